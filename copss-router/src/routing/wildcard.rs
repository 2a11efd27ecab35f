/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Wildcard matching of a stored CD pattern against a concrete CD.

use crate::cd::CdElement;
use crate::observability::events;
use tracing::trace;

const COMPONENT: &str = "wildcard";

/// Single left-to-right pass over `pattern` and `input`, no backtracking.
///
/// - pattern exhausted: match, trailing input is accepted
/// - input exhausted first: no match
/// - asterisk: step past it without consuming input
/// - equal values: consume one element of each
/// - unequal optional: skip to the next component, eliding the rest of the group
/// - unequal component: no match
pub fn pattern_matches(pattern: &[CdElement], input: &[CdElement]) -> bool {
    let mut e = 0;
    let mut i = 0;
    loop {
        let Some(expected) = pattern.get(e) else {
            return true;
        };
        let Some(actual) = input.get(i) else {
            return false;
        };
        trace!(
            event = events::ST_WILDCARD_STEP,
            component = COMPONENT,
            pattern_index = e,
            input_index = i,
            "wildcard step"
        );
        match expected {
            CdElement::Asterisk => e += 1,
            _ if expected.value() == actual.value() => {
                e += 1;
                i += 1;
            }
            CdElement::Optional(_) => {
                while pattern.get(e).is_some_and(|element| !element.is_component()) {
                    e += 1;
                }
            }
            CdElement::Component(_) => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pattern_matches;
    use crate::cd::Cd;

    fn matches(pattern: &str, input: &str) -> bool {
        let pattern: Cd = pattern.parse().unwrap();
        let input: Cd = input.parse().unwrap();
        pattern_matches(pattern.elements(), input.elements())
    }

    #[test]
    fn optional_may_be_present_or_elided() {
        assert!(matches("/a(/x)/b", "/a/b"));
        assert!(matches("/a(/x)/b", "/a/x/b"));
        assert!(!matches("/a(/x)/b", "/a/y/b"));
        assert!(!matches("/a(/x)/b", "/a/z"));
        assert!(!matches("/a(/x)/b", "/a/x"));
    }

    #[test]
    fn pattern_may_be_a_prefix_of_the_input() {
        assert!(matches("/a", "/a/b/c"));
        assert!(matches("/", "/a"));
        assert!(matches("/a(/x)/b", "/a/x/b/c"));
        assert!(!matches("/a/b/c", "/a/b"));
    }

    #[test]
    fn group_of_several_optionals() {
        assert!(matches("/news(/sports/local)/today", "/news/sports/local/today"));
        assert!(matches("/news(/sports/local)/today", "/news/today"));
        // A partially matched group elides the remainder.
        assert!(matches("/news(/sports/local)/today", "/news/sports/today"));
        assert!(!matches("/news(/sports/local)/today", "/news/weather/today"));
    }

    #[test]
    fn components_must_match_exactly() {
        assert!(!matches("/a/b", "/a/c"));
        assert!(!matches("/a/b", "/b/b"));
        assert!(matches("/a/b", "/a/b"));
    }
}
