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

//! Content Descriptor (CD): the hierarchical, optionally wildcarded name carried by
//! subscriptions and publications.
//!
//! A CD is an ordered sequence of [`CdElement`]s. Text form is `/`-separated with a
//! single optional group written in brackets, e.g. `/news(/sports/local)/today`.
//!
//! ```
//! use copss_router::cd::{Cd, CdElement};
//!
//! let cd: Cd = "/news(/sports)/today".parse().unwrap();
//! assert_eq!(cd.len(), 4);
//! assert_eq!(cd.elements()[2], CdElement::Asterisk);
//! assert_eq!(cd.to_string(), "/news(/sports)/today");
//! ```

mod grammar;
mod render;
mod wire;

pub use grammar::CdParseError;

use crate::tlv;
use std::cmp::Ordering;

/// One element of a CD.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum CdElement {
    /// Exact-match element.
    Component(Vec<u8>),
    /// Element inside a bracketed group; elided when it does not match.
    Optional(Vec<u8>),
    /// Closes an optional group. Never carries a value.
    Asterisk,
}

impl CdElement {
    pub fn component(value: impl Into<Vec<u8>>) -> Self {
        Self::Component(value.into())
    }

    pub fn optional(value: impl Into<Vec<u8>>) -> Self {
        Self::Optional(value.into())
    }

    /// TLV type the element is encoded with.
    pub fn tlv_type(&self) -> u64 {
        match self {
            Self::Component(_) => tlv::CD_COMPONENT,
            Self::Optional(_) => tlv::CD_OPTIONAL,
            Self::Asterisk => tlv::CD_ASTERISK,
        }
    }

    pub fn value(&self) -> &[u8] {
        match self {
            Self::Component(value) | Self::Optional(value) => value,
            Self::Asterisk => &[],
        }
    }

    pub fn is_component(&self) -> bool {
        matches!(self, Self::Component(_))
    }
}

impl Ord for CdElement {
    /// Orders by TLV type, then value length, then value bytes.
    fn cmp(&self, other: &Self) -> Ordering {
        self.tlv_type()
            .cmp(&other.tlv_type())
            .then_with(|| self.value().len().cmp(&other.value().len()))
            .then_with(|| self.value().cmp(other.value()))
    }
}

impl PartialOrd for CdElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A Content Descriptor.
///
/// Ordering is elementwise by [`CdElement`] order, a shorter CD sorting before any
/// CD it is a prefix of.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Cd {
    elements: Vec<CdElement>,
}

impl Cd {
    /// The empty CD, rendered as `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a CD from raw elements without checking the text grammar.
    pub fn from_elements(elements: Vec<CdElement>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[CdElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// True when `self`'s elements are an exact elementwise prefix of `other`'s.
    ///
    /// Brackets get no special treatment here: `/a(/x)/b` is a prefix only of CDs
    /// that literally start with the same optional and asterisk elements.
    pub fn is_prefix_of(&self, other: &Cd) -> bool {
        other.elements.starts_with(&self.elements)
    }
}

impl From<Vec<CdElement>> for Cd {
    fn from(elements: Vec<CdElement>) -> Self {
        Self::from_elements(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cd(text: &str) -> Cd {
        text.parse().expect("test CD should parse")
    }

    #[test]
    fn element_order_is_type_then_length_then_bytes() {
        let short = CdElement::component("zz");
        let long = CdElement::component("aaa");
        assert!(short < long);
        assert!(CdElement::component("ab") < CdElement::component("ac"));
        assert!(CdElement::component("zzzz") < CdElement::optional("a"));
        assert!(CdElement::optional("zzzz") < CdElement::Asterisk);
    }

    #[test]
    fn cd_order_is_elementwise_then_by_length() {
        assert!(cd("/a") < cd("/a/b"));
        assert!(cd("/a/b") < cd("/a/c"));
        assert!(cd("/b/a") < cd("/aa"));
        assert!(Cd::root() < cd("/a"));
        assert_eq!(cd("/a/b").cmp(&cd("a/b/")), Ordering::Equal);
    }

    #[test]
    fn cd_order_matches_encoded_byte_order() {
        let mut samples = vec![
            cd("/a"),
            cd("/a/b"),
            cd("/b"),
            cd("/aa"),
            cd("/a(/x)/b"),
            cd("/a(/x/yy)/b"),
            cd("/a/b/c"),
        ];
        samples.sort();
        for pair in samples.windows(2) {
            assert!(pair[0].encode_value() <= pair[1].encode_value());
        }
    }

    #[test]
    fn is_prefix_of_is_exact_and_reflexive() {
        let a = cd("/a");
        let ab = cd("/a/b");
        let abc = cd("/a/b/c");

        assert!(a.is_prefix_of(&a));
        assert!(a.is_prefix_of(&ab) && ab.is_prefix_of(&abc) && a.is_prefix_of(&abc));
        assert!(!ab.is_prefix_of(&a));
        assert!(!cd("/a/c").is_prefix_of(&abc));
        assert!(Cd::root().is_prefix_of(&abc));
        assert!(!cd("/a(/x)/b").is_prefix_of(&cd("/a/x/b")));
    }
}
