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

//! Deterministic benchmark fixtures for the Criterion harness.

use crate::cd::{Cd, CdElement};
use crate::face::FaceId;
use crate::routing::{Fib, St};

const REGIONS: usize = 16;
const FIRST_FACE: FaceId = 101;
const FACES: usize = 8;

fn component(text: String) -> CdElement {
    CdElement::component(text.into_bytes())
}

fn topic(index: usize) -> Vec<CdElement> {
    vec![
        component(format!("region{}", index % REGIONS)),
        component(format!("topic{index}")),
    ]
}

fn face(index: usize) -> FaceId {
    FIRST_FACE + (index % FACES) as FaceId
}

/// Publication CDs one or two levels below every registered topic.
fn queries(rows: usize) -> Vec<Cd> {
    (0..rows)
        .map(|index| {
            let mut elements = topic(index);
            elements.push(component("item".to_string()));
            if index % 2 == 0 {
                elements.push(component(format!("detail{index}")));
            }
            Cd::from_elements(elements)
        })
        .collect()
}

pub struct FibLookupFixture {
    fib: Fib,
    queries: Vec<Cd>,
}

impl FibLookupFixture {
    /// A FIB with one region-level and one topic-level route per row.
    pub fn new(rows: usize) -> Self {
        let mut fib = Fib::new();
        for index in 0..rows {
            let elements = topic(index);
            fib.insert(Cd::from_elements(elements[..1].to_vec()), face(index + 1), 10);
            fib.insert(Cd::from_elements(elements), face(index), (index % 5) as u64);
        }
        Self {
            fib,
            queries: queries(rows),
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.queries
            .iter()
            .map(|query| self.fib.matches(query).len())
            .sum()
    }
}

pub struct StMatchFixture {
    st: St,
    queries: Vec<Cd>,
}

impl StMatchFixture {
    /// An ST where every third subscription leaves the topic optional.
    pub fn new(rows: usize) -> Self {
        let mut st = St::new(None);
        for index in 0..rows {
            let mut elements = topic(index);
            if index % 3 == 0 {
                let topic = elements.remove(1);
                elements.push(CdElement::optional(topic.value().to_vec()));
                elements.push(CdElement::Asterisk);
            }
            elements.push(component("item".to_string()));
            st.add(Cd::from_elements(elements), face(index));
        }
        Self {
            st,
            queries: queries(rows),
        }
    }

    pub fn match_count(&self) -> usize {
        self.queries
            .iter()
            .map(|query| self.st.matches(query).len())
            .sum()
    }
}

pub struct CdParseFixture {
    texts: Vec<String>,
}

impl CdParseFixture {
    pub fn new(rows: usize) -> Self {
        let texts = (0..rows)
            .map(|index| {
                format!(
                    "/region{}(/topic{index}/sub%20{index})/item",
                    index % REGIONS
                )
            })
            .collect();
        Self { texts }
    }

    pub fn parse_count(&self) -> usize {
        self.texts
            .iter()
            .filter(|text| Cd::parse(text).is_ok())
            .count()
    }
}
