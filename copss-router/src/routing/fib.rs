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

//! Forwarding Information Base: exact-prefix routes toward the rendezvous point.

use crate::cd::{Cd, CdParseError};
use crate::face::FaceId;
use crate::observability::events;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use tracing::{debug, info};

const COMPONENT: &str = "fib";

/// One route: a CD prefix and its weighted next-hops, keyed by face.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FibEntry {
    cd: Cd,
    next_hops: BTreeMap<FaceId, u64>,
}

impl FibEntry {
    fn new(cd: Cd) -> Self {
        Self {
            cd,
            next_hops: BTreeMap::new(),
        }
    }

    pub fn cd(&self) -> &Cd {
        &self.cd
    }

    /// `(face, cost)` pairs ordered by face id.
    pub fn next_hops(&self) -> impl Iterator<Item = (FaceId, u64)> + '_ {
        self.next_hops.iter().map(|(face_id, cost)| (*face_id, *cost))
    }

    /// Cheapest next-hop; on equal cost the lowest face id.
    fn best_next_hop(&self) -> Option<FaceId> {
        self.next_hops
            .iter()
            .min_by_key(|(_, cost)| **cost)
            .map(|(face_id, _)| *face_id)
    }

    fn dump_line(&self) -> String {
        let mut line = self.cd.to_string();
        line.push('=');
        for (face_id, cost) in self.next_hops() {
            let _ = write!(line, "({face_id},{cost})");
        }
        line
    }
}

#[derive(Clone, Debug, Default)]
pub struct Fib {
    entries: Vec<FibEntry>,
}

impl Fib {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &FibEntry> {
        self.entries.iter()
    }

    fn position(&self, cd: &Cd) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.cd == cd)
    }

    /// Adds a route for `name` through `face_id`, replacing any prior cost for
    /// that face.
    pub fn add(&mut self, name: &str, face_id: FaceId, cost: u64) -> Result<(), CdParseError> {
        let cd = Cd::parse(name)?;
        self.insert(cd, face_id, cost);
        Ok(())
    }

    /// Adds a route for an already parsed CD.
    pub fn insert(&mut self, cd: Cd, face_id: FaceId, cost: u64) {
        info!(
            event = events::FIB_ADD,
            component = COMPONENT,
            cd = %cd,
            face_id,
            cost,
            "adding FIB next-hop"
        );
        let index = match self.position(&cd) {
            Some(index) => index,
            None => {
                self.entries.push(FibEntry::new(cd));
                self.entries.len() - 1
            }
        };
        let next_hops = &mut self.entries[index].next_hops;
        next_hops.remove(&face_id);
        next_hops.insert(face_id, cost);
    }

    /// Removes one next-hop from the entry for `name`, dropping the entry once it
    /// has none left. Returns whether the next-hop existed.
    pub fn remove_next_hop(&mut self, name: &str, face_id: FaceId) -> Result<bool, CdParseError> {
        let cd = Cd::parse(name)?;
        let Some(index) = self.position(&cd) else {
            return Ok(false);
        };
        let removed = self.entries[index].next_hops.remove(&face_id).is_some();
        if self.entries[index].next_hops.is_empty() {
            self.entries.remove(index);
        }
        info!(
            event = events::FIB_REMOVE_NEXT_HOP,
            component = COMPONENT,
            cd = %cd,
            face_id,
            removed,
            "removed FIB next-hop"
        );
        Ok(removed)
    }

    /// Removes the whole entry for `name`. Returns whether it existed.
    pub fn remove_entry(&mut self, name: &str) -> Result<bool, CdParseError> {
        let cd = Cd::parse(name)?;
        let removed = match self.position(&cd) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        };
        info!(
            event = events::FIB_REMOVE_ENTRY,
            component = COMPONENT,
            cd = %cd,
            removed,
            "removed FIB entry"
        );
        Ok(removed)
    }

    /// Removes `face_id` from every entry. Returns the number of next-hops removed.
    pub fn remove_face(&mut self, face_id: FaceId) -> usize {
        let mut removed = 0;
        self.entries.retain_mut(|entry| {
            if entry.next_hops.remove(&face_id).is_some() {
                removed += 1;
            }
            !entry.next_hops.is_empty()
        });
        debug!(
            event = events::FIB_REMOVE_FACE,
            component = COMPONENT,
            face_id,
            count = removed,
            "removed face from FIB"
        );
        removed
    }

    pub fn clear(&mut self) {
        info!(
            event = events::FIB_CLEAR,
            component = COMPONENT,
            count = self.entries.len(),
            "clearing FIB"
        );
        self.entries.clear();
    }

    /// Longest-prefix lookup.
    ///
    /// Picks the entry with the most elements whose CD is an exact prefix of `cd`,
    /// then that entry's cheapest next-hop. The result holds at most one face.
    pub fn matches(&self, cd: &Cd) -> BTreeSet<FaceId> {
        let mut best: Option<&FibEntry> = None;
        for entry in &self.entries {
            if !entry.cd.is_prefix_of(cd) {
                continue;
            }
            if best.map_or(true, |current| entry.cd.len() > current.cd.len()) {
                best = Some(entry);
            }
        }
        best.and_then(FibEntry::best_next_hop).into_iter().collect()
    }

    /// One line per entry: `/a/b=(1,10)(2,5)`.
    pub fn dump(&self) -> Vec<String> {
        self.entries.iter().map(FibEntry::dump_line).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cd(text: &str) -> Cd {
        text.parse().unwrap()
    }

    fn faces(ids: &[FaceId]) -> BTreeSet<FaceId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn lowest_cost_next_hop_of_longest_prefix_wins() {
        let mut fib = Fib::new();
        fib.add("a/b", 1, 10).unwrap();
        fib.add("a/b", 2, 5).unwrap();
        assert_eq!(fib.matches(&cd("/a/b/c")), faces(&[2]));

        assert!(fib.remove_next_hop("a/b", 2).unwrap());
        assert_eq!(fib.matches(&cd("/a/b/c")), faces(&[1]));
    }

    #[test]
    fn longer_prefix_beats_cheaper_shorter_prefix() {
        let mut fib = Fib::new();
        fib.add("/a", 1, 1).unwrap();
        fib.add("/a/b", 2, 100).unwrap();
        fib.add("/a/b/c/d", 3, 1).unwrap();

        assert_eq!(fib.matches(&cd("/a/b/c")), faces(&[2]));
        assert_eq!(fib.matches(&cd("/a/x")), faces(&[1]));
        assert_eq!(fib.matches(&cd("/a")), faces(&[1]));
        assert!(fib.matches(&cd("/b")).is_empty());
    }

    #[test]
    fn root_route_matches_everything() {
        let mut fib = Fib::new();
        fib.add("/", 9, 1).unwrap();
        assert_eq!(fib.matches(&cd("/anything/at/all")), faces(&[9]));
        assert_eq!(fib.matches(&Cd::root()), faces(&[9]));
    }

    #[test]
    fn equal_cost_prefers_lowest_face_id() {
        let mut fib = Fib::new();
        fib.add("/a", 7, 3).unwrap();
        fib.add("/a", 4, 3).unwrap();
        assert_eq!(fib.matches(&cd("/a/b")), faces(&[4]));
    }

    #[test]
    fn readding_a_face_replaces_its_cost() {
        let mut fib = Fib::new();
        fib.add("/a", 1, 1).unwrap();
        fib.add("/a", 2, 5).unwrap();
        fib.add("/a", 1, 10).unwrap();

        assert_eq!(fib.len(), 1);
        assert_eq!(fib.matches(&cd("/a/b")), faces(&[2]));
        assert_eq!(fib.dump(), vec!["/a=(1,10)(2,5)".to_string()]);
    }

    #[test]
    fn removing_last_next_hop_drops_the_entry() {
        let mut fib = Fib::new();
        fib.add("/a", 1, 1).unwrap();
        assert!(!fib.remove_next_hop("/a", 2).unwrap());
        assert_eq!(fib.len(), 1);
        assert!(fib.remove_next_hop("/a", 1).unwrap());
        assert!(fib.is_empty());
        assert!(!fib.remove_next_hop("/a", 1).unwrap());
    }

    #[test]
    fn remove_entry_ignores_next_hops() {
        let mut fib = Fib::new();
        fib.add("/a", 1, 1).unwrap();
        fib.add("/a", 2, 1).unwrap();
        fib.add("/a/b", 2, 1).unwrap();

        assert!(fib.remove_entry("/a").unwrap());
        assert!(!fib.remove_entry("/a").unwrap());
        assert_eq!(fib.dump(), vec!["/a/b=(2,1)".to_string()]);
    }

    #[test]
    fn remove_face_sweeps_every_entry_and_is_idempotent() {
        let mut fib = Fib::new();
        fib.add("/a", 1, 1).unwrap();
        fib.add("/a", 2, 1).unwrap();
        fib.add("/b", 2, 1).unwrap();

        assert_eq!(fib.remove_face(2), 2);
        assert_eq!(fib.dump(), vec!["/a=(1,1)".to_string()]);
        assert_eq!(fib.remove_face(2), 0);
        assert_eq!(fib.dump(), vec!["/a=(1,1)".to_string()]);
    }

    #[test]
    fn clear_empties_the_table() {
        let mut fib = Fib::new();
        fib.add("/a", 1, 1).unwrap();
        fib.clear();
        assert!(fib.matches(&cd("/a")).is_empty());
        assert!(fib.dump().is_empty());
    }

    #[test]
    fn malformed_names_are_rejected_without_side_effects() {
        let mut fib = Fib::new();
        assert!(fib.add("/a)/b", 1, 1).is_err());
        assert!(fib.remove_entry("/a//b").is_err());
        assert!(fib.is_empty());
    }

    #[test]
    fn prefix_match_is_not_wildcard_aware() {
        let mut fib = Fib::new();
        fib.add("/a(/x)/b", 1, 1).unwrap();
        assert!(fib.matches(&cd("/a/x/b")).is_empty());
        assert_eq!(fib.matches(&cd("/a(/x)/b/c")), faces(&[1]));
    }
}
