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

//! Subscription Table: soft-state wildcard routes toward subscribers.
//!
//! Every next-hop carries its own expiry. Expiries are queued on a
//! [`DelayQueue`] owned by the table and drained through [`St::next_expired`],
//! so a timer can only fire on the task that owns the table. Refreshing a
//! next-hop cancels its queued expiry before scheduling the new one.
//!
//! Tables created with a finite lifetime schedule timers on the tokio clock and
//! must be used from within a runtime. Lifetimes are capped at [`MAX_LIFETIME`],
//! which keeps every deadline inside the range the delay queue accepts.

use crate::cd::Cd;
use crate::face::FaceId;
use crate::observability::events;
use crate::routing::wildcard::pattern_matches;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::future::poll_fn;
use std::task::Poll;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::time::delay_queue::{DelayQueue, Key};
use tracing::{debug, info, warn};

const COMPONENT: &str = "st";
const NO_EXPIRY: &str = "INFINITY";
const EXPIRY_FORMAT: &str = "%Y-%b-%d %H:%M:%S";

/// Longest next-hop lifetime a table schedules.
pub const MAX_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug)]
struct Expiry {
    key: Key,
    deadline: Instant,
}

#[derive(Debug)]
struct StEntry {
    cd: Cd,
    next_hops: BTreeMap<FaceId, Option<Expiry>>,
}

impl StEntry {
    fn dump_line(&self) -> String {
        let mut line = self.cd.to_string();
        line.push('=');
        for (face_id, expiry) in &self.next_hops {
            match expiry {
                Some(expiry) => {
                    let _ = write!(line, "({face_id},{})", format_deadline(expiry.deadline));
                }
                None => {
                    let _ = write!(line, "({face_id},{NO_EXPIRY})");
                }
            }
        }
        line
    }
}

fn format_deadline(deadline: Instant) -> String {
    let remaining = deadline.saturating_duration_since(Instant::now());
    let remaining =
        chrono::Duration::from_std(remaining).unwrap_or_else(|_| chrono::Duration::zero());
    (chrono::Local::now() + remaining)
        .format(EXPIRY_FORMAT)
        .to_string()
}

#[derive(Debug)]
pub struct St {
    entries: Vec<StEntry>,
    lifetime: Option<Duration>,
    expirations: DelayQueue<(Cd, FaceId)>,
}

impl Default for St {
    fn default() -> Self {
        Self::new(None)
    }
}

impl St {
    /// Creates a table whose next-hops expire `lifetime` after their last
    /// refresh. `None` disables expiry; longer lifetimes are cut to
    /// [`MAX_LIFETIME`].
    pub fn new(lifetime: Option<Duration>) -> Self {
        let lifetime = lifetime.map(|requested| {
            if requested > MAX_LIFETIME {
                warn!(
                    event = events::ST_LIFETIME_CAPPED,
                    component = COMPONENT,
                    requested_secs = requested.as_secs(),
                    max_secs = MAX_LIFETIME.as_secs(),
                    "ST lifetime capped"
                );
                MAX_LIFETIME
            } else {
                requested
            }
        });
        Self {
            entries: Vec::new(),
            lifetime,
            expirations: DelayQueue::new(),
        }
    }

    pub fn lifetime(&self) -> Option<Duration> {
        self.lifetime
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, cd: &Cd) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.cd == cd)
    }

    fn cancel(expirations: &mut DelayQueue<(Cd, FaceId)>, expiry: Option<Expiry>) {
        if let Some(expiry) = expiry {
            expirations.remove(&expiry.key);
        }
    }

    /// Registers or refreshes `face_id` as a subscriber of `cd`.
    ///
    /// Always asks the caller to forward the subscription upstream and hands the
    /// CD back unchanged.
    pub fn add(&mut self, cd: Cd, face_id: FaceId) -> (bool, Cd) {
        let index = match self.position(&cd) {
            Some(index) => index,
            None => {
                self.entries.push(StEntry {
                    cd: cd.clone(),
                    next_hops: BTreeMap::new(),
                });
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[index];
        let previous = entry.next_hops.remove(&face_id);
        let refreshed = previous.is_some();
        Self::cancel(&mut self.expirations, previous.flatten());

        let expiry = self.lifetime.map(|lifetime| Expiry {
            key: self.expirations.insert((cd.clone(), face_id), lifetime),
            deadline: Instant::now() + lifetime,
        });
        entry.next_hops.insert(face_id, expiry);

        let event = if refreshed {
            events::ST_REFRESH
        } else {
            events::ST_ADD
        };
        info!(
            event,
            component = COMPONENT,
            cd = %cd,
            face_id,
            "registered ST next-hop"
        );
        (true, cd)
    }

    /// Removes one next-hop, dropping the entry once it has none left. Returns
    /// whether the next-hop existed.
    pub fn remove_next_hop(&mut self, cd: &Cd, face_id: FaceId) -> bool {
        let Some(index) = self.position(cd) else {
            return false;
        };
        let entry = &mut self.entries[index];
        let removed = match entry.next_hops.remove(&face_id) {
            Some(expiry) => {
                Self::cancel(&mut self.expirations, expiry);
                true
            }
            None => false,
        };
        if entry.next_hops.is_empty() {
            self.entries.remove(index);
        }
        info!(
            event = events::ST_REMOVE_NEXT_HOP,
            component = COMPONENT,
            cd = %cd,
            face_id,
            removed,
            "removed ST next-hop"
        );
        removed
    }

    /// Removes the whole entry for `cd`. Returns whether it existed.
    pub fn remove_entry(&mut self, cd: &Cd) -> bool {
        let Some(index) = self.position(cd) else {
            return false;
        };
        let entry = self.entries.remove(index);
        for expiry in entry.next_hops.into_values() {
            Self::cancel(&mut self.expirations, expiry);
        }
        info!(
            event = events::ST_REMOVE_ENTRY,
            component = COMPONENT,
            cd = %cd,
            "removed ST entry"
        );
        true
    }

    /// Removes `face_id` from every entry. Returns the number of next-hops removed.
    pub fn remove_face(&mut self, face_id: FaceId) -> usize {
        let expirations = &mut self.expirations;
        let mut removed = 0;
        self.entries.retain_mut(|entry| {
            if let Some(expiry) = entry.next_hops.remove(&face_id) {
                Self::cancel(expirations, expiry);
                removed += 1;
            }
            !entry.next_hops.is_empty()
        });
        debug!(
            event = events::ST_REMOVE_FACE,
            component = COMPONENT,
            face_id,
            count = removed,
            "removed face from ST"
        );
        removed
    }

    pub fn clear(&mut self) {
        info!(
            event = events::ST_CLEAR,
            component = COMPONENT,
            count = self.entries.len(),
            "clearing ST"
        );
        self.entries.clear();
        self.expirations.clear();
    }

    /// Union of the next-hops of every entry whose pattern matches `cd`.
    pub fn matches(&self, cd: &Cd) -> BTreeSet<FaceId> {
        self.entries
            .iter()
            .filter(|entry| pattern_matches(entry.cd.elements(), cd.elements()))
            .flat_map(|entry| entry.next_hops.keys().copied())
            .collect()
    }

    /// Waits for the next next-hop to expire, removes it and returns it.
    ///
    /// Pending forever while nothing is scheduled, which makes it safe to poll
    /// from a `select!` loop.
    pub async fn next_expired(&mut self) -> (Cd, FaceId) {
        let (cd, face_id) = poll_fn(|cx| match self.expirations.poll_expired(cx) {
            Poll::Ready(Some(expired)) => Poll::Ready(expired.into_inner()),
            Poll::Ready(None) | Poll::Pending => Poll::Pending,
        })
        .await;

        if let Some(index) = self.position(&cd) {
            let entry = &mut self.entries[index];
            entry.next_hops.remove(&face_id);
            if entry.next_hops.is_empty() {
                self.entries.remove(index);
            }
        }
        info!(
            event = events::ST_EXPIRE,
            component = COMPONENT,
            cd = %cd,
            face_id,
            "ST next-hop expired"
        );
        (cd, face_id)
    }

    /// One line per entry: `/a=(101,2026-Jan-01 12:00:00)(102,INFINITY)`.
    pub fn dump(&self) -> Vec<String> {
        self.entries.iter().map(StEntry::dump_line).collect()
    }
}
