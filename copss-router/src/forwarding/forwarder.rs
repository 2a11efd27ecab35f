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

//! Router forwarder: drives FIB and ST lookups for each face event.

use super::FaceEventHandler;
use crate::data_plane::face_registry::FaceRegistry;
use crate::face::FaceId;
use crate::observability::{events, fields};
use crate::packet::{Packet, Pub, Sub};
use crate::routing::{Fib, St};
use bytes::Bytes;
use std::collections::BTreeSet;
use tracing::{debug, info, warn, Level};

const COMPONENT: &str = "forwarder";

/// Borrowing view over the router's tables for the duration of one event.
pub struct Forwarder<'a> {
    fib: &'a mut Fib,
    st: &'a mut St,
    faces: &'a mut FaceRegistry,
}

impl<'a> Forwarder<'a> {
    pub fn new(fib: &'a mut Fib, st: &'a mut St, faces: &'a mut FaceRegistry) -> Self {
        Self { fib, st, faces }
    }

    /// Queues `wire` on every target face still registered.
    fn send_to(&self, targets: &BTreeSet<FaceId>, wire: &Bytes) -> usize {
        let mut sent = 0;
        for face_id in targets {
            let Some(face) = self.faces.find(*face_id) else {
                debug!(
                    event = events::FORWARD_SEND_FAILED,
                    component = COMPONENT,
                    face_id,
                    reason = fields::REASON_FACE_MISSING,
                    "target face not registered"
                );
                continue;
            };
            match face.send(wire.clone()) {
                Ok(()) => sent += 1,
                Err(err) => warn!(
                    event = events::FORWARD_SEND_FAILED,
                    component = COMPONENT,
                    face_id,
                    err = %err,
                    "failed to queue packet on face"
                ),
            }
        }
        sent
    }
}

impl FaceEventHandler for Forwarder<'_> {
    /// Registers the subscription in the ST and, when asked to, forwards it
    /// toward the rendezvous point.
    fn on_sub_received(&mut self, face_id: FaceId, sub: &Sub) -> usize {
        info!(
            event = events::SUB_RECEIVED,
            component = COMPONENT,
            face_id,
            cd = %sub.cd,
            "Sub received"
        );
        let (forward, cd) = self.st.add(sub.cd.clone(), face_id);
        let mut sent = 0;
        if forward {
            let targets = self.fib.matches(&cd);
            let wire = Packet::Sub(Sub::new(cd)).encode();
            sent = self.send_to(&targets, &wire);
            if sent > 0 {
                info!(
                    event = events::SUB_FORWARD,
                    component = COMPONENT,
                    cd = %sub.cd,
                    targets = fields::format_face_ids(&targets),
                    "Sub forwarded"
                );
            }
        }
        if sent == 0 {
            info!(
                event = events::SUB_NOT_FORWARDED,
                component = COMPONENT,
                cd = %sub.cd,
                reason = fields::REASON_NO_ROUTE,
                "Sub not forwarded"
            );
        }
        sent
    }

    /// Passes the publication, unmodified, toward the rendezvous point.
    fn on_pub_to_rp_received(
        &mut self,
        face_id: FaceId,
        publication: &Pub,
        wire: &Bytes,
    ) -> usize {
        info!(
            event = events::PUB_TO_RP_RECEIVED,
            component = COMPONENT,
            face_id,
            cd = %publication.cd,
            "PubToRp received"
        );
        let targets = self.fib.matches(&publication.cd);
        let sent = self.send_to(&targets, wire);
        if sent > 0 {
            info!(
                event = events::PUB_TO_RP_FORWARD,
                component = COMPONENT,
                cd = %publication.cd,
                targets = fields::format_face_ids(&targets),
                "PubToRp forwarded"
            );
        } else {
            info!(
                event = events::PUB_TO_RP_NOT_FORWARDED,
                component = COMPONENT,
                cd = %publication.cd,
                reason = fields::REASON_NO_ROUTE,
                "PubToRp not forwarded"
            );
        }
        sent
    }

    /// Fans the publication out to every matching subscriber.
    fn on_pub_from_rp_received(
        &mut self,
        face_id: FaceId,
        publication: &Pub,
        wire: &Bytes,
    ) -> usize {
        info!(
            event = events::PUB_FROM_RP_RECEIVED,
            component = COMPONENT,
            face_id,
            cd = %publication.cd,
            "PubFromRp received"
        );
        let targets = self.st.matches(&publication.cd);
        let sent = self.send_to(&targets, wire);
        if sent > 0 {
            let targets_field = tracing::enabled!(Level::INFO)
                .then(|| fields::format_face_ids(&targets))
                .unwrap_or_default();
            info!(
                event = events::PUB_FROM_RP_FORWARD,
                component = COMPONENT,
                cd = %publication.cd,
                targets = targets_field.as_str(),
                "PubFromRp forwarded"
            );
        } else {
            info!(
                event = events::PUB_FROM_RP_NOT_FORWARDED,
                component = COMPONENT,
                cd = %publication.cd,
                reason = fields::REASON_NO_SUBSCRIBER,
                "PubFromRp not forwarded"
            );
        }
        sent
    }

    /// Forgets the face: ST first, then FIB, then the registry.
    fn on_face_shutdown(&mut self, face_id: FaceId) {
        info!(
            event = events::FACE_SHUTDOWN,
            component = COMPONENT,
            face_id,
            "face gone; removing from tables"
        );
        self.st.remove_face(face_id);
        self.fib.remove_face(face_id);
        self.faces.remove(face_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cd::Cd;
    use crate::face::{Face, FaceInfo, FaceKind, FaceTransport};

    struct Harness {
        fib: Fib,
        st: St,
        faces: FaceRegistry,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                fib: Fib::new(),
                st: St::default(),
                faces: FaceRegistry::new(),
            }
        }

        fn connect(&mut self, face_id: FaceId) -> FaceTransport {
            let info = FaceInfo {
                kind: FaceKind::Tcp,
                local: "127.0.0.1:9876".parse().unwrap(),
                remote: format!("10.0.0.{}:9876", face_id % 250).parse().unwrap(),
            };
            let (face, transport) = Face::new(face_id, info);
            self.faces.insert(face);
            transport
        }

        fn forwarder(&mut self) -> Forwarder<'_> {
            Forwarder::new(&mut self.fib, &mut self.st, &mut self.faces)
        }
    }

    fn cd(text: &str) -> Cd {
        text.parse().unwrap()
    }

    fn publication(text: &str) -> (Pub, Bytes) {
        let publication = Pub::new(cd(text), &b"payload"[..]);
        let wire = Packet::PubFromRp(publication.clone()).encode();
        (publication, wire)
    }

    #[test]
    fn sub_is_recorded_and_forwarded_along_fib() {
        let mut harness = Harness::new();
        let mut upstream = harness.connect(3);
        let _subscriber = harness.connect(7);
        harness.fib.add("/news", 3, 1).unwrap();

        let sub = Sub::new(cd("/news(/sports)/today"));
        assert_eq!(harness.forwarder().on_sub_received(7, &sub), 1);

        let sent = upstream.outbound.try_recv().unwrap();
        assert_eq!(Packet::decode(&sent).unwrap(), Packet::Sub(sub.clone()));
        assert_eq!(harness.st.matches(&cd("/news/sports/today")), [7].into());
    }

    #[test]
    fn sub_without_route_is_still_recorded() {
        let mut harness = Harness::new();
        let _subscriber = harness.connect(7);

        assert_eq!(harness.forwarder().on_sub_received(7, &Sub::new(cd("/a"))), 0);
        assert_eq!(harness.st.len(), 1);
    }

    #[test]
    fn pub_to_rp_is_forwarded_byte_for_byte() {
        let mut harness = Harness::new();
        let mut upstream = harness.connect(3);
        harness.fib.add("/a", 3, 1).unwrap();

        let publication = Pub::new(cd("/a/b"), &b"x"[..]);
        let wire = Packet::PubToRp(publication.clone()).encode();
        assert_eq!(
            harness.forwarder().on_pub_to_rp_received(1, &publication, &wire),
            1
        );
        assert_eq!(upstream.outbound.try_recv().unwrap(), wire);
    }

    #[test]
    fn pub_from_rp_fans_out_once_per_face() {
        let mut harness = Harness::new();
        let mut first = harness.connect(7);
        let mut second = harness.connect(8);
        harness.st.add(cd("/news"), 7);
        harness.st.add(cd("/news(/sports)/today"), 7);
        harness.st.add(cd("/news/sports"), 8);

        let (publication, wire) = publication("/news/sports/today");
        assert_eq!(
            harness
                .forwarder()
                .on_pub_from_rp_received(3, &publication, &wire),
            2
        );
        assert_eq!(first.outbound.try_recv().unwrap(), wire);
        assert!(first.outbound.try_recv().is_err());
        assert_eq!(second.outbound.try_recv().unwrap(), wire);
    }

    #[test]
    fn unregistered_targets_are_skipped() {
        let mut harness = Harness::new();
        harness.st.add(cd("/a"), 42);

        let (publication, wire) = publication("/a");
        assert_eq!(
            harness
                .forwarder()
                .on_pub_from_rp_received(3, &publication, &wire),
            0
        );
    }

    #[test]
    fn face_shutdown_clears_every_table() {
        let mut harness = Harness::new();
        let _face = harness.connect(7);
        harness.fib.add("/a", 7, 1).unwrap();
        harness.st.add(cd("/b"), 7);

        harness.forwarder().on_face_shutdown(7);
        assert!(harness.fib.is_empty());
        assert!(harness.st.is_empty());
        assert!(harness.faces.find(7).is_none());

        harness.forwarder().on_face_shutdown(7);
        assert!(harness.faces.is_empty());
    }

    #[test]
    fn on_packet_dispatches_by_kind() {
        let mut harness = Harness::new();
        let mut upstream = harness.connect(3);
        harness.fib.add("/", 3, 1).unwrap();

        let packet = Packet::PubToRp(Pub::new(cd("/x"), Bytes::new()));
        let wire = packet.encode();
        assert_eq!(harness.forwarder().on_packet(1, &packet, &wire), 1);
        assert_eq!(upstream.outbound.try_recv().unwrap(), wire);
    }
}
