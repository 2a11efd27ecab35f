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

//! Forwarding layer.
//!
//! Reacts to the four face events (subscription received, publication toward the
//! rendezvous point, publication from the rendezvous point, face gone) by
//! consulting the routing tables and queueing packets on faces. Holds no state of
//! its own: handlers borrow the tables owned by the router loop.

mod forwarder;
mod rendezvous;

pub use forwarder::Forwarder;
pub use rendezvous::RendezvousForwarder;

use crate::face::FaceId;
use crate::packet::{Packet, Pub, Sub};
use bytes::Bytes;

/// Handler for decoded packets and face loss, one implementation per node role.
///
/// Publication handlers also receive the packet as it arrived on the wire so it
/// can be passed on unmodified. Packet handlers return the number of faces the
/// packet was queued on.
pub trait FaceEventHandler {
    fn on_sub_received(&mut self, face_id: FaceId, sub: &Sub) -> usize;

    fn on_pub_to_rp_received(
        &mut self,
        face_id: FaceId,
        publication: &Pub,
        wire: &Bytes,
    ) -> usize;

    fn on_pub_from_rp_received(
        &mut self,
        face_id: FaceId,
        publication: &Pub,
        wire: &Bytes,
    ) -> usize;

    fn on_face_shutdown(&mut self, face_id: FaceId);

    /// Dispatches by packet kind.
    fn on_packet(&mut self, face_id: FaceId, packet: &Packet, wire: &Bytes) -> usize {
        match packet {
            Packet::Sub(sub) => self.on_sub_received(face_id, sub),
            Packet::PubToRp(publication) => self.on_pub_to_rp_received(face_id, publication, wire),
            Packet::PubFromRp(publication) => {
                self.on_pub_from_rp_received(face_id, publication, wire)
            }
        }
    }
}
