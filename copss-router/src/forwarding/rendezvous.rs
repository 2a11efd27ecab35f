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

//! Rendezvous point: echoes every upstream publication back to its sender.

use super::FaceEventHandler;
use crate::data_plane::face_registry::FaceRegistry;
use crate::face::FaceId;
use crate::observability::{events, fields};
use crate::packet::{Packet, Pub, Sub};
use bytes::Bytes;
use tracing::{info, warn};

const COMPONENT: &str = "rendezvous";

pub struct RendezvousForwarder<'a> {
    faces: &'a mut FaceRegistry,
}

impl<'a> RendezvousForwarder<'a> {
    pub fn new(faces: &'a mut FaceRegistry) -> Self {
        Self { faces }
    }
}

impl FaceEventHandler for RendezvousForwarder<'_> {
    fn on_sub_received(&mut self, face_id: FaceId, sub: &Sub) -> usize {
        info!(
            event = events::RP_SUB_IGNORED,
            component = COMPONENT,
            face_id,
            cd = %sub.cd,
            "Sub received; nothing to do"
        );
        0
    }

    /// Returns the publication to the same face as a from-RP publication.
    fn on_pub_to_rp_received(
        &mut self,
        face_id: FaceId,
        publication: &Pub,
        _wire: &Bytes,
    ) -> usize {
        let Some(face) = self.faces.find(face_id) else {
            warn!(
                event = events::RP_ECHO,
                component = COMPONENT,
                face_id,
                cd = %publication.cd,
                reason = fields::REASON_FACE_MISSING,
                "PubFromRp not sent"
            );
            return 0;
        };
        let echo = Packet::PubFromRp(publication.clone()).encode();
        match face.send(echo) {
            Ok(()) => {
                info!(
                    event = events::RP_ECHO,
                    component = COMPONENT,
                    face_id,
                    cd = %publication.cd,
                    "PubFromRp sent"
                );
                1
            }
            Err(err) => {
                warn!(
                    event = events::FORWARD_SEND_FAILED,
                    component = COMPONENT,
                    face_id,
                    err = %err,
                    "PubFromRp not sent"
                );
                0
            }
        }
    }

    fn on_pub_from_rp_received(
        &mut self,
        face_id: FaceId,
        publication: &Pub,
        _wire: &Bytes,
    ) -> usize {
        warn!(
            event = events::RP_UNEXPECTED_PUB_FROM_RP,
            component = COMPONENT,
            face_id,
            cd = %publication.cd,
            "PubFromRp received by rendezvous point; dropping"
        );
        0
    }

    fn on_face_shutdown(&mut self, face_id: FaceId) {
        info!(
            event = events::FACE_SHUTDOWN,
            component = COMPONENT,
            face_id,
            "face gone"
        );
        self.faces.remove(face_id);
    }
}
