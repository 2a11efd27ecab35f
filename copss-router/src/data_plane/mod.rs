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

//! Data-plane layer.
//!
//! Owns the sockets. Each TCP connection and each UDP peer becomes a face whose
//! transport task decodes inbound packets into [`RouterEvent`]s and drains the
//! face's outbound queue onto the wire. A face is announced to the router before
//! its task starts, so the router never sees a packet from an unknown face.

pub mod connector;
pub mod face_registry;
pub mod frame_codec;
pub mod tcp_face;
pub mod udp_face;

use crate::face::{Face, FaceIdAllocator};
use crate::observability::events;
use crate::runtime::RouterEvent;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

const COMPONENT: &str = "data_plane";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connect to {0} timed out")]
    ConnectTimeout(SocketAddr),
    #[error("local endpoint and remote endpoint are the same ({0})")]
    SelfConnection(SocketAddr),
    #[error("no UDP socket bound")]
    UdpUnavailable,
    #[error("router event queue closed")]
    EventQueueClosed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// What every transport task needs to talk to the router.
#[derive(Clone, Debug)]
pub struct TransportContext {
    pub events: mpsc::Sender<RouterEvent>,
    pub face_ids: FaceIdAllocator,
    /// Limit on how long a partially received TCP packet may sit in the buffer.
    pub receive_timeout: Option<Duration>,
}

impl TransportContext {
    pub fn new(
        events: mpsc::Sender<RouterEvent>,
        face_ids: FaceIdAllocator,
        receive_timeout: Option<Duration>,
    ) -> Self {
        Self {
            events,
            face_ids,
            receive_timeout,
        }
    }

    /// Hands a new face to the router.
    pub(crate) async fn announce(&self, face: Face) -> Result<(), TransportError> {
        info!(
            event = events::FACE_UP,
            component = COMPONENT,
            face_id = face.id(),
            kind = %face.info().kind,
            local = %face.info().local,
            remote = %face.info().remote,
            "face up"
        );
        self.events
            .send(RouterEvent::FaceUp(face))
            .await
            .map_err(|_| TransportError::EventQueueClosed)
    }
}
