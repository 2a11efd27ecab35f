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

//! Face handles: one per peer connection.
//!
//! A [`Face`] is what the routing tables refer to (by [`FaceId`]) and what the
//! forwarder sends through. The transport task that owns the socket holds the
//! matching [`FaceTransport`] half.

use bytes::Bytes;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Router-local identifier of a face.
pub type FaceId = u64;

const FIRST_FACE_ID_SERIAL: u64 = 100;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum FaceKind {
    Tcp,
    Udp,
}

impl FaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

impl fmt::Display for FaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown face type: {0}")]
pub struct UnknownFaceKind(pub String);

impl FromStr for FaceKind {
    type Err = UnknownFaceKind;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.eq_ignore_ascii_case("tcp") {
            Ok(Self::Tcp)
        } else if text.eq_ignore_ascii_case("udp") {
            Ok(Self::Udp)
        } else {
            Err(UnknownFaceKind(text.to_string()))
        }
    }
}

/// Transport kind and socket endpoints of a face.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FaceInfo {
    pub kind: FaceKind,
    pub local: SocketAddr,
    pub remote: SocketAddr,
}

impl fmt::Display for FaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.kind, self.local, self.remote)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum FaceError {
    #[error("face {0} is closed")]
    Closed(FaceId),
}

/// Sending half of a face, held by the router.
#[derive(Clone, Debug)]
pub struct Face {
    id: FaceId,
    info: FaceInfo,
    outbound: mpsc::UnboundedSender<Bytes>,
    shutdown: CancellationToken,
}

/// Transport half of a face: the queue to drain onto the wire and the shutdown signal.
#[derive(Debug)]
pub struct FaceTransport {
    pub outbound: mpsc::UnboundedReceiver<Bytes>,
    pub shutdown: CancellationToken,
}

impl Face {
    /// Creates a face together with the half its transport task drives.
    pub fn new(id: FaceId, info: FaceInfo) -> (Self, FaceTransport) {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let face = Self {
            id,
            info,
            outbound,
            shutdown: shutdown.clone(),
        };
        let transport = FaceTransport {
            outbound: outbound_rx,
            shutdown,
        };
        (face, transport)
    }

    pub fn id(&self) -> FaceId {
        self.id
    }

    pub fn info(&self) -> &FaceInfo {
        &self.info
    }

    /// Queues an encoded packet. Packets leave in the order they were queued.
    pub fn send(&self, packet: Bytes) -> Result<(), FaceError> {
        if self.shutdown.is_cancelled() {
            return Err(FaceError::Closed(self.id));
        }
        self.outbound
            .send(packet)
            .map_err(|_| FaceError::Closed(self.id))
    }

    /// Asks the transport to close; it reports the face gone once it has.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

/// Hands out face ids. Ids start at 101 and are never reused.
#[derive(Clone, Debug)]
pub struct FaceIdAllocator {
    serial: Arc<AtomicU64>,
}

impl Default for FaceIdAllocator {
    fn default() -> Self {
        Self {
            serial: Arc::new(AtomicU64::new(FIRST_FACE_ID_SERIAL)),
        }
    }
}

impl FaceIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> FaceId {
        self.serial.fetch_add(1, Ordering::Relaxed) + 1
    }
}
