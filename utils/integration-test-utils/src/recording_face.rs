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

use copss_router::face::{Face, FaceId, FaceInfo, FaceKind, FaceTransport};
use copss_router::packet::Packet;
use std::net::SocketAddr;

/// The transport side of a face that keeps whatever the router queues on it.
pub struct RecordingFace {
    transport: FaceTransport,
}

impl RecordingFace {
    /// Creates a TCP face toward `remote` and the recorder for its outbound queue.
    pub fn new(face_id: FaceId, remote: &str) -> (Face, Self) {
        let remote: SocketAddr = remote.parse().expect("remote address should parse");
        let info = FaceInfo {
            kind: FaceKind::Tcp,
            local: "127.0.0.1:9876".parse().expect("local address should parse"),
            remote,
        };
        let (face, transport) = Face::new(face_id, info);
        (face, Self { transport })
    }

    /// Decodes and removes everything queued so far.
    pub fn drain(&mut self) -> Vec<Packet> {
        let mut packets = Vec::new();
        while let Ok(wire) = self.transport.outbound.try_recv() {
            packets.push(Packet::decode(&wire).expect("router should queue valid packets"));
        }
        packets
    }

    /// Waits for the next queued packet.
    pub async fn next(&mut self) -> Option<Packet> {
        let wire = self.transport.outbound.recv().await?;
        Packet::decode(&wire).ok()
    }

    pub fn is_shut_down(&self) -> bool {
        self.transport.shutdown.is_cancelled()
    }
}
