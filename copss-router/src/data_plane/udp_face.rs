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

//! UDP faces: one shared socket, one face per remote address.

use super::{TransportContext, TransportError};
use crate::face::{Face, FaceId, FaceInfo, FaceKind, FaceTransport};
use crate::observability::{events, fields};
use crate::packet::Packet;
use crate::runtime::RouterEvent;
use crate::tlv::MAX_PACKET_SIZE;
use bytes::Bytes;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const COMPONENT: &str = "udp_face";

type PeerTable = Arc<Mutex<HashMap<SocketAddr, FaceId>>>;

/// The router's UDP socket and the faces multiplexed over it.
#[derive(Clone, Debug)]
pub struct UdpEndpoint {
    socket: Arc<UdpSocket>,
    local: SocketAddr,
    peers: PeerTable,
    ctx: TransportContext,
}

impl UdpEndpoint {
    pub fn new(socket: UdpSocket, ctx: TransportContext) -> Result<Self, TransportError> {
        let local = socket.local_addr()?;
        Ok(Self {
            socket: Arc::new(socket),
            local,
            peers: Arc::new(Mutex::new(HashMap::new())),
            ctx,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }

    /// Returns the face for `remote`, creating and announcing it on first contact.
    pub async fn face_for(&self, remote: SocketAddr) -> Result<FaceId, TransportError> {
        if remote == self.local {
            return Err(TransportError::SelfConnection(remote));
        }
        let mut peers = self.peers.lock().await;
        if let Some(face_id) = peers.get(&remote) {
            return Ok(*face_id);
        }

        let face_id = self.ctx.face_ids.next_id();
        let info = FaceInfo {
            kind: FaceKind::Udp,
            local: self.local,
            remote,
        };
        let (face, transport) = Face::new(face_id, info);
        self.ctx.announce(face).await?;
        peers.insert(remote, face_id);
        tokio::spawn(drive_udp_face(face_id, remote, transport, self.clone()));
        Ok(face_id)
    }

    /// Receives datagrams until the router goes away. Each datagram is one packet;
    /// undecodable ones are dropped without touching the face.
    pub async fn run(self) {
        let mut buf = vec![0u8; MAX_PACKET_SIZE];
        loop {
            let (len, remote) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(err) => {
                    warn!(
                        event = events::UDP_RECV_FAILED,
                        component = COMPONENT,
                        err = %err,
                        "receive failed"
                    );
                    continue;
                }
            };
            let wire = Bytes::copy_from_slice(&buf[..len]);
            let packet = match Packet::decode(&wire) {
                Ok(packet) => packet,
                Err(err) => {
                    warn!(
                        event = events::UDP_DATAGRAM_DROPPED,
                        component = COMPONENT,
                        remote = %remote,
                        err = %err,
                        "dropping undecodable datagram"
                    );
                    continue;
                }
            };
            let face_id = match self.face_for(remote).await {
                Ok(face_id) => face_id,
                Err(TransportError::EventQueueClosed) => break,
                Err(err) => {
                    debug!(
                        event = events::UDP_DATAGRAM_DROPPED,
                        component = COMPONENT,
                        remote = %remote,
                        err = %err,
                        "dropping datagram"
                    );
                    continue;
                }
            };
            let event = RouterEvent::Packet {
                face_id,
                packet,
                wire,
            };
            if self.ctx.events.send(event).await.is_err() {
                break;
            }
        }
    }
}

/// Drains one face's queue onto the shared socket until the face is shut down.
async fn drive_udp_face(
    face_id: FaceId,
    remote: SocketAddr,
    mut transport: FaceTransport,
    endpoint: UdpEndpoint,
) {
    let reason = loop {
        tokio::select! {
            _ = transport.shutdown.cancelled() => break fields::REASON_SHUTDOWN_REQUESTED,
            outbound = transport.outbound.recv() => {
                let Some(packet) = outbound else {
                    break fields::REASON_SHUTDOWN_REQUESTED;
                };
                if let Err(err) = endpoint.socket.send_to(&packet, remote).await {
                    warn!(
                        event = events::UDP_SEND_FAILED,
                        component = COMPONENT,
                        face_id,
                        remote = %remote,
                        err = %err,
                        "send failed"
                    );
                }
            }
        }
    };

    endpoint.peers.lock().await.remove(&remote);
    transport.shutdown.cancel();
    info!(
        event = events::FACE_DOWN,
        component = COMPONENT,
        face_id,
        reason,
        "face down"
    );
    let _ = endpoint.ctx.events.send(RouterEvent::FaceDown(face_id)).await;
}
