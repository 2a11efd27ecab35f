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

//! Outbound face creation for routes toward neighbours that have not connected.

use super::tcp_face::connect_tcp;
use super::udp_face::UdpEndpoint;
use super::{TransportContext, TransportError};
use crate::face::{FaceId, FaceKind};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct FaceConnector {
    ctx: TransportContext,
    connection_timeout: Option<Duration>,
    udp: Option<UdpEndpoint>,
}

impl FaceConnector {
    pub fn new(
        ctx: TransportContext,
        connection_timeout: Option<Duration>,
        udp: Option<UdpEndpoint>,
    ) -> Self {
        Self {
            ctx,
            connection_timeout,
            udp,
        }
    }

    /// Opens a face of `kind` toward `remote` and announces it to the router.
    pub async fn connect(
        &self,
        kind: FaceKind,
        remote: SocketAddr,
    ) -> Result<FaceId, TransportError> {
        match kind {
            FaceKind::Tcp => connect_tcp(remote, self.connection_timeout, &self.ctx)
                .await
                .map(|face| face.id()),
            FaceKind::Udp => match &self.udp {
                Some(udp) => udp.face_for(remote).await,
                None => Err(TransportError::UdpUnavailable),
            },
        }
    }
}
