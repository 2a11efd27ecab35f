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

//! Socket setup around a [`Router`].

use super::options::{NodeMode, RouterOptions};
use super::router::{Router, RouterHandle};
use crate::control_plane::control_server::run_control_server;
use crate::data_plane::connector::FaceConnector;
use crate::data_plane::tcp_face::run_tcp_listener;
use crate::data_plane::udp_face::UdpEndpoint;
use crate::data_plane::{TransportContext, TransportError};
use crate::face::FaceIdAllocator;
use crate::observability::events;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::{TcpListener, UdpSocket};
use tokio::task::JoinHandle;
use tracing::info;

const COMPONENT: &str = "router_node";

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("failed to bind {listener} listener on {addr}: {source}")]
    Bind {
        listener: &'static str,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn bind_error(listener: &'static str, addr: SocketAddr) -> impl FnOnce(std::io::Error) -> RouterError {
    move |source| RouterError::Bind {
        listener,
        addr,
        source,
    }
}

/// A router with its TCP listener, UDP socket and (for routers) control server.
pub struct RouterNode {
    router: Router,
    handle: RouterHandle,
    tcp_addr: SocketAddr,
    udp_addr: SocketAddr,
    control_addr: Option<SocketAddr>,
    tasks: Vec<JoinHandle<()>>,
}

impl RouterNode {
    /// Binds every socket and starts the transport tasks. Packets are queued
    /// until [`RouterNode::run`] is polled.
    pub async fn bind(options: RouterOptions) -> Result<Self, RouterError> {
        let (mut router, sender) = Router::new(
            options.mode,
            options.st_lifetime,
            options.event_queue_size,
        );
        let ctx = TransportContext::new(
            sender.clone(),
            FaceIdAllocator::new(),
            options.receive_timeout,
        );

        let tcp = TcpListener::bind(options.listen_addr)
            .await
            .map_err(bind_error("tcp", options.listen_addr))?;
        let tcp_addr = tcp.local_addr()?;
        // Same port as TCP, also when the port was picked by the OS.
        let udp = UdpSocket::bind(tcp_addr)
            .await
            .map_err(bind_error("udp", tcp_addr))?;
        let udp = UdpEndpoint::new(udp, ctx.clone())?;
        let udp_addr = udp.local_addr();
        info!(
            event = events::LISTENER_BIND_OK,
            component = COMPONENT,
            tcp = %tcp_addr,
            udp = %udp_addr,
            "listening"
        );

        router.set_connector(FaceConnector::new(
            ctx.clone(),
            options.connection_timeout,
            Some(udp.clone()),
        ));
        let handle = RouterHandle::new(sender);
        let mut tasks = vec![
            tokio::spawn(run_tcp_listener(tcp, ctx)),
            tokio::spawn(udp.run()),
        ];

        let control_addr = match (options.mode, options.control_addr) {
            (NodeMode::Router, Some(addr)) => {
                let listener = TcpListener::bind(addr)
                    .await
                    .map_err(bind_error("control", addr))?;
                let local = listener.local_addr()?;
                info!(
                    event = events::LISTENER_BIND_OK,
                    component = COMPONENT,
                    control = %local,
                    "control server listening"
                );
                tasks.push(tokio::spawn(run_control_server(
                    listener,
                    handle.clone(),
                    options.receive_timeout,
                )));
                Some(local)
            }
            _ => None,
        };

        Ok(Self {
            router,
            handle,
            tcp_addr,
            udp_addr,
            control_addr,
            tasks,
        })
    }

    pub fn tcp_addr(&self) -> SocketAddr {
        self.tcp_addr
    }

    pub fn udp_addr(&self) -> SocketAddr {
        self.udp_addr
    }

    pub fn control_addr(&self) -> Option<SocketAddr> {
        self.control_addr
    }

    pub fn handle(&self) -> RouterHandle {
        self.handle.clone()
    }

    /// Runs until the process is stopped.
    pub async fn run(self) {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Runs until `shutdown` resolves, then closes every face and socket.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) {
        let Self { router, tasks, .. } = self;
        router.run_until(shutdown).await;
        for task in tasks {
            task.abort();
        }
    }
}
