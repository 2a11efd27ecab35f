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

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_ROUTER_PORT: u16 = 9876;
pub const DEFAULT_CONTROL_PORT: u16 = 9877;
pub const DEFAULT_RENDEZVOUS_PORT: u16 = 9878;
pub const DEFAULT_EVENT_QUEUE_SIZE: usize = 1024;

/// Role of the node.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NodeMode {
    /// Forwards subscriptions and publications using the FIB and ST.
    #[default]
    Router,
    /// Terminates publications by echoing them back as from-RP publications.
    Rendezvous,
}

/// Start-up settings for a [`RouterNode`](super::RouterNode). `None` durations mean no limit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouterOptions {
    pub mode: NodeMode,
    /// TCP listener and UDP socket address.
    pub listen_addr: SocketAddr,
    /// Control server address; routers only.
    pub control_addr: Option<SocketAddr>,
    pub st_lifetime: Option<Duration>,
    pub connection_timeout: Option<Duration>,
    pub receive_timeout: Option<Duration>,
    pub event_queue_size: usize,
}

impl RouterOptions {
    pub fn router(listen_addr: SocketAddr, control_addr: SocketAddr) -> Self {
        Self {
            mode: NodeMode::Router,
            listen_addr,
            control_addr: Some(control_addr),
            st_lifetime: None,
            connection_timeout: None,
            receive_timeout: None,
            event_queue_size: DEFAULT_EVENT_QUEUE_SIZE,
        }
    }

    pub fn rendezvous(listen_addr: SocketAddr) -> Self {
        Self {
            mode: NodeMode::Rendezvous,
            listen_addr,
            control_addr: None,
            st_lifetime: None,
            connection_timeout: None,
            receive_timeout: None,
            event_queue_size: DEFAULT_EVENT_QUEUE_SIZE,
        }
    }
}

impl Default for RouterOptions {
    fn default() -> Self {
        let any = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        Self::router(
            SocketAddr::new(any, DEFAULT_ROUTER_PORT),
            SocketAddr::new(any, DEFAULT_CONTROL_PORT),
        )
    }
}

/// Converts a seconds setting where zero means "no limit".
pub fn secs_or_unlimited(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seconds_means_unlimited() {
        assert_eq!(secs_or_unlimited(0), None);
        assert_eq!(secs_or_unlimited(5), Some(Duration::from_secs(5)));
    }

    #[test]
    fn rendezvous_has_no_control_port() {
        let options = RouterOptions::rendezvous("127.0.0.1:9878".parse().unwrap());
        assert_eq!(options.mode, NodeMode::Rendezvous);
        assert!(options.control_addr.is_none());
        assert_eq!(RouterOptions::default().listen_addr.port(), DEFAULT_ROUTER_PORT);
    }
}
