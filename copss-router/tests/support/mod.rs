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

use copss_router::runtime::{RouterNode, RouterOptions};
use integration_test_utils::ControlClient;
use std::net::SocketAddr;
use std::time::Duration;

pub(crate) const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) struct RunningNode {
    pub(crate) tcp: SocketAddr,
    #[allow(dead_code)]
    pub(crate) udp: SocketAddr,
    pub(crate) control: Option<SocketAddr>,
}

fn loopback() -> SocketAddr {
    "127.0.0.1:0".parse().expect("loopback address should parse")
}

async fn start(options: RouterOptions) -> RunningNode {
    let node = RouterNode::bind(options)
        .await
        .expect("node should bind on loopback");
    let running = RunningNode {
        tcp: node.tcp_addr(),
        udp: node.udp_addr(),
        control: node.control_addr(),
    };
    tokio::spawn(node.run());
    running
}

pub(crate) async fn start_router() -> RunningNode {
    let mut options = RouterOptions::router(loopback(), loopback());
    options.connection_timeout = Some(REPLY_TIMEOUT);
    start(options).await
}

#[allow(dead_code)]
pub(crate) async fn start_rendezvous() -> RunningNode {
    start(RouterOptions::rendezvous(loopback())).await
}

pub(crate) async fn control_client(node: &RunningNode) -> ControlClient {
    let addr = node.control.expect("router should run a control server");
    ControlClient::connect(addr)
        .await
        .expect("control client should connect")
}

/// Repeats `request` until the reply satisfies `done`, returning that reply.
pub(crate) async fn wait_for_reply(
    control: &mut ControlClient,
    request: &str,
    done: impl Fn(&[String]) -> bool,
) -> Vec<String> {
    let deadline = tokio::time::Instant::now() + REPLY_TIMEOUT;
    loop {
        let reply = control
            .request(request)
            .await
            .expect("control request should succeed");
        if done(&reply) {
            return reply;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "reply never satisfied the condition: {reply:?}"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

pub(crate) fn count_line(table: &str, count: usize) -> String {
    format!("{table}-COUNT: {count}")
}
