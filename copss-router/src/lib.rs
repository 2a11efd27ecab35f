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

//! # copss-router
//!
//! `copss-router` is a content-oriented publish/subscribe router. Subscribers
//! register interest in Content Descriptors (CDs), publishers send content tagged
//! with a CD toward a rendezvous point (RP), and the RP sends it back down the
//! tree of routers to every matching subscriber.
//!
//! Typical usage binds a [`RouterNode`](runtime::RouterNode) and runs it; the
//! tables and the forwarding logic can also be driven directly.
//!
//! ```no_run
//! use copss_router::control_plane::{ControlCommand, ControlReply};
//! use copss_router::runtime::{RouterNode, RouterOptions};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let options = RouterOptions::router(
//!     "0.0.0.0:9876".parse().unwrap(),
//!     "127.0.0.1:9877".parse().unwrap(),
//! );
//! let node = RouterNode::bind(options).await.unwrap();
//! let handle = node.handle();
//! tokio::spawn(node.run());
//!
//! let reply = handle.control(ControlCommand::FibDump).await;
//! assert!(matches!(reply, ControlReply::Dump { .. }));
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - CD model: names, patterns, text grammar and binary form (`cd`, `tlv`, `packet`)
//! - Routing: FIB longest-prefix lookup and ST wildcard matching with expiry
//! - Forwarding: reactions of a router or an RP to the four face events
//! - Control plane: operator commands against the tables
//! - Data plane: TCP and UDP faces
//! - Runtime: the single task that owns every table
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events/spans and does not initialize a global subscriber.
//! Binaries and tests are responsible for one-time `tracing_subscriber`
//! initialization at process boundaries.

pub mod cd;
pub mod control_plane;
pub mod data_plane;
pub mod face;
pub mod forwarding;
pub mod packet;
pub mod routing;
pub mod runtime;
pub mod tlv;

#[doc(hidden)]
pub mod benchmark_support;
#[doc(hidden)]
pub mod observability;
