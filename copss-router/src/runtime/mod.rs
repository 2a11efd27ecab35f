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

//! Runtime layer.
//!
//! A single [`Router`] task owns the FIB, the ST and the face registry. Transport
//! tasks and the control server talk to it only through [`RouterEvent`]s, and ST
//! expiry timers fire inside the same loop, so table access needs no locking.
//! [`RouterNode`] binds the sockets around a router.

mod node;
mod options;
mod router;

pub use node::{RouterError, RouterNode};
pub use options::{
    secs_or_unlimited, NodeMode, RouterOptions, DEFAULT_CONTROL_PORT, DEFAULT_EVENT_QUEUE_SIZE,
    DEFAULT_RENDEZVOUS_PORT, DEFAULT_ROUTER_PORT,
};
pub use router::{Router, RouterEvent, RouterHandle};
