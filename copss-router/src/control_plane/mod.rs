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

//! Control-plane layer.
//!
//! Operators manage the FIB, the ST and the face list through a text protocol
//! on a TCP port. [`command`] parses requests and renders replies, [`executor`]
//! applies a command to the tables on the router task, and [`control_server`]
//! carries requests from the socket to the router and back.

pub mod command;
pub mod control_server;
pub mod executor;

pub use command::{ControlCommand, ControlError, ControlReply};
