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

//! Canonical structured field keys and value-format helpers.

use crate::face::FaceId;
use std::collections::BTreeSet;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const FACE_ID: &str = "face_id";
pub const CD: &str = "cd";
pub const COST: &str = "cost";
pub const COUNT: &str = "count";
pub const TARGETS: &str = "targets";
pub const KIND: &str = "kind";
pub const LOCAL: &str = "local";
pub const REMOTE: &str = "remote";
pub const COMMAND: &str = "command";
pub const REASON: &str = "reason";
pub const ERR: &str = "err";

pub const REASON_NO_ROUTE: &str = "no_route";
pub const REASON_NO_SUBSCRIBER: &str = "no_subscriber";
pub const REASON_FACE_MISSING: &str = "face_missing";
pub const REASON_PEER_CLOSED: &str = "peer_closed";
pub const REASON_SHUTDOWN_REQUESTED: &str = "shutdown_requested";
pub const REASON_RECEIVE_TIMEOUT: &str = "receive_timeout";
pub const REASON_DECODE_FAILED: &str = "decode_failed";

/// Renders a face set as `[101,102]`.
pub fn format_face_ids(face_ids: &BTreeSet<FaceId>) -> String {
    let ids: Vec<String> = face_ids.iter().map(FaceId::to_string).collect();
    format!("[{}]", ids.join(","))
}
