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

//! Canonical structured event names used across `copss-router`.

// FIB events.
pub const FIB_ADD: &str = "fib_add";
pub const FIB_REMOVE_NEXT_HOP: &str = "fib_remove_next_hop";
pub const FIB_REMOVE_ENTRY: &str = "fib_remove_entry";
pub const FIB_REMOVE_FACE: &str = "fib_remove_face";
pub const FIB_CLEAR: &str = "fib_clear";

// ST events.
pub const ST_ADD: &str = "st_add";
pub const ST_REFRESH: &str = "st_refresh";
pub const ST_REMOVE_NEXT_HOP: &str = "st_remove_next_hop";
pub const ST_REMOVE_ENTRY: &str = "st_remove_entry";
pub const ST_REMOVE_FACE: &str = "st_remove_face";
pub const ST_CLEAR: &str = "st_clear";
pub const ST_EXPIRE: &str = "st_expire";
pub const ST_LIFETIME_CAPPED: &str = "st_lifetime_capped";
pub const ST_WILDCARD_STEP: &str = "st_wildcard_step";

// Forwarding events.
pub const SUB_RECEIVED: &str = "sub_received";
pub const SUB_FORWARD: &str = "sub_forward";
pub const SUB_NOT_FORWARDED: &str = "sub_not_forwarded";
pub const PUB_TO_RP_RECEIVED: &str = "pub_to_rp_received";
pub const PUB_TO_RP_FORWARD: &str = "pub_to_rp_forward";
pub const PUB_TO_RP_NOT_FORWARDED: &str = "pub_to_rp_not_forwarded";
pub const PUB_FROM_RP_RECEIVED: &str = "pub_from_rp_received";
pub const PUB_FROM_RP_FORWARD: &str = "pub_from_rp_forward";
pub const PUB_FROM_RP_NOT_FORWARDED: &str = "pub_from_rp_not_forwarded";
pub const FORWARD_SEND_FAILED: &str = "forward_send_failed";
pub const FACE_SHUTDOWN: &str = "face_shutdown";

// Rendezvous point events.
pub const RP_ECHO: &str = "rp_echo";
pub const RP_SUB_IGNORED: &str = "rp_sub_ignored";
pub const RP_UNEXPECTED_PUB_FROM_RP: &str = "rp_unexpected_pub_from_rp";

// Face and transport events.
pub const FACE_UP: &str = "face_up";
pub const FACE_DOWN: &str = "face_down";
pub const FACE_DUPLICATE: &str = "face_duplicate";
pub const PACKET_UNKNOWN_FACE: &str = "packet_unknown_face";
pub const PACKET_DECODE_FAILED: &str = "packet_decode_failed";
pub const TCP_ACCEPT_OK: &str = "tcp_accept_ok";
pub const TCP_ACCEPT_FAILED: &str = "tcp_accept_failed";
pub const TCP_CONNECT_OK: &str = "tcp_connect_ok";
pub const TCP_CONNECT_FAILED: &str = "tcp_connect_failed";
pub const TCP_RECEIVE_TIMEOUT: &str = "tcp_receive_timeout";
pub const TCP_STREAM_FAILED: &str = "tcp_stream_failed";
pub const TCP_SEND_FAILED: &str = "tcp_send_failed";
pub const UDP_DATAGRAM_DROPPED: &str = "udp_datagram_dropped";
pub const UDP_RECV_FAILED: &str = "udp_recv_failed";
pub const UDP_SEND_FAILED: &str = "udp_send_failed";

// Control-plane events.
pub const CONTROL_ACCEPT: &str = "control_accept";
pub const CONTROL_REQUEST: &str = "control_request";
pub const CONTROL_REPLY_OK: &str = "control_reply_ok";
pub const CONTROL_REPLY_ERR: &str = "control_reply_err";
pub const CONTROL_CLIENT_TIMEOUT: &str = "control_client_timeout";
pub const CONTROL_IO_FAILED: &str = "control_io_failed";
pub const CONTROL_CONNECT: &str = "control_connect";

// Runtime events.
pub const ROUTER_START: &str = "router_start";
pub const ROUTER_STOP: &str = "router_stop";
pub const LISTENER_BIND_OK: &str = "listener_bind_ok";
pub const EVENT_QUEUE_CLOSED: &str = "event_queue_closed";
