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

//! TCP faces: accepted and outbound connections.

use super::frame_codec::TlvFrameCodec;
use super::{TransportContext, TransportError};
use crate::face::{Face, FaceId, FaceInfo, FaceKind, FaceTransport};
use crate::observability::{events, fields};
use crate::packet::Packet;
use crate::runtime::RouterEvent;
use crate::tlv::MAX_PACKET_SIZE;
use bytes::BytesMut;
use futures::SinkExt;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::Instant;
use tokio_util::codec::{Decoder, FramedWrite};
use tracing::{debug, info, warn};

const COMPONENT: &str = "tcp_face";

/// Accepts connections until the router goes away.
pub async fn run_tcp_listener(listener: TcpListener, ctx: TransportContext) {
    loop {
        let (stream, remote) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!(
                    event = events::TCP_ACCEPT_FAILED,
                    component = COMPONENT,
                    err = %err,
                    "accept failed"
                );
                continue;
            }
        };
        debug!(
            event = events::TCP_ACCEPT_OK,
            component = COMPONENT,
            remote = %remote,
            "accepted connection"
        );
        match start_tcp_face(stream, &ctx).await {
            Ok(_) => {}
            Err(TransportError::EventQueueClosed) => break,
            Err(err) => warn!(
                event = events::TCP_ACCEPT_FAILED,
                component = COMPONENT,
                remote = %remote,
                err = %err,
                "rejected connection"
            ),
        }
    }
}

/// Connects to `remote`, giving up after `timeout` when one is set.
pub async fn connect_tcp(
    remote: SocketAddr,
    timeout: Option<Duration>,
    ctx: &TransportContext,
) -> Result<Face, TransportError> {
    let connect = TcpStream::connect(remote);
    let connected = match timeout {
        Some(timeout) => tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| TransportError::ConnectTimeout(remote))?,
        None => connect.await,
    };
    let stream = connected.map_err(|err| {
        warn!(
            event = events::TCP_CONNECT_FAILED,
            component = COMPONENT,
            remote = %remote,
            err = %err,
            "connect failed"
        );
        TransportError::Io(err)
    })?;
    let face = start_tcp_face(stream, ctx).await?;
    info!(
        event = events::TCP_CONNECT_OK,
        component = COMPONENT,
        face_id = face.id(),
        remote = %remote,
        "connected"
    );
    Ok(face)
}

/// Wraps a connected stream in a face, announces it and starts its task.
pub async fn start_tcp_face(
    stream: TcpStream,
    ctx: &TransportContext,
) -> Result<Face, TransportError> {
    let local = stream.local_addr()?;
    let remote = stream.peer_addr()?;
    if local == remote {
        return Err(TransportError::SelfConnection(local));
    }

    let face_id = ctx.face_ids.next_id();
    let info = FaceInfo {
        kind: FaceKind::Tcp,
        local,
        remote,
    };
    let (face, transport) = Face::new(face_id, info);
    ctx.announce(face.clone()).await?;
    tokio::spawn(drive_tcp_face(face_id, stream, transport, ctx.clone()));
    Ok(face)
}

/// Sleeps until `deadline`, or forever when none is armed.
async fn receive_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Hands every complete frame in `buffer` to the router. Returns whether at
/// least one frame completed, or the reason the face must go down.
async fn deliver_frames(
    face_id: FaceId,
    codec: &mut TlvFrameCodec,
    buffer: &mut BytesMut,
    ctx: &TransportContext,
) -> Result<bool, &'static str> {
    let mut delivered = false;
    loop {
        let frame = match codec.decode(buffer) {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(delivered),
            Err(err) => {
                warn!(
                    event = events::TCP_STREAM_FAILED,
                    component = COMPONENT,
                    face_id,
                    err = %err,
                    "stream framing failed"
                );
                return Err(fields::REASON_DECODE_FAILED);
            }
        };
        delivered = true;
        let packet = match Packet::decode(&frame) {
            Ok(packet) => packet,
            Err(err) => {
                warn!(
                    event = events::PACKET_DECODE_FAILED,
                    component = COMPONENT,
                    face_id,
                    err = %err,
                    "undecodable packet; closing connection"
                );
                return Err(fields::REASON_DECODE_FAILED);
            }
        };
        let event = RouterEvent::Packet {
            face_id,
            packet,
            wire: frame,
        };
        if ctx.events.send(event).await.is_err() {
            return Err(fields::REASON_SHUTDOWN_REQUESTED);
        }
    }
}

/// Moves packets between one connection and the router until either side ends it.
///
/// The receive deadline is armed when bytes of an incomplete packet first sit in
/// the buffer and disarmed once that packet completes; outbound traffic does not
/// move it.
async fn drive_tcp_face<S>(
    face_id: FaceId,
    stream: S,
    mut transport: FaceTransport,
    ctx: TransportContext,
) where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (mut reader, writer) = tokio::io::split(stream);
    let mut sink = FramedWrite::new(writer, TlvFrameCodec);
    let mut codec = TlvFrameCodec;
    let mut buffer = BytesMut::with_capacity(MAX_PACKET_SIZE);
    let mut deadline: Option<Instant> = None;

    let reason = loop {
        tokio::select! {
            _ = transport.shutdown.cancelled() => break fields::REASON_SHUTDOWN_REQUESTED,
            read = reader.read_buf(&mut buffer) => {
                match read {
                    Ok(0) => break fields::REASON_PEER_CLOSED,
                    Ok(_) => {}
                    Err(err) => {
                        warn!(
                            event = events::TCP_STREAM_FAILED,
                            component = COMPONENT,
                            face_id,
                            err = %err,
                            "stream read failed"
                        );
                        break fields::REASON_PEER_CLOSED;
                    }
                }
                match deliver_frames(face_id, &mut codec, &mut buffer, &ctx).await {
                    Ok(true) => deadline = None,
                    Ok(false) => {}
                    Err(reason) => break reason,
                }
                if buffer.is_empty() {
                    deadline = None;
                } else if deadline.is_none() {
                    deadline = ctx
                        .receive_timeout
                        .and_then(|timeout| Instant::now().checked_add(timeout));
                }
            }
            Some(outbound) = transport.outbound.recv() => {
                if let Err(err) = sink.send(outbound).await {
                    warn!(
                        event = events::TCP_SEND_FAILED,
                        component = COMPONENT,
                        face_id,
                        err = %err,
                        "send failed"
                    );
                    break fields::REASON_PEER_CLOSED;
                }
            }
            _ = receive_deadline(deadline) => {
                warn!(
                    event = events::TCP_RECEIVE_TIMEOUT,
                    component = COMPONENT,
                    face_id,
                    buffered = buffer.len(),
                    "partial packet not completed in time"
                );
                break fields::REASON_RECEIVE_TIMEOUT;
            }
        }
    };

    transport.shutdown.cancel();
    info!(
        event = events::FACE_DOWN,
        component = COMPONENT,
        face_id,
        reason,
        "face down"
    );
    let _ = ctx.events.send(RouterEvent::FaceDown(face_id)).await;
}
