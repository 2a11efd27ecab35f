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

//! Line-oriented TCP front end for control commands.

use super::command::{ControlCommand, ControlReply};
use crate::observability::events;
use crate::runtime::RouterHandle;
use futures::StreamExt;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::Instant;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, info, warn};

const COMPONENT: &str = "control_server";
const MAX_LINE_LENGTH: usize = 4096;

/// Serves control clients one after another until the router stops.
pub async fn run_control_server(
    listener: TcpListener,
    router: RouterHandle,
    receive_timeout: Option<Duration>,
) {
    loop {
        let (stream, remote) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!(
                    event = events::CONTROL_IO_FAILED,
                    component = COMPONENT,
                    err = %err,
                    "accept failed"
                );
                continue;
            }
        };
        info!(
            event = events::CONTROL_ACCEPT,
            component = COMPONENT,
            remote = %remote,
            "control client connected"
        );
        if let Err(err) = serve_client(stream, &router, receive_timeout).await {
            warn!(
                event = events::CONTROL_IO_FAILED,
                component = COMPONENT,
                remote = %remote,
                err = %err,
                "control client failed"
            );
        }
        if router.is_closed() {
            break;
        }
    }
}

enum NextLine {
    Line(String),
    Closed,
    TimedOut,
}

/// Deadline for the next request, measured from when waiting for it begins.
fn request_deadline(receive_timeout: Option<Duration>) -> Option<Instant> {
    receive_timeout.and_then(|timeout| Instant::now().checked_add(timeout))
}

async fn next_line(
    lines: &mut FramedRead<tokio::net::tcp::OwnedReadHalf, LinesCodec>,
    deadline: Option<Instant>,
) -> std::io::Result<NextLine> {
    let next = match deadline {
        Some(deadline) => match tokio::time::timeout_at(deadline, lines.next()).await {
            Ok(next) => next,
            Err(_) => return Ok(NextLine::TimedOut),
        },
        None => lines.next().await,
    };
    match next {
        Some(Ok(line)) => Ok(NextLine::Line(line)),
        Some(Err(err)) => Err(std::io::Error::new(std::io::ErrorKind::InvalidData, err)),
        None => Ok(NextLine::Closed),
    }
}

/// Answers requests from one client until it disconnects or fails to finish a
/// request within the receive timeout.
async fn serve_client(
    stream: TcpStream,
    router: &RouterHandle,
    receive_timeout: Option<Duration>,
) -> std::io::Result<()> {
    let (read, mut write) = stream.into_split();
    let mut lines = FramedRead::new(read, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    let mut request = String::new();
    let mut deadline = request_deadline(receive_timeout);

    loop {
        let line = match next_line(&mut lines, deadline).await? {
            NextLine::Line(line) => line,
            NextLine::Closed => return Ok(()),
            NextLine::TimedOut => {
                debug!(
                    event = events::CONTROL_CLIENT_TIMEOUT,
                    component = COMPONENT,
                    buffered = request.len(),
                    "control request not completed in time; disconnecting"
                );
                return Ok(());
            }
        };
        if !line.trim().is_empty() {
            request.push_str(&line);
            request.push('\n');
            continue;
        }
        if request.is_empty() {
            continue;
        }

        let reply = match ControlCommand::parse(&request) {
            Ok(command) => {
                info!(
                    event = events::CONTROL_REQUEST,
                    component = COMPONENT,
                    command = command.as_str(),
                    "control request"
                );
                router.control(command).await
            }
            Err(err) => ControlReply::from(err),
        };
        request.clear();

        match &reply {
            ControlReply::Err(reason) => info!(
                event = events::CONTROL_REPLY_ERR,
                component = COMPONENT,
                reason = reason.as_str(),
                "control request failed"
            ),
            _ => debug!(
                event = events::CONTROL_REPLY_OK,
                component = COMPONENT,
                "control request done"
            ),
        }
        write.write_all(reply.to_string().as_bytes()).await?;
        deadline = request_deadline(receive_timeout);
    }
}
