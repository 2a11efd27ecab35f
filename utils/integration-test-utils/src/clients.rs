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

use copss_router::data_plane::frame_codec::TlvFrameCodec;
use copss_router::packet::Packet;
use futures::{SinkExt, StreamExt};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

/// A neighbour speaking the packet protocol over TCP.
pub struct PacketClient {
    framed: Framed<TcpStream, TlvFrameCodec>,
}

impl PacketClient {
    pub async fn connect(addr: SocketAddr) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            framed: Framed::new(stream, TlvFrameCodec),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.framed.get_ref().local_addr()
    }

    pub async fn send(&mut self, packet: &Packet) -> io::Result<()> {
        self.framed
            .send(packet.encode())
            .await
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
    }

    /// Sends raw bytes, bypassing the encoder.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.framed.get_mut().write_all(bytes).await
    }

    /// Next packet from the router, or `None` on timeout or close.
    pub async fn recv(&mut self, timeout: Duration) -> Option<Packet> {
        let frame = tokio::time::timeout(timeout, self.framed.next())
            .await
            .ok()??
            .ok()?;
        Packet::decode(&frame).ok()
    }

    /// Whether the router closed the connection within `timeout`.
    pub async fn is_closed_within(&mut self, timeout: Duration) -> bool {
        matches!(
            tokio::time::timeout(timeout, self.framed.next()).await,
            Ok(None) | Ok(Some(Err(_)))
        )
    }
}

/// An operator session on the control port.
pub struct ControlClient {
    reader: BufReader<tokio::net::tcp::OwnedReadHalf>,
    writer: tokio::net::tcp::OwnedWriteHalf,
}

impl ControlClient {
    pub async fn connect(addr: SocketAddr) -> io::Result<Self> {
        let (read, writer) = TcpStream::connect(addr).await?.into_split();
        Ok(Self {
            reader: BufReader::new(read),
            writer,
        })
    }

    async fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Sends `request` and returns the reply lines, without line endings and
    /// without the blank separator lines.
    pub async fn request(&mut self, request: &str) -> io::Result<Vec<String>> {
        self.writer.write_all(request.as_bytes()).await?;

        let status = self.read_line().await?;
        let mut reply = vec![status.clone()];
        if status != "OK" {
            self.read_line().await?;
            return Ok(reply);
        }
        let header = self.read_line().await?;
        if header.is_empty() {
            return Ok(reply);
        }
        let count: usize = header
            .split_once(':')
            .and_then(|(_, count)| count.trim().parse().ok())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, header.clone()))?;
        reply.push(header);
        self.read_line().await?;
        for _ in 0..count {
            reply.push(self.read_line().await?);
        }
        Ok(reply)
    }
}
