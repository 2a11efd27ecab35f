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

//! Stream framing: splits a byte stream into whole top-level TLVs.

use crate::tlv::{self, MAX_PACKET_SIZE};
use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame of {0} bytes exceeds maximum packet size ({MAX_PACKET_SIZE} bytes)")]
    TooLarge(u64),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Yields each complete top-level TLV as one frame, header included.
#[derive(Debug, Default)]
pub struct TlvFrameCodec;

impl Decoder for TlvFrameCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(header) = tlv::peek_header(src) else {
            return Ok(None);
        };
        let frame_len = header
            .total_len()
            .filter(|len| *len <= MAX_PACKET_SIZE)
            .ok_or_else(|| {
                FrameError::TooLarge(header.value_len.saturating_add(header.header_len as u64))
            })?;
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }
        Ok(Some(src.split_to(frame_len).freeze()))
    }
}

impl Encoder<Bytes> for TlvFrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.len() > MAX_PACKET_SIZE {
            return Err(FrameError::TooLarge(item.len() as u64));
        }
        dst.reserve(item.len());
        dst.put_slice(&item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{Packet, Pub, Sub};

    fn sub_frame() -> Bytes {
        Packet::Sub(Sub::new("/a/b".parse().unwrap())).encode()
    }

    #[test]
    fn partial_frame_waits_for_more_bytes() {
        let frame = sub_frame();
        let mut codec = TlvFrameCodec;
        let mut buf = BytesMut::from(&frame[..3]);

        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 3);

        buf.extend_from_slice(&frame[3..]);
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), frame);
        assert!(buf.is_empty());
    }

    #[test]
    fn back_to_back_frames_split_cleanly() {
        let first = sub_frame();
        let second = Packet::PubToRp(Pub::new("/x".parse().unwrap(), &b"body"[..])).encode();
        let mut codec = TlvFrameCodec;
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&first);
        buf.extend_from_slice(&second);

        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), first);
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), second);
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn oversized_declared_length_is_an_error() {
        let mut codec = TlvFrameCodec;
        let mut buf = BytesMut::new();
        tlv::put_tlv_header(&mut buf, tlv::PUB_TO_RP, MAX_PACKET_SIZE);

        assert!(matches!(
            codec.decode(&mut buf),
            Err(FrameError::TooLarge(_))
        ));
    }

    #[test]
    fn encoder_passes_frames_through() {
        let frame = sub_frame();
        let mut codec = TlvFrameCodec;
        let mut dst = BytesMut::new();
        codec.encode(frame.clone(), &mut dst).unwrap();
        assert_eq!(dst.freeze(), frame);
    }
}
