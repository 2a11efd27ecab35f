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

//! Subscribe and publish packets.
//!
//! `Sub` wraps a `Cd`; `PubToRp` and `PubFromRp` wrap a `Cd` followed by a
//! `Content` element, which may be empty but is always present.

use crate::cd::Cd;
use crate::tlv::{self, DecodeError, TlvIter};
use bytes::{Bytes, BytesMut};
use std::fmt;

/// Subscription to every publication matching `cd`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sub {
    pub cd: Cd,
}

/// Publication of `content` under `cd`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pub {
    pub cd: Cd,
    pub content: Bytes,
}

impl Sub {
    pub fn new(cd: Cd) -> Self {
        Self { cd }
    }
}

impl Pub {
    pub fn new(cd: Cd, content: impl Into<Bytes>) -> Self {
        Self {
            cd,
            content: content.into(),
        }
    }

    fn value_len(&self) -> usize {
        self.cd.encoded_len() + tlv::tlv_size(tlv::CONTENT, self.content.len())
    }

    fn encode_as(&self, typ: u64) -> Bytes {
        let value_len = self.value_len();
        let mut buf = BytesMut::with_capacity(tlv::tlv_size(typ, value_len));
        tlv::put_tlv_header(&mut buf, typ, value_len);
        self.cd.encode_to(&mut buf);
        tlv::put_tlv(&mut buf, tlv::CONTENT, &self.content);
        buf.freeze()
    }

    fn decode_value(value: &[u8]) -> Result<Self, DecodeError> {
        let mut cd = None;
        let mut content = None;
        for child in TlvIter::new(value) {
            let child = child?;
            match child.typ {
                tlv::CD if cd.is_none() => cd = Some(Cd::decode_value(child.value)?),
                tlv::CONTENT if content.is_none() => {
                    content = Some(Bytes::copy_from_slice(child.value))
                }
                _ => {}
            }
        }
        Ok(Self {
            cd: cd.ok_or(DecodeError::MissingElement("Cd"))?,
            content: content.ok_or(DecodeError::MissingElement("Content"))?,
        })
    }
}

/// A decoded packet, tagged by direction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Packet {
    Sub(Sub),
    /// Publication travelling toward the rendezvous point.
    PubToRp(Pub),
    /// Publication travelling from the rendezvous point toward subscribers.
    PubFromRp(Pub),
}

impl Packet {
    pub fn tlv_type(&self) -> u64 {
        match self {
            Self::Sub(_) => tlv::SUB,
            Self::PubToRp(_) => tlv::PUB_TO_RP,
            Self::PubFromRp(_) => tlv::PUB_FROM_RP,
        }
    }

    pub fn cd(&self) -> &Cd {
        match self {
            Self::Sub(sub) => &sub.cd,
            Self::PubToRp(publication) | Self::PubFromRp(publication) => &publication.cd,
        }
    }

    pub fn encode(&self) -> Bytes {
        match self {
            Self::Sub(sub) => {
                let value_len = sub.cd.encoded_len();
                let mut buf = BytesMut::with_capacity(tlv::tlv_size(tlv::SUB, value_len));
                tlv::put_tlv_header(&mut buf, tlv::SUB, value_len);
                sub.cd.encode_to(&mut buf);
                buf.freeze()
            }
            Self::PubToRp(publication) => publication.encode_as(tlv::PUB_TO_RP),
            Self::PubFromRp(publication) => publication.encode_as(tlv::PUB_FROM_RP),
        }
    }

    /// Decodes a buffer holding exactly one packet.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let (outer, consumed) = tlv::read_tlv(buf)?;
        if consumed != buf.len() {
            return Err(DecodeError::TrailingBytes(buf.len() - consumed));
        }
        match outer.typ {
            tlv::SUB => {
                let mut cd = None;
                for child in TlvIter::new(outer.value) {
                    let child = child?;
                    if child.typ == tlv::CD {
                        cd = Some(Cd::decode_value(child.value)?);
                        break;
                    }
                }
                let cd = cd.ok_or(DecodeError::MissingElement("Cd"))?;
                Ok(Self::Sub(Sub { cd }))
            }
            tlv::PUB_TO_RP => Pub::decode_value(outer.value).map(Self::PubToRp),
            tlv::PUB_FROM_RP => Pub::decode_value(outer.value).map(Self::PubFromRp),
            other => Err(DecodeError::UnknownPacketType(other)),
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Sub(_) => "Sub",
            Self::PubToRp(_) => "PubToRp",
            Self::PubFromRp(_) => "PubFromRp",
        };
        write!(f, "{kind} {}", self.cd())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cd(text: &str) -> Cd {
        text.parse().unwrap()
    }

    #[test]
    fn sub_wraps_cd() {
        let packet = Packet::Sub(Sub::new(cd("/a")));
        let encoded = packet.encode();
        assert_eq!(encoded.as_ref(), &[65, 5, 70, 3, 8, 1, b'a']);
        assert_eq!(Packet::decode(&encoded).unwrap(), packet);
    }

    #[test]
    fn pub_carries_cd_then_content() {
        let packet = Packet::PubToRp(Pub::new(cd("/a"), &b"hi"[..]));
        let encoded = packet.encode();
        assert_eq!(
            encoded.as_ref(),
            &[66, 9, 70, 3, 8, 1, b'a', 21, 2, b'h', b'i']
        );
        assert_eq!(Packet::decode(&encoded).unwrap(), packet);
    }

    #[test]
    fn empty_content_is_still_encoded() {
        let packet = Packet::PubFromRp(Pub::new(cd("/a/b"), Bytes::new()));
        let encoded = packet.encode();
        assert_eq!(&encoded[encoded.len() - 2..], &[21, 0]);
        assert_eq!(Packet::decode(&encoded).unwrap(), packet);
    }

    #[test]
    fn pub_without_content_is_rejected() {
        assert_eq!(
            Packet::decode(&[67, 5, 70, 3, 8, 1, b'a']),
            Err(DecodeError::MissingElement("Content"))
        );
        assert_eq!(
            Packet::decode(&[66, 2, 21, 0]),
            Err(DecodeError::MissingElement("Cd"))
        );
    }

    #[test]
    fn unknown_outer_type_is_rejected() {
        assert_eq!(
            Packet::decode(&[5, 0]),
            Err(DecodeError::UnknownPacketType(5))
        );
    }

    #[test]
    fn unrecognized_children_are_skipped() {
        let decoded = Packet::decode(&[65, 8, 99, 1, 0, 70, 3, 8, 1, b'a']).unwrap();
        assert_eq!(decoded, Packet::Sub(Sub::new(cd("/a"))));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        assert_eq!(
            Packet::decode(&[65, 2, 70, 0, 0]),
            Err(DecodeError::TrailingBytes(1))
        );
    }
}
