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

//! Type-length-value primitives shared by the CD and packet codecs.
//!
//! Numbers (types and lengths) use the variable-length encoding: values below 253
//! take one byte, larger values are prefixed by 253, 254 or 255 and followed by a
//! 2, 4 or 8 byte big-endian integer.

use bytes::BufMut;

pub const SUB: u64 = 65;
pub const PUB_TO_RP: u64 = 66;
pub const PUB_FROM_RP: u64 = 67;
pub const CD: u64 = 70;
pub const CD_COMPONENT: u64 = 8;
pub const CD_OPTIONAL: u64 = 81;
pub const CD_ASTERISK: u64 = 82;
pub const CONTENT: u64 = 21;

/// Largest packet accepted from or written to the wire.
pub const MAX_PACKET_SIZE: usize = 8192;

/// Failure to decode a TLV structure from received bytes.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("truncated variable-length number")]
    TruncatedNumber,
    #[error("truncated TLV value: {needed} bytes declared, {available} available")]
    TruncatedValue { needed: u64, available: usize },
    #[error("unexpected TLV type {actual}, expected {expected}")]
    UnexpectedType { expected: u64, actual: u64 },
    #[error("unknown packet type {0}")]
    UnknownPacketType(u64),
    #[error("unknown CD element type {0}")]
    UnknownElementType(u64),
    #[error("missing {0} element")]
    MissingElement(&'static str),
    #[error("asterisk element carries {0} value bytes")]
    NonEmptyAsterisk(usize),
    #[error("{0} trailing bytes after TLV")]
    TrailingBytes(usize),
}

/// A decoded TLV borrowing its value from the source buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tlv<'a> {
    pub typ: u64,
    pub value: &'a [u8],
}

/// The type and length prefix of a TLV.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TlvHeader {
    pub typ: u64,
    pub header_len: usize,
    pub value_len: u64,
}

impl TlvHeader {
    /// Total number of bytes the TLV occupies, `None` on overflow.
    pub fn total_len(&self) -> Option<usize> {
        usize::try_from(self.value_len)
            .ok()
            .and_then(|value_len| value_len.checked_add(self.header_len))
    }
}

pub fn varnum_size(number: u64) -> usize {
    if number < 253 {
        1
    } else if number <= u64::from(u16::MAX) {
        3
    } else if number <= u64::from(u32::MAX) {
        5
    } else {
        9
    }
}

pub fn put_varnum(buf: &mut impl BufMut, number: u64) {
    if number < 253 {
        buf.put_u8(number as u8);
    } else if number <= u64::from(u16::MAX) {
        buf.put_u8(253);
        buf.put_u16(number as u16);
    } else if number <= u64::from(u32::MAX) {
        buf.put_u8(254);
        buf.put_u32(number as u32);
    } else {
        buf.put_u8(255);
        buf.put_u64(number);
    }
}

/// Reads one variable-length number, returning it with the bytes consumed.
///
/// `None` means the buffer ends before the number does.
pub fn peek_varnum(buf: &[u8]) -> Option<(u64, usize)> {
    let (&first, rest) = buf.split_first()?;
    let width = match first {
        0..=252 => return Some((u64::from(first), 1)),
        253 => 2,
        254 => 4,
        255 => 8,
    };
    let bytes = rest.get(..width)?;
    let number = bytes
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
    Some((number, width + 1))
}

/// Encoded size of a TLV of type `typ` carrying `value_len` bytes.
pub fn tlv_size(typ: u64, value_len: usize) -> usize {
    varnum_size(typ) + varnum_size(value_len as u64) + value_len
}

pub fn put_tlv_header(buf: &mut impl BufMut, typ: u64, value_len: usize) {
    put_varnum(buf, typ);
    put_varnum(buf, value_len as u64);
}

pub fn put_tlv(buf: &mut impl BufMut, typ: u64, value: &[u8]) {
    put_tlv_header(buf, typ, value.len());
    buf.put_slice(value);
}

/// Reads the type and length of the first TLV in `buf`, if both are complete.
pub fn peek_header(buf: &[u8]) -> Option<TlvHeader> {
    let (typ, type_len) = peek_varnum(buf)?;
    let (value_len, len_len) = peek_varnum(&buf[type_len..])?;
    Some(TlvHeader {
        typ,
        header_len: type_len + len_len,
        value_len,
    })
}

/// Reads the first TLV of `buf`, returning it with the number of bytes consumed.
pub fn read_tlv(buf: &[u8]) -> Result<(Tlv<'_>, usize), DecodeError> {
    let header = peek_header(buf).ok_or(DecodeError::TruncatedNumber)?;
    let available = buf.len() - header.header_len;
    let end = header
        .total_len()
        .filter(|end| *end <= buf.len())
        .ok_or(DecodeError::TruncatedValue {
            needed: header.value_len,
            available,
        })?;
    let tlv = Tlv {
        typ: header.typ,
        value: &buf[header.header_len..end],
    };
    Ok((tlv, end))
}

/// Reads a buffer that must hold exactly one TLV of type `expected`.
pub fn read_exact_tlv(buf: &[u8], expected: u64) -> Result<Tlv<'_>, DecodeError> {
    let (tlv, consumed) = read_tlv(buf)?;
    if tlv.typ != expected {
        return Err(DecodeError::UnexpectedType {
            expected,
            actual: tlv.typ,
        });
    }
    if consumed != buf.len() {
        return Err(DecodeError::TrailingBytes(buf.len() - consumed));
    }
    Ok(tlv)
}

/// Iterates over consecutive TLVs in a value block.
pub struct TlvIter<'a> {
    rest: &'a [u8],
}

impl<'a> TlvIter<'a> {
    pub fn new(block: &'a [u8]) -> Self {
        Self { rest: block }
    }
}

impl<'a> Iterator for TlvIter<'a> {
    type Item = Result<Tlv<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        match read_tlv(self.rest) {
            Ok((tlv, consumed)) => {
                self.rest = &self.rest[consumed..];
                Some(Ok(tlv))
            }
            Err(err) => {
                self.rest = &[];
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn encode_varnum(number: u64) -> Vec<u8> {
        let mut buf = BytesMut::new();
        put_varnum(&mut buf, number);
        buf.to_vec()
    }

    #[test]
    fn varnum_uses_shortest_width_at_each_boundary() {
        assert_eq!(encode_varnum(252), vec![252]);
        assert_eq!(encode_varnum(253), vec![253, 0x00, 0xFD]);
        assert_eq!(encode_varnum(0xFFFF), vec![253, 0xFF, 0xFF]);
        assert_eq!(encode_varnum(0x1_0000), vec![254, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(encode_varnum(0x1_0000_0000).len(), 9);

        for number in [0, 252, 253, 0xFFFF, 0x1_0000, 0x1_0000_0000] {
            assert_eq!(varnum_size(number), encode_varnum(number).len());
            assert_eq!(
                peek_varnum(&encode_varnum(number)),
                Some((number, varnum_size(number)))
            );
        }
    }

    #[test]
    fn peek_varnum_reports_incomplete_input() {
        assert_eq!(peek_varnum(&[]), None);
        assert_eq!(peek_varnum(&[253, 0x01]), None);
        assert_eq!(peek_varnum(&[254, 0, 0, 1]), None);
    }

    #[test]
    fn read_tlv_rejects_value_shorter_than_declared() {
        let err = read_tlv(&[CONTENT as u8, 4, 1, 2]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedValue {
                needed: 4,
                available: 2
            }
        );
    }

    #[test]
    fn read_exact_tlv_checks_type_and_trailing_bytes() {
        let mut buf = BytesMut::new();
        put_tlv(&mut buf, CONTENT, b"abc");
        assert_eq!(read_exact_tlv(&buf, CONTENT).unwrap().value, b"abc");
        assert_eq!(
            read_exact_tlv(&buf, CD).unwrap_err(),
            DecodeError::UnexpectedType {
                expected: CD,
                actual: CONTENT
            }
        );

        buf.extend_from_slice(&[0, 0]);
        assert_eq!(
            read_exact_tlv(&buf, CONTENT).unwrap_err(),
            DecodeError::TrailingBytes(2)
        );
    }

    #[test]
    fn tlv_iter_stops_after_first_error() {
        let mut buf = BytesMut::new();
        put_tlv(&mut buf, CD_COMPONENT, b"a");
        buf.extend_from_slice(&[CD_COMPONENT as u8, 9]);

        let items: Vec<_> = TlvIter::new(&buf).collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }
}
