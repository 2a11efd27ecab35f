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

//! Binary (TLV) encoding of CDs.

use super::{Cd, CdElement};
use crate::tlv::{self, DecodeError, TlvIter};
use bytes::{BufMut, Bytes, BytesMut};

impl CdElement {
    fn encoded_len(&self) -> usize {
        tlv::tlv_size(self.tlv_type(), self.value().len())
    }

    fn decode(typ: u64, value: &[u8]) -> Result<Self, DecodeError> {
        match typ {
            tlv::CD_COMPONENT => Ok(Self::Component(value.to_vec())),
            tlv::CD_OPTIONAL => Ok(Self::Optional(value.to_vec())),
            tlv::CD_ASTERISK if value.is_empty() => Ok(Self::Asterisk),
            tlv::CD_ASTERISK => Err(DecodeError::NonEmptyAsterisk(value.len())),
            other => Err(DecodeError::UnknownElementType(other)),
        }
    }
}

impl Cd {
    fn value_len(&self) -> usize {
        self.elements().iter().map(CdElement::encoded_len).sum()
    }

    /// Size of the complete `Cd` TLV.
    pub fn encoded_len(&self) -> usize {
        tlv::tlv_size(tlv::CD, self.value_len())
    }

    /// Appends the `Cd` TLV to `buf`.
    pub fn encode_to(&self, buf: &mut impl BufMut) {
        tlv::put_tlv_header(buf, tlv::CD, self.value_len());
        for element in self.elements() {
            tlv::put_tlv(buf, element.tlv_type(), element.value());
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_to(&mut buf);
        buf.freeze()
    }

    /// Concatenated element TLVs, without the outer `Cd` header.
    pub(crate) fn encode_value(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.value_len());
        for element in self.elements() {
            tlv::put_tlv(&mut buf, element.tlv_type(), element.value());
        }
        buf
    }

    /// Decodes a buffer holding exactly one `Cd` TLV.
    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let block = tlv::read_exact_tlv(buf, tlv::CD)?;
        Self::decode_value(block.value)
    }

    /// Decodes the value of a `Cd` TLV.
    ///
    /// Element order is kept as received; the text grammar is not re-checked.
    pub(crate) fn decode_value(value: &[u8]) -> Result<Self, DecodeError> {
        TlvIter::new(value)
            .map(|item| item.and_then(|element| CdElement::decode(element.typ, element.value)))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::from_elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_nests_elements_in_order() {
        let cd: Cd = "/a(/x)/bc".parse().unwrap();
        let encoded = cd.encode();
        assert_eq!(
            encoded.as_ref(),
            &[70, 12, 8, 1, b'a', 81, 1, b'x', 82, 0, 8, 2, b'b', b'c']
        );
        assert_eq!(cd.encoded_len(), encoded.len());
        assert_eq!(Cd::decode(&encoded).unwrap(), cd);
    }

    #[test]
    fn root_encodes_as_empty_container() {
        assert_eq!(Cd::root().encode().as_ref(), &[70, 0]);
        assert!(Cd::decode(&[70, 0]).unwrap().is_empty());
    }

    #[test]
    fn long_values_use_extended_lengths() {
        let cd = Cd::from_elements(vec![CdElement::component(vec![b'v'; 300])]);
        let encoded = cd.encode();
        assert_eq!(&encoded[..2], &[70, 253]);
        assert_eq!(Cd::decode(&encoded).unwrap(), cd);
    }

    #[test]
    fn decode_rejects_wrong_outer_type() {
        assert_eq!(
            Cd::decode(&[21, 0]),
            Err(DecodeError::UnexpectedType {
                expected: tlv::CD,
                actual: 21
            })
        );
    }

    #[test]
    fn decode_rejects_truncated_and_unknown_elements() {
        assert!(matches!(
            Cd::decode(&[70, 3, 8, 5, b'a']),
            Err(DecodeError::TruncatedValue { .. })
        ));
        assert_eq!(
            Cd::decode(&[70, 4, 8, 1, b'a', 9]),
            Err(DecodeError::TruncatedNumber)
        );
        assert_eq!(
            Cd::decode(&[70, 3, 9, 1, b'a']),
            Err(DecodeError::UnknownElementType(9))
        );
        assert_eq!(
            Cd::decode(&[70, 3, 82, 1, b'a']),
            Err(DecodeError::NonEmptyAsterisk(1))
        );
    }
}
