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

//! Text rendering of CDs.

use super::{Cd, CdElement};
use std::fmt;

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'-' | b'.' | b'_')
}

/// Writes one element value in escaped form.
pub(crate) fn write_escaped(f: &mut impl fmt::Write, value: &[u8]) -> fmt::Result {
    if value.iter().all(|byte| *byte == b'.') {
        f.write_str("...")?;
        for _ in value {
            f.write_char('.')?;
        }
        return Ok(());
    }
    for byte in value {
        if is_unreserved(*byte) {
            f.write_char(char::from(*byte))?;
        } else {
            write!(f, "%{byte:02X}")?;
        }
    }
    Ok(())
}

impl fmt::Display for Cd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("/");
        }
        let mut group_opened = false;
        for element in self.elements() {
            match element {
                CdElement::Component(value) => {
                    f.write_str("/")?;
                    write_escaped(f, value)?;
                }
                CdElement::Optional(value) => {
                    if !group_opened {
                        f.write_str("(")?;
                        group_opened = true;
                    }
                    f.write_str("/")?;
                    write_escaped(f, value)?;
                }
                CdElement::Asterisk => f.write_str(")")?,
            }
        }
        Ok(())
    }
}
