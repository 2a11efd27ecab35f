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

//! Text grammar for CDs.
//!
//! Words are split on `/`. A word ending in `(` opens the optional group, a word
//! ending in `)` closes it; the group may appear once and cannot nest.

use super::{Cd, CdElement};
use std::str::FromStr;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CdParseError {
    #[error("CD parse error: empty name component")]
    EmptyComponent,
    #[error("CD parse error: illegal '(' in name component")]
    IllegalOpen,
    #[error("CD parse error: illegal ')' in name component")]
    IllegalClose,
    #[error("CD parse error: more than one '(' in name component")]
    RepeatedOpen,
    #[error("CD parse error: more than one ')' in name component")]
    RepeatedClose,
    #[error("CD parse error: illegal last name component")]
    IllegalLastElement,
    #[error("CD parse error: name component cannot be '.' or '..'")]
    IllegalDotComponent,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum GroupState {
    NotOpened,
    Opened,
    Closed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum WordKind {
    Hold,
    Open,
    Close,
}

/// Classifies a word and strips its trailing bracket. A bare bracket leaves
/// nothing behind and counts as an empty component.
fn classify(word: &str) -> Result<(WordKind, &str), CdParseError> {
    if word.is_empty() {
        return Err(CdParseError::EmptyComponent);
    }
    if let Some(stripped) = word.strip_suffix('(') {
        if stripped.contains('(') {
            return Err(CdParseError::RepeatedOpen);
        }
        if stripped.is_empty() {
            return Err(CdParseError::EmptyComponent);
        }
        return Ok((WordKind::Open, stripped));
    }
    if let Some(stripped) = word.strip_suffix(')') {
        if stripped.contains(')') {
            return Err(CdParseError::RepeatedClose);
        }
        if stripped.is_empty() {
            return Err(CdParseError::EmptyComponent);
        }
        return Ok((WordKind::Close, stripped));
    }
    if word.contains('(') {
        return Err(CdParseError::IllegalOpen);
    }
    if word.contains(')') {
        return Err(CdParseError::IllegalClose);
    }
    Ok((WordKind::Hold, word))
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Decodes `%XX` escapes; a `%` without two hex digits is kept as is.
fn unescape(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

/// Turns an escaped word into an element value.
///
/// A word made only of dots loses three of them, so `...` is the empty value.
fn component_value(text: &str) -> Result<Vec<u8>, CdParseError> {
    if text.bytes().all(|byte| byte == b'.') {
        if text.len() < 3 {
            return Err(CdParseError::IllegalDotComponent);
        }
        return Ok(text.as_bytes()[3..].to_vec());
    }
    Ok(unescape(text))
}

fn parse_words<'a>(words: impl Iterator<Item = &'a str>) -> Result<Vec<CdElement>, CdParseError> {
    let mut state = GroupState::NotOpened;
    let mut elements = Vec::new();

    for word in words {
        let (kind, text) = classify(word)?;
        let value = component_value(text)?;

        state = match (state, kind) {
            (GroupState::NotOpened, WordKind::Open) => {
                elements.push(CdElement::Component(value));
                GroupState::Opened
            }
            (GroupState::NotOpened, WordKind::Hold) | (GroupState::Closed, WordKind::Hold) => {
                elements.push(CdElement::Component(value));
                state
            }
            (GroupState::Opened, WordKind::Hold) => {
                elements.push(CdElement::Optional(value));
                state
            }
            (GroupState::Opened, WordKind::Close) => {
                elements.push(CdElement::Optional(value));
                elements.push(CdElement::Asterisk);
                GroupState::Closed
            }
            (_, WordKind::Open) => return Err(CdParseError::IllegalOpen),
            (_, WordKind::Close) => return Err(CdParseError::IllegalClose),
        };
    }

    match elements.last() {
        Some(last) if !last.is_component() => Err(CdParseError::IllegalLastElement),
        _ => Ok(elements),
    }
}

impl Cd {
    /// Parses the text form. Leading and trailing slashes are ignored; an empty
    /// string is the root CD.
    pub fn parse(text: &str) -> Result<Self, CdParseError> {
        let trimmed = text.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        parse_words(trimmed.split('/')).map(Self::from_elements)
    }
}

impl FromStr for Cd {
    type Err = CdParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl TryFrom<&str> for Cd {
    type Error = CdParseError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::parse(text)
    }
}
