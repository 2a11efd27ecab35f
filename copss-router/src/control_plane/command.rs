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

//! Control requests and replies.
//!
//! A request is a command line, zero or more `KEY: VALUE` lines and a blank line.
//! A reply is `OK` or `ERR <reason>`, optionally followed by a count header and
//! one line per table entry, and ends with a blank line.

use crate::cd::CdParseError;
use crate::face::{FaceId, FaceKind};
use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const CRLF: &str = "\r\n";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ControlCommand {
    /// Route `name` through the face of `kind` connected to `remote`, opening
    /// that face first if needed.
    FibAdd {
        name: String,
        kind: FaceKind,
        remote: SocketAddr,
        cost: u64,
    },
    FibDelEntry {
        name: String,
    },
    FibDelNextHop {
        name: String,
        kind: FaceKind,
        remote: SocketAddr,
    },
    FibClear,
    StClear,
    FaceDel {
        face_id: FaceId,
    },
    FibDump,
    StDump,
    FaceDump,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ControlError {
    #[error("illegal control command")]
    EmptyRequest,
    #[error("unknown control command: {0}")]
    UnknownCommand(String),
    #[error("illegal control command arg: {0}")]
    MalformedArg(String),
    #[error("illegal control command arg: missing {0}")]
    MissingArg(&'static str),
    #[error("illegal control command arg: duplicate {0}")]
    DuplicateArg(String),
    #[error("illegal control command arg: {key}: {value}")]
    InvalidArg { key: &'static str, value: String },
    #[error("illegal control command arg")]
    ArgCombination,
    #[error("face not found")]
    FaceNotFound,
    #[error(transparent)]
    Cd(#[from] CdParseError),
    #[error("{0}")]
    Transport(String),
    #[error("control command not supported by the rendezvous point")]
    Unsupported,
    #[error("router stopped")]
    RouterStopped,
}

struct Args(BTreeMap<String, String>);

impl Args {
    fn parse<'a>(lines: impl Iterator<Item = &'a str>) -> Result<Self, ControlError> {
        let mut args = BTreeMap::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| ControlError::MalformedArg(line.to_string()))?;
            let key = key.trim();
            if args.insert(key.to_string(), value.trim().to_string()).is_some() {
                return Err(ControlError::DuplicateArg(key.to_string()));
            }
        }
        Ok(Self(args))
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn get(&self, key: &'static str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn require(&self, key: &'static str) -> Result<&str, ControlError> {
        self.get(key).ok_or(ControlError::MissingArg(key))
    }

    fn parsed<T: std::str::FromStr>(&self, key: &'static str) -> Result<T, ControlError> {
        let value = self.require(key)?;
        value.parse().map_err(|_| ControlError::InvalidArg {
            key,
            value: value.to_string(),
        })
    }

    fn remote(&self) -> Result<(FaceKind, SocketAddr), ControlError> {
        let kind = self.parsed::<FaceKind>("TYPE")?;
        let ip = self.parsed::<IpAddr>("IP")?;
        let port = self.parsed::<u16>("PORT")?;
        Ok((kind, SocketAddr::new(ip, port)))
    }
}

impl ControlCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FibAdd { .. } => "FIB-ADD",
            Self::FibDelEntry { .. } | Self::FibDelNextHop { .. } | Self::FibClear => "FIB-DEL",
            Self::StClear => "ST-DEL",
            Self::FaceDel { .. } => "FACE-DEL",
            Self::FibDump => "FIB-DUMP",
            Self::StDump => "ST-DUMP",
            Self::FaceDump => "FACE-DUMP",
        }
    }

    /// Parses one request. Line endings may be `\r\n` or `\n`; the terminating
    /// blank line is optional.
    pub fn parse(request: &str) -> Result<Self, ControlError> {
        let mut lines = request.lines().map(|line| line.trim_end_matches('\r'));
        let command = loop {
            match lines.next() {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line.trim(),
                None => return Err(ControlError::EmptyRequest),
            }
        };
        if !matches!(
            command,
            "FIB-ADD" | "FIB-DEL" | "ST-DEL" | "FACE-DEL" | "FIB-DUMP" | "ST-DUMP" | "FACE-DUMP"
        ) {
            return Err(ControlError::UnknownCommand(command.to_string()));
        }
        let args = Args::parse(lines)?;

        match command {
            "FIB-ADD" => {
                let name = args.require("NAME")?.to_string();
                let (kind, remote) = args.remote()?;
                let cost = args.parsed::<u64>("COST")?;
                Ok(Self::FibAdd {
                    name,
                    kind,
                    remote,
                    cost,
                })
            }
            "FIB-DEL" => Self::parse_fib_del(&args),
            "ST-DEL" => Ok(Self::StClear),
            "FACE-DEL" => Ok(Self::FaceDel {
                face_id: args.parsed("FACE")?,
            }),
            "FIB-DUMP" => Ok(Self::FibDump),
            "ST-DUMP" => Ok(Self::StDump),
            _ => Ok(Self::FaceDump),
        }
    }

    fn parse_fib_del(args: &Args) -> Result<Self, ControlError> {
        if args.is_empty() {
            return Ok(Self::FibClear);
        }
        let name = args.require("NAME")?.to_string();
        let endpoint_keys = ["TYPE", "IP", "PORT"].map(|key| args.get(key).is_some());
        match endpoint_keys {
            [false, false, false] => Ok(Self::FibDelEntry { name }),
            [true, true, true] => {
                let (kind, remote) = args.remote()?;
                Ok(Self::FibDelNextHop { name, kind, remote })
            }
            _ => Err(ControlError::ArgCombination),
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{CRLF}", self.as_str())?;
        match self {
            Self::FibAdd {
                name,
                kind,
                remote,
                cost,
            } => {
                write!(f, "NAME: {name}{CRLF}TYPE: {kind}{CRLF}")?;
                write!(f, "IP: {}{CRLF}PORT: {}{CRLF}", remote.ip(), remote.port())?;
                write!(f, "COST: {cost}{CRLF}")?;
            }
            Self::FibDelEntry { name } => write!(f, "NAME: {name}{CRLF}")?,
            Self::FibDelNextHop { name, kind, remote } => {
                write!(f, "NAME: {name}{CRLF}TYPE: {kind}{CRLF}")?;
                write!(f, "IP: {}{CRLF}PORT: {}{CRLF}", remote.ip(), remote.port())?;
            }
            Self::FaceDel { face_id } => write!(f, "FACE: {face_id}{CRLF}")?,
            Self::FibClear | Self::StClear | Self::FibDump | Self::StDump | Self::FaceDump => {}
        }
        f.write_str(CRLF)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ControlReply {
    Ok,
    /// Table listing with its `<TABLE>-COUNT` header name.
    Dump {
        counter: &'static str,
        lines: Vec<String>,
    },
    Err(String),
}

impl ControlReply {
    pub fn error(reason: impl fmt::Display) -> Self {
        Self::Err(reason.to_string())
    }

    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Err(_))
    }
}

impl From<ControlError> for ControlReply {
    fn from(err: ControlError) -> Self {
        Self::error(err)
    }
}

impl fmt::Display for ControlReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK{CRLF}{CRLF}"),
            Self::Dump { counter, lines } => {
                write!(f, "OK{CRLF}{counter}: {}{CRLF}{CRLF}", lines.len())?;
                for line in lines {
                    write!(f, "{line}{CRLF}")?;
                }
                Ok(())
            }
            Self::Err(reason) => write!(f, "ERR {reason}{CRLF}{CRLF}"),
        }
    }
}
