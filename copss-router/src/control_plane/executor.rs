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

//! Applies control commands to the router's tables.

use super::command::{ControlCommand, ControlError, ControlReply};
use crate::cd::Cd;
use crate::data_plane::face_registry::FaceRegistry;
use crate::face::FaceKind;
use crate::routing::{Fib, St};
use std::net::SocketAddr;

/// Outcome of executing one command against the tables.
#[derive(Debug, Eq, PartialEq)]
pub enum Execution {
    Reply(ControlReply),
    /// The command needs a face that does not exist yet. The caller opens it and
    /// executes the command again once the face is registered.
    Connect {
        kind: FaceKind,
        remote: SocketAddr,
        command: ControlCommand,
    },
}

impl From<Result<ControlReply, ControlError>> for Execution {
    fn from(result: Result<ControlReply, ControlError>) -> Self {
        Self::Reply(result.unwrap_or_else(ControlReply::from))
    }
}

/// Mutable view over the tables a command may touch.
pub struct Tables<'a> {
    pub fib: &'a mut Fib,
    pub st: &'a mut St,
    pub faces: &'a FaceRegistry,
}

/// Executes `command`. With `may_connect` unset a missing face is an error
/// instead of a [`Execution::Connect`] request.
pub fn execute(command: ControlCommand, tables: Tables<'_>, may_connect: bool) -> Execution {
    let Tables { fib, st, faces } = tables;
    match command {
        ControlCommand::FibAdd {
            name,
            kind,
            remote,
            cost,
        } => {
            if let Err(err) = Cd::parse(&name) {
                return Execution::Reply(ControlError::from(err).into());
            }
            match faces.find_by_remote(kind, remote) {
                Some(face) => fib
                    .add(&name, face.id(), cost)
                    .map(|()| ControlReply::Ok)
                    .map_err(ControlError::from)
                    .into(),
                None if may_connect => Execution::Connect {
                    kind,
                    remote,
                    command: ControlCommand::FibAdd {
                        name,
                        kind,
                        remote,
                        cost,
                    },
                },
                None => Execution::Reply(ControlError::FaceNotFound.into()),
            }
        }
        ControlCommand::FibDelEntry { name } => fib
            .remove_entry(&name)
            .map(|_| ControlReply::Ok)
            .map_err(ControlError::from)
            .into(),
        ControlCommand::FibDelNextHop { name, kind, remote } => {
            match faces.find_by_remote(kind, remote) {
                Some(face) => fib
                    .remove_next_hop(&name, face.id())
                    .map(|_| ControlReply::Ok)
                    .map_err(ControlError::from)
                    .into(),
                None => Execution::Reply(ControlError::FaceNotFound.into()),
            }
        }
        ControlCommand::FibClear => {
            fib.clear();
            Execution::Reply(ControlReply::Ok)
        }
        ControlCommand::StClear => {
            st.clear();
            Execution::Reply(ControlReply::Ok)
        }
        ControlCommand::FaceDel { face_id } => {
            if let Some(face) = faces.find(face_id) {
                face.shutdown();
            }
            Execution::Reply(ControlReply::Ok)
        }
        ControlCommand::FibDump => Execution::Reply(ControlReply::Dump {
            counter: "FIB-COUNT",
            lines: fib.dump(),
        }),
        ControlCommand::StDump => Execution::Reply(ControlReply::Dump {
            counter: "ST-COUNT",
            lines: st.dump(),
        }),
        ControlCommand::FaceDump => Execution::Reply(ControlReply::Dump {
            counter: "FACE-COUNT",
            lines: faces.dump(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::{Face, FaceId, FaceInfo, FaceTransport};

    struct Fixture {
        fib: Fib,
        st: St,
        faces: FaceRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                fib: Fib::new(),
                st: St::default(),
                faces: FaceRegistry::new(),
            }
        }

        fn face(&mut self, face_id: FaceId, kind: FaceKind, remote: &str) -> FaceTransport {
            let info = FaceInfo {
                kind,
                local: "127.0.0.1:9876".parse().unwrap(),
                remote: remote.parse().unwrap(),
            };
            let (face, transport) = Face::new(face_id, info);
            self.faces.insert(face);
            transport
        }

        fn run(&mut self, request: &str, may_connect: bool) -> Execution {
            let command = ControlCommand::parse(request).unwrap();
            execute(
                command,
                Tables {
                    fib: &mut self.fib,
                    st: &mut self.st,
                    faces: &self.faces,
                },
                may_connect,
            )
        }

        fn reply(&mut self, request: &str) -> ControlReply {
            match self.run(request, true) {
                Execution::Reply(reply) => reply,
                other => panic!("expected a reply, got {other:?}"),
            }
        }
    }

    const ADD_B: &str = "FIB-ADD\nNAME: /b\nTYPE: tcp\nIP: 10.0.0.2\nPORT: 9876\nCOST: 4\n\n";

    #[test]
    fn fib_add_uses_existing_face() {
        let mut fixture = Fixture::new();
        let _transport = fixture.face(101, FaceKind::Tcp, "10.0.0.2:9876");

        assert_eq!(fixture.reply(ADD_B), ControlReply::Ok);
        assert_eq!(fixture.fib.dump(), vec!["/b=(101,4)".to_string()]);
    }

    #[test]
    fn fib_add_without_face_asks_for_connection() {
        let mut fixture = Fixture::new();
        let _udp_twin = fixture.face(101, FaceKind::Udp, "10.0.0.2:9876");

        match fixture.run(ADD_B, true) {
            Execution::Connect { kind, remote, .. } => {
                assert_eq!(kind, FaceKind::Tcp);
                assert_eq!(remote, "10.0.0.2:9876".parse().unwrap());
            }
            other => panic!("expected a connect request, got {other:?}"),
        }
        assert_eq!(
            fixture.run(ADD_B, false),
            Execution::Reply(ControlReply::Err("face not found".to_string()))
        );
    }

    #[test]
    fn fib_add_rejects_bad_name_before_connecting() {
        let mut fixture = Fixture::new();
        let reply = fixture.reply(
            "FIB-ADD\nNAME: /a(/b\nTYPE: tcp\nIP: 10.0.0.2\nPORT: 9876\nCOST: 1\n\n",
        );
        assert!(!reply.is_ok());
    }

    #[test]
    fn fib_del_variants() {
        let mut fixture = Fixture::new();
        let _transport = fixture.face(101, FaceKind::Tcp, "10.0.0.2:9876");
        fixture.fib.add("/a", 101, 1).unwrap();
        fixture.fib.add("/b", 101, 1).unwrap();
        fixture.fib.add("/c", 101, 1).unwrap();

        assert_eq!(
            fixture.reply("FIB-DEL\nNAME: /a\nTYPE: tcp\nIP: 10.0.0.2\nPORT: 9876\n\n"),
            ControlReply::Ok
        );
        assert_eq!(fixture.fib.len(), 2);
        assert_eq!(
            fixture.reply("FIB-DEL\nNAME: /b\nTYPE: udp\nIP: 10.0.0.2\nPORT: 9876\n\n"),
            ControlReply::Err("face not found".to_string())
        );

        assert_eq!(fixture.reply("FIB-DEL\nNAME: /b\n\n"), ControlReply::Ok);
        assert_eq!(fixture.fib.len(), 1);

        assert_eq!(fixture.reply("FIB-DEL\n\n"), ControlReply::Ok);
        assert!(fixture.fib.is_empty());
    }

    #[test]
    fn st_del_clears_subscriptions() {
        let mut fixture = Fixture::new();
        fixture.st.add("/a".parse().unwrap(), 101);

        assert_eq!(fixture.reply("ST-DEL\n\n"), ControlReply::Ok);
        assert!(fixture.st.is_empty());
    }

    #[test]
    fn face_del_shuts_face_down_and_always_succeeds() {
        let mut fixture = Fixture::new();
        let transport = fixture.face(101, FaceKind::Tcp, "10.0.0.2:9876");

        assert_eq!(fixture.reply("FACE-DEL\nFACE: 101\n\n"), ControlReply::Ok);
        assert!(transport.shutdown.is_cancelled());
        assert_eq!(fixture.reply("FACE-DEL\nFACE: 555\n\n"), ControlReply::Ok);
    }

    #[test]
    fn dumps_report_counts() {
        let mut fixture = Fixture::new();
        let _transport = fixture.face(101, FaceKind::Udp, "10.0.0.3:9000");
        fixture.fib.add("/a", 101, 2).unwrap();

        assert_eq!(
            fixture.reply("FIB-DUMP\n\n"),
            ControlReply::Dump {
                counter: "FIB-COUNT",
                lines: vec!["/a=(101,2)".to_string()],
            }
        );
        assert_eq!(
            fixture.reply("ST-DUMP\n\n"),
            ControlReply::Dump {
                counter: "ST-COUNT",
                lines: Vec::new(),
            }
        );
        assert_eq!(
            fixture.reply("FACE-DUMP\n\n"),
            ControlReply::Dump {
                counter: "FACE-COUNT",
                lines: vec!["101=(udp,127.0.0.1:9876,10.0.0.3:9000)".to_string()],
            }
        );
    }
}
