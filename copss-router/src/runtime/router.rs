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

//! The router event loop.

use super::options::NodeMode;
use crate::control_plane::executor::{execute, Execution, Tables};
use crate::control_plane::{ControlCommand, ControlError, ControlReply};
use crate::data_plane::connector::FaceConnector;
use crate::data_plane::face_registry::FaceRegistry;
use crate::face::{Face, FaceId, FaceKind};
use crate::forwarding::{FaceEventHandler, Forwarder, RendezvousForwarder};
use crate::observability::events;
use crate::packet::Packet;
use crate::routing::{Fib, St};
use bytes::Bytes;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

const COMPONENT: &str = "router";

/// Everything the router task reacts to.
#[derive(Debug)]
pub enum RouterEvent {
    FaceUp(Face),
    /// A decoded packet together with the bytes it arrived as.
    Packet {
        face_id: FaceId,
        packet: Packet,
        wire: Bytes,
    },
    FaceDown(FaceId),
    Control {
        command: ControlCommand,
        reply: oneshot::Sender<ControlReply>,
    },
    /// An outbound face requested by `command` was opened, or could not be.
    Connected {
        command: ControlCommand,
        result: Result<FaceId, ControlError>,
        reply: oneshot::Sender<ControlReply>,
    },
}

/// Cloneable handle for submitting control commands to a running router.
#[derive(Clone, Debug)]
pub struct RouterHandle {
    events: mpsc::Sender<RouterEvent>,
}

impl RouterHandle {
    pub fn new(events: mpsc::Sender<RouterEvent>) -> Self {
        Self { events }
    }

    /// Runs `command` on the router task and waits for its reply.
    pub async fn control(&self, command: ControlCommand) -> ControlReply {
        let (reply, response) = oneshot::channel();
        let event = RouterEvent::Control { command, reply };
        if self.events.send(event).await.is_err() {
            return ControlError::RouterStopped.into();
        }
        response
            .await
            .unwrap_or_else(|_| ControlError::RouterStopped.into())
    }

    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }
}

/// Owns the FIB, the ST and the face registry; all mutation happens on the task
/// running [`Router::run`].
pub struct Router {
    mode: NodeMode,
    fib: Fib,
    st: St,
    faces: FaceRegistry,
    events: mpsc::Receiver<RouterEvent>,
    // Weak so that dropping every external sender still ends the loop.
    loopback: mpsc::WeakSender<RouterEvent>,
    connector: Option<FaceConnector>,
}

impl Router {
    /// Creates a router and the sender that feeds it.
    pub fn new(
        mode: NodeMode,
        st_lifetime: Option<Duration>,
        queue_size: usize,
    ) -> (Self, mpsc::Sender<RouterEvent>) {
        let (sender, events) = mpsc::channel(queue_size.max(1));
        let router = Self {
            mode,
            fib: Fib::new(),
            st: St::new(st_lifetime),
            faces: FaceRegistry::new(),
            events,
            loopback: sender.downgrade(),
            connector: None,
        };
        (router, sender)
    }

    /// Lets `FIB-ADD` open faces toward neighbours that are not connected yet.
    pub fn set_connector(&mut self, connector: FaceConnector) {
        self.connector = Some(connector);
    }

    pub fn mode(&self) -> NodeMode {
        self.mode
    }

    /// Processes events until every sender is dropped.
    pub async fn run(self) {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Processes events until every sender is dropped or `shutdown` resolves.
    pub async fn run_until(mut self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        info!(
            event = events::ROUTER_START,
            component = COMPONENT,
            mode = ?self.mode,
            "router started"
        );
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                event = self.events.recv() => {
                    let Some(event) = event else {
                        info!(
                            event = events::EVENT_QUEUE_CLOSED,
                            component = COMPONENT,
                            "no event senders left"
                        );
                        break;
                    };
                    self.handle_event(event);
                }
                _ = self.st.next_expired() => {}
            }
        }
        self.stop();
    }

    fn stop(&mut self) {
        for face_id in self.faces.ids() {
            if let Some(face) = self.faces.find(face_id) {
                face.shutdown();
            }
        }
        info!(
            event = events::ROUTER_STOP,
            component = COMPONENT,
            faces = self.faces.len(),
            fib_entries = self.fib.len(),
            st_entries = self.st.len(),
            "router stopped"
        );
    }

    fn with_handler<R>(&mut self, f: impl FnOnce(&mut dyn FaceEventHandler) -> R) -> R {
        match self.mode {
            NodeMode::Router => f(&mut Forwarder::new(
                &mut self.fib,
                &mut self.st,
                &mut self.faces,
            )),
            NodeMode::Rendezvous => f(&mut RendezvousForwarder::new(&mut self.faces)),
        }
    }

    fn handle_event(&mut self, event: RouterEvent) {
        match event {
            RouterEvent::FaceUp(face) => {
                let face_id = face.id();
                if !self.faces.insert(face) {
                    warn!(
                        event = events::FACE_DUPLICATE,
                        component = COMPONENT,
                        face_id,
                        "face id already registered"
                    );
                }
            }
            RouterEvent::Packet {
                face_id,
                packet,
                wire,
            } => {
                if self.faces.find(face_id).is_none() {
                    debug!(
                        event = events::PACKET_UNKNOWN_FACE,
                        component = COMPONENT,
                        face_id,
                        "dropping packet from unregistered face"
                    );
                    return;
                }
                self.with_handler(|handler| handler.on_packet(face_id, &packet, &wire));
            }
            RouterEvent::FaceDown(face_id) => {
                self.with_handler(|handler| handler.on_face_shutdown(face_id));
            }
            RouterEvent::Control { command, reply } => self.handle_control(command, reply, true),
            RouterEvent::Connected {
                command,
                result,
                reply,
            } => match result {
                Ok(_) => self.handle_control(command, reply, false),
                Err(err) => {
                    let _ = reply.send(err.into());
                }
            },
        }
    }

    fn handle_control(
        &mut self,
        command: ControlCommand,
        reply: oneshot::Sender<ControlReply>,
        may_connect: bool,
    ) {
        if self.mode == NodeMode::Rendezvous {
            let _ = reply.send(ControlError::Unsupported.into());
            return;
        }
        let tables = Tables {
            fib: &mut self.fib,
            st: &mut self.st,
            faces: &self.faces,
        };
        match execute(command, tables, may_connect) {
            Execution::Reply(result) => {
                let _ = reply.send(result);
            }
            Execution::Connect {
                kind,
                remote,
                command,
            } => self.spawn_connect(kind, remote, command, reply),
        }
    }

    /// Opens the face in the background and feeds the command back in once the
    /// face has been announced.
    fn spawn_connect(
        &self,
        kind: FaceKind,
        remote: SocketAddr,
        command: ControlCommand,
        reply: oneshot::Sender<ControlReply>,
    ) {
        let (Some(connector), Some(loopback)) = (self.connector.clone(), self.loopback.upgrade())
        else {
            let _ = reply.send(ControlError::FaceNotFound.into());
            return;
        };
        info!(
            event = events::CONTROL_CONNECT,
            component = COMPONENT,
            kind = %kind,
            remote = %remote,
            "opening face for control command"
        );
        tokio::spawn(async move {
            let result = connector
                .connect(kind, remote)
                .await
                .map_err(|err| ControlError::Transport(err.to_string()));
            let _ = loopback
                .send(RouterEvent::Connected {
                    command,
                    result,
                    reply,
                })
                .await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::{FaceInfo, FaceTransport};
    use crate::packet::{Pub, Sub};

    fn face(face_id: FaceId, remote: &str) -> (Face, FaceTransport) {
        let info = FaceInfo {
            kind: FaceKind::Tcp,
            local: "127.0.0.1:9876".parse().unwrap(),
            remote: remote.parse().unwrap(),
        };
        Face::new(face_id, info)
    }

    fn control(router: &mut Router, request: &str) -> ControlReply {
        let (reply, mut response) = oneshot::channel();
        let command = ControlCommand::parse(request).unwrap();
        router.handle_event(RouterEvent::Control { command, reply });
        response.try_recv().unwrap()
    }

    fn packet(router: &mut Router, face_id: FaceId, packet: Packet) {
        let wire = packet.encode();
        router.handle_event(RouterEvent::Packet {
            face_id,
            packet,
            wire,
        });
    }

    #[tokio::test]
    async fn subscription_and_publication_flow_through_router() {
        let (mut router, _sender) = Router::new(NodeMode::Router, None, 16);
        let (upstream, mut upstream_transport) = face(3, "10.0.0.3:9876");
        let (subscriber, mut subscriber_transport) = face(7, "10.0.0.7:9876");
        router.handle_event(RouterEvent::FaceUp(upstream));
        router.handle_event(RouterEvent::FaceUp(subscriber));
        assert_eq!(
            control(
                &mut router,
                "FIB-ADD\nNAME: /news\nTYPE: tcp\nIP: 10.0.0.3\nPORT: 9876\nCOST: 1\n\n"
            ),
            ControlReply::Ok
        );

        let sub = Packet::Sub(Sub::new("/news(/sports)/today".parse().unwrap()));
        packet(&mut router, 7, sub.clone());
        let forwarded = upstream_transport.outbound.try_recv().unwrap();
        assert_eq!(Packet::decode(&forwarded).unwrap(), sub);

        let publication = Packet::PubFromRp(Pub::new(
            "/news/sports/today".parse().unwrap(),
            &b"goal"[..],
        ));
        packet(&mut router, 3, publication.clone());
        let delivered = subscriber_transport.outbound.try_recv().unwrap();
        assert_eq!(delivered, publication.encode());
    }

    #[tokio::test]
    async fn packets_from_unknown_faces_are_dropped() {
        let (mut router, _sender) = Router::new(NodeMode::Router, None, 16);
        packet(&mut router, 9, Packet::Sub(Sub::new("/a".parse().unwrap())));
        assert!(router.st.is_empty());
    }

    #[tokio::test]
    async fn face_down_clears_tables() {
        let (mut router, _sender) = Router::new(NodeMode::Router, None, 16);
        let (upstream, _transport) = face(3, "10.0.0.3:9876");
        router.handle_event(RouterEvent::FaceUp(upstream));
        packet(&mut router, 3, Packet::Sub(Sub::new("/a".parse().unwrap())));
        router.fib.add("/a", 3, 1).unwrap();

        router.handle_event(RouterEvent::FaceDown(3));
        assert!(router.faces.is_empty());
        assert!(router.fib.is_empty());
        assert!(router.st.is_empty());
    }

    #[tokio::test]
    async fn fib_add_without_connector_reports_missing_face() {
        let (mut router, _sender) = Router::new(NodeMode::Router, None, 16);
        assert_eq!(
            control(
                &mut router,
                "FIB-ADD\nNAME: /a\nTYPE: udp\nIP: 10.0.0.3\nPORT: 9876\nCOST: 1\n\n"
            ),
            ControlReply::Err("face not found".to_string())
        );
    }

    #[tokio::test]
    async fn failed_connection_is_reported_to_the_client() {
        let (mut router, _sender) = Router::new(NodeMode::Router, None, 16);
        let (reply, mut response) = oneshot::channel();
        router.handle_event(RouterEvent::Connected {
            command: ControlCommand::FibClear,
            result: Err(ControlError::Transport("connection refused".to_string())),
            reply,
        });
        assert_eq!(
            response.try_recv().unwrap(),
            ControlReply::Err("connection refused".to_string())
        );
    }

    #[tokio::test]
    async fn rendezvous_echoes_and_refuses_control() {
        let (mut router, _sender) = Router::new(NodeMode::Rendezvous, None, 16);
        let (publisher, mut transport) = face(101, "10.0.0.5:40000");
        router.handle_event(RouterEvent::FaceUp(publisher));

        let publication = Pub::new("/a/b".parse().unwrap(), &b"x"[..]);
        packet(&mut router, 101, Packet::PubToRp(publication.clone()));
        let echoed = transport.outbound.try_recv().unwrap();
        assert_eq!(
            Packet::decode(&echoed).unwrap(),
            Packet::PubFromRp(publication)
        );

        assert!(!control(&mut router, "FIB-DUMP\n\n").is_ok());
    }

    #[tokio::test]
    async fn run_ends_when_senders_are_dropped() {
        let (router, sender) = Router::new(NodeMode::Router, None, 16);
        let handle = RouterHandle::new(sender);
        let task = tokio::spawn(router.run());

        assert_eq!(
            handle.control(ControlCommand::FibDump).await,
            ControlReply::Dump {
                counter: "FIB-COUNT",
                lines: Vec::new(),
            }
        );
        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn subscriptions_expire_inside_the_loop() {
        let (router, sender) = Router::new(NodeMode::Router, Some(Duration::from_secs(10)), 16);
        let handle = RouterHandle::new(sender.clone());
        let task = tokio::spawn(router.run());
        let (subscriber, _transport) = face(7, "10.0.0.7:9876");
        sender.send(RouterEvent::FaceUp(subscriber)).await.unwrap();
        let sub = Packet::Sub(Sub::new("/a".parse().unwrap()));
        let wire = sub.encode();
        sender
            .send(RouterEvent::Packet {
                face_id: 7,
                packet: sub,
                wire,
            })
            .await
            .unwrap();

        let ControlReply::Dump { lines, .. } = handle.control(ControlCommand::StDump).await else {
            panic!("expected a dump");
        };
        assert_eq!(lines.len(), 1);

        tokio::time::sleep(Duration::from_secs(11)).await;
        let ControlReply::Dump { lines, .. } = handle.control(ControlCommand::StDump).await else {
            panic!("expected a dump");
        };
        assert!(lines.is_empty());

        drop(sender);
        drop(handle);
        task.await.unwrap();
    }
}
