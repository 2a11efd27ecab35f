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

//! Registry of live faces, keyed by face id.

use crate::face::{Face, FaceId, FaceKind};
use std::collections::BTreeMap;
use std::net::SocketAddr;

#[derive(Debug, Default)]
pub struct FaceRegistry {
    faces: BTreeMap<FaceId, Face>,
}

impl FaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a face. Returns `false` if the id is already taken.
    pub fn insert(&mut self, face: Face) -> bool {
        if self.faces.contains_key(&face.id()) {
            return false;
        }
        self.faces.insert(face.id(), face);
        true
    }

    pub fn remove(&mut self, face_id: FaceId) -> Option<Face> {
        self.faces.remove(&face_id)
    }

    pub fn find(&self, face_id: FaceId) -> Option<&Face> {
        self.faces.get(&face_id)
    }

    /// Finds the face of `kind` connected to `remote`.
    pub fn find_by_remote(&self, kind: FaceKind, remote: SocketAddr) -> Option<&Face> {
        self.faces
            .values()
            .find(|face| face.info().kind == kind && face.info().remote == remote)
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.keys().copied()
    }

    /// One line per face, ordered by id: `101=(tcp,127.0.0.1:9876,10.0.0.2:50000)`.
    pub fn dump(&self) -> Vec<String> {
        self.faces
            .values()
            .map(|face| format!("{}={}", face.id(), face.info()))
            .collect()
    }
}
