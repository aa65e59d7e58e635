// Copyright 2025 the signet_ecs authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! EntityRegistry: the set of live entities and their signatures.

use ahash::AHashMap;
use tracing::trace;

use crate::entity::Entity;
use crate::error::{EcsError, Result};
use crate::signature::Signature;

/// Entity -> signature map. Every live entity has exactly one entry.
#[derive(Default)]
pub struct EntityRegistry {
    entities: AHashMap<Entity, Signature>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh entity with an all-zero signature.
    ///
    /// Ids are random; on the negligible chance of a collision with a
    /// live entity a new id is drawn rather than clobbering the existing
    /// entry.
    pub fn create_entity(&mut self) -> Entity {
        let mut e = Entity::new();
        while self.entities.contains_key(&e) {
            e = Entity::new();
        }
        self.entities.insert(e, Signature::default());
        trace!(entity = e.id(), "entity created");
        e
    }

    /// Remove `e` from the registry.
    pub fn destroy_entity(&mut self, e: Entity) -> Result<()> {
        self.entities
            .remove(&e)
            .map(|_| trace!(entity = e.id(), "entity destroyed"))
            .ok_or(EcsError::UnknownEntity(e))
    }

    /// Overwrite `e`'s signature wholesale.
    pub fn set_signature(&mut self, e: Entity, signature: Signature) -> Result<()> {
        let entry = self.entities.get_mut(&e).ok_or(EcsError::UnknownEntity(e))?;
        *entry = signature;
        Ok(())
    }

    /// Read-only view of `e`'s signature.
    pub fn signature(&self, e: Entity) -> Result<&Signature> {
        self.entities.get(&e).ok_or(EcsError::UnknownEntity(e))
    }

    /// Mutable view of `e`'s signature, for flipping single bits without
    /// re-inserting the whole bitset.
    pub fn signature_mut(&mut self, e: Entity) -> Result<&mut Signature> {
        self.entities.get_mut(&e).ok_or(EcsError::UnknownEntity(e))
    }

    /// Full enumeration, entity -> signature. Iteration order is that of
    /// the underlying hash map, i.e. unspecified.
    pub fn map(&self) -> &AHashMap<Entity, Signature> {
        &self.entities
    }

    pub fn contains(&self, e: Entity) -> bool {
        self.entities.contains_key(&e)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Empty the whole registry.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
