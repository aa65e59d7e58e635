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

//! World: the façade coordinating entity registry, component registry and
//! systems.
//!
//! Every entity-creation, attach/detach and destruction call goes through
//! the world so that entity signatures, component storage and every
//! system's cached entity set stay mutually consistent. A failure at any
//! step leaves no partial mutation behind.

use tracing::debug;

use crate::component::{Component, ComponentSlot};
use crate::entity::Entity;
use crate::entity_registry::EntityRegistry;
use crate::error::{EcsError, Result};
use crate::registry::ComponentRegistry;
use crate::signature::Signature;
use crate::system::System;

/// Composition root owning one [`EntityRegistry`], one
/// [`ComponentRegistry`] and the registered systems.
///
/// Refresh policy: attach, detach and entity removal each trigger a full
/// refresh of every system's cache, so caches are accurate after every
/// world mutation. `update_systems_entities` remains available for
/// drivers that mutate the registries directly.
///
/// System execution order is registration order, first registered first.
#[derive(Default)]
pub struct World {
    entities: EntityRegistry,
    components: ComponentRegistry,
    systems: Vec<System>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    fn system_index(&self, tag: &str) -> Result<usize> {
        self.systems
            .iter()
            .position(|s| s.tag() == tag)
            .ok_or_else(|| EcsError::SystemNotFound(tag.to_string()))
    }

    /// Create an entity, registered with both registries as one unit.
    pub fn create_entity(&mut self) -> Result<Entity> {
        let e = self.entities.create_entity();
        if let Err(err) = self.components.on_entity_create(e) {
            // Keep the pairing invariant: never leave a half-registered
            // entity behind.
            let _ = self.entities.destroy_entity(e);
            return Err(err);
        }
        Ok(e)
    }

    /// Destroy `e` everywhere.
    ///
    /// The signature is zeroed and systems refreshed before the registry
    /// entries go away, so every system evicts `e` while the entity map
    /// still knows it.
    pub fn remove_entity(&mut self, e: Entity) -> Result<()> {
        self.entities.set_signature(e, Signature::default())?;
        self.update_systems_entities();
        self.entities.destroy_entity(e)?;
        self.components.on_entity_destroy(e)?;
        debug!(entity = e.id(), "entity removed from world");
        Ok(())
    }

    /// Bind `T` to a component slot.
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentSlot> {
        self.components.register_component::<T>()
    }

    /// Slot bound to `T`.
    pub fn component_type<T: Component>(&self) -> Result<ComponentSlot> {
        self.components.component_type::<T>()
    }

    /// Attach `data` to `e`, set the slot bit in `e`'s signature and
    /// refresh every system.
    pub fn attach_component<T: Component>(&mut self, e: Entity, data: T) -> Result<()> {
        // Checked up front so the signature update below cannot fail
        // after component storage was already mutated.
        if !self.entities.contains(e) {
            return Err(EcsError::UnknownEntity(e));
        }
        self.components.attach_component(e, data)?;
        let slot = self.components.component_type::<T>()?;
        self.entities.signature_mut(e)?.set(slot);
        self.update_systems_entities();
        Ok(())
    }

    /// Attach a default-constructed `T` to `e`.
    pub fn attach_default<T: Component + Default>(&mut self, e: Entity) -> Result<()> {
        self.attach_component(e, T::default())
    }

    /// Detach `T` from `e`, clear the slot bit and refresh every system.
    pub fn detach_component<T: Component>(&mut self, e: Entity) -> Result<()> {
        if !self.entities.contains(e) {
            return Err(EcsError::UnknownEntity(e));
        }
        let slot = self.components.component_type::<T>()?;
        self.components.detach_component::<T>(e)?;
        self.entities.signature_mut(e)?.clear(slot);
        self.update_systems_entities();
        Ok(())
    }

    /// Mutable reference to `e`'s `T` value.
    pub fn get_component<T: Component>(&mut self, e: Entity) -> Result<&mut T> {
        self.components.get_component::<T>(e)
    }

    /// `e`'s current signature.
    pub fn entity_signature(&self, e: Entity) -> Result<&Signature> {
        self.entities.signature(e)
    }

    /// Bitset of component slots currently bound to a kind.
    pub fn registry_signature(&self) -> &Signature {
        self.components.in_use()
    }

    /// Register `sys`, refreshing its cache once.
    ///
    /// A system must depend on at least one component kind; an all-zero
    /// query would match every entity, including entities with no
    /// components at all.
    pub fn register_system(&mut self, mut sys: System) -> Result<()> {
        if sys.signature().is_empty() {
            return Err(EcsError::EmptySystemQuery(sys.tag().to_string()));
        }
        if self.system_index(sys.tag()).is_ok() {
            return Err(EcsError::DuplicateSystemTag(sys.tag().to_string()));
        }
        sys.update_valid_entities(&self.entities);
        debug!(tag = sys.tag(), matched = sys.entities().len(), "system registered");
        self.systems.push(sys);
        Ok(())
    }

    /// Drop the system with this tag.
    pub fn remove_system(&mut self, tag: &str) -> Result<()> {
        let idx = self.system_index(tag)?;
        self.systems.remove(idx);
        debug!(tag, "system removed");
        Ok(())
    }

    /// Add `T` as a requirement of the tagged system and refresh its
    /// cache.
    pub fn add_system_dependency<T: Component>(&mut self, tag: &str) -> Result<()> {
        let idx = self.system_index(tag)?;
        self.systems[idx].add_dependency_of_refreshed::<T>(&self.entities, &self.components)
    }

    /// Drop `T` from the tagged system's requirements and refresh its
    /// cache. A system left with an empty query is removed outright: it
    /// no longer satisfies the non-empty-query invariant.
    pub fn remove_system_dependency<T: Component>(&mut self, tag: &str) -> Result<()> {
        let idx = self.system_index(tag)?;
        self.systems[idx].remove_dependency_of_refreshed::<T>(&self.entities, &self.components)?;
        if self.systems[idx].signature().is_empty() {
            let sys = self.systems.remove(idx);
            debug!(tag = sys.tag(), "system dropped, query became empty");
        }
        Ok(())
    }

    /// Refresh every system's cached entity set.
    pub fn update_systems_entities(&mut self) {
        for sys in &mut self.systems {
            sys.update_valid_entities(&self.entities);
        }
    }

    /// Run every system's callback pass, in registration order.
    pub fn update_systems(&mut self) {
        for sys in &mut self.systems {
            sys.run(&mut self.components);
        }
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Reset systems, component registry and entity registry to empty.
    pub fn clear_world(&mut self) {
        self.systems.clear();
        self.components.clear();
        self.entities.clear();
        debug!("world cleared");
    }
}
