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

//! ComponentRegistry: component kind <-> slot bookkeeping and per-entity
//! type-erased storage.

use std::any::TypeId;
use std::fmt;

use ahash::AHashMap;
use tracing::{debug, trace};

use crate::component::{Component, ComponentCell, ComponentSlot, MAX_COMPONENTS};
use crate::entity::Entity;
use crate::error::{EcsError, Result};
use crate::signature::Signature;

/// Maps component kinds to dense slots and stores, per tracked entity,
/// one type-erased cell per slot.
///
/// Slot allocation is greedy lowest-free-first: after an unregistration
/// the freed slot is the next one handed out, keeping active slot numbers
/// low.
pub struct ComponentRegistry {
    /// Component kind -> slot
    slots: AHashMap<TypeId, ComponentSlot>,

    /// Slot -> type name, for diagnostics
    slot_names: AHashMap<ComponentSlot, &'static str>,

    /// Slots currently bound to a kind
    in_use: Signature,

    /// Entity -> per-slot cells, grown on demand up to MAX_COMPONENTS
    storage: AHashMap<Entity, Vec<ComponentCell>>,

    /// When set, attaching an unregistered kind registers it on the fly.
    dynamic_registration: bool,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self {
            slots: AHashMap::new(),
            slot_names: AHashMap::new(),
            in_use: Signature::default(),
            storage: AHashMap::new(),
            dynamic_registration: true,
        }
    }

    /// Toggle on-the-fly registration in `attach_component`. Defaults to
    /// enabled; when disabled, attaching an unregistered kind fails with
    /// `NotRegistered`.
    pub fn set_dynamic_registration(&mut self, enabled: bool) {
        self.dynamic_registration = enabled;
    }

    fn lowest_free_slot(&self) -> Result<ComponentSlot> {
        (0..MAX_COMPONENTS)
            .find(|&i| !self.in_use.contains(i))
            .ok_or(EcsError::RegistryFull)
    }

    /// Bind `T` to a slot. Idempotent: a kind that already has a slot
    /// keeps it.
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentSlot> {
        let type_id = TypeId::of::<T>();
        if let Some(&slot) = self.slots.get(&type_id) {
            return Ok(slot);
        }
        let slot = self.lowest_free_slot()?;
        self.in_use.set(slot);
        self.slots.insert(type_id, slot);
        self.slot_names.insert(slot, std::any::type_name::<T>());
        debug!(kind = std::any::type_name::<T>(), slot, "component registered");
        Ok(slot)
    }

    /// Free `T`'s slot for reuse by a different kind.
    ///
    /// Every tracked entity's cell at that slot is emptied first so no
    /// stale value can be observed through a future occupant of the slot.
    pub fn unregister_component<T: Component>(&mut self) -> Result<()> {
        let type_id = TypeId::of::<T>();
        let slot = self
            .slots
            .remove(&type_id)
            .ok_or(EcsError::NotRegistered(std::any::type_name::<T>()))?;
        self.in_use.clear(slot);
        self.slot_names.remove(&slot);
        for cells in self.storage.values_mut() {
            if let Some(cell) = cells.get_mut(slot) {
                cell.detach();
            }
        }
        debug!(kind = std::any::type_name::<T>(), slot, "component unregistered");
        Ok(())
    }

    /// Slot bound to `T`, without mutating any state.
    pub fn component_type<T: Component>(&self) -> Result<ComponentSlot> {
        self.slots
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or(EcsError::NotRegistered(std::any::type_name::<T>()))
    }

    /// Kind -> slot mapping, read-only.
    pub fn component_map(&self) -> &AHashMap<TypeId, ComponentSlot> {
        &self.slots
    }

    /// Bitset of slots currently bound to a kind.
    pub fn in_use(&self) -> &Signature {
        &self.in_use
    }

    /// Start tracking `e`, allocating its per-slot storage.
    pub fn on_entity_create(&mut self, e: Entity) -> Result<()> {
        if self.storage.contains_key(&e) {
            return Err(EcsError::DuplicateEntity(e));
        }
        self.storage.insert(e, Vec::new());
        trace!(entity = e.id(), "entity storage allocated");
        Ok(())
    }

    /// Release `e`'s per-slot storage.
    pub fn on_entity_destroy(&mut self, e: Entity) -> Result<()> {
        self.storage
            .remove(&e)
            .map(|_| trace!(entity = e.id(), "entity storage released"))
            .ok_or(EcsError::UnknownEntity(e))
    }

    /// Attach `value` to `e` at `T`'s slot.
    ///
    /// An unregistered kind is registered on the fly when dynamic
    /// registration is enabled, otherwise the attach fails with
    /// `NotRegistered`.
    pub fn attach_component<T: Component>(&mut self, e: Entity, value: T) -> Result<()> {
        if !self.storage.contains_key(&e) {
            return Err(EcsError::UnknownEntity(e));
        }
        let slot = match self.component_type::<T>() {
            Ok(slot) => slot,
            Err(_) if self.dynamic_registration => self.register_component::<T>()?,
            Err(err) => return Err(err),
        };
        let cells = self.storage.get_mut(&e).ok_or(EcsError::UnknownEntity(e))?;
        if cells.len() <= slot {
            cells.resize_with(slot + 1, ComponentCell::default);
        }
        cells[slot].attach(value)?;
        trace!(entity = e.id(), kind = std::any::type_name::<T>(), "component attached");
        Ok(())
    }

    /// Attach a default-constructed `T` to `e`.
    pub fn attach_default<T: Component + Default>(&mut self, e: Entity) -> Result<()> {
        self.attach_component(e, T::default())
    }

    /// Empty `e`'s cell at `T`'s slot. Safe even when the cell is already
    /// empty.
    pub fn detach_component<T: Component>(&mut self, e: Entity) -> Result<()> {
        let slot = self.component_type::<T>()?;
        let cells = self.storage.get_mut(&e).ok_or(EcsError::UnknownEntity(e))?;
        if let Some(cell) = cells.get_mut(slot) {
            cell.detach();
        }
        trace!(entity = e.id(), kind = std::any::type_name::<T>(), "component detached");
        Ok(())
    }

    /// Mutable reference to `e`'s `T` value.
    ///
    /// Unknown entity, unknown kind and empty slot all surface as one
    /// `ComponentNotFound` condition.
    pub fn get_component<T: Component>(&mut self, e: Entity) -> Result<&mut T> {
        let not_found = EcsError::ComponentNotFound(e, std::any::type_name::<T>());
        let slot = match self.slots.get(&TypeId::of::<T>()) {
            Some(&slot) => slot,
            None => return Err(not_found),
        };
        let cells = self.storage.get_mut(&e).ok_or(not_found.clone())?;
        let cell = cells.get_mut(slot).ok_or(not_found)?;
        cell.get_mut::<T>(e)
    }

    /// True when `e` has a value attached at `T`'s slot.
    pub fn has_component<T: Component>(&self, e: Entity) -> bool {
        match (self.slots.get(&TypeId::of::<T>()), self.storage.get(&e)) {
            (Some(&slot), Some(cells)) => {
                cells.get(slot).map(ComponentCell::has_value).unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Reset the registry to empty.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.slot_names.clear();
        self.in_use.clear_all();
        self.storage.clear();
        debug!("component registry cleared");
    }

    /// Emit the registry state through tracing, at debug level.
    pub fn log_state(&self) {
        debug!(registry = %self, "component registry state");
    }
}

impl fmt::Display for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ComponentRegistry {{ kinds: {}, entities: {}, slots: [",
            self.slots.len(),
            self.storage.len()
        )?;
        let mut first = true;
        for slot in self.in_use.ones() {
            let name = self.slot_names.get(&slot).copied().unwrap_or("?");
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{slot}:{name}")?;
            first = false;
        }
        write!(f, "] }}")
    }
}
