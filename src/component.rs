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

//! Component kinds and the per-slot value container.
//!
//! Components are data attached to entities. Each distinct component type
//! gets a small integer slot from the registry; per entity there is one
//! type-erased cell per slot, either empty or holding exactly one value of
//! the registered type.

use std::any::Any;

use crate::entity::Entity;
use crate::error::{EcsError, Result};

/// Maximum number of concurrently registered component kinds.
pub const MAX_COMPONENTS: usize = 300;

/// Dense index assigned to a component kind; doubles as the bit position
/// in signatures and the cell index in per-entity storage.
pub type ComponentSlot = usize;

/// Marker trait for components
///
/// Components must be 'static (no borrowed data)
pub trait Component: 'static + Send + Sync {}

/// Automatically implement Component for all valid types
impl<T: 'static + Send + Sync> Component for T {}

/// Type-erased value container for one (entity, slot) pair.
///
/// The registry's slot discipline is the only guard pairing slots with
/// types; the cell itself only detects "no value" and downcast failure.
#[derive(Default)]
pub struct ComponentCell {
    value: Option<Box<dyn Any + Send + Sync>>,
}

impl ComponentCell {
    /// Store `value` in the cell.
    ///
    /// A cell cannot be re-filled while non-empty.
    pub fn attach<T: Component>(&mut self, value: T) -> Result<()> {
        if self.value.is_some() {
            return Err(EcsError::AlreadyAttached(std::any::type_name::<T>()));
        }
        self.value = Some(Box::new(value));
        Ok(())
    }

    /// Empty the cell. Safe to call on an already-empty cell.
    pub fn detach(&mut self) {
        self.value = None;
    }

    /// Mutable access to the stored value.
    ///
    /// `entity` is only used to report which entity the lookup was for.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T> {
        self.value
            .as_mut()
            .and_then(|v| v.downcast_mut::<T>())
            .ok_or(EcsError::ComponentNotFound(
                entity,
                std::any::type_name::<T>(),
            ))
    }

    /// O(1) occupancy check.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(u32);

    #[test]
    fn test_attach_then_get() {
        let e = Entity::from_raw(1);
        let mut cell = ComponentCell::default();
        assert!(!cell.has_value());
        cell.attach(Health(50)).unwrap();
        assert!(cell.has_value());
        assert_eq!(*cell.get_mut::<Health>(e).unwrap(), Health(50));
    }

    #[test]
    fn test_double_attach_fails() {
        let mut cell = ComponentCell::default();
        cell.attach(Health(1)).unwrap();
        let err = cell.attach(Health(2)).unwrap_err();
        assert!(matches!(err, EcsError::AlreadyAttached(_)));
    }

    #[test]
    fn test_detach_is_idempotent() {
        let e = Entity::from_raw(2);
        let mut cell = ComponentCell::default();
        cell.attach(Health(3)).unwrap();
        cell.detach();
        cell.detach();
        assert!(!cell.has_value());
        assert!(cell.get_mut::<Health>(e).is_err());
    }

    #[test]
    fn test_wrong_type_reads_as_not_found() {
        let e = Entity::from_raw(3);
        let mut cell = ComponentCell::default();
        cell.attach(Health(9)).unwrap();
        let err = cell.get_mut::<String>(e).unwrap_err();
        assert!(matches!(err, EcsError::ComponentNotFound(_, _)));
    }

    #[test]
    fn test_reattach_after_detach() {
        let e = Entity::from_raw(4);
        let mut cell = ComponentCell::default();
        cell.attach(Health(1)).unwrap();
        cell.detach();
        cell.attach(Health(2)).unwrap();
        assert_eq!(cell.get_mut::<Health>(e).unwrap().0, 2);
    }
}
