//! System: a query signature, a cached set of matching entities and a
//! per-entity callback.

use ahash::AHashSet;
use tracing::trace;

use crate::component::{Component, ComponentSlot};
use crate::entity::Entity;
use crate::entity_registry::EntityRegistry;
use crate::error::Result;
use crate::registry::ComponentRegistry;
use crate::signature::Signature;

/// Callback invoked once per matching entity on every system run.
pub type SystemUpdate = Box<dyn FnMut(&mut ComponentRegistry, Entity)>;

/// A collection of entities matching a required-component signature,
/// updated in one batch.
///
/// The cache is only guaranteed accurate immediately after
/// [`System::update_valid_entities`]; any entity or component mutation
/// since then leaves it stale until the next refresh.
pub struct System {
    tag: String,
    signature: Signature,
    entities: AHashSet<Entity>,
    on_update: SystemUpdate,
}

impl System {
    /// Create a system with the given tag and an empty query signature.
    /// The default callback is a no-op.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            signature: Signature::default(),
            entities: AHashSet::new(),
            on_update: Box::new(|_, _| {}),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The query signature: slots an entity must carry to match.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Currently cached matching entities. Iteration order is
    /// unspecified.
    pub fn entities(&self) -> &AHashSet<Entity> {
        &self.entities
    }

    /// Replace the per-entity callback.
    pub fn set_on_update(&mut self, updater: SystemUpdate) {
        self.on_update = updater;
    }

    /// Require `slot`. Does not touch the entity cache.
    pub fn add_dependency(&mut self, slot: ComponentSlot) {
        self.signature.set(slot);
    }

    /// Require `slot` and refresh the cache immediately.
    pub fn add_dependency_refreshed(&mut self, entities: &EntityRegistry, slot: ComponentSlot) {
        self.add_dependency(slot);
        self.update_valid_entities(entities);
    }

    /// Require `T`, resolving its slot through the component registry.
    /// Does not touch the entity cache.
    pub fn add_dependency_of<T: Component>(&mut self, components: &ComponentRegistry) -> Result<()> {
        self.signature.set(components.component_type::<T>()?);
        Ok(())
    }

    /// Require `T` and refresh the cache immediately.
    pub fn add_dependency_of_refreshed<T: Component>(
        &mut self,
        entities: &EntityRegistry,
        components: &ComponentRegistry,
    ) -> Result<()> {
        self.add_dependency_of::<T>(components)?;
        self.update_valid_entities(entities);
        Ok(())
    }

    /// Drop the requirement on `slot`. Does not touch the entity cache.
    pub fn remove_dependency(&mut self, slot: ComponentSlot) {
        self.signature.clear(slot);
    }

    /// Drop the requirement on `slot` and refresh the cache immediately.
    pub fn remove_dependency_refreshed(&mut self, entities: &EntityRegistry, slot: ComponentSlot) {
        self.remove_dependency(slot);
        self.update_valid_entities(entities);
    }

    /// Drop the requirement on `T`. Does not touch the entity cache.
    pub fn remove_dependency_of<T: Component>(
        &mut self,
        components: &ComponentRegistry,
    ) -> Result<()> {
        self.signature.clear(components.component_type::<T>()?);
        Ok(())
    }

    /// Drop the requirement on `T` and refresh the cache immediately.
    pub fn remove_dependency_of_refreshed<T: Component>(
        &mut self,
        entities: &EntityRegistry,
        components: &ComponentRegistry,
    ) -> Result<()> {
        self.remove_dependency_of::<T>(components)?;
        self.update_valid_entities(entities);
        Ok(())
    }

    /// Recompute the cache from the full live-entity map.
    ///
    /// A full rescan rather than incremental diffing: O(live entities)
    /// per refresh, correct regardless of how many mutations happened
    /// since the last one. Entities gone from the registry are evicted
    /// along with entities whose signature no longer matches.
    pub fn update_valid_entities(&mut self, registry: &EntityRegistry) {
        self.entities = registry
            .map()
            .iter()
            .filter(|(_, sig)| sig.contains_all(&self.signature))
            .map(|(&e, _)| e)
            .collect();
        trace!(tag = %self.tag, matched = self.entities.len(), "system cache refreshed");
    }

    /// Invoke the callback once per cached entity.
    pub fn run(&mut self, components: &mut ComponentRegistry) {
        for &e in &self.entities {
            (self.on_update)(components, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Marker;

    fn setup() -> (EntityRegistry, ComponentRegistry) {
        (EntityRegistry::new(), ComponentRegistry::new())
    }

    #[test]
    fn test_cache_matches_superset_rule() {
        let (mut entities, _) = setup();
        let a = entities.create_entity();
        let b = entities.create_entity();
        entities.signature_mut(a).unwrap().set(0);
        entities.signature_mut(b).unwrap().set(0);
        entities.signature_mut(b).unwrap().set(1);

        let mut sys = System::new("movement");
        sys.add_dependency(0);
        sys.update_valid_entities(&entities);
        assert!(sys.entities().contains(&a));
        assert!(sys.entities().contains(&b));

        // Narrowing the query evicts the entity lacking slot 1.
        sys.add_dependency_refreshed(&entities, 1);
        assert!(!sys.entities().contains(&a));
        assert!(sys.entities().contains(&b));
    }

    #[test]
    fn test_refresh_evicts_destroyed_entities() {
        let (mut entities, _) = setup();
        let e = entities.create_entity();
        entities.signature_mut(e).unwrap().set(2);

        let mut sys = System::new("cleanup");
        sys.add_dependency(2);
        sys.update_valid_entities(&entities);
        assert_eq!(sys.entities().len(), 1);

        entities.destroy_entity(e).unwrap();
        sys.update_valid_entities(&entities);
        assert!(sys.entities().is_empty());
    }

    #[test]
    fn test_remove_dependency_widens_match() {
        let (mut entities, _) = setup();
        let e = entities.create_entity();
        entities.signature_mut(e).unwrap().set(0);

        let mut sys = System::new("render");
        sys.add_dependency(0);
        sys.add_dependency(5);
        sys.update_valid_entities(&entities);
        assert!(sys.entities().is_empty());

        sys.remove_dependency_refreshed(&entities, 5);
        assert!(sys.entities().contains(&e));
    }

    #[test]
    fn test_typed_dependency_resolves_slot() {
        let (mut entities, mut components) = setup();
        let slot = components.register_component::<Marker>().unwrap();
        let e = entities.create_entity();
        entities.signature_mut(e).unwrap().set(slot);

        let mut sys = System::new("typed");
        sys.add_dependency_of_refreshed::<Marker>(&entities, &components)
            .unwrap();
        assert!(sys.signature().contains(slot));
        assert!(sys.entities().contains(&e));
    }

    #[test]
    fn test_typed_dependency_on_unregistered_kind_fails() {
        let (_, components) = setup();
        let mut sys = System::new("typed");
        assert!(sys.add_dependency_of::<Marker>(&components).is_err());
    }

    #[test]
    fn test_run_invokes_callback_per_cached_entity() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let (mut entities, mut components) = setup();
        let e1 = entities.create_entity();
        let e2 = entities.create_entity();
        entities.signature_mut(e1).unwrap().set(0);
        entities.signature_mut(e2).unwrap().set(0);

        let visited = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&visited);

        let mut sys = System::new("visit");
        sys.add_dependency(0);
        sys.set_on_update(Box::new(move |_, e| sink.borrow_mut().push(e)));
        sys.update_valid_entities(&entities);
        sys.run(&mut components);

        let mut got = visited.borrow().clone();
        got.sort();
        let mut want = vec![e1, e2];
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn test_default_callback_is_noop() {
        let (mut entities, mut components) = setup();
        let e = entities.create_entity();
        entities.signature_mut(e).unwrap().set(0);

        let mut sys = System::new("idle");
        sys.add_dependency(0);
        sys.update_valid_entities(&entities);
        sys.run(&mut components);
    }
}
