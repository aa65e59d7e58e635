//! Convenient re-exports of commonly used types.
//!
//! The prelude can be imported with:
//! ```
//! use signet_ecs::prelude::*;
//! ```

pub use crate::component::{Component, ComponentSlot, MAX_COMPONENTS};
pub use crate::entity::Entity;
pub use crate::entity_registry::EntityRegistry;
pub use crate::error::{EcsError, Result};
pub use crate::registry::ComponentRegistry;
pub use crate::signature::Signature;
pub use crate::system::System;
pub use crate::world::World;
