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

//! signet_ecs - Signature-driven Entity Component System
//!
//! Entities are random 64-bit ids, component kinds map to dense slots,
//! and bitset signatures drive system matching. A single-threaded core
//! meant to be embedded in an application loop.

pub mod component;
pub mod entity;
pub mod entity_registry;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod signature;
pub mod system;
pub mod world;


pub use component::*;
pub use entity::*;
pub use entity_registry::*;
pub use error::*;
pub use registry::*;
pub use signature::*;
pub use system::*;
pub use world::*;
