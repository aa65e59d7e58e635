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

//! Entity identifiers.
//!
//! An entity is a random 64-bit id drawn from a process-wide generator.
//! Uniqueness is statistical, not guaranteed: at populations in the tens
//! of thousands the collision probability is negligible, and that risk is
//! accepted by design.

use std::fmt;
use std::sync::OnceLock;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Shared generator, seeded from OS entropy on first use. The mutex makes
// entity creation safe if it ever happens off the main thread.
static ENTITY_RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();

fn next_entity_id() -> u64 {
    let rng = ENTITY_RNG.get_or_init(|| Mutex::new(StdRng::from_entropy()));
    rng.lock().gen()
}

/// Opaque unique identifier denoting one simulated thing.
///
/// Entities are plain values: copyable, hashable and compared by raw id.
/// Destroying an entity in a registry leaves any outstanding `Entity`
/// values as inert integers; operating on them afterwards is a caller
/// error surfaced by the registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u64);

impl Entity {
    /// Draw a fresh random entity id.
    pub fn new() -> Self {
        Self(next_entity_id())
    }

    /// Rebuild an entity handle from a raw id.
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The underlying integer id.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
