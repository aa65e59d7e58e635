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

//! Error types

use std::fmt;

use crate::entity::Entity;

/// ECS error type
///
/// Every variant is a misuse of the API rather than an environmental
/// failure; there is no retry path anywhere in the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Entity already tracked by the component registry
    DuplicateEntity(Entity),

    /// Entity not present in the relevant registry
    UnknownEntity(Entity),

    /// Component kind has no slot in the registry
    NotRegistered(&'static str),

    /// Component slot already holds a value for this entity
    AlreadyAttached(&'static str),

    /// Component missing on the entity (unknown entity, unknown kind
    /// or empty slot, folded into one user-facing condition)
    ComponentNotFound(Entity, &'static str),

    /// All component slots are occupied
    RegistryFull,

    /// System registered with an all-zero query signature
    EmptySystemQuery(String),

    /// A system with this tag already exists in the world
    DuplicateSystemTag(String),

    /// No system with this tag exists in the world
    SystemNotFound(String),
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::DuplicateEntity(e) => {
                write!(f, "Entity {e} is already registered")
            }
            EcsError::UnknownEntity(e) => write!(f, "Entity {e} not found"),
            EcsError::NotRegistered(name) => {
                write!(f, "Component kind `{name}` is not registered")
            }
            EcsError::AlreadyAttached(name) => {
                write!(f, "Component `{name}` is already attached")
            }
            EcsError::ComponentNotFound(e, name) => {
                write!(f, "Component `{name}` not found on entity {e}")
            }
            EcsError::RegistryFull => write!(f, "No free component slot remains"),
            EcsError::EmptySystemQuery(tag) => {
                write!(f, "System `{tag}` has an empty query signature")
            }
            EcsError::DuplicateSystemTag(tag) => {
                write!(f, "A system with tag `{tag}` already exists")
            }
            EcsError::SystemNotFound(tag) => {
                write!(f, "System `{tag}` not found")
            }
        }
    }
}

impl std::error::Error for EcsError {}

/// Result type alias
pub type Result<T> = std::result::Result<T, EcsError>;
