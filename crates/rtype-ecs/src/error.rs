//! Error taxonomy for the ECS layer.
//!
//! Every variant here is a recoverable, non-fatal condition: a stale
//! handle or a missing component means a system skips that entity this
//! tick, not a panic.

use thiserror::Error;

use crate::entity::EntityId;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    #[error("entity {0} is dead or refers to a stale generation")]
    StaleEntity(EntityId),
    #[error("component type is not registered on this world")]
    UnknownComponent,
    #[error("entity {0} has no component of the requested type")]
    ComponentNotFound(EntityId),
}
