//! Entity-component storage and gameplay systems for the authoritative
//! R-Type server.
//!
//! Storage is a sparse-set per component type ([`component::ComponentPool`])
//! rather than an archetype table: simpler, no unsafe code, and fast
//! enough for the entity counts a single room ever holds. Entity-set
//! mutations (spawn/despawn, group membership changes) go through a
//! [`command::CommandBuffer`] flushed after every system call, so a
//! system never has to special-case iterating while mutating.

pub mod bridge;
pub mod command;
pub mod component;
pub mod components;
pub mod entity;
pub mod error;
pub mod group;
pub mod scheduler;
pub mod systems;
pub mod world;

pub mod prelude {
    pub use crate::bridge::{DamageResult, DomainBridge};
    pub use crate::command::{Command, CommandBuffer};
    pub use crate::entity::{EntityAllocator, EntityId};
    pub use crate::error::EcsError;
    pub use crate::group::{EntityGroup, GroupIndex};
    pub use crate::scheduler::{Scheduler, System};
    pub use crate::world::World;
}
