//! Stateless domain rules for the R-Type authoritative server.
//!
//! This crate is the innermost layer: damage/score/weapon arithmetic
//! (`game_rule`), AABB and screen-bounds tests (`collision_rule`), and
//! per-type enemy movement integration (`enemy_behavior`). Every public
//! function is a pure function of its arguments — no service here holds
//! mutable state, and none of them know the ECS exists.

pub mod collision_rule;
pub mod constants;
pub mod enemy_behavior;
pub mod game_rule;
pub mod types;

pub mod prelude {
    pub use crate::collision_rule::CollisionRule;
    pub use crate::enemy_behavior::{EnemyBehavior, EnemyMovement, ZigzagState};
    pub use crate::game_rule::GameRule;
    pub use crate::types::{BossAttack, BossMovement, BossPhase, EnemyType, PowerUpType, WeaponType};
}
