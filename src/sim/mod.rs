//! Headless simulation module
//!
//! All gameplay logic lives here. This module has no rendering or platform
//! dependencies:
//! - Fixed timestep only
//! - Seeded RNG only
//! - One owner (`GameState`), passed explicitly to each step

pub mod camera;
pub mod collision;
pub mod cooldown;
pub mod skills;
pub mod spawn;
pub mod state;
pub mod targeting;
pub mod tick;

pub use camera::{CameraPose, CameraRig, base_zoom};
pub use collision::{Aabb, ring_contains, within_radius};
pub use cooldown::{CastGate, CastState};
pub use skills::{SkillKind, SkillProfile, cast};
pub use spawn::{fill_population, population_near_player, spawn_replacement};
pub use state::{
    EffectKind, Enemy, EntityId, GameEvent, GamePhase, GameState, Player, Projectile, Ring,
    Shockwave, SkillEffect,
};
pub use targeting::{nearest_enemies, nearest_enemy};
pub use tick::{TickInput, tick};
