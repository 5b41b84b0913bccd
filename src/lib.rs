//! Tank Arena - A 3D tank arena shooter
//!
//! Core modules:
//! - `sim`: Headless simulation (movement, casting, collisions, game state)
//! - `config`: Data-driven game tuning
//! - `render`: Render adapter contract (per-tick frame snapshot)
//! - `status`: Status board snapshot and polling
//! - `platform`: Browser input latch and offline asset cache

pub mod config;
pub mod platform;
pub mod render;
pub mod sim;
pub mod status;

pub use config::{ConfigError, GameConfig};

use glam::Vec2;

/// Game loop constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per animation frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Status board refresh interval (ms), independent of frame rate
    pub const STATUS_INTERVAL_MS: f64 = 2000.0;
    /// Length of skill aim indicators
    pub const AIM_LINE_LENGTH: f32 = 1000.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Move `current` toward `target` by fraction `t` along the shortest arc
#[inline]
pub fn lerp_angle(current: f32, target: f32, t: f32) -> f32 {
    let delta = normalize_angle(target - current);
    normalize_angle(current + delta * t)
}

/// Ground-plane heading from `from` to `to` (atan2 of dz, dx)
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit direction for a ground-plane heading
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
