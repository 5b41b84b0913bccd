//! Game tuning table
//!
//! Every gameplay constant lives here so a JSON override can rebalance the
//! arena without a rebuild. Missing keys fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Session ===
    /// Kills that end the session in victory
    pub kill_target: u32,
    /// Enemy population floor within the spawn radius
    pub max_enemies: usize,

    // === Projectiles ===
    pub bullet_speed: f32,
    pub enemy_bullet_speed: f32,
    /// Projectiles expire once they travel further than this
    pub bullet_max_distance: f32,
    /// Player auto-fire period (ticks)
    pub fire_interval_ticks: u64,
    /// Enemy fire period while in shooting range (ticks)
    pub enemy_fire_interval_ticks: u64,

    // === Skills ===
    pub skill_speed: f32,
    pub skill_max_distance: f32,
    /// Distance over which an effect grows from min to max size
    pub skill_expand_distance: f32,
    pub skill_min_size: f32,
    /// Base max size, multiplied by each skill's size factor
    pub skill_max_size: f32,
    pub skill_lifetime_ticks: u32,
    pub skill_cooldown_ms: f64,

    // === Enemies ===
    /// Enemies closer than this hold position and shoot
    pub enemy_shooting_distance: f32,
    /// Half-side of the spawn square and radius of the population count
    pub enemy_spawn_distance: f32,
    pub enemy_move_speed: f32,
    /// Half-side of an enemy's bounding box
    pub enemy_half_extent: f32,
    pub enemy_health: i32,

    // === Player ===
    pub player_move_speed: f32,
    pub player_health: u32,
    /// Tank footprint; half of it is the spawn exclusion radius
    pub tank_size: f32,
    /// Turret interpolation factor per tick
    pub turret_lerp: f32,

    // === Combat ===
    /// Bullet proximity threshold
    pub hit_radius: f32,
    /// Damage dealt to enemies by bullets and area skills
    pub hit_damage: i32,
    /// Damage dealt to the player per enemy bullet
    pub enemy_bullet_damage: u32,

    // === Ally ===
    pub ally_lifetime_ticks: u32,
    pub ally_fire_interval_ticks: u32,
    pub ally_size: f32,
    /// Distance from the player the ally holds
    pub ally_offset: f32,

    // === Shockwave ===
    pub shockwave_rings: u32,
    pub shockwave_ring_delay_ticks: u32,
    pub shockwave_ring_speed: f32,
    pub shockwave_max_radius: f32,

    // === Camera ===
    /// Radians per tick while a rotate key is held
    pub camera_rotate_speed: f32,
    pub camera_height_step: f32,
    pub camera_min_height: f32,
    pub camera_max_height: f32,
    pub camera_initial_height: f32,
    /// Radians of orbit per pixel of middle-button drag
    pub camera_drag_sensitivity: f32,

    // === Spawning ===
    /// Rejection-sampling cap before falling back to the exclusion ring
    pub spawn_max_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            kill_target: 1000,
            max_enemies: 50,

            bullet_speed: 8.0,
            enemy_bullet_speed: 3.0,
            bullet_max_distance: 1000.0,
            fire_interval_ticks: 30,
            enemy_fire_interval_ticks: 60,

            skill_speed: 8.0,
            skill_max_distance: 1000.0,
            skill_expand_distance: 700.0,
            skill_min_size: 10.0,
            skill_max_size: 30.0,
            skill_lifetime_ticks: 200,
            skill_cooldown_ms: 500.0,

            enemy_shooting_distance: 500.0,
            enemy_spawn_distance: 1500.0,
            enemy_move_speed: 2.0,
            enemy_half_extent: 20.0,
            enemy_health: 10,

            player_move_speed: 6.0,
            player_health: 1000,
            tank_size: 75.0,
            turret_lerp: 0.1,

            hit_radius: 40.0,
            hit_damage: 10,
            enemy_bullet_damage: 1,

            ally_lifetime_ticks: 600,
            ally_fire_interval_ticks: 20,
            ally_size: 40.0,
            ally_offset: 90.0,

            shockwave_rings: 3,
            shockwave_ring_delay_ticks: 8,
            shockwave_ring_speed: 10.0,
            shockwave_max_radius: 600.0,

            camera_rotate_speed: std::f32::consts::PI / 180.0,
            camera_height_step: 2.0,
            camera_min_height: -500.0,
            camera_max_height: 0.0,
            camera_initial_height: -112.0,
            camera_drag_sensitivity: 0.01,

            spawn_max_attempts: 10_000,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON tuning file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Spawn exclusion radius around the player
    pub fn spawn_exclusion_radius(&self) -> f32 {
        self.tank_size / 2.0
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("bullet_speed", self.bullet_speed),
            ("enemy_bullet_speed", self.enemy_bullet_speed),
            ("bullet_max_distance", self.bullet_max_distance),
            ("skill_speed", self.skill_speed),
            ("skill_max_distance", self.skill_max_distance),
            ("skill_expand_distance", self.skill_expand_distance),
            ("skill_min_size", self.skill_min_size),
            ("skill_max_size", self.skill_max_size),
            ("enemy_spawn_distance", self.enemy_spawn_distance),
            ("enemy_half_extent", self.enemy_half_extent),
            ("tank_size", self.tank_size),
            ("hit_radius", self.hit_radius),
            ("ally_size", self.ally_size),
            ("shockwave_ring_speed", self.shockwave_ring_speed),
            ("shockwave_max_radius", self.shockwave_max_radius),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }

        if self.fire_interval_ticks == 0 {
            return Err(invalid("fire_interval_ticks", "must be at least 1"));
        }
        if self.enemy_fire_interval_ticks == 0 {
            return Err(invalid("enemy_fire_interval_ticks", "must be at least 1"));
        }
        if self.ally_fire_interval_ticks == 0 {
            return Err(invalid("ally_fire_interval_ticks", "must be at least 1"));
        }
        if self.hit_damage <= 0 {
            return Err(invalid("hit_damage", "must be positive"));
        }
        if self.enemy_health <= 0 {
            return Err(invalid("enemy_health", "must be positive"));
        }
        if self.skill_cooldown_ms < 0.0 {
            return Err(invalid("skill_cooldown_ms", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.turret_lerp) {
            return Err(invalid("turret_lerp", "must be within [0, 1]"));
        }
        if self.camera_min_height > self.camera_max_height {
            return Err(invalid(
                "camera_min_height",
                format!(
                    "{} exceeds camera_max_height {}",
                    self.camera_min_height, self.camera_max_height
                ),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
