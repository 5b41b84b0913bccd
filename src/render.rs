//! Render adapter contract
//!
//! A `RenderFrame` is a read-only snapshot of everything the renderer draws
//! for one tick: camera pose plus flat instance records ready to upload as a
//! GPU instance buffer. Nothing here feeds back into the simulation.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::consts::AIM_LINE_LENGTH;
use crate::sim::{CameraPose, EffectKind, GameState};

/// Instance kinds understood by the renderer
pub mod kinds {
    pub const TANK_BODY: u32 = 0;
    pub const TURRET: u32 = 1;
    pub const ENEMY: u32 = 2;
    pub const BULLET: u32 = 3;
    pub const ENEMY_BULLET: u32 = 4;
    pub const FIREBALL: u32 = 5;
    pub const FROST_CUBE: u32 = 6;
    pub const CONE: u32 = 7;
    pub const SHURIKEN: u32 = 8;
    pub const ALLY: u32 = 9;
    pub const RING: u32 = 10;
}

/// Spin applied to skill meshes per tick (radians)
const EFFECT_SPIN_RATE: f32 = 0.05;
/// Fill alpha lost per remaining lifetime tick, out of 255
const EFFECT_ALPHA_PER_TICK: f32 = 5.0;
const BULLET_SIZE: f32 = 5.0;
const ENEMY_SIZE: f32 = 40.0;
const TURRET_SIZE: f32 = 30.0;

/// One drawable instance
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize)]
pub struct Instance {
    pub position: [f32; 3],
    /// Rotation about the vertical axis
    pub yaw: f32,
    /// Uniform scale (edge length or diameter)
    pub scale: f32,
    pub alpha: f32,
    pub kind: u32,
    pub _pad: u32,
}

impl Instance {
    fn new(kind: u32, ground: Vec2, yaw: f32, scale: f32, alpha: f32) -> Self {
        Self {
            position: ground_point(ground).to_array(),
            yaw,
            scale,
            alpha,
            kind,
            _pad: 0,
        }
    }
}

/// Line from the player toward a skill's captured target
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize)]
pub struct AimLine {
    pub from: [f32; 3],
    pub to: [f32; 3],
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub camera: CameraPose,
    pub zoom: f32,
    pub instances: Vec<Instance>,
    pub aim_lines: Vec<AimLine>,
}

fn ground_point(p: Vec2) -> Vec3 {
    Vec3::new(p.x, 0.0, p.y)
}

impl RenderFrame {
    /// Snapshot the simulation for a viewport of `viewport_width` pixels
    pub fn capture(state: &GameState, viewport_width: f32) -> Self {
        let config = &state.config;
        let player = &state.player;
        let spin = state.time_ticks as f32 * EFFECT_SPIN_RATE;

        let mut instances = Vec::with_capacity(
            2 + state.enemies.len()
                + state.bullets.len()
                + state.enemy_bullets.len()
                + state.effects.len()
                + state.shockwaves.len() * config.shockwave_rings as usize,
        );

        instances.push(Instance::new(kinds::TANK_BODY, player.pos, player.body_angle, config.tank_size, 1.0));
        instances.push(Instance::new(kinds::TURRET, player.pos, player.turret_angle, TURRET_SIZE, 1.0));

        for enemy in &state.enemies {
            instances.push(Instance::new(kinds::ENEMY, enemy.pos, 0.0, ENEMY_SIZE, 1.0));
        }
        for bullet in &state.bullets {
            instances.push(Instance::new(kinds::BULLET, bullet.pos, 0.0, BULLET_SIZE, 1.0));
        }
        for bullet in &state.enemy_bullets {
            instances.push(Instance::new(kinds::ENEMY_BULLET, bullet.pos, 0.0, BULLET_SIZE, 1.0));
        }

        for effect in &state.effects {
            let kind = match effect.kind {
                EffectKind::Fireball => kinds::FIREBALL,
                EffectKind::FrostCube => kinds::FROST_CUBE,
                EffectKind::Cone => kinds::CONE,
                EffectKind::Shuriken => kinds::SHURIKEN,
                EffectKind::Ally { .. } => kinds::ALLY,
            };
            let (yaw, alpha) = if effect.is_ally() {
                (player.turret_angle, 1.0)
            } else {
                let alpha = (effect.lifetime as f32 * EFFECT_ALPHA_PER_TICK / 255.0).min(1.0);
                (spin, alpha)
            };
            instances.push(Instance::new(kind, effect.pos, yaw, effect.size(config), alpha));
        }

        for wave in &state.shockwaves {
            for ring in wave.rings.iter().filter(|r| r.is_active()) {
                instances.push(Instance::new(
                    kinds::RING,
                    wave.origin,
                    0.0,
                    ring.radius * 2.0,
                    ring.alpha(config.shockwave_max_radius),
                ));
            }
        }

        // Aim lines only for targets that are still alive
        let aim_lines = state
            .effects
            .iter()
            .filter(|e| e.lifetime > 0)
            .filter_map(|e| e.target.and_then(|id| state.enemy(id)))
            .map(|target| {
                let dir = (target.pos - player.pos).normalize_or_zero();
                AimLine {
                    from: ground_point(player.pos).to_array(),
                    to: ground_point(player.pos + dir * AIM_LINE_LENGTH).to_array(),
                }
            })
            .collect();

        Self {
            camera: state.camera.pose(player.pos, viewport_width),
            zoom: state.camera.zoom_level(viewport_width),
            instances,
            aim_lines,
        }
    }

    /// Raw instance buffer contents
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn aim_line_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.aim_lines)
    }
}
