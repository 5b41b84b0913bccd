//! Enemy spawning
//!
//! Spawn points are rejection-sampled from a square around the player. A
//! sample is kept only if it lies outside the tank's exclusion radius and
//! inside the spawn radius, so every accepted enemy counts toward the
//! population floor.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EntityId, GameState};
use crate::config::GameConfig;

/// Number of enemies within the spawn radius of the player
pub fn population_near_player(state: &GameState) -> usize {
    let radius = state.config.enemy_spawn_distance;
    let player = state.player.pos;
    state
        .enemies
        .iter()
        .filter(|e| e.pos.distance(player) < radius)
        .count()
}

/// Sample a spawn point around `center`
///
/// Gives up after `spawn_max_attempts` rejections and places the enemy on the
/// exclusion ring in a random direction instead.
pub fn sample_spawn_point<R: Rng>(rng: &mut R, center: Vec2, config: &GameConfig) -> Vec2 {
    let extent = config.enemy_spawn_distance;
    let exclusion = config.spawn_exclusion_radius();

    for _ in 0..config.spawn_max_attempts {
        let candidate = center
            + Vec2::new(
                rng.random_range(-extent..=extent),
                rng.random_range(-extent..=extent),
            );
        let dist = candidate.distance(center);
        if dist >= exclusion && dist < extent {
            return candidate;
        }
    }

    log::warn!(
        "Spawn sampling gave up after {} attempts; using exclusion ring",
        config.spawn_max_attempts
    );
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    center + crate::direction(angle) * exclusion
}

/// Spawn one enemy at a sampled point and return its ID
pub fn spawn_enemy(state: &mut GameState) -> EntityId {
    let pos = sample_spawn_point(&mut state.rng, state.player.pos, &state.config);
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        pos,
        health: state.config.enemy_health,
    });
    id
}

/// Replace a kill: always one enemy, then top up to the population floor
///
/// Returns how many enemies spawned. When the player has outrun the pack the
/// floor is restored around the player's current position.
pub fn spawn_replacement(state: &mut GameState) -> usize {
    spawn_enemy(state);
    1 + fill_population(state)
}

/// Top the local population up to `max_enemies`; returns how many spawned
pub fn fill_population(state: &mut GameState) -> usize {
    let mut nearby = population_near_player(state);
    let mut spawned = 0;
    while nearby < state.config.max_enemies {
        let id = spawn_enemy(state);
        spawned += 1;
        // The exclusion-ring fallback can land outside a degenerate spawn radius
        if state
            .enemy(id)
            .is_some_and(|e| e.pos.distance(state.player.pos) < state.config.enemy_spawn_distance)
        {
            nearby += 1;
        } else {
            break;
        }
    }
    spawned
}
