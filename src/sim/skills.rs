//! Skill slots and effect creation
//!
//! Every slot shares the same cooldown gate; what a cast produces depends on
//! the skill's profile.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EffectKind, GameEvent, GameState, Shockwave, SkillEffect};
use super::targeting::nearest_enemies;

/// Skill slots, in key order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    Fireball,
    FrostCube,
    Cone,
    Shuriken,
    Ally,
    Shockwave,
}

/// What a cast creates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillProfile {
    /// One effect per target, aimed at the nearest `targets` enemies
    Volley {
        effect: EffectKind,
        targets: usize,
        size_factor: f32,
    },
    /// A friendly tank that follows the player
    Summon,
    /// Concentric rings expanding from the player
    Shockwave,
}

impl SkillKind {
    pub const COUNT: usize = 6;
    pub const ALL: [SkillKind; Self::COUNT] = [
        SkillKind::Fireball,
        SkillKind::FrostCube,
        SkillKind::Cone,
        SkillKind::Shuriken,
        SkillKind::Ally,
        SkillKind::Shockwave,
    ];

    /// Index into per-slot tables
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Keyboard key bound to this slot
    pub fn key(self) -> char {
        match self {
            SkillKind::Fireball => 'a',
            SkillKind::FrostCube => 's',
            SkillKind::Cone => 'd',
            SkillKind::Shuriken => 'f',
            SkillKind::Ally => 'g',
            SkillKind::Shockwave => 'h',
        }
    }

    pub fn from_key(key: char) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn profile(self) -> SkillProfile {
        match self {
            SkillKind::Fireball => SkillProfile::Volley {
                effect: EffectKind::Fireball,
                targets: 1,
                size_factor: 3.0,
            },
            SkillKind::FrostCube => SkillProfile::Volley {
                effect: EffectKind::FrostCube,
                targets: 3,
                size_factor: 2.0,
            },
            SkillKind::Cone => SkillProfile::Volley {
                effect: EffectKind::Cone,
                targets: 10,
                size_factor: 1.0,
            },
            SkillKind::Shuriken => SkillProfile::Volley {
                effect: EffectKind::Shuriken,
                targets: 1,
                size_factor: 7.0,
            },
            SkillKind::Ally => SkillProfile::Summon,
            SkillKind::Shockwave => SkillProfile::Shockwave,
        }
    }
}

/// Create the effect entities for one cast of `kind`
///
/// Returns the number of entities created. A volley with no enemies in the
/// arena creates nothing but still counts as a cast.
pub fn cast(state: &mut GameState, kind: SkillKind) -> usize {
    let origin = state.player.pos;
    state.events.push(GameEvent::SkillCast { kind });

    let created = match kind.profile() {
        SkillProfile::Volley {
            effect,
            targets,
            size_factor,
        } => {
            let aims: Vec<_> = nearest_enemies(&state.enemies, origin, targets)
                .into_iter()
                .map(|e| (e.id, e.pos))
                .collect();
            let lifetime = state.config.skill_lifetime_ticks;
            for &(id, pos) in &aims {
                state.effects.push(SkillEffect {
                    kind: effect,
                    pos: origin,
                    dir: (pos - origin).try_normalize().unwrap_or(Vec2::X),
                    lifetime,
                    traveled: 0.0,
                    size_factor,
                    target: Some(id),
                });
            }
            aims.len()
        }
        SkillProfile::Summon => {
            let offset = state.camera.left() * state.config.ally_offset;
            state.effects.push(SkillEffect {
                kind: EffectKind::Ally {
                    offset,
                    fire_timer: 0,
                },
                pos: origin + offset,
                dir: Vec2::ZERO,
                lifetime: state.config.ally_lifetime_ticks,
                traveled: 0.0,
                size_factor: 1.0,
                target: None,
            });
            1
        }
        SkillProfile::Shockwave => {
            state.shockwaves.push(Shockwave::new(
                origin,
                state.config.shockwave_rings,
                state.config.shockwave_ring_delay_ticks,
            ));
            1
        }
    };

    log::debug!("Cast {:?} at tick {} ({} created)", kind, state.time_ticks, created);
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Enemy;

    fn state_with_enemies(count: u32) -> GameState {
        let mut state = GameState::new(3);
        state.enemies.clear();
        for i in 0..count {
            state.enemies.push(Enemy {
                id: 100 + i,
                pos: Vec2::new(100.0 + 50.0 * i as f32, 0.0),
                health: 10,
            });
        }
        state
    }

    #[test]
    fn test_slots_map_to_keys() {
        for kind in SkillKind::ALL {
            assert_eq!(SkillKind::from_key(kind.key()), Some(kind));
            assert_eq!(SkillKind::ALL[kind.slot()], kind);
        }
        assert_eq!(SkillKind::from_key('S'), Some(SkillKind::FrostCube));
        assert_eq!(SkillKind::from_key('z'), None);
    }

    #[test]
    fn test_volley_targets_nearest() {
        let mut state = state_with_enemies(5);
        assert_eq!(cast(&mut state, SkillKind::FrostCube), 3);
        let targets: Vec<_> = state.effects.iter().map(|e| e.target).collect();
        assert_eq!(targets, vec![Some(100), Some(101), Some(102)]);
        assert!(state.effects.iter().all(|e| (e.dir.length() - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_volley_caps_at_enemy_count() {
        let mut state = state_with_enemies(4);
        assert_eq!(cast(&mut state, SkillKind::Cone), 4);

        let mut empty = state_with_enemies(0);
        assert_eq!(cast(&mut empty, SkillKind::Fireball), 0);
        assert_eq!(
            empty.events,
            vec![GameEvent::SkillCast {
                kind: SkillKind::Fireball
            }]
        );
    }

    #[test]
    fn test_summon_and_shockwave() {
        let mut state = state_with_enemies(0);
        assert_eq!(cast(&mut state, SkillKind::Ally), 1);
        assert!(state.effects[0].is_ally());
        assert_eq!(state.effects[0].lifetime, state.config.ally_lifetime_ticks);

        assert_eq!(cast(&mut state, SkillKind::Shockwave), 1);
        assert_eq!(state.shockwaves[0].rings.len(), 3);
    }
}
