//! Game state and core simulation types
//!
//! Ground-plane positions are `Vec2` where `x` is world X and `y` is world Z.
//! The simulation owns every entity; renderers and the status board only read.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::CameraRig;
use super::cooldown::CastGate;
use super::skills::SkillKind;
use super::spawn;
use crate::config::GameConfig;
use crate::lerp_angle;

/// Stable identifier for enemies (used for weak target references)
pub type EntityId = u32;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Suspended by the player
    Paused,
    /// Player health reached zero
    Defeated,
    /// Kill target reached
    Victory,
}

impl GamePhase {
    /// Terminal phases never resume
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Defeated | GamePhase::Victory)
    }
}

/// Things that happened during a tick, drained by the host each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    BulletFired,
    SkillCast { kind: SkillKind },
    EnemyKilled { id: EntityId },
    PlayerHit { health: u32 },
    Defeated,
    Victory,
}

/// The player's tank
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Hull heading (faces the last movement direction)
    pub body_angle: f32,
    /// Rendered turret heading, lags behind `target_turret_angle`
    pub turret_angle: f32,
    /// Heading of the last auto-fire target
    pub target_turret_angle: f32,
    pub health: u32,
    pub kills: u32,
}

impl Player {
    pub fn new(health: u32) -> Self {
        Self {
            pos: Vec2::ZERO,
            body_angle: 0.0,
            turret_angle: 0.0,
            target_turret_angle: 0.0,
            health,
            kills: 0,
        }
    }

    /// Ease the turret toward its target heading
    pub fn smooth_turret(&mut self, factor: f32) {
        self.turret_angle = lerp_angle(self.turret_angle, self.target_turret_angle, factor);
    }
}

/// An enemy tank
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    pub health: i32,
}

/// A straight-flying shell (player or enemy side)
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Unit direction, fixed at creation
    pub dir: Vec2,
    pub traveled: f32,
}

impl Projectile {
    /// Create a projectile at `from` heading toward `to`
    pub fn aimed(from: Vec2, to: Vec2) -> Self {
        Self {
            pos: from,
            dir: (to - from).try_normalize().unwrap_or(Vec2::X),
            traveled: 0.0,
        }
    }

    pub fn advance(&mut self, speed: f32) {
        self.pos += self.dir * speed;
        self.traveled += speed;
    }
}

/// Behavior of a live skill effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum EffectKind {
    /// Area burst
    Fireball,
    /// Expanding cube
    FrostCube,
    Cone,
    /// Spinning blade aimed at a single target
    Shuriken,
    /// Summoned tank that follows the player and fires on its own
    Ally { offset: Vec2, fire_timer: u32 },
}

/// A skill effect in flight (or an ally on station)
#[derive(Debug, Clone)]
pub struct SkillEffect {
    pub kind: EffectKind,
    pub pos: Vec2,
    pub dir: Vec2,
    /// Ticks left before the effect fades
    pub lifetime: u32,
    pub traveled: f32,
    pub size_factor: f32,
    /// Enemy this effect was aimed at; only used for the aim indicator
    pub target: Option<EntityId>,
}

impl SkillEffect {
    pub fn is_ally(&self) -> bool {
        matches!(self.kind, EffectKind::Ally { .. })
    }

    /// Current collision/render size
    ///
    /// Allies have a fixed footprint. Everything else grows linearly with
    /// distance traveled up to the skill's maximum.
    pub fn size(&self, config: &GameConfig) -> f32 {
        if self.is_ally() {
            return config.ally_size;
        }
        let min = config.skill_min_size;
        let max = (config.skill_max_size * self.size_factor).max(min);
        let t = self.traveled / config.skill_expand_distance;
        (min + (max - min) * t).clamp(min, max)
    }

    pub fn is_expired(&self, config: &GameConfig) -> bool {
        if self.is_ally() {
            self.lifetime == 0
        } else {
            self.lifetime == 0 || self.traveled > config.skill_max_distance
        }
    }
}

/// One ring of a shockwave
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    /// Ticks until this ring starts expanding
    pub delay: u32,
    pub radius: f32,
}

impl Ring {
    pub fn is_active(&self) -> bool {
        self.delay == 0
    }

    /// Fade from opaque at the origin to transparent at the max radius
    pub fn alpha(&self, max_radius: f32) -> f32 {
        if !self.is_active() {
            return 0.0;
        }
        (1.0 - self.radius / max_radius).clamp(0.0, 1.0)
    }
}

/// Concentric rings radiating from where the skill was cast
#[derive(Debug, Clone)]
pub struct Shockwave {
    pub origin: Vec2,
    pub rings: Vec<Ring>,
}

impl Shockwave {
    pub fn new(origin: Vec2, ring_count: u32, stagger: u32) -> Self {
        Self {
            origin,
            rings: (0..ring_count)
                .map(|i| Ring {
                    delay: i * stagger,
                    radius: 0.0,
                })
                .collect(),
        }
    }

    pub fn advance(&mut self, speed: f32, max_radius: f32) {
        for ring in &mut self.rings {
            if ring.delay > 0 {
                ring.delay -= 1;
            } else {
                ring.radius = (ring.radius + speed).min(max_radius);
            }
        }
    }

    pub fn is_finished(&self, max_radius: f32) -> bool {
        self.rings.iter().all(|r| r.radius >= max_radius)
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation clock in milliseconds (drives cooldowns)
    pub clock_ms: f64,
    pub camera: CameraRig,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Projectile>,
    pub enemy_bullets: Vec<Projectile>,
    pub effects: Vec<SkillEffect>,
    pub shockwaves: Vec<Shockwave>,
    /// One gate per skill slot, indexed by `SkillKind::slot`
    pub cast_gates: [CastGate; SkillKind::COUNT],
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, GameConfig::default())
    }

    /// Create a new session and fill the arena to its population floor
    pub fn with_config(seed: u64, config: GameConfig) -> Self {
        let cooldown = config.skill_cooldown_ms;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_ticks: 0,
            clock_ms: 0.0,
            camera: CameraRig::new(&config),
            player: Player::new(config.player_health),
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            effects: Vec::new(),
            shockwaves: Vec::new(),
            cast_gates: [CastGate::new(cooldown); SkillKind::COUNT],
            events: Vec::new(),
            next_id: 1,
            config,
        };

        let spawned = spawn::fill_population(&mut state);
        log::info!("Arena ready with {} enemies (seed {})", spawned, seed);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply damage to the enemy at `index`; returns true if it died
    pub fn damage_enemy(&mut self, index: usize, damage: i32) -> bool {
        let enemy = &mut self.enemies[index];
        enemy.health -= damage;
        if enemy.health <= 0 {
            self.kill_enemy(index);
            true
        } else {
            false
        }
    }

    /// Remove the enemy at `index` and run kill accounting
    pub fn kill_enemy(&mut self, index: usize) {
        let enemy = self.enemies.remove(index);
        self.player.kills += 1;
        self.events.push(GameEvent::EnemyKilled { id: enemy.id });
        log::debug!("Enemy {} destroyed ({} kills)", enemy.id, self.player.kills);

        if self.player.kills >= self.config.kill_target {
            self.end(GamePhase::Victory);
        } else {
            spawn::spawn_replacement(self);
        }
    }

    /// Apply enemy bullet damage to the player
    pub fn hit_player(&mut self, damage: u32) {
        self.player.health = self.player.health.saturating_sub(damage);
        self.events.push(GameEvent::PlayerHit {
            health: self.player.health,
        });
        if self.player.health == 0 {
            self.end(GamePhase::Defeated);
        }
    }

    /// Enter a terminal phase; the first terminal condition wins
    fn end(&mut self, phase: GamePhase) {
        if self.phase.is_over() {
            return;
        }
        self.phase = phase;
        match phase {
            GamePhase::Victory => {
                self.events.push(GameEvent::Victory);
                log::info!("Kill target reached after {} ticks", self.time_ticks);
            }
            GamePhase::Defeated => {
                self.events.push(GameEvent::Defeated);
                log::info!(
                    "Player destroyed after {} ticks with {} kills",
                    self.time_ticks,
                    self.player.kills
                );
            }
            _ => {}
        }
    }
}
