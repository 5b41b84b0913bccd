//! Input latch
//!
//! Event callbacks only flip flags here; the game loop samples the latch once
//! per tick. Held keys are level-triggered (most recent state wins), pointer
//! motion accumulates until the next sample, and pause is one-shot.

use crate::sim::{GamePhase, SkillKind, TickInput};

/// DOM `MouseEvent.button` value for the middle button
pub const MIDDLE_BUTTON: i16 = 1;
/// Pixels of wheel delta per zoom notch
const WHEEL_NOTCH: f32 = 100.0;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    Skill(SkillKind),
    RotateLeft,
    RotateRight,
    HeightUp,
    HeightDown,
    ZoomIn,
    ZoomOut,
    Pause,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Key::Forward),
            "ArrowDown" => Some(Key::Back),
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "Escape" => Some(Key::Pause),
            _ => {
                let mut chars = key.chars();
                let c = chars.next()?.to_ascii_lowercase();
                if chars.next().is_some() {
                    return None;
                }
                match c {
                    'q' => Some(Key::RotateLeft),
                    'w' => Some(Key::RotateRight),
                    'e' => Some(Key::HeightUp),
                    'r' => Some(Key::HeightDown),
                    'z' => Some(Key::ZoomIn),
                    'x' => Some(Key::ZoomOut),
                    'p' => Some(Key::Pause),
                    _ => SkillKind::from_key(c).map(Key::Skill),
                }
            }
        }
    }
}

/// Latest input state between ticks
///
/// While the simulation is not playing only the pause key is latched.
#[derive(Debug, Clone)]
pub struct InputLatch {
    held: TickInput,
    orbiting: bool,
    accepting: bool,
}

impl Default for InputLatch {
    fn default() -> Self {
        Self {
            held: TickInput::default(),
            orbiting: false,
            accepting: true,
        }
    }
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the simulation phase; leaving `Playing` drops everything held
    pub fn sync_phase(&mut self, phase: GamePhase) {
        let accepting = phase == GamePhase::Playing;
        if self.accepting && !accepting {
            self.release_all();
        }
        self.accepting = accepting;
    }

    pub fn key_down(&mut self, key: Key) {
        if key == Key::Pause {
            self.held.pause = true;
        } else if self.accepting {
            self.set(key, true);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if key != Key::Pause {
            self.set(key, false);
        }
    }

    fn set(&mut self, key: Key, down: bool) {
        let held = &mut self.held;
        match key {
            Key::Forward => held.forward = down,
            Key::Back => held.back = down,
            Key::Left => held.left = down,
            Key::Right => held.right = down,
            Key::Skill(kind) => held.casting[kind.slot()] = down,
            Key::RotateLeft => held.rotate_left = down,
            Key::RotateRight => held.rotate_right = down,
            Key::HeightUp => held.height_up = down,
            Key::HeightDown => held.height_down = down,
            Key::ZoomIn => held.zoom_in = down,
            Key::ZoomOut => held.zoom_out = down,
            Key::Pause => {}
        }
    }

    pub fn pointer_down(&mut self, button: i16) {
        if button == MIDDLE_BUTTON && self.accepting {
            self.orbiting = true;
        }
    }

    pub fn pointer_up(&mut self, button: i16) {
        if button == MIDDLE_BUTTON {
            self.orbiting = false;
        }
    }

    /// Horizontal pointer motion; only orbits while the middle button is held
    pub fn pointer_move(&mut self, movement_x: f32) {
        if self.orbiting {
            self.held.orbit_pixels += movement_x;
        }
    }

    /// Wheel scroll; scrolling up (negative delta) zooms in
    pub fn wheel(&mut self, delta_y: f32) {
        if self.accepting {
            self.held.zoom_steps -= delta_y / WHEEL_NOTCH;
        }
    }

    /// Release everything, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        let pause = self.held.pause;
        self.held = TickInput {
            pause,
            ..TickInput::default()
        };
        self.orbiting = false;
    }

    /// Request a pause toggle on the next tick
    pub fn request_pause(&mut self) {
        self.held.pause = true;
    }

    /// Sample the latch for one tick, consuming accumulated motion and pause
    pub fn sample(&mut self) -> TickInput {
        let input = self.held.clone();
        self.held.orbit_pixels = 0.0;
        self.held.zoom_steps = 0.0;
        self.held.pause = false;
        input
    }
}
