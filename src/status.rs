//! Status board
//!
//! A small read-only snapshot of the session, refreshed on a fixed interval
//! that does not depend on frame rate.

use serde::Serialize;

use crate::consts::STATUS_INTERVAL_MS;
use crate::sim::{GamePhase, GameState};

/// What the status board shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub health: u32,
    pub kills: u32,
    pub camera_height: f32,
    /// Camera yaw in radians
    pub camera_angle: f32,
    pub zoom: f32,
    pub phase: GamePhase,
}

impl StatusSnapshot {
    pub fn capture(state: &GameState, viewport_width: f32) -> Self {
        Self {
            health: state.player.health,
            kills: state.player.kills,
            camera_height: state.camera.height,
            camera_angle: state.camera.yaw,
            zoom: state.camera.zoom_level(viewport_width),
            phase: state.phase,
        }
    }

    pub fn camera_angle_degrees(&self) -> f32 {
        self.camera_angle.to_degrees()
    }

    /// Banner for terminal or paused phases
    pub fn banner(&self) -> Option<&'static str> {
        match self.phase {
            GamePhase::Playing => None,
            GamePhase::Paused => Some("Paused"),
            GamePhase::Defeated => Some("Game Over"),
            GamePhase::Victory => Some("Victory!"),
        }
    }

    /// Plain-text lines for the overlay
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Status Board".to_string(),
            format!("Health: {}", self.health),
            format!("Enemies Killed: {}", self.kills),
            format!("Camera Height: {:.2}", self.camera_height),
            format!("Camera Angle: {:.2}°", self.camera_angle_degrees()),
            format!("Zoom: {:.2}", self.zoom),
        ];
        if let Some(banner) = self.banner() {
            lines.push(banner.to_string());
        }
        lines
    }
}

/// Polls the simulation at most once per interval
#[derive(Debug, Clone)]
pub struct StatusReporter {
    interval_ms: f64,
    last_poll_ms: Option<f64>,
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new(STATUS_INTERVAL_MS)
    }
}

impl StatusReporter {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_poll_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Snapshot the state if the interval has elapsed since the last poll
    pub fn poll(&mut self, now_ms: f64, state: &GameState, viewport_width: f32) -> Option<StatusSnapshot> {
        let due = self
            .last_poll_ms
            .is_none_or(|last| now_ms - last >= self.interval_ms);
        if !due {
            return None;
        }
        self.last_poll_ms = Some(now_ms);
        Some(StatusSnapshot::capture(state, viewport_width))
    }
}
