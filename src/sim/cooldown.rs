//! Cooldown-gated skill casting
//!
//! Holding a skill key keeps the slot requested; the gate fires at most once
//! per cooldown window so a held key auto-repeats at the cooldown rate.

/// Observable state of a skill slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastState {
    /// Not requested and off cooldown
    Idle,
    /// Requested and off cooldown; casts on the next tick
    Ready,
    /// Cooldown window has not elapsed
    OnCooldown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastGate {
    pub requested: bool,
    pub cooldown_ms: f64,
    last_cast_ms: Option<f64>,
}

impl CastGate {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            requested: false,
            cooldown_ms,
            last_cast_ms: None,
        }
    }

    pub fn last_cast_ms(&self) -> Option<f64> {
        self.last_cast_ms
    }

    fn off_cooldown(&self, now_ms: f64) -> bool {
        self.last_cast_ms
            .is_none_or(|last| now_ms - last >= self.cooldown_ms)
    }

    pub fn state(&self, now_ms: f64) -> CastState {
        if !self.off_cooldown(now_ms) {
            CastState::OnCooldown
        } else if self.requested {
            CastState::Ready
        } else {
            CastState::Idle
        }
    }

    /// Consume the request if the gate is open; returns true when a cast fires
    pub fn try_cast(&mut self, now_ms: f64) -> bool {
        if self.requested && self.off_cooldown(now_ms) {
            self.last_cast_ms = Some(now_ms);
            true
        } else {
            false
        }
    }
}
