//! Orbit camera around the player tank
//!
//! The camera orbits on the ground plane at `yaw` and looks at the player.
//! Movement input is rotated by the same yaw so "forward" always points away
//! from the camera.

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::config::GameConfig;
use crate::normalize_angle;

/// Horizontal distance from the player at zoom level 1.0
pub const ORBIT_DISTANCE: f32 = 200.0;
/// Viewports narrower than this get the wide-angle base zoom
pub const NARROW_VIEWPORT: f32 = 1024.0;
pub const MIN_ZOOM_SCALE: f32 = 0.5;
pub const MAX_ZOOM_SCALE: f32 = 2.0;

/// Base zoom level for a viewport width
pub fn base_zoom(viewport_width: f32) -> f32 {
    if viewport_width < NARROW_VIEWPORT {
        0.1
    } else {
        0.2
    }
}

/// Camera parameters handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

/// Player-controlled camera state
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    /// Orbit angle around the player (radians)
    pub yaw: f32,
    pub height: f32,
    /// Player zoom multiplier on top of the viewport base zoom
    pub zoom_scale: f32,
    min_height: f32,
    max_height: f32,
}

impl CameraRig {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            yaw: 0.0,
            height: config
                .camera_initial_height
                .clamp(config.camera_min_height, config.camera_max_height),
            zoom_scale: 1.0,
            min_height: config.camera_min_height,
            max_height: config.camera_max_height,
        }
    }

    pub fn rotate(&mut self, delta: f32) {
        self.yaw = normalize_angle(self.yaw + delta);
    }

    /// Change height, clamped to the configured range
    pub fn adjust_height(&mut self, delta: f32) {
        self.height = (self.height + delta).clamp(self.min_height, self.max_height);
    }

    /// Multiply the zoom scale, clamped to a sane range
    pub fn zoom_by(&mut self, factor: f32) {
        self.zoom_scale = (self.zoom_scale * factor).clamp(MIN_ZOOM_SCALE, MAX_ZOOM_SCALE);
    }

    /// Effective zoom level for the current viewport
    pub fn zoom_level(&self, viewport_width: f32) -> f32 {
        base_zoom(viewport_width) * self.zoom_scale
    }

    /// Ground direction pointing away from the camera
    pub fn forward(&self) -> Vec2 {
        -Vec2::new(self.yaw.cos(), self.yaw.sin())
    }

    /// Ground direction to the left of `forward`
    pub fn left(&self) -> Vec2 {
        let f = self.forward();
        Vec2::new(f.y, -f.x)
    }

    /// Map directional input onto a ground-plane step of length `speed`
    pub fn relative_move(&self, forward: bool, back: bool, left: bool, right: bool, speed: f32) -> Vec2 {
        let axis = |pos: bool, neg: bool| (pos as i32 - neg as i32) as f32;
        let wish = self.forward() * axis(forward, back) + self.left() * axis(left, right);
        wish.normalize_or_zero() * speed
    }

    /// Camera pose orbiting `focus`
    pub fn pose(&self, focus: Vec2, viewport_width: f32) -> CameraPose {
        let zoom = self.zoom_level(viewport_width);
        let orbit = Vec2::new(self.yaw.cos(), self.yaw.sin()) * ORBIT_DISTANCE / zoom;
        CameraPose {
            eye: Vec3::new(focus.x + orbit.x, self.height / zoom, focus.y + orbit.y),
            target: Vec3::new(focus.x, 0.0, focus.y),
            up: Vec3::Y,
        }
    }
}
