use isoworks_tilemap::IsoProjection;

use crate::map::InputMap;

/// Pans the isometric camera from the movement axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraController {
    /// Screen pixels per second at full deflection.
    pub speed: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self { speed: 300.0 }
    }
}

impl CameraController {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    pub fn apply(&self, input: &InputMap, projection: &mut IsoProjection, dt: f32) {
        let delta = input.movement() * self.speed * dt;
        if delta != glam::Vec2::ZERO {
            projection.pan(delta);
        }
    }
}
