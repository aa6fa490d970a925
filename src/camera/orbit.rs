//! Free orbit camera used while the debug override is on.
//!
//! - Left mouse drag: rotate around the focus point
//! - Scroll wheel: zoom
//!
//! Motion is damped: input feeds an angular velocity that decays each frame,
//! so the view glides to a stop instead of halting abruptly.

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

use crate::avatar::Avatar;
use crate::camera::CameraRig;

#[derive(Component, Debug, Clone)]
pub struct DebugOrbit {
    /// Point the camera orbits around.
    pub focus: Vec3,
    pub distance: f32,
    /// Horizontal angle (radians).
    pub azimuth: f32,
    /// Vertical angle above the horizon (radians).
    pub elevation: f32,
    pub sensitivity: f32,
    pub zoom_sensitivity: f32,
    /// Fraction of angular velocity kept per 1/60 s.
    pub damping: f32,
    velocity: Vec2,
}

impl Default for DebugOrbit {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            distance: 10.0,
            azimuth: 0.0,
            elevation: 0.5,
            sensitivity: 0.005,
            zoom_sensitivity: 1.0,
            damping: 0.95,
            velocity: Vec2::ZERO,
        }
    }
}

const MAX_ELEVATION: f32 = 1.4;

impl DebugOrbit {
    /// Start orbiting from where the camera already is, so switching to the
    /// debug controller does not move the view.
    pub fn seed(&mut self, camera: Vec3, focus: Vec3) {
        let offset = camera - focus;
        self.focus = focus;
        self.distance = offset.length().max(1.0);
        self.azimuth = offset.x.atan2(offset.z);
        let horizontal = Vec2::new(offset.x, offset.z).length();
        self.elevation = offset.y.atan2(horizontal).clamp(-MAX_ELEVATION, MAX_ELEVATION);
        self.velocity = Vec2::ZERO;
    }

    #[must_use]
    pub fn calculate_position(&self) -> Vec3 {
        let x = self.distance * self.elevation.cos() * self.azimuth.sin();
        let y = self.distance * self.elevation.sin();
        let z = self.distance * self.elevation.cos() * self.azimuth.cos();
        self.focus + Vec3::new(x, y, z)
    }

    /// Integrate drag and scroll input for one frame.
    pub fn step(&mut self, drag: Vec2, scroll: f32, dt: f32) {
        self.velocity += drag * self.sensitivity;
        self.azimuth -= self.velocity.x;
        self.elevation = (self.elevation + self.velocity.y).clamp(-MAX_ELEVATION, MAX_ELEVATION);
        self.velocity *= self.damping.clamp(0.0, 1.0).powf(dt * 60.0);

        if scroll != 0.0 {
            self.distance = (self.distance - scroll * self.zoom_sensitivity).clamp(1.0, 100.0);
        }
    }
}

/// Drive the camera with `DebugOrbit` while the rig's override is enabled.
#[allow(clippy::needless_pass_by_value)]
pub fn debug_orbit_control(
    time: Res<Time>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    mut cameras: Query<(&CameraRig, &mut DebugOrbit, &mut Transform), Without<Avatar>>,
) {
    let drag: Vec2 = motion.read().map(|ev| ev.delta).sum();
    let scroll: f32 = wheel.read().map(|ev| ev.y).sum();

    for (rig, mut orbit, mut transform) in &mut cameras {
        if !rig.debug_orbit_enabled() {
            continue;
        }
        let drag = if mouse_button.pressed(MouseButton::Left) { drag } else { Vec2::ZERO };
        orbit.step(drag, scroll, time.delta_seconds());
        transform.translation = orbit.calculate_position();
        transform.look_at(orbit.focus, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_keeps_the_camera_in_place() {
        let mut orbit = DebugOrbit::default();
        let camera = Vec3::new(-5.0, 6.0, 3.0);
        let focus = Vec3::new(1.0, 1.0, 1.0);
        orbit.seed(camera, focus);
        assert!(orbit.calculate_position().abs_diff_eq(camera, 1e-4));
    }

    #[test]
    fn drag_glides_then_stops() {
        let mut orbit = DebugOrbit::default();
        orbit.step(Vec2::new(20.0, 0.0), 0.0, 1.0 / 60.0);
        let after_drag = orbit.azimuth;
        assert!(after_drag < 0.0);
        for _ in 0..600 {
            orbit.step(Vec2::ZERO, 0.0, 1.0 / 60.0);
        }
        let settled = orbit.azimuth;
        assert!(settled < after_drag);
        orbit.step(Vec2::ZERO, 0.0, 1.0 / 60.0);
        assert!((orbit.azimuth - settled).abs() < 1e-6);
    }

    #[test]
    fn zoom_is_bounded() {
        let mut orbit = DebugOrbit::default();
        orbit.step(Vec2::ZERO, 1000.0, 0.016);
        assert_eq!(orbit.distance, 1.0);
        orbit.step(Vec2::ZERO, -1000.0, 0.016);
        assert_eq!(orbit.distance, 100.0);
    }
}
