//! Follow camera rig.
//!
//! The rig decides where the camera should be given the avatar's position and
//! facing. It owns orbit angles, a control mode and drag state, and produces a
//! `CameraTransform` each frame. It never touches the Bevy camera directly;
//! `camera::follow` applies the result.
//!
//! Spherical coordinates follow the usual `(radius, polar, azimuth)`
//! convention with `polar` measured from `+y` and `azimuth` from `+z` towards
//! `+x`.

use crate::settings::CameraSettings;
use bevy::math::{Vec2, Vec3};
use bevy::prelude::Component;
use serde::{Deserialize, Serialize};

/// How the rig positions the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    /// Fixed offset behind the avatar's own facing.
    Keyboard,
    /// Free orbit driven by drag angles.
    Mouse,
    /// Fixed over-the-shoulder azimuth, overridden while dragging.
    #[default]
    Hybrid,
}

impl CameraMode {
    /// Next mode in the toggle cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            CameraMode::Keyboard => CameraMode::Mouse,
            CameraMode::Mouse => CameraMode::Hybrid,
            CameraMode::Hybrid => CameraMode::Keyboard,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Keyboard => "keyboard",
            CameraMode::Mouse => "mouse",
            CameraMode::Hybrid => "hybrid",
        }
    }

    /// Whether cursor drags steer the camera in this mode.
    #[must_use]
    pub fn accepts_drag(self) -> bool {
        !matches!(self, CameraMode::Keyboard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigParams {
    pub distance: f32,
    pub height: f32,
    pub look_height: f32,
    pub follow_speed: f32,
    pub sensitivity: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub fixed_angle: f32,
}

impl RigParams {
    #[must_use]
    pub fn from_settings(camera: &CameraSettings, sensitivity: f32) -> Self {
        let (min_polar, max_polar) = if camera.min_polar <= camera.max_polar {
            (camera.min_polar, camera.max_polar)
        } else {
            (camera.max_polar, camera.min_polar)
        };
        Self {
            distance: camera.distance,
            height: camera.height,
            look_height: camera.look_height,
            follow_speed: camera.follow_speed.clamp(0.0, 1.0),
            sensitivity,
            min_polar,
            max_polar,
            fixed_angle: camera.fixed_angle,
        }
    }
}

impl Default for RigParams {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default(), 0.002)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRigState {
    /// Always within `[min_polar, max_polar]`.
    pub polar_angle: f32,
    /// Free running.
    pub azimuth_angle: f32,
    pub mode: CameraMode,
    pub dragging: bool,
    /// Last absolute cursor position seen during a drag.
    pub last_cursor: Option<Vec2>,
}

/// What the rig follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub position: Vec3,
    pub facing: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// The rig itself. Lives on the camera entity.
#[derive(Component, Debug, Clone)]
pub struct CameraRig {
    pub state: CameraRigState,
    pub params: RigParams,
    debug_orbit: bool,
    current: Vec3,
    last: Option<CameraTransform>,
}

/// Offset of a point at `(radius, polar, azimuth)` from the origin.
#[must_use]
pub fn spherical_offset(radius: f32, polar: f32, azimuth: f32) -> Vec3 {
    let sin_polar = polar.sin();
    Vec3::new(
        radius * sin_polar * azimuth.sin(),
        radius * polar.cos(),
        radius * sin_polar * azimuth.cos(),
    )
}

impl CameraRig {
    /// Create a rig whose smoothed position starts at `camera_position`.
    #[must_use]
    pub fn new(params: RigParams, camera: &CameraSettings, camera_position: Vec3) -> Self {
        Self {
            state: CameraRigState {
                polar_angle: camera.initial_polar.clamp(params.min_polar, params.max_polar),
                azimuth_angle: camera.initial_azimuth,
                mode: camera.initial_mode,
                dragging: false,
                last_cursor: None,
            },
            params,
            debug_orbit: false,
            current: camera_position,
            last: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> CameraMode {
        self.state.mode
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        self.state.mode = mode;
        if !mode.accepts_drag() {
            self.end_drag();
        }
    }

    /// Advance to the next mode. Angles are left untouched.
    pub fn toggle_mode(&mut self) -> CameraMode {
        self.set_mode(self.state.mode.next());
        self.state.mode
    }

    #[must_use]
    pub fn debug_orbit_enabled(&self) -> bool {
        self.debug_orbit
    }

    /// Hand the camera to (or take it back from) the free orbit controller.
    ///
    /// While enabled the rig does no work at all. Angles and mode survive the
    /// round trip; callers should `sync_position` with the live camera on the
    /// way back so smoothing resumes from where the orbit controller left it.
    pub fn set_debug_orbit_enabled(&mut self, enabled: bool) {
        self.debug_orbit = enabled;
        if enabled {
            self.end_drag();
            self.last = None;
        }
    }

    /// Re-seed the smoothed position, e.g. after another controller moved
    /// the camera.
    pub fn sync_position(&mut self, position: Vec3) {
        self.current = position;
    }

    /// Whether a drag would currently steer the rig.
    #[must_use]
    pub fn accepts_drag(&self) -> bool {
        !self.debug_orbit && self.state.mode.accepts_drag()
    }

    /// Start a drag. `cursor` is the absolute cursor position, when known.
    pub fn begin_drag(&mut self, cursor: Option<Vec2>) {
        if !self.accepts_drag() {
            return;
        }
        self.state.dragging = true;
        self.state.last_cursor = cursor;
    }

    pub fn end_drag(&mut self) {
        self.state.dragging = false;
        self.state.last_cursor = None;
    }

    /// Apply a relative cursor movement in pixels.
    pub fn apply_cursor_delta(&mut self, dx: f32, dy: f32) {
        if !self.accepts_drag() {
            return;
        }
        let p = &self.params;
        self.state.azimuth_angle -= dx * p.sensitivity;
        self.state.polar_angle = (self.state.polar_angle + dy * p.sensitivity).clamp(p.min_polar, p.max_polar);
    }

    /// Feed an absolute cursor position during a drag, differencing it
    /// against the previous one. Used when the pointer is not captured.
    pub fn drag_to(&mut self, cursor: Vec2) {
        if !self.state.dragging {
            return;
        }
        if let Some(last) = self.state.last_cursor {
            let delta = cursor - last;
            self.apply_cursor_delta(delta.x, delta.y);
        }
        self.state.last_cursor = Some(cursor);
    }

    /// Where the camera wants to be this frame, before smoothing.
    #[must_use]
    pub fn desired_position(&self, target: &CameraTarget) -> Vec3 {
        let p = &self.params;
        let s = &self.state;
        let orbit = |t: &CameraTarget| {
            let mut pos = t.position + spherical_offset(p.distance, s.polar_angle, s.azimuth_angle);
            // Keep the orbit at a constant height above the target.
            pos.y += p.height - p.distance * s.polar_angle.cos();
            pos
        };

        match s.mode {
            CameraMode::Keyboard => {
                let behind = Vec3::new(target.facing.sin(), 0.0, target.facing.cos()) * p.distance;
                target.position - behind + Vec3::Y * p.height
            }
            CameraMode::Mouse => orbit(target),
            CameraMode::Hybrid if s.dragging => orbit(target),
            CameraMode::Hybrid => {
                target.position
                    + Vec3::new(
                        p.fixed_angle.sin() * p.distance,
                        p.height,
                        p.fixed_angle.cos() * p.distance,
                    )
            }
        }
    }

    /// Advance the rig one frame.
    ///
    /// Returns `None` when there is nothing to do: debug orbit is active or
    /// there is no target. A `drag_delta` is applied before positioning. With
    /// `dt == 0` (paused) the camera holds still.
    pub fn update(&mut self, dt: f32, target: Option<CameraTarget>, drag_delta: Option<Vec2>) -> Option<CameraTransform> {
        if self.debug_orbit {
            return None;
        }
        if let Some(d) = drag_delta {
            self.apply_cursor_delta(d.x, d.y);
        }
        let target = target?;

        let desired = self.desired_position(&target);
        let t = if dt > 0.0 { self.params.follow_speed } else { 0.0 };
        self.current = self.current.lerp(desired, t);

        let transform = CameraTransform {
            position: self.current,
            look_at: target.position + Vec3::Y * self.params.look_height,
        };
        self.last = Some(transform);
        Some(transform)
    }

    /// Horizontal viewing direction of the last computed transform, the
    /// reference the avatar walks along.
    #[must_use]
    pub fn forward(&self) -> Option<Vec3> {
        let last = self.last?;
        let dir = last.look_at - last.position;
        let flat = Vec3::new(dir.x, 0.0, dir.z).normalize_or_zero();
        (flat != Vec3::ZERO).then_some(flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn rig(mode: CameraMode) -> CameraRig {
        let mut settings = CameraSettings::default();
        settings.initial_mode = mode;
        CameraRig::new(RigParams::default(), &settings, Vec3::new(0.0, 5.0, -8.0))
    }

    fn target_at(position: Vec3, facing: f32) -> Option<CameraTarget> {
        Some(CameraTarget { position, facing })
    }

    #[test]
    fn mode_cycle() {
        let mut r = rig(CameraMode::Keyboard);
        assert_eq!(r.toggle_mode(), CameraMode::Mouse);
        assert_eq!(r.toggle_mode(), CameraMode::Hybrid);
        assert_eq!(r.toggle_mode(), CameraMode::Keyboard);
    }

    #[test]
    fn polar_clamps_on_huge_drag() {
        let mut r = rig(CameraMode::Mouse);
        r.apply_cursor_delta(0.0, 1e6);
        assert_eq!(r.state.polar_angle, r.params.max_polar);
        r.apply_cursor_delta(0.0, -1e6);
        assert_eq!(r.state.polar_angle, r.params.min_polar);
    }

    #[test]
    fn azimuth_runs_free() {
        let mut r = rig(CameraMode::Mouse);
        let start = r.state.azimuth_angle;
        r.apply_cursor_delta(10_000.0, 0.0);
        assert!((r.state.azimuth_angle - (start - 20.0)).abs() < 1e-4);
    }

    #[test]
    fn keyboard_mode_ignores_drags() {
        let mut r = rig(CameraMode::Keyboard);
        let before = r.state;
        r.begin_drag(Some(Vec2::ZERO));
        r.apply_cursor_delta(50.0, 50.0);
        assert_eq!(r.state, before);
    }

    #[test]
    fn angles_survive_mode_changes() {
        let mut r = rig(CameraMode::Mouse);
        r.apply_cursor_delta(120.0, -40.0);
        let (polar, azimuth) = (r.state.polar_angle, r.state.azimuth_angle);
        r.toggle_mode();
        r.toggle_mode();
        r.toggle_mode();
        assert_eq!(r.mode(), CameraMode::Mouse);
        assert_eq!((r.state.polar_angle, r.state.azimuth_angle), (polar, azimuth));
    }

    #[test]
    fn keyboard_mode_sits_behind_facing() {
        let r = rig(CameraMode::Keyboard);
        let t = CameraTarget { position: Vec3::new(1.0, 0.0, 2.0), facing: PI / 2.0 };
        let p = r.desired_position(&t);
        assert!(p.abs_diff_eq(Vec3::new(1.0 - 8.0, 4.0, 2.0), 1e-4));
    }

    #[test]
    fn mouse_mode_orbits_at_fixed_height() {
        let mut r = rig(CameraMode::Mouse);
        r.state.polar_angle = PI / 4.0;
        r.state.azimuth_angle = 0.0;
        let p = r.desired_position(&CameraTarget { position: Vec3::ZERO, facing: 0.0 });
        let horizontal = 8.0 * (PI / 4.0).sin();
        assert!(p.abs_diff_eq(Vec3::new(0.0, 4.0, horizontal), 1e-4));
    }

    #[test]
    fn hybrid_uses_fixed_angle_until_dragged() {
        let mut r = rig(CameraMode::Hybrid);
        r.state.azimuth_angle = 1.0;
        let t = CameraTarget { position: Vec3::ZERO, facing: 0.0 };
        let fixed = r.params.fixed_angle;
        let resting = r.desired_position(&t);
        assert!(resting.abs_diff_eq(Vec3::new(fixed.sin() * 8.0, 4.0, fixed.cos() * 8.0), 1e-4));

        r.begin_drag(None);
        let dragged = r.desired_position(&t);
        let mut mouse = r.clone();
        mouse.set_mode(CameraMode::Mouse);
        assert!(dragged.abs_diff_eq(mouse.desired_position(&t), 1e-5));

        r.end_drag();
        assert!(r.desired_position(&t).abs_diff_eq(resting, 1e-6));
    }

    #[test]
    fn position_is_smoothed_and_look_at_snapped() {
        let mut r = rig(CameraMode::Keyboard);
        let start = Vec3::new(0.0, 5.0, -8.0);
        let target = Vec3::new(10.0, 0.0, 10.0);
        let out = r.update(0.016, target_at(target, 0.0), None).unwrap();
        let desired = r.desired_position(&CameraTarget { position: target, facing: 0.0 });
        assert!(out.position.abs_diff_eq(start.lerp(desired, 0.1), 1e-5));
        assert_eq!(out.look_at, target + Vec3::Y * 1.7);
    }

    #[test]
    fn paused_frame_holds_position() {
        let mut r = rig(CameraMode::Hybrid);
        let out = r.update(0.0, target_at(Vec3::new(3.0, 0.0, 3.0), 0.0), None).unwrap();
        assert_eq!(out.position, Vec3::new(0.0, 5.0, -8.0));
    }

    #[test]
    fn no_target_no_update() {
        let mut r = rig(CameraMode::Mouse);
        assert!(r.update(0.016, None, None).is_none());
        assert!(r.forward().is_none());
    }

    #[test]
    fn debug_orbit_suspends_and_restores() {
        let mut r = rig(CameraMode::Mouse);
        r.apply_cursor_delta(30.0, 10.0);
        let angles = (r.state.polar_angle, r.state.azimuth_angle);

        r.set_debug_orbit_enabled(true);
        assert!(r.update(0.016, target_at(Vec3::ZERO, 0.0), Some(Vec2::new(100.0, 100.0))).is_none());
        r.apply_cursor_delta(500.0, 500.0);
        assert_eq!((r.state.polar_angle, r.state.azimuth_angle), angles);

        r.set_debug_orbit_enabled(false);
        r.sync_position(Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(r.mode(), CameraMode::Mouse);
        let out = r.update(0.016, target_at(Vec3::ZERO, 0.0), None).unwrap();
        let desired = r.desired_position(&CameraTarget { position: Vec3::ZERO, facing: 0.0 });
        assert!(out.position.abs_diff_eq(Vec3::new(2.0, 2.0, 2.0).lerp(desired, 0.1), 1e-5));
    }

    #[test]
    fn absolute_and_relative_drags_agree() {
        let mut relative = rig(CameraMode::Mouse);
        relative.begin_drag(None);
        relative.apply_cursor_delta(12.0, -7.0);
        relative.apply_cursor_delta(3.0, 4.0);

        let mut absolute = rig(CameraMode::Mouse);
        absolute.begin_drag(Some(Vec2::new(100.0, 100.0)));
        absolute.drag_to(Vec2::new(112.0, 93.0));
        absolute.drag_to(Vec2::new(115.0, 97.0));

        assert!((relative.state.polar_angle - absolute.state.polar_angle).abs() < 1e-6);
        assert!((relative.state.azimuth_angle - absolute.state.azimuth_angle).abs() < 1e-6);
    }

    #[test]
    fn forward_points_from_camera_to_target() {
        let mut r = rig(CameraMode::Keyboard);
        r.sync_position(Vec3::new(0.0, 4.0, -8.0));
        r.update(0.016, target_at(Vec3::ZERO, 0.0), None);
        let f = r.forward().unwrap();
        assert!(f.abs_diff_eq(Vec3::Z, 1e-5));
    }
}
