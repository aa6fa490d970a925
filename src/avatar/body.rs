//! Kinematic avatar body: camera-relative walking, jumping and gravity.
//!
//! `KinematicBody::integrate` is the only place the avatar's position and
//! facing change. It works on plain vectors so it can be driven (and tested)
//! without a render context; the `movement` system copies the result onto the
//! avatar's `Transform`.

use crate::settings::AvatarSettings;
use bevy::math::{Vec2, Vec3};
use bevy::prelude::Component;
use std::f32::consts::{PI, TAU};

/// Wrap an angle into `[-π, π)`.
#[inline]
#[must_use]
pub fn wrap_angle(a: f32) -> f32 {
    (a + PI).rem_euclid(TAU) - PI
}

/// Input flags for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump_requested: bool,
    pub interact_requested: bool,
}

impl MoveIntent {
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Locomotion constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyParams {
    pub speed: f32,
    pub turn_speed: f32,
    pub jump_force: f32,
    pub gravity: f32,
    pub ground_level: f32,
}

impl Default for BodyParams {
    fn default() -> Self {
        (&AvatarSettings::default()).into()
    }
}

impl From<&AvatarSettings> for BodyParams {
    fn from(s: &AvatarSettings) -> Self {
        Self {
            speed: s.speed,
            turn_speed: s.turn_speed,
            jump_force: s.jump_force,
            gravity: s.gravity,
            ground_level: s.ground_level,
        }
    }
}

/// Everything the body integrates.
///
/// Invariants after every `integrate`: `grounded` implies
/// `vertical_velocity == 0`, and `position.y >= ground_level`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    pub position: Vec3,
    /// Horizontal (x, z) velocity of the last tick, units per second.
    pub horizontal_velocity: Vec2,
    pub vertical_velocity: f32,
    pub grounded: bool,
    pub has_jumped: bool,
    /// Yaw in radians; `0` faces `+z`.
    pub facing: f32,
}

/// The avatar's movement integrator.
#[derive(Component, Debug, Clone)]
pub struct KinematicBody {
    pub state: KinematicState,
    pub params: BodyParams,
}

impl KinematicBody {
    /// Spawn a body at `position`. A spawn point below the ground is lifted
    /// onto it; one above the ground starts airborne and falls.
    #[must_use]
    pub fn new(position: Vec3, facing: f32, params: BodyParams) -> Self {
        let grounded = position.y <= params.ground_level;
        let position = Vec3::new(position.x, position.y.max(params.ground_level), position.z);
        Self {
            state: KinematicState {
                position,
                horizontal_velocity: Vec2::ZERO,
                vertical_velocity: 0.0,
                grounded,
                has_jumped: false,
                facing: wrap_angle(facing),
            },
            params,
        }
    }

    /// Unit vector the avatar is facing, on the ground plane.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.state.facing.sin(), 0.0, self.state.facing.cos())
    }

    /// Advance the body by one tick.
    ///
    /// `reference_forward` is the camera's viewing direction. Only its ground
    /// plane projection matters; "right" is derived from it with world-up.
    pub fn integrate(&mut self, intent: &MoveIntent, reference_forward: Vec3, dt: f32) -> &KinematicState {
        let dt = dt.max(0.0);
        let p = self.params;
        let s = &mut self.state;

        let forward = Vec3::new(reference_forward.x, 0.0, reference_forward.z).normalize_or_zero();
        let right = Vec3::Y.cross(forward);

        let mut wish = Vec3::ZERO;
        if intent.forward {
            wish += forward;
        }
        if intent.backward {
            wish -= forward;
        }
        if intent.left {
            wish -= right;
        }
        if intent.right {
            wish += right;
        }

        let velocity = wish * p.speed;
        s.horizontal_velocity = Vec2::new(velocity.x, velocity.z);
        let displacement = velocity * dt;

        if intent.jump_requested && s.grounded && !s.has_jumped {
            s.vertical_velocity = p.jump_force;
            s.grounded = false;
            s.has_jumped = true;
        }

        if displacement.x != 0.0 || displacement.z != 0.0 {
            let target = displacement.x.atan2(displacement.z);
            let diff = wrap_angle(target - s.facing);
            s.facing = wrap_angle(s.facing + diff * (dt * p.turn_speed).min(1.0));
        }

        if !s.grounded {
            s.vertical_velocity -= p.gravity * dt;
        }

        s.position.x += displacement.x;
        s.position.z += displacement.z;
        s.position.y += s.vertical_velocity * dt;

        if s.position.y < p.ground_level {
            s.position.y = p.ground_level;
            s.vertical_velocity = 0.0;
            s.grounded = true;
            s.has_jumped = false;
        }

        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> KinematicBody {
        KinematicBody::new(Vec3::ZERO, 0.0, BodyParams::default())
    }

    fn airborne(y: f32) -> KinematicBody {
        let mut b = body();
        b.state.position.y = y;
        b.state.grounded = false;
        b
    }

    #[test]
    fn idle_integration_changes_nothing() {
        let mut b = KinematicBody::new(Vec3::new(2.0, 0.0, -3.0), 1.2, BodyParams::default());
        let before = b.state;
        for dt in [0.0, 0.016, 0.1, 0.5] {
            b.integrate(&MoveIntent::default(), Vec3::Z, dt);
        }
        assert_eq!(b.state.position, before.position);
        assert_eq!(b.state.facing, before.facing);
        assert!(b.state.grounded);
    }

    #[test]
    fn walks_forward_along_reference() {
        let mut b = body();
        let intent = MoveIntent { forward: true, ..Default::default() };
        let s = b.integrate(&intent, Vec3::Z, 0.1);
        assert!(s.position.abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), 1e-6));
        assert_eq!(s.facing, 0.0);
        assert!(s.horizontal_velocity.abs_diff_eq(Vec2::new(0.0, 5.0), 1e-6));
    }

    #[test]
    fn reference_pitch_is_ignored() {
        let mut b = body();
        let intent = MoveIntent { forward: true, ..Default::default() };
        // A camera looking down at the avatar still walks on the ground plane.
        b.integrate(&intent, Vec3::new(0.0, -0.8, 0.6), 0.1);
        assert!(b.state.position.abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), 1e-6));
    }

    #[test]
    fn strafe_right_moves_along_up_cross_forward() {
        let mut b = body();
        let intent = MoveIntent { right: true, ..Default::default() };
        b.integrate(&intent, Vec3::Z, 0.1);
        // up x +z = +x
        assert!(b.state.position.x > 0.0);
        assert!(b.state.position.z.abs() < 1e-6);

        let mut b = body();
        let intent = MoveIntent { left: true, ..Default::default() };
        b.integrate(&intent, Vec3::Z, 0.1);
        assert!(b.state.position.x < 0.0);
    }

    #[test]
    fn opposing_inputs_cancel() {
        let mut b = body();
        let intent = MoveIntent { forward: true, backward: true, ..Default::default() };
        b.integrate(&intent, Vec3::X, 0.1);
        assert_eq!(b.state.position, Vec3::ZERO);
    }

    #[test]
    fn falls_under_gravity_and_lands() {
        let mut b = airborne(1.0);
        b.integrate(&MoveIntent::default(), Vec3::Z, 0.1);
        assert!((b.state.vertical_velocity + 3.0).abs() < 1e-5);
        assert!((b.state.position.y - 0.7).abs() < 1e-5);
        assert!(!b.state.grounded);

        // -6 * 0.1 = -0.6 -> 0.1, then -9 * 0.1 -> below ground.
        b.integrate(&MoveIntent::default(), Vec3::Z, 0.1);
        assert!(!b.state.grounded);
        b.integrate(&MoveIntent::default(), Vec3::Z, 0.1);
        assert_eq!(b.state.position.y, 0.0);
        assert_eq!(b.state.vertical_velocity, 0.0);
        assert!(b.state.grounded);
        assert!(!b.state.has_jumped);
    }

    #[test]
    fn ground_clamp_is_idempotent() {
        let mut b = body();
        for _ in 0..30 {
            b.integrate(&MoveIntent::default(), Vec3::Z, 0.05);
            assert_eq!(b.state.position.y, 0.0);
            assert!(b.state.grounded);
            assert_eq!(b.state.vertical_velocity, 0.0);
        }
    }

    #[test]
    fn jump_is_not_reentrant() {
        let mut b = body();
        let intent = MoveIntent { jump_requested: true, ..Default::default() };
        let dt = 0.02;

        b.integrate(&intent, Vec3::Z, dt);
        assert!(b.state.has_jumped);
        assert!(!b.state.grounded);
        let mut last_vv = b.state.vertical_velocity;
        assert!((last_vv - (10.0 - 30.0 * dt)).abs() < 1e-5);

        let mut landed = false;
        for _ in 0..200 {
            b.integrate(&intent, Vec3::Z, dt);
            if b.state.grounded {
                landed = true;
                break;
            }
            // No second impulse: the velocity only ever decreases mid-air.
            assert!(b.state.vertical_velocity < last_vv);
            last_vv = b.state.vertical_velocity;
        }
        assert!(landed);
        assert_eq!(b.state.position.y, 0.0);

        // Grounded again, so the held key jumps once more.
        b.integrate(&intent, Vec3::Z, dt);
        assert!(b.state.has_jumped);
        assert!(b.state.vertical_velocity > 0.0);
    }

    #[test]
    fn grounded_implies_zero_vertical_velocity() {
        let mut b = body();
        let jump = MoveIntent { jump_requested: true, forward: true, ..Default::default() };
        for i in 0..120 {
            let intent = if i % 7 == 0 { jump } else { MoveIntent { forward: true, ..Default::default() } };
            b.integrate(&intent, Vec3::new(1.0, 0.0, 1.0), 1.0 / 60.0);
            assert!(b.state.position.y >= 0.0);
            if b.state.grounded {
                assert_eq!(b.state.vertical_velocity, 0.0);
            }
        }
    }

    #[test]
    fn yaw_turns_through_pi_not_zero() {
        let mut b = body();
        b.state.facing = 3.0;
        // Walking towards yaw -3.0: target direction (sin -3, cos -3).
        let reference = Vec3::new((-3.0f32).sin(), 0.0, (-3.0f32).cos());
        let intent = MoveIntent { forward: true, ..Default::default() };
        b.integrate(&intent, reference, 0.01);

        // The short arc is 2π - 6 ≈ 0.283 rad wide and crosses ±π; yaw must
        // not have moved towards 0.
        let travelled = wrap_angle(b.state.facing - 3.0);
        assert!(travelled > 0.0);
        assert!(travelled < 2.0 * PI - 6.0 + 1e-5);
        assert!(b.state.facing.abs() > 3.0);
    }

    #[test]
    fn large_dt_turn_does_not_overshoot() {
        let mut b = body();
        let intent = MoveIntent { forward: true, ..Default::default() };
        b.integrate(&intent, Vec3::X, 10.0);
        assert!((b.state.facing - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn spawn_below_ground_is_lifted() {
        let b = KinematicBody::new(Vec3::new(0.0, -2.0, 0.0), 0.0, BodyParams::default());
        assert_eq!(b.state.position.y, 0.0);
        assert!(b.state.grounded);

        let b = KinematicBody::new(Vec3::new(0.0, 3.0, 0.0), 0.0, BodyParams::default());
        assert!(!b.state.grounded);
    }

    #[test]
    fn wrap_angle_range() {
        assert!((wrap_angle(4.0) - (4.0 - 2.0 * PI)).abs() < 1e-5);
        assert!((wrap_angle(-6.0) - (2.0 * PI - 6.0)).abs() < 1e-5);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
    }
}
