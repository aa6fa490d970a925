//! Avatar movement system.
//!
//! Runs the kinematic body for the frame and mirrors the result onto the
//! avatar's `Transform`. The reference direction is the camera's horizontal
//! viewing direction from the previous camera update, so input is always
//! relative to what the player currently sees.

use bevy::prelude::*;

use crate::avatar::{Avatar, AvatarIntent, BodyParams, FrameDelta, KinematicBody};
use crate::camera::CameraRig;
use crate::settings::Settings;

/// Integrate the avatar's body and write its transform.
///
/// # Arguments
/// * `dt` - clamped frame delta
/// * `cameras` - rig (for its forward vector) and the live camera transform,
///   used instead while the debug orbit controller owns the camera
/// * `avatars` - avatar intent, body and transform
#[allow(clippy::needless_pass_by_value)]
pub fn avatar_movement(
    dt: Res<FrameDelta>,
    cameras: Query<(&CameraRig, &Transform), Without<Avatar>>,
    mut avatars: Query<(&AvatarIntent, &mut KinematicBody, &mut Transform), With<Avatar>>,
) {
    let reference = cameras
        .get_single()
        .ok()
        .map(|(rig, tf)| rig.forward().unwrap_or_else(|| *tf.forward()));

    for (intent, mut body, mut transform) in &mut avatars {
        let reference = reference.unwrap_or_else(|| body.forward());
        let state = *body.integrate(&intent.0, reference, dt.0);
        transform.translation = state.position;
        transform.rotation = Quat::from_rotation_y(state.facing);
    }
}

/// Push reloaded locomotion tuning into every body, keeping its state.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_body_settings(settings: Res<Settings>, mut bodies: Query<&mut KinematicBody>) {
    if !settings.is_changed() {
        return;
    }
    let params = BodyParams::from(&settings.avatar);
    for mut body in &mut bodies {
        body.params = params;
    }
}
