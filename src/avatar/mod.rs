//! Avatar components and systems (input, movement, visuals).
//!
//! The module provides the `Avatar` marker, the per-frame `AvatarIntent`
//! and re-exports the avatar systems.
//!
//! # Example:
//!
//! ```ignore
//! commands.spawn((
//!     SpatialBundle::default(),
//!     Avatar,
//!     AvatarIntent::default(),
//!     KinematicBody::new(Vec3::ZERO, 0.0, BodyParams::default()),
//! ));
//! app.add_systems(Update, (read_move_intent, avatar_movement).chain());
//! ```
pub mod body;
pub mod input;
pub mod movement;
pub mod visual;

use bevy::prelude::*;

pub use body::*;
pub use input::*;
pub use movement::*;
pub use visual::*;

/// Marks the user-controlled character.
#[derive(Component, Debug, Default)]
pub struct Avatar;

/// The avatar's input state for the current frame.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct AvatarIntent(pub MoveIntent);

impl AvatarIntent {
    /// Replace the held flags wholesale.
    pub fn set_move_intent(&mut self, flags: MoveIntent) {
        self.0 = flags;
    }
}

/// Frame delta handed to the avatar core, already clamped by the host so a
/// hitch cannot launch the avatar through the ground.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FrameDelta(pub f32);

/// Sample `Time` into `FrameDelta`, capped at `engine.max_frame_dt`.
#[allow(clippy::needless_pass_by_value)]
pub fn clamp_frame_delta(time: Res<Time>, settings: Res<crate::settings::Settings>, mut dt: ResMut<FrameDelta>) {
    dt.0 = time.delta_seconds().min(settings.engine.max_frame_dt.max(0.0));
}
