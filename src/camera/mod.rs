//! Camera: the follow rig, its input/transform systems and the debug orbit
//! controller.
//!
//! ```ignore
//! commands.spawn((
//!     Camera3dBundle::default(),
//!     CameraRig::new(RigParams::default(), &settings.camera, start),
//!     DebugOrbit::default(),
//! ));
//! app.add_systems(Update, (camera_input, avatar_movement, camera_follow).chain());
//! ```
pub mod follow;
pub mod orbit;
pub mod rig;

pub use follow::*;
pub use orbit::*;
pub use rig::*;
