pub mod display;
pub mod scenery;
pub mod setup;

pub use display::{present_mode, sync_vsync_settings};
pub use scenery::spawn_scenery;
pub use setup::setup;
