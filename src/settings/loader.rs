//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in `data/settings`. If several files are
//! present the first one (by file name) that parses wins; if none parse the
//! defaults are used. A watcher resource flags edits and
//! `check_settings_changes` swaps the new values in at the start of a frame.
use crate::ron::{load_ron_files, setup_ron_watcher, RonWatcher};
use crate::settings::Settings;
use bevy::log::info;
use bevy::prelude::{Res, ResMut, Resource};

pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher(pub RonWatcher);

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher(RonWatcher::stub())
    }
}

/// Load settings from `path` (a directory).
///
/// # Example
/// ```
/// let settings = promenade::settings::loader::load_settings_from_dir("data/settings");
/// assert!(settings.camera.max_polar > settings.camera.min_polar);
/// ```
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    items.into_iter().next().unwrap_or_else(|| {
        info!("no settings found in {path}, using defaults");
        Settings::defaults()
    })
}

/// Create a watcher for the settings directory.
///
/// # Errors
/// Propagates the `notify::Error` from the underlying watcher.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(SettingsWatcher)
}

/// Reload the `Settings` resource when the watcher reports a change.
///
/// Components that cache tuning derived from settings (body, rig) pick up the
/// new values through `Res<Settings>::is_changed` in their own systems.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if watcher.0.take_changed() {
        info!("settings changed, reloading");
        *settings = load_settings_from_dir(SETTINGS_DIR);
    }
}
