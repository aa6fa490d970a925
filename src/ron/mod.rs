//! RON data loading and directory watching.
//!
//! Settings and portfolio content both live as `.ron` files under `data/`.
//! `load_ron_files` reads a directory in file-name order so that "first file
//! wins" lookups are deterministic. `RonWatcher` flips a shared flag whenever
//! something under the watched directory is modified, which the reload systems
//! poll once per frame.

use bevy::log::{debug, warn};
use bevy::prelude::Resource;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Hot-reload flag backed by an optional OS file watcher.
#[derive(Resource)]
pub struct RonWatcher {
    changed: Arc<AtomicBool>,
    _watcher: Option<RecommendedWatcher>, // kept alive for the lifetime of the resource
}

impl RonWatcher {
    /// A watcher that never reports changes. Used when the OS watcher cannot
    /// be created (missing directory, unsupported platform).
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher {
            changed: Arc::new(AtomicBool::new(false)),
            _watcher: None,
        }
    }

    /// Mark the watched data as dirty by hand.
    pub fn mark_changed(&self) {
        self.changed.store(true, Ordering::Release);
    }

    /// Returns `true` once per batch of changes and clears the flag.
    pub fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::AcqRel)
    }

    /// Whether an OS watcher backs this resource.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self._watcher.is_some()
    }
}

/// Collect every `.ron` file directly inside `path`, sorted by file name.
fn ron_paths(path: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(path) else {
        debug!("ron: directory {} not readable", path.display());
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    paths.sort();
    paths
}

/// Deserialize a single RON file.
///
/// # Errors
/// Returns a readable message when the file cannot be read or parsed.
pub fn load_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    ron::from_str::<T>(&content).map_err(|e| format!("failed to parse {}: {e}", path.display()))
}

/// Load all `.ron` files from `path` and deserialize them into `T`.
///
/// Files that fail to parse are skipped with a warning so one broken file
/// does not take the rest of the directory down with it.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &str) -> Vec<T> {
    ron_paths(Path::new(path))
        .into_iter()
        .filter_map(|p| match load_ron_file::<T>(&p) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("{e}");
                None
            }
        })
        .collect()
}

/// Start watching `path` for modifications.
///
/// # Errors
/// Returns a `notify::Error` if the watcher cannot be created or registered.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, notify::Error> {
    let changed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&changed);
    let watched: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(
                    event.kind,
                    notify::EventKind::Modify(_) | notify::EventKind::Create(_)
                ) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    std::fs::canonicalize(p)
                        .unwrap_or_else(|_| p.clone())
                        .starts_with(&watched)
                });
                if relevant {
                    flag.store(true, Ordering::Release);
                }
            }
            Err(e) => warn!("ron watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher {
        changed,
        _watcher: Some(watcher),
    })
}
