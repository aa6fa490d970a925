//! Loading and hot-reloading of portfolio sections.
//!
//! Every `.ron` file in `data/portfolio` holds one `PortfolioSection`.
//! Editing a file while the app runs swaps the new text into the
//! `Portfolio` resource; stations already placed keep their position.
//!
//! # Example
//! ```
//! let portfolio = promenade::portfolio::loader::load_portfolio_from_dir("data/portfolio");
//! assert!(portfolio.section("about-me").is_some());
//! ```

use super::{Portfolio, PortfolioSection};
use crate::ron::{load_ron_files, setup_ron_watcher, RonWatcher};
use bevy::log::info;
use bevy::prelude::{Res, ResMut, Resource};

pub const PORTFOLIO_DIR: &str = "data/portfolio";

#[derive(Resource)]
pub struct PortfolioWatcher(pub RonWatcher);

impl PortfolioWatcher {
    #[must_use]
    pub fn stub() -> Self {
        PortfolioWatcher(RonWatcher::stub())
    }
}

/// Load every section found under `path`.
#[must_use]
pub fn load_portfolio_from_dir(path: &str) -> Portfolio {
    let mut portfolio = Portfolio::default();
    let sections: Vec<PortfolioSection> = load_ron_files(path);
    for section in sections {
        portfolio.insert(section);
    }
    info!("loaded {} portfolio sections from {path}", portfolio.len());
    portfolio
}

/// Create a watcher for the portfolio directory.
///
/// # Errors
/// Propagates the `notify::Error` from the underlying watcher.
pub fn setup_portfolio_watcher(path: &str) -> Result<PortfolioWatcher, notify::Error> {
    setup_ron_watcher(path).map(PortfolioWatcher)
}

/// Reload the `Portfolio` resource when the watcher reports a change.
#[allow(clippy::needless_pass_by_value)]
pub fn check_portfolio_changes(watcher: Res<PortfolioWatcher>, mut portfolio: ResMut<Portfolio>) {
    if watcher.0.take_changed() {
        info!("portfolio changed, reloading");
        *portfolio = load_portfolio_from_dir(PORTFOLIO_DIR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_sections_from_files() {
        let dir = std::env::temp_dir().join(format!("promenade-portfolio-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("a.ron"),
            r#"(id: "mobile-apps", title: "Mobile", order: 2, items: [(title: "Tracker", technologies: ["Flutter"])])"#,
        )
        .unwrap();
        fs::write(dir.join("b.ron"), r#"(id: "about-me", title: "About", order: 1, body: Some("Hello"))"#).unwrap();
        fs::write(dir.join("c.ron"), "(broken").unwrap();

        let portfolio = load_portfolio_from_dir(dir.to_str().unwrap());
        let ids: Vec<_> = portfolio.sections().map(|s| s.id.clone()).collect();
        assert_eq!(ids, ["about-me", "mobile-apps"]);
        let mobile = portfolio.section("mobile-apps").unwrap();
        assert_eq!(mobile.items[0].technologies, ["Flutter"]);
        assert!(mobile.station.is_none());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn stub_watcher_never_reloads() {
        let watcher = PortfolioWatcher::stub();
        assert!(!watcher.0.take_changed());
    }
}
