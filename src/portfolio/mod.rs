//! Portfolio content and the overlay panel that shows it.
//!
//! Sections are data (RON files under `data/portfolio`). Each one may carry
//! a station placement, in which case the scene spawns a station for it.
//! Using a station sends `Interacted`; the panel opens for the station's
//! section and fades in. Escape fades it out again.
//!
//! # Example
//! ```
//! use promenade::portfolio::{Portfolio, PortfolioSection};
//!
//! let mut portfolio = Portfolio::default();
//! portfolio.insert(PortfolioSection::new("about-me", "About me"));
//! assert!(portfolio.section("about-me").is_some());
//! assert!(portfolio.section("missing").is_none());
//! ```

pub mod loader;

use bevy::prelude::*;
use serde::Deserialize;

use crate::anim::{Ease, Tween};
use crate::interaction::{Interacted, Station};
use crate::settings::Settings;

const FADE_SECONDS: f32 = 0.3;

/// One project or entry in a section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PortfolioItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Where a section's station stands in the scene.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct StationPlacement {
    pub position: (f32, f32, f32),
    #[serde(default)]
    pub yaw: f32,
    /// A disabled station stands in the scene but never takes an interaction.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for StationPlacement {
    fn default() -> Self {
        Self { position: (0.0, 0.0, 0.0), yaw: 0.0, enabled: default_enabled() }
    }
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PortfolioSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Accent colour as `#rrggbb`.
    #[serde(default = "default_color")]
    pub color: String,
    /// Ordering of stations and of the section list.
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub items: Vec<PortfolioItem>,
    /// Free text shown after the items (biography, contact...).
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub station: Option<StationPlacement>,
}

fn default_color() -> String {
    "#3498db".to_string()
}

impl PortfolioSection {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), color: default_color(), ..Default::default() }
    }

    /// The station this section places in the scene, if any.
    #[must_use]
    pub fn station(&self) -> Option<Station> {
        self.station.map(|place| Station {
            enabled: place.enabled,
            ..Station::new(self.title.clone(), self.id.clone(), self.order)
        })
    }

    /// Accent colour, falling back to the default blue on a malformed value.
    #[must_use]
    pub fn accent(&self) -> Color {
        Srgba::hex(&self.color).map_or(Color::srgb(0.2, 0.6, 0.86), Color::Srgba)
    }

    /// Plain-text rendering for the panel.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if !self.description.is_empty() {
            out.push_str(&self.description);
            out.push_str("\n\n");
        }
        for item in &self.items {
            out.push_str("- ");
            out.push_str(&item.title);
            out.push('\n');
            if !item.description.is_empty() {
                out.push_str("  ");
                out.push_str(&item.description);
                out.push('\n');
            }
            if !item.technologies.is_empty() {
                out.push_str("  [");
                out.push_str(&item.technologies.join(", "));
                out.push_str("]\n");
            }
            if let Some(link) = &item.link {
                out.push_str("  ");
                out.push_str(link);
                out.push('\n');
            }
        }
        if let Some(body) = &self.body {
            if !self.items.is_empty() {
                out.push('\n');
            }
            out.push_str(body.trim());
        }
        out.trim_end().to_string()
    }
}

/// All loaded sections, kept sorted by `order`.
#[derive(Resource, Debug, Default, Clone)]
pub struct Portfolio {
    sections: Vec<PortfolioSection>,
}

impl Portfolio {
    /// Add or replace a section by id.
    pub fn insert(&mut self, section: PortfolioSection) {
        self.sections.retain(|s| s.id != section.id);
        self.sections.push(section);
        self.sections.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    }

    #[must_use]
    pub fn section(&self, id: &str) -> Option<&PortfolioSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn sections(&self) -> impl Iterator<Item = &PortfolioSection> {
        self.sections.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Overlay state: which section is shown and the fade in/out.
#[derive(Resource, Debug, Clone)]
pub struct PortfolioPanel {
    pub open: Option<String>,
    pub fade: Tween,
}

impl Default for PortfolioPanel {
    fn default() -> Self {
        Self { open: None, fade: Tween::at(0.0) }
    }
}

impl PortfolioPanel {
    /// Show `id` and fade in. Reopening while visible swaps content in place.
    pub fn show(&mut self, id: &str) {
        self.open = Some(id.to_string());
        self.fade.retarget(1.0, FADE_SECONDS, Ease::QuadOut);
    }

    /// Fade out; the section stays set until the fade completes.
    pub fn hide(&mut self) {
        self.fade.retarget(0.0, FADE_SECONDS, Ease::QuadIn);
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.is_some() && self.fade.target() > 0.0
    }

    /// Advance the fade and return the panel's opacity.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let alpha = self.fade.advance(dt);
        if self.fade.finished() && self.fade.target() <= 0.0 {
            self.open = None;
        }
        alpha
    }
}

#[derive(Component)]
pub struct PortfolioPanelRoot;

#[derive(Component)]
pub struct PortfolioPanelTitle;

#[derive(Component)]
pub struct PortfolioPanelBody;

/// Spawn the (hidden) overlay panel.
pub fn spawn_portfolio_panel(mut commands: Commands) {
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    left: Val::Percent(15.0),
                    right: Val::Percent(15.0),
                    top: Val::Percent(10.0),
                    bottom: Val::Percent(10.0),
                    flex_direction: FlexDirection::Column,
                    padding: UiRect::all(Val::Px(24.0)),
                    row_gap: Val::Px(12.0),
                    ..default()
                },
                background_color: Color::srgba(0.05, 0.05, 0.1, 0.0).into(),
                visibility: Visibility::Hidden,
                ..default()
            },
            PortfolioPanelRoot,
        ))
        .with_children(|panel| {
            panel.spawn((
                TextBundle::from_section("", TextStyle { font_size: 32.0, color: Color::WHITE, ..default() }),
                PortfolioPanelTitle,
            ));
            panel.spawn((
                TextBundle::from_section("", TextStyle { font_size: 18.0, color: Color::WHITE, ..default() }),
                PortfolioPanelBody,
            ));
            panel.spawn(TextBundle::from_section(
                "Esc to close",
                TextStyle { font_size: 14.0, color: Color::srgb(0.7, 0.7, 0.7), ..default() },
            ));
        });
}

/// Open the panel for the section of a station that was used.
///
/// Targets that vanished since the probe ran and sections that are not
/// loaded are skipped.
#[allow(clippy::needless_pass_by_value)]
pub fn open_portfolio_panel(
    mut interactions: EventReader<Interacted>,
    stations: Query<&Station>,
    portfolio: Res<Portfolio>,
    mut panel: ResMut<PortfolioPanel>,
) {
    for ev in interactions.read() {
        let Ok(station) = stations.get(ev.target) else { continue };
        if portfolio.section(&station.section).is_none() {
            warn!("station '{}' points at unknown portfolio section '{}'", station.title, station.section);
            continue;
        }
        info!("opening portfolio section '{}'", station.section);
        panel.show(&station.section);
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn close_portfolio_panel(
    settings: Res<Settings>,
    keys: Res<ButtonInput<KeyCode>>,
    mut panel: ResMut<PortfolioPanel>,
) {
    if panel.is_open() && settings.keys_for("close_panel").iter().any(|k| keys.just_pressed(*k)) {
        panel.hide();
    }
}

#[derive(bevy::ecs::system::SystemParam)]
pub struct PanelViewCtx<'w, 's> {
    pub dt: Res<'w, crate::avatar::FrameDelta>,
    pub portfolio: Res<'w, Portfolio>,
    pub panel: ResMut<'w, PortfolioPanel>,
    pub root: Query<'w, 's, (&'static mut Visibility, &'static mut BackgroundColor), With<PortfolioPanelRoot>>,
    pub title: Query<'w, 's, &'static mut Text, (With<PortfolioPanelTitle>, Without<PortfolioPanelBody>)>,
    pub body: Query<'w, 's, &'static mut Text, (With<PortfolioPanelBody>, Without<PortfolioPanelTitle>)>,
}

/// Fade the panel and keep its text in sync with the open section.
pub fn animate_portfolio_panel(mut ctx: PanelViewCtx) {
    let dt = ctx.dt.0;
    let alpha = ctx.panel.advance(dt);
    let Ok((mut visibility, mut background)) = ctx.root.get_single_mut() else { return };

    let section = ctx.panel.open.as_deref().and_then(|id| ctx.portfolio.section(id));
    let Some(section) = section else {
        *visibility = Visibility::Hidden;
        return;
    };

    *visibility = Visibility::Visible;
    background.0 = Color::srgba(0.05, 0.05, 0.1, 0.85 * alpha);

    let accent = section.accent();
    if let Ok(mut text) = ctx.title.get_single_mut() {
        if text.sections[0].value != section.title {
            text.sections[0].value.clone_from(&section.title);
        }
        text.sections[0].style.color = accent.with_alpha(alpha);
    }
    if let Ok(mut text) = ctx.body.get_single_mut() {
        let body = section.render_text();
        if text.sections[0].value != body {
            text.sections[0].value = body;
        }
        text.sections[0].style.color = Color::WHITE.with_alpha(alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web() -> PortfolioSection {
        PortfolioSection {
            items: vec![PortfolioItem {
                title: "Storefront".into(),
                description: "Checkout and admin".into(),
                technologies: vec!["Rust".into(), "Postgres".into()],
                link: Some("https://example.com".into()),
            }],
            description: "Web work".into(),
            order: 1,
            ..PortfolioSection::new("web-projects", "Web")
        }
    }

    #[test]
    fn placement_enables_its_station_unless_told_otherwise() {
        let open: PortfolioSection =
            ron::from_str(r#"(id: "web", title: "Web", order: 2, station: Some((position: (5.0, 0.0, 0.0))))"#)
                .unwrap();
        let station = open.station().unwrap();
        assert!(station.enabled);
        assert_eq!((station.section.as_str(), station.order), ("web", 2));

        let closed: PortfolioSection = ron::from_str(
            r#"(id: "soon", title: "Soon", station: Some((position: (0.0, 0.0, 5.0), enabled: false)))"#,
        )
        .unwrap();
        assert!(!closed.station().unwrap().enabled);

        assert!(PortfolioSection::new("about-me", "About").station().is_none());
    }

    #[test]
    fn sections_stay_ordered_and_replace_by_id() {
        let mut p = Portfolio::default();
        p.insert(web());
        p.insert(PortfolioSection { order: 0, ..PortfolioSection::new("about-me", "About") });
        let ids: Vec<_> = p.sections().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["about-me", "web-projects"]);

        p.insert(PortfolioSection { order: 5, ..PortfolioSection::new("about-me", "About v2") });
        assert_eq!(p.len(), 2);
        assert_eq!(p.section("about-me").map(|s| s.title.as_str()), Some("About v2"));
    }

    #[test]
    fn render_text_lists_items() {
        let text = web().render_text();
        assert!(text.starts_with("Web work"));
        assert!(text.contains("- Storefront"));
        assert!(text.contains("[Rust, Postgres]"));
        assert!(text.contains("https://example.com"));
    }

    #[test]
    fn panel_fades_in_and_clears_after_fade_out() {
        let mut panel = PortfolioPanel::default();
        panel.show("web-projects");
        assert!(panel.is_open());
        assert!((panel.advance(1.0) - 1.0).abs() < 1e-6);

        panel.hide();
        assert!(!panel.is_open());
        assert_eq!(panel.open.as_deref(), Some("web-projects"));
        assert_eq!(panel.advance(1.0), 0.0);
        assert!(panel.open.is_none());
    }

    #[test]
    fn malformed_accent_falls_back() {
        let s = PortfolioSection { color: "not-a-color".into(), ..PortfolioSection::new("x", "X") };
        assert_eq!(s.accent(), Color::srgb(0.2, 0.6, 0.86));
        let s = PortfolioSection { color: "#2ecc71".into(), ..PortfolioSection::new("x", "X") };
        assert_ne!(s.accent(), Color::srgb(0.2, 0.6, 0.86));
    }

    #[test]
    fn unknown_section_and_stale_station_do_not_open_the_panel() {
        let mut app = App::new();
        app.add_event::<Interacted>()
            .init_resource::<Portfolio>()
            .init_resource::<PortfolioPanel>()
            .add_systems(Update, open_portfolio_panel);

        let orphan = app.world_mut().spawn(Station::new("Lost", "missing", 0)).id();
        let gone = app.world_mut().spawn(Station::new("Gone", "missing", 1)).id();
        app.world_mut().despawn(gone);
        let actor = app.world_mut().spawn_empty().id();

        app.world_mut().send_event(Interacted { target: orphan, actor });
        app.world_mut().send_event(Interacted { target: gone, actor });
        app.update();
        assert!(app.world().resource::<PortfolioPanel>().open.is_none());
    }
}
