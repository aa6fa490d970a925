use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::window::{Window, WindowPlugin};
use promenade::avatar::{animate_avatar, avatar_movement, clamp_frame_delta, read_move_intent, sync_body_settings, FrameDelta};
use promenade::camera::{camera_follow, camera_input, debug_orbit_control, sync_rig_settings};
use promenade::debug::DebugDumpPlugin;
use promenade::interaction::{interaction_probe, station_feedback, station_hover, Interacted, ProbeTarget};
use promenade::portfolio::loader as portfolio_loader;
use promenade::portfolio::{
    animate_portfolio_panel, close_portfolio_panel, open_portfolio_panel, spawn_portfolio_panel, PortfolioPanel,
};
use promenade::settings::loader as settings_loader;
use promenade::ui::{
    setup_hud, show_toasts, spawn_hud, toggle_debug_overlay, toggle_help, update_debug_overlay, HudMessage,
};

mod app;
use app::{present_mode, setup, spawn_scenery, sync_vsync_settings};

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Promenade".into(),
                position: WindowPosition::Centered(MonitorSelection::Primary),
                present_mode: present_mode(settings.engine.vsync),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(DebugDumpPlugin);

    app.insert_resource(portfolio_loader::load_portfolio_from_dir(portfolio_loader::PORTFOLIO_DIR));
    app.insert_resource(
        portfolio_loader::setup_portfolio_watcher(portfolio_loader::PORTFOLIO_DIR)
            .unwrap_or_else(|_| portfolio_loader::PortfolioWatcher::stub()),
    );
    app.insert_resource(settings.clone());
    app.insert_resource(settings_watcher);
    app.insert_resource(FrameDelta::default());
    app.init_resource::<ProbeTarget>();
    app.init_resource::<PortfolioPanel>();
    app.add_event::<Interacted>();
    app.add_event::<HudMessage>();

    app.add_systems(Startup, setup_hud);
    app.add_systems(Startup, spawn_hud);
    app.add_systems(Startup, spawn_portfolio_panel);
    app.add_systems(Startup, setup);
    app.add_systems(Startup, spawn_scenery);

    app.add_systems(PreUpdate, settings_loader::check_settings_changes);
    app.add_systems(PreUpdate, portfolio_loader::check_portfolio_changes);
    app.add_systems(PreUpdate, clamp_frame_delta.after(settings_loader::check_settings_changes));

    // Input, then body, then camera, then probe, then reactions.
    app.add_systems(
        Update,
        (
            (sync_body_settings, sync_rig_settings),
            read_move_intent,
            camera_input,
            avatar_movement,
            (camera_follow, debug_orbit_control),
            interaction_probe,
            (station_hover, station_feedback, animate_avatar, open_portfolio_panel),
        )
            .chain(),
    );
    app.add_systems(Update, (close_portfolio_panel, animate_portfolio_panel).chain().after(open_portfolio_panel));
    app.add_systems(Update, show_toasts.after(camera_input));
    app.add_systems(Update, toggle_help);
    app.add_systems(Update, toggle_debug_overlay);
    app.add_systems(Update, update_debug_overlay.after(interaction_probe));
    app.add_systems(Update, sync_vsync_settings);

    app.run();
}
