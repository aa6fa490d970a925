//! HUD: toast messages, the controls help panel and the debug overlay.
//!
//! Toasts are short status lines ("Camera mode: hybrid") sent as
//! `HudMessage` events by any system. The help panel lists the key bindings
//! and is shown for a few seconds at start-up, then toggled with H. The debug
//! overlay (F1) refreshes twice a second with FPS, avatar and camera state.

use crate::avatar::{Avatar, KinematicBody};
use crate::camera::CameraRig;
use crate::interaction::{ProbeTarget, Station};
use crate::settings::Settings;
use bevy::diagnostic::{Diagnostic, DiagnosticsStore};
use bevy::prelude::*;

const TOAST_SECONDS: f32 = 2.0;
const HELP_STARTUP_SECONDS: f32 = 5.0;

/// A one-line status message for the toast area.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct HudMessage(pub String);

impl HudMessage {
    pub fn new(text: impl Into<String>) -> Self {
        HudMessage(text.into())
    }
}

/// Current toast and how long it stays.
#[derive(Resource, Debug, Default)]
pub struct Toast {
    pub text: String,
    pub timer: Timer,
}

/// Help panel visibility plus the start-up auto-hide timer.
#[derive(Resource, Debug)]
pub struct HelpState {
    pub visible: bool,
    pub auto_hide: Option<Timer>,
}

impl Default for HelpState {
    fn default() -> Self {
        Self { visible: true, auto_hide: Some(Timer::from_seconds(HELP_STARTUP_SECONDS, TimerMode::Once)) }
    }
}

/// State for the debug overlay visibility.
#[derive(Resource, Default)]
pub struct DebugOverlayState {
    /// Whether the overlay is currently visible.
    pub visible: bool,
}

#[derive(Resource, Default)]
pub struct DebugOverlayTimer(pub Timer);

#[derive(Component)]
pub struct ToastText;

#[derive(Component)]
pub struct HelpText;

#[derive(Component)]
pub struct DebugOverlayText;

/// Insert the HUD resources.
pub fn setup_hud(mut commands: Commands) {
    commands.insert_resource(DebugOverlayTimer(Timer::from_seconds(0.5, TimerMode::Repeating)));
    commands.insert_resource(DebugOverlayState::default());
    commands.insert_resource(HelpState::default());
    commands.insert_resource(Toast::default());
}

/// Spawn the text nodes for toast, help and debug overlay.
#[allow(clippy::needless_pass_by_value)]
pub fn spawn_hud(mut commands: Commands, settings: Res<Settings>) {
    commands.spawn((
        TextBundle {
            text: Text::from_section("", TextStyle { font_size: 18.0, color: Color::srgb(1.0, 1.0, 0.0), ..default() }),
            style: Style { position_type: PositionType::Absolute, left: Val::Px(10.0), top: Val::Px(10.0), ..default() },
            ..default()
        },
        DebugOverlayText,
    ));

    commands.spawn((
        TextBundle {
            text: Text::from_section("", TextStyle { font_size: 22.0, color: Color::WHITE, ..default() }),
            style: Style {
                position_type: PositionType::Absolute,
                bottom: Val::Px(40.0),
                left: Val::Percent(40.0),
                ..default()
            },
            ..default()
        },
        ToastText,
    ));

    commands.spawn((
        TextBundle {
            text: Text::from_section(help_text(&settings), TextStyle { font_size: 16.0, color: Color::WHITE, ..default() }),
            style: Style { position_type: PositionType::Absolute, right: Val::Px(10.0), top: Val::Px(10.0), ..default() },
            background_color: Color::srgba(0.0, 0.0, 0.0, 0.5).into(),
            ..default()
        },
        HelpText,
    ));
}

/// Controls list built from the current key bindings.
#[must_use]
pub fn help_text(settings: &Settings) -> String {
    let bind = |action: &str| {
        settings
            .controls
            .keybinds
            .get(action)
            .cloned()
            .unwrap_or_else(|| "-".to_string())
    };
    let lines = [
        ("Move", format!("{} / {} / {} / {}", bind("forward"), bind("left"), bind("back"), bind("right"))),
        ("Jump", bind("jump")),
        ("Interact", bind("interact")),
        ("Camera mode", bind("camera_mode")),
        ("Rotate camera", "drag mouse".to_string()),
        ("Debug orbit", bind("debug_orbit")),
        ("Close panel", bind("close_panel")),
        ("Help", bind("help")),
    ];
    lines.iter().map(|(what, keys)| format!("{what}: {keys}")).collect::<Vec<_>>().join("\n")
}

/// Latest `HudMessage` replaces the current toast and restarts its timer.
#[allow(clippy::needless_pass_by_value)]
pub fn show_toasts(time: Res<Time>, mut messages: EventReader<HudMessage>, mut toast: ResMut<Toast>, mut text: Query<&mut Text, With<ToastText>>) {
    if let Some(msg) = messages.read().last() {
        toast.text.clone_from(&msg.0);
        toast.timer = Timer::from_seconds(TOAST_SECONDS, TimerMode::Once);
    }
    if !toast.text.is_empty() && toast.timer.tick(time.delta()).finished() {
        toast.text.clear();
    }
    for mut t in &mut text {
        if t.sections[0].value != toast.text {
            t.sections[0].value.clone_from(&toast.text);
        }
    }
}

/// H toggles the help panel; it also hides itself after the start-up delay.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_help(
    time: Res<Time>,
    settings: Res<Settings>,
    keys: Res<ButtonInput<KeyCode>>,
    mut help: ResMut<HelpState>,
    mut panel: Query<(&mut Visibility, &mut Text), With<HelpText>>,
) {
    if settings.keys_for("help").iter().any(|k| keys.just_pressed(*k)) {
        help.visible = !help.visible;
        help.auto_hide = None;
    }
    if let Some(timer) = help.auto_hide.as_mut() {
        if timer.tick(time.delta()).just_finished() {
            help.visible = false;
            help.auto_hide = None;
        }
    }

    for (mut visibility, mut text) in &mut panel {
        *visibility = if help.visible { Visibility::Visible } else { Visibility::Hidden };
        if settings.is_changed() {
            text.sections[0].value = help_text(&settings);
        }
    }
}

/// Toggle the debug overlay visibility on F1.
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_overlay(
    settings: Res<Settings>,
    mut state: ResMut<DebugOverlayState>,
    input: Res<ButtonInput<KeyCode>>,
) {
    if settings.keys_for("toggle_debug").iter().any(|k| input.just_pressed(*k)) {
        state.visible = !state.visible;
    }
}

#[derive(bevy::ecs::system::SystemParam)]
pub struct DebugOverlayCtx<'w, 's> {
    pub diagnostics: Res<'w, DiagnosticsStore>,
    pub state: Res<'w, DebugOverlayState>,
    pub time: Res<'w, Time>,
    pub timer: ResMut<'w, DebugOverlayTimer>,
    pub probe: Res<'w, ProbeTarget>,
    pub query: Query<'w, 's, &'static mut Text, With<DebugOverlayText>>,
    pub avatars: Query<'w, 's, &'static KinematicBody, With<Avatar>>,
    pub rigs: Query<'w, 's, &'static CameraRig>,
    pub stations: Query<'w, 's, &'static Station>,
}

/// Refresh the debug overlay text once every interval.
pub fn update_debug_overlay(mut ctx: DebugOverlayCtx<'_, '_>) {
    if !ctx.timer.0.tick(ctx.time.delta()).just_finished() {
        return;
    }

    let Ok(mut text) = ctx.query.get_single_mut() else { return };

    if !ctx.state.visible {
        text.sections[0].value = String::new();
        return;
    }

    let fps = ctx
        .diagnostics
        .get(&bevy::diagnostic::FrameTimeDiagnosticsPlugin::FPS)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let avatar = ctx.avatars.get_single().map_or_else(
        |_| "Avatar: N/A".to_string(),
        |body| {
            let s = &body.state;
            format!(
                "Pos: ({:.2}, {:.2}, {:.2})\nFacing: {:.0}°  Grounded: {}",
                s.position.x,
                s.position.y,
                s.position.z,
                s.facing.to_degrees(),
                s.grounded
            )
        },
    );

    let camera = ctx.rigs.get_single().map_or_else(
        |_| "Camera: N/A".to_string(),
        |rig| {
            format!(
                "Camera: {}  Drag: {}  Orbit: {}\nPolar: {:.2}  Azimuth: {:.2}",
                rig.mode().label(),
                rig.state.dragging,
                rig.debug_orbit_enabled(),
                rig.state.polar_angle,
                rig.state.azimuth_angle
            )
        },
    );

    let target = ctx
        .probe
        .0
        .and_then(|e| ctx.stations.get(e).ok())
        .map_or("none", |s| s.title.as_str());

    text.sections[0].value = format!("FPS: {fps:.1}\n{avatar}\n{camera}\nTarget: {target}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_rebound_keys() {
        let mut s = Settings::default();
        s.controls.keybinds.insert("jump".into(), "J".into());
        let help = help_text(&s);
        assert!(help.contains("Jump: J"));
        assert!(help.contains("Move: W, Up / A, Left / S, Down / D, Right"));
    }

    #[test]
    fn latest_message_becomes_the_toast() {
        let mut app = App::new();
        app.add_event::<HudMessage>()
            .init_resource::<Time>()
            .init_resource::<Toast>()
            .add_systems(Update, show_toasts);
        app.world_mut().send_event(HudMessage::new("Camera mode: mouse"));
        app.world_mut().send_event(HudMessage::new("Camera mode: hybrid"));
        app.update();
        assert_eq!(app.world().resource::<Toast>().text, "Camera mode: hybrid");
    }
}
