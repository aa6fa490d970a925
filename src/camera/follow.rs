//! Bevy glue for the camera rig: input bindings, cursor capture and applying
//! the rig's output to the camera transform.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::avatar::{Avatar, FrameDelta};
use crate::camera::{CameraRig, CameraTarget, DebugOrbit, RigParams};
use crate::settings::Settings;
use crate::ui::HudMessage;

/// Translate mouse and keyboard input into rig operations.
///
/// - Left button starts/ends a drag and captures the pointer while held.
/// - With the pointer captured, raw motion deltas steer the rig; otherwise the
///   absolute cursor position is differenced.
/// - The `camera_mode` key cycles modes, `debug_orbit` toggles the override.
#[allow(clippy::needless_pass_by_value, clippy::too_many_arguments)]
pub fn camera_input(
    settings: Res<Settings>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut cameras: Query<(&mut CameraRig, &mut DebugOrbit, &Transform), Without<Avatar>>,
    avatars: Query<&Transform, With<Avatar>>,
    mut hud: EventWriter<HudMessage>,
) {
    let Ok((mut rig, mut orbit, cam_tf)) = cameras.get_single_mut() else { return };
    let mut window = windows.get_single_mut().ok();

    if settings.keys_for("camera_mode").iter().any(|k| keys.just_pressed(*k)) {
        let was_dragging = rig.state.dragging;
        let mode = rig.toggle_mode();
        // Switching into Keyboard ends the drag without a button release.
        if was_dragging && !rig.state.dragging {
            if let Some(w) = window.as_mut() {
                release_pointer(w);
            }
        }
        info!("camera mode: {}", mode.label());
        hud.send(HudMessage::new(format!("Camera mode: {}", mode.label())));
    }

    if settings.keys_for("debug_orbit").iter().any(|k| keys.just_pressed(*k)) {
        let enable = !rig.debug_orbit_enabled();
        rig.set_debug_orbit_enabled(enable);
        if enable {
            let focus = avatars
                .get_single()
                .map(|t| t.translation + Vec3::Y * rig.params.look_height)
                .unwrap_or(Vec3::ZERO);
            orbit.seed(cam_tf.translation, focus);
        } else {
            rig.sync_position(cam_tf.translation);
        }
        if let Some(w) = window.as_mut() {
            release_pointer(w);
        }
        info!("debug orbit: {}", if enable { "on" } else { "off" });
        hud.send(HudMessage::new(format!("Debug orbit: {}", if enable { "on" } else { "off" })));
    }

    if mouse_button.just_pressed(MouseButton::Left) && rig.accepts_drag() {
        let cursor = window
            .as_ref()
            .and_then(|w| w.cursor_position())
            .map(|c| oriented_cursor(&settings, c));
        rig.begin_drag(cursor);
        if let Some(w) = window.as_mut() {
            w.cursor.grab_mode = CursorGrabMode::Locked;
            w.cursor.visible = false;
        }
    }

    if mouse_button.just_released(MouseButton::Left) && rig.state.dragging {
        rig.end_drag();
        if let Some(w) = window.as_mut() {
            release_pointer(w);
        }
    }

    let captured = window
        .as_ref()
        .is_some_and(|w| w.cursor.grab_mode != CursorGrabMode::None);

    if captured && rig.state.dragging {
        let mut delta: Vec2 = motion.read().map(|ev| ev.delta).sum();
        if settings.controls.invert_x {
            delta.x = -delta.x;
        }
        if settings.controls.invert_y {
            delta.y = -delta.y;
        }
        rig.apply_cursor_delta(delta.x, delta.y);
    } else {
        motion.clear();
        // Pointer capture was refused (or is unsupported): fall back to
        // differencing absolute cursor positions.
        if let Some(cursor) = window.as_ref().and_then(|w| w.cursor_position()) {
            rig.drag_to(oriented_cursor(&settings, cursor));
        }
    }
}

/// Mirror the cursor position on inverted axes so differencing it yields
/// inverted deltas.
fn oriented_cursor(settings: &Settings, cursor: Vec2) -> Vec2 {
    Vec2::new(
        if settings.controls.invert_x { -cursor.x } else { cursor.x },
        if settings.controls.invert_y { -cursor.y } else { cursor.y },
    )
}

fn release_pointer(window: &mut Window) {
    window.cursor.grab_mode = CursorGrabMode::None;
    window.cursor.visible = true;
}

/// Position the camera from the rig, after the avatar has moved this frame.
#[allow(clippy::needless_pass_by_value)]
pub fn camera_follow(
    dt: Res<FrameDelta>,
    avatars: Query<&crate::avatar::KinematicBody, With<Avatar>>,
    mut cameras: Query<(&mut CameraRig, &mut Transform), Without<Avatar>>,
) {
    let target = avatars.get_single().ok().map(|body| CameraTarget {
        position: body.state.position,
        facing: body.state.facing,
    });

    for (mut rig, mut transform) in &mut cameras {
        if let Some(out) = rig.update(dt.0, target, None) {
            transform.translation = out.position;
            transform.look_at(out.look_at, Vec3::Y);
        }
    }
}

/// Push reloaded camera tuning into the rig without resetting its angles.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_rig_settings(settings: Res<Settings>, mut rigs: Query<&mut CameraRig>) {
    if !settings.is_changed() {
        return;
    }
    let params = RigParams::from_settings(&settings.camera, settings.controls.mouse_sensitivity);
    for mut rig in &mut rigs {
        rig.params = params;
        let polar = rig.state.polar_angle.clamp(params.min_polar, params.max_polar);
        rig.state.polar_angle = polar;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraMode;

    fn app() -> App {
        let mut settings = Settings::default();
        settings.camera.initial_mode = CameraMode::Hybrid;
        let rig = CameraRig::new(
            RigParams::from_settings(&settings.camera, settings.controls.mouse_sensitivity),
            &settings.camera,
            Vec3::new(0.0, 5.0, -8.0),
        );

        let mut app = App::new();
        app.insert_resource(settings)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .add_event::<MouseMotion>()
            .add_event::<HudMessage>()
            .add_systems(Update, camera_input);
        app.world_mut().spawn((Window::default(), PrimaryWindow));
        app.world_mut().spawn((rig, DebugOrbit::default(), Transform::from_xyz(0.0, 5.0, -8.0)));
        app.world_mut().spawn((Avatar, Transform::default()));
        app
    }

    /// Run one frame with the given presses and releases applied.
    fn step(app: &mut App, press: &[KeyCode], mouse_press: bool, mouse_release: bool) {
        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.clear();
            for k in press {
                keys.press(*k);
            }
        }
        {
            let mut buttons = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
            buttons.clear();
            if mouse_press {
                buttons.press(MouseButton::Left);
            }
            if mouse_release {
                buttons.release(MouseButton::Left);
            }
        }
        app.update();
    }

    fn window(app: &mut App) -> Window {
        let mut q = app.world_mut().query_filtered::<&Window, With<PrimaryWindow>>();
        q.single(app.world()).clone()
    }

    fn window_mut(app: &mut App) -> Mut<'_, Window> {
        let mut q = app.world_mut().query_filtered::<&mut Window, With<PrimaryWindow>>();
        q.single_mut(app.world_mut())
    }

    fn rig(app: &mut App) -> CameraRig {
        let mut q = app.world_mut().query::<&CameraRig>();
        q.single(app.world()).clone()
    }

    #[test]
    fn drag_captures_and_release_frees_the_pointer() {
        let mut app = app();
        step(&mut app, &[], true, false);
        assert!(rig(&mut app).state.dragging);
        assert_eq!(window(&mut app).cursor.grab_mode, CursorGrabMode::Locked);
        assert!(!window(&mut app).cursor.visible);

        step(&mut app, &[], false, true);
        assert!(!rig(&mut app).state.dragging);
        assert_eq!(window(&mut app).cursor.grab_mode, CursorGrabMode::None);
        assert!(window(&mut app).cursor.visible);
    }

    #[test]
    fn captured_drag_steers_with_raw_motion() {
        let mut app = app();
        step(&mut app, &[], true, false);
        let before = rig(&mut app);
        app.world_mut().send_event(MouseMotion { delta: Vec2::new(10.0, 0.0) });
        step(&mut app, &[], false, false);
        let after = rig(&mut app);
        let expected = before.state.azimuth_angle - 10.0 * before.params.sensitivity;
        assert!((after.state.azimuth_angle - expected).abs() < 1e-5);
    }

    #[test]
    fn refused_capture_falls_back_to_cursor_differencing() {
        let mut app = app();
        window_mut(&mut app).set_cursor_position(Some(Vec2::new(100.0, 100.0)));
        step(&mut app, &[], true, false);
        let before = rig(&mut app);

        // The platform declined the lock; raw motion must not be applied.
        {
            let mut w = window_mut(&mut app);
            w.cursor.grab_mode = CursorGrabMode::None;
            w.set_cursor_position(Some(Vec2::new(120.0, 100.0)));
        }
        app.world_mut().send_event(MouseMotion { delta: Vec2::new(500.0, 0.0) });
        step(&mut app, &[], false, false);

        let after = rig(&mut app);
        let expected = before.state.azimuth_angle - 20.0 * before.params.sensitivity;
        assert!((after.state.azimuth_angle - expected).abs() < 1e-4);
    }

    #[test]
    fn mode_switch_mid_drag_frees_the_pointer() {
        let mut app = app();
        step(&mut app, &[], true, false);
        assert_eq!(window(&mut app).cursor.grab_mode, CursorGrabMode::Locked);

        step(&mut app, &[KeyCode::KeyM], false, false);
        let r = rig(&mut app);
        assert_eq!(r.mode(), CameraMode::Keyboard);
        assert!(!r.state.dragging);
        assert_eq!(window(&mut app).cursor.grab_mode, CursorGrabMode::None);
        assert!(window(&mut app).cursor.visible);

        step(&mut app, &[], false, true);
        assert_eq!(window(&mut app).cursor.grab_mode, CursorGrabMode::None);
    }

    #[test]
    fn debug_orbit_toggle_mid_drag_frees_the_pointer() {
        let mut app = app();
        step(&mut app, &[], true, false);
        step(&mut app, &[KeyCode::Tab], false, false);
        let r = rig(&mut app);
        assert!(r.debug_orbit_enabled());
        assert!(!r.state.dragging);
        assert_eq!(window(&mut app).cursor.grab_mode, CursorGrabMode::None);

        step(&mut app, &[], false, true);
        assert_eq!(window(&mut app).cursor.grab_mode, CursorGrabMode::None);
        assert!(!rig(&mut app).state.dragging);
    }
}
