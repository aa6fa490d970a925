//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are
//! hot-reloadable (see `settings::loader`). Every field has a serde default so
//! a partial file, or no file at all, still yields a complete `Settings`.
use crate::camera::CameraMode;
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::PI;

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default)]
    pub invert_x: bool, // Invert horizontal drag
    #[serde(default)]
    pub invert_y: bool, // Invert vertical drag
    #[serde(default = "ControlsSettings::default_sensitivity")]
    pub mouse_sensitivity: f32, // Radians of orbit per pixel of drag
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Action name -> comma separated key names
}

impl ControlsSettings {
    fn default_sensitivity() -> f32 { 0.002 }

    fn default_keybinds() -> HashMap<String, String> {
        [
            ("forward", "W, Up"),
            ("back", "S, Down"),
            ("left", "A, Left"),
            ("right", "D, Right"),
            ("jump", "Space"),
            ("interact", "E"),
            ("camera_mode", "M"),
            ("debug_orbit", "Tab"),
            ("help", "H"),
            ("close_panel", "Escape"),
            ("toggle_debug", "F1"),
            ("dump_debug", "F3"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            invert_x: false,
            invert_y: false,
            mouse_sensitivity: Self::default_sensitivity(),
            keybinds: Self::default_keybinds(),
        }
    }
}

/// Avatar locomotion tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarSettings {
    #[serde(default = "AvatarSettings::default_speed")]
    pub speed: f32, // Walk speed in units per second
    #[serde(default = "AvatarSettings::default_turn_speed")]
    pub turn_speed: f32, // Facing damping rate (1/s)
    #[serde(default = "AvatarSettings::default_jump_force")]
    pub jump_force: f32, // Initial upward velocity of a jump
    #[serde(default = "AvatarSettings::default_gravity")]
    pub gravity: f32, // Downward acceleration while airborne
    #[serde(default)]
    pub ground_level: f32, // Height of the (flat) ground
}

impl AvatarSettings {
    fn default_speed() -> f32 { 5.0 }
    fn default_turn_speed() -> f32 { 8.0 }
    fn default_jump_force() -> f32 { 10.0 }
    fn default_gravity() -> f32 { 30.0 }
}

impl Default for AvatarSettings {
    fn default() -> Self {
        Self {
            speed: Self::default_speed(),
            turn_speed: Self::default_turn_speed(),
            jump_force: Self::default_jump_force(),
            gravity: Self::default_gravity(),
            ground_level: 0.0,
        }
    }
}

/// Follow camera tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default = "CameraSettings::default_distance")]
    pub distance: f32,
    #[serde(default = "CameraSettings::default_height")]
    pub height: f32,
    #[serde(default = "CameraSettings::default_look_height")]
    pub look_height: f32,
    #[serde(default = "CameraSettings::default_follow_speed")]
    pub follow_speed: f32, // Per-frame lerp factor towards the computed position
    #[serde(default = "CameraSettings::default_min_polar")]
    pub min_polar: f32,
    #[serde(default = "CameraSettings::default_max_polar")]
    pub max_polar: f32,
    #[serde(default = "CameraSettings::default_initial_polar")]
    pub initial_polar: f32,
    #[serde(default = "CameraSettings::default_initial_azimuth")]
    pub initial_azimuth: f32,
    #[serde(default = "CameraSettings::default_fixed_angle")]
    pub fixed_angle: f32, // Hybrid mode resting azimuth
    #[serde(default)]
    pub initial_mode: CameraMode,
}

impl CameraSettings {
    fn default_distance() -> f32 { 8.0 }
    fn default_height() -> f32 { 4.0 }
    fn default_look_height() -> f32 { 1.7 }
    fn default_follow_speed() -> f32 { 0.1 }
    fn default_min_polar() -> f32 { PI * 0.05 }
    fn default_max_polar() -> f32 { PI * 0.45 }
    fn default_initial_polar() -> f32 { PI * 0.25 }
    fn default_initial_azimuth() -> f32 { -PI / 4.0 }
    fn default_fixed_angle() -> f32 { -PI / 4.0 }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: Self::default_distance(),
            height: Self::default_height(),
            look_height: Self::default_look_height(),
            follow_speed: Self::default_follow_speed(),
            min_polar: Self::default_min_polar(),
            max_polar: Self::default_max_polar(),
            initial_polar: Self::default_initial_polar(),
            initial_azimuth: Self::default_initial_azimuth(),
            fixed_angle: Self::default_fixed_angle(),
            initial_mode: CameraMode::default(),
        }
    }
}

/// Interaction probe tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionSettings {
    #[serde(default = "InteractionSettings::default_max_range")]
    pub max_range: f32, // Ray length for the interaction probe
    #[serde(default = "InteractionSettings::default_eye_offset")]
    pub eye_offset: f32, // Ray origin height above the avatar's feet
    #[serde(default = "InteractionSettings::default_hover_distance")]
    pub hover_distance: f32, // Distance at which stations highlight
}

impl InteractionSettings {
    fn default_max_range() -> f32 { 3.0 }
    fn default_eye_offset() -> f32 { 1.0 }
    fn default_hover_distance() -> f32 { 2.0 }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            max_range: Self::default_max_range(),
            eye_offset: Self::default_eye_offset(),
            hover_distance: Self::default_hover_distance(),
        }
    }
}

/// Procedural animation tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSettings {
    #[serde(default = "AnimationSettings::default_blink_rate")]
    pub blink_rate_per_second: f32, // Expected blinks per second
    #[serde(default = "AnimationSettings::default_blink_speed")]
    pub blink_speed: f32, // Blink progress per second
    #[serde(default = "AnimationSettings::default_walk_cycle_speed")]
    pub walk_cycle_speed: f32,
    #[serde(default = "AnimationSettings::default_arm_swing_duration")]
    pub arm_swing_duration: f32, // Seconds for each half of the interaction swing
    #[serde(default = "AnimationSettings::default_jump_bob_height")]
    pub jump_bob_height: f32,
    #[serde(default = "AnimationSettings::default_jump_bob_duration")]
    pub jump_bob_duration: f32, // Seconds for each half of the jump bob
}

impl AnimationSettings {
    fn default_blink_rate() -> f32 { 0.3 }
    fn default_blink_speed() -> f32 { 5.0 }
    fn default_walk_cycle_speed() -> f32 { 15.0 }
    fn default_arm_swing_duration() -> f32 { 0.3 }
    fn default_jump_bob_height() -> f32 { 0.2 }
    fn default_jump_bob_duration() -> f32 { 0.2 }
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            blink_rate_per_second: Self::default_blink_rate(),
            blink_speed: Self::default_blink_speed(),
            walk_cycle_speed: Self::default_walk_cycle_speed(),
            arm_swing_duration: Self::default_arm_swing_duration(),
            jump_bob_height: Self::default_jump_bob_height(),
            jump_bob_duration: Self::default_jump_bob_duration(),
        }
    }
}

/// Host/engine level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "EngineSettings::default_vsync")]
    pub vsync: bool,
    #[serde(default = "EngineSettings::default_max_frame_dt")]
    pub max_frame_dt: f32, // Upper bound on the per-frame delta handed to the avatar core
}

impl EngineSettings {
    fn default_vsync() -> bool { true }
    fn default_max_frame_dt() -> f32 { 0.1 }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            vsync: Self::default_vsync(),
            max_frame_dt: Self::default_max_frame_dt(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub avatar: AvatarSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub interaction: InteractionSettings,
    #[serde(default)]
    pub animation: AnimationSettings,
    #[serde(default)]
    pub engine: EngineSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Resolve every key bound to `action`.
    ///
    /// Bindings are comma separated (`"W, Up"`). Unknown key names are
    /// dropped; if nothing usable remains the built-in default for the action
    /// is used instead.
    #[must_use]
    pub fn keys_for(&self, action: &str) -> Vec<KeyCode> {
        let parse = |s: &str| -> Vec<KeyCode> {
            s.split(',')
                .filter_map(|name| Self::keycode_from_str(name.trim()))
                .collect()
        };

        let bound = self.controls.keybinds.get(action).map(|s| parse(s)).unwrap_or_default();
        if !bound.is_empty() {
            return bound;
        }
        ControlsSettings::default_keybinds()
            .get(action)
            .map(|s| parse(s))
            .unwrap_or_default()
    }

    /// Convert a key name (as written in `controls.keybinds`) into a `KeyCode`.
    ///
    /// Letters and digits are accepted as single characters. Everything else
    /// uses the names below, case-insensitively.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
            KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
            KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
            KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
            KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
            KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
        ];
        const FUNCTION: [KeyCode; 12] = [
            KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
            KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
        ];

        let s = name.trim().to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return Some(LETTERS[(c as u8 - b'A') as usize]);
            }
            if c.is_ascii_digit() {
                return Some(DIGITS[(c as u8 - b'0') as usize]);
            }
        }

        if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
            return (1..=FUNCTION.len()).contains(&n).then(|| FUNCTION[n - 1]);
        }

        Some(match s.as_str() {
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "BACKSPACE" => KeyCode::Backspace,
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,
            _ => return None,
        })
    }
}

pub mod loader;
