//! Keyboard to `MoveIntent` mapping.

use bevy::prelude::*;

use crate::avatar::{AvatarIntent, MoveIntent};
use crate::settings::Settings;

/// Resolved key bindings for the avatar's actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveBindings {
    pub forward: Vec<KeyCode>,
    pub back: Vec<KeyCode>,
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub jump: Vec<KeyCode>,
    pub interact: Vec<KeyCode>,
}

impl MoveBindings {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            forward: settings.keys_for("forward"),
            back: settings.keys_for("back"),
            left: settings.keys_for("left"),
            right: settings.keys_for("right"),
            jump: settings.keys_for("jump"),
            interact: settings.keys_for("interact"),
        }
    }

    /// Build the intent from whatever keys `held` reports as down.
    pub fn intent(&self, held: impl Fn(KeyCode) -> bool) -> MoveIntent {
        let any = |keys: &[KeyCode]| keys.iter().any(|k| held(*k));
        MoveIntent {
            forward: any(&self.forward),
            backward: any(&self.back),
            left: any(&self.left),
            right: any(&self.right),
            jump_requested: any(&self.jump),
            interact_requested: any(&self.interact),
        }
    }
}

/// Refresh the avatar's intent from the keyboard every frame.
#[allow(clippy::needless_pass_by_value)]
pub fn read_move_intent(
    settings: Res<Settings>,
    keys: Res<ButtonInput<KeyCode>>,
    mut bindings: Local<Option<MoveBindings>>,
    mut avatars: Query<&mut AvatarIntent>,
) {
    if bindings.is_none() || settings.is_changed() {
        *bindings = Some(MoveBindings::from_settings(&settings));
    }
    let Some(bindings) = bindings.as_ref() else { return };

    let flags = bindings.intent(|k| keys.pressed(k));
    for mut intent in &mut avatars {
        intent.set_move_intent(flags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_letters_both_drive_movement() {
        let b = MoveBindings::from_settings(&Settings::default());
        let intent = b.intent(|k| k == KeyCode::ArrowUp || k == KeyCode::KeyD);
        assert!(intent.forward && intent.right);
        assert!(!intent.backward && !intent.left && !intent.jump_requested);

        let intent = b.intent(|k| k == KeyCode::Space || k == KeyCode::KeyE);
        assert!(intent.jump_requested && intent.interact_requested);
        assert!(!intent.is_moving());
    }

    #[test]
    fn remapped_jump() {
        let mut s = Settings::default();
        s.controls.keybinds.insert("jump".into(), "J".into());
        let b = MoveBindings::from_settings(&s);
        assert!(!b.intent(|k| k == KeyCode::Space).jump_requested);
        assert!(b.intent(|k| k == KeyCode::KeyJ).jump_requested);
    }
}
