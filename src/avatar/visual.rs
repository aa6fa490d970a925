//! Procedural avatar model and its animations.
//!
//! The model is a handful of primitives parented under a `VisualRoot`:
//! body, head, hair, two arms, two legs and two eyes. Limbs pivot at the
//! shoulder/hip, so swinging is a rotation about local X.
//!
//! Animations (all driven from `anim`):
//! - walk cycle on arms and legs while the body moves horizontally,
//! - jump bob on the visual root when a jump starts,
//! - right-arm swing when the avatar interacts with a station,
//! - random blinks.

use bevy::prelude::*;
use rand::thread_rng;

use crate::anim::{Blink, Ease, PingPong, WalkCycle};
use crate::avatar::{Avatar, FrameDelta, KinematicBody};
use crate::interaction::Interacted;
use crate::settings::{AnimationSettings, Settings};
use std::f32::consts::PI;

/// Which limb an entity is.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limb {
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl Limb {
    /// Walk phase sign: each limb swings opposite its pair and its diagonal
    /// partner.
    #[must_use]
    pub fn phase_sign(self) -> f32 {
        match self {
            Limb::LeftLeg | Limb::LeftArm => -1.0,
            Limb::RightLeg | Limb::RightArm => 1.0,
        }
    }
}

/// Eye entity; its Y scale is driven by the blink.
#[derive(Component, Debug)]
pub struct Eye;

/// Root of the avatar's meshes, offset vertically by the jump bob.
#[derive(Component, Debug)]
pub struct VisualRoot;

/// Per-avatar animation state.
#[derive(Component, Debug, Clone)]
pub struct AvatarAnimation {
    pub walk: WalkCycle,
    pub jump_bob: PingPong,
    pub arm_swing: PingPong,
    pub blink: Blink,
    was_jumping: bool,
}

impl AvatarAnimation {
    #[must_use]
    pub fn from_settings(a: &AnimationSettings) -> Self {
        Self {
            walk: WalkCycle::default(),
            jump_bob: PingPong::new(a.jump_bob_height, a.jump_bob_duration, Ease::QuadOut, Ease::QuadIn),
            arm_swing: PingPong::new(-PI * 0.4, a.arm_swing_duration, Ease::Linear, Ease::Linear),
            blink: Blink::new(a.blink_rate_per_second, a.blink_speed),
            was_jumping: false,
        }
    }

    /// Start the jump bob on the frame a jump begins.
    pub fn observe_jump(&mut self, has_jumped: bool) {
        if has_jumped && !self.was_jumping {
            self.jump_bob.trigger();
        }
        self.was_jumping = has_jumped;
    }
}

/// Spawn the avatar's meshes under `parent`.
pub fn spawn_avatar_visual(
    parent: &mut ChildBuilder,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let skin = materials.add(Color::srgb(1.0, 0.81, 0.71));
    let hair = materials.add(Color::srgb(0.24, 0.18, 0.16));
    let outfit = materials.add(Color::srgb(0.58, 0.44, 0.86));
    let trousers = materials.add(Color::srgb(0.2, 0.2, 0.3));
    let eye_white = materials.add(Color::WHITE);

    let torso = meshes.add(Cuboid::new(0.6, 0.8, 0.35));
    let head = meshes.add(Sphere::new(0.3));
    let hair_mesh = meshes.add(Cuboid::new(0.62, 0.2, 0.62));
    let arm = meshes.add(Cuboid::new(0.16, 0.6, 0.16));
    let leg = meshes.add(Cuboid::new(0.2, 0.7, 0.2));
    let eye = meshes.add(Sphere::new(0.06));

    parent
        .spawn((SpatialBundle::default(), VisualRoot))
        .with_children(|root| {
            root.spawn(PbrBundle {
                mesh: torso,
                material: outfit.clone(),
                transform: Transform::from_xyz(0.0, 1.1, 0.0),
                ..default()
            });
            root.spawn(PbrBundle {
                mesh: head,
                material: skin.clone(),
                transform: Transform::from_xyz(0.0, 1.75, 0.0),
                ..default()
            });
            root.spawn(PbrBundle {
                mesh: hair_mesh,
                material: hair,
                transform: Transform::from_xyz(0.0, 2.0, -0.02),
                ..default()
            });

            for (limb, x) in [(Limb::LeftArm, -0.4), (Limb::RightArm, 0.4)] {
                root.spawn((SpatialBundle::from_transform(Transform::from_xyz(x, 1.45, 0.0)), limb))
                    .with_children(|pivot| {
                        pivot.spawn(PbrBundle {
                            mesh: arm.clone(),
                            material: skin.clone(),
                            transform: Transform::from_xyz(0.0, -0.3, 0.0),
                            ..default()
                        });
                    });
            }

            for (limb, x) in [(Limb::LeftLeg, -0.15), (Limb::RightLeg, 0.15)] {
                root.spawn((SpatialBundle::from_transform(Transform::from_xyz(x, 0.7, 0.0)), limb))
                    .with_children(|pivot| {
                        pivot.spawn(PbrBundle {
                            mesh: leg.clone(),
                            material: trousers.clone(),
                            transform: Transform::from_xyz(0.0, -0.35, 0.0),
                            ..default()
                        });
                    });
            }

            for x in [-0.11, 0.11] {
                root.spawn((
                    PbrBundle {
                        mesh: eye.clone(),
                        material: eye_white.clone(),
                        transform: Transform::from_xyz(x, 1.8, 0.26),
                        ..default()
                    },
                    Eye,
                ));
            }
        });
}

#[derive(bevy::ecs::system::SystemParam)]
pub struct AvatarAnimationCtx<'w, 's> {
    pub dt: Res<'w, FrameDelta>,
    pub settings: Res<'w, Settings>,
    pub interactions: EventReader<'w, 's, Interacted>,
    pub avatars: Query<'w, 's, (Entity, &'static KinematicBody, &'static mut AvatarAnimation), With<Avatar>>,
    pub roots: Query<'w, 's, &'static mut Transform, (With<VisualRoot>, Without<Limb>, Without<Eye>)>,
    pub limbs: Query<'w, 's, (&'static Limb, &'static mut Transform), (Without<VisualRoot>, Without<Eye>)>,
    pub eyes: Query<'w, 's, &'static mut Transform, (With<Eye>, Without<VisualRoot>, Without<Limb>)>,
}

/// Advance every avatar animation and pose the model.
///
/// The scene holds a single avatar, so limbs, eyes and the visual root are
/// posed from that avatar's animation state.
pub fn animate_avatar(mut ctx: AvatarAnimationCtx) {
    let dt = ctx.dt.0;
    let fired_by: Vec<Entity> = ctx.interactions.read().map(|ev| ev.actor).collect();
    let Ok((entity, body, mut anim)) = ctx.avatars.get_single_mut() else { return };

    if ctx.settings.is_changed() {
        let a = &ctx.settings.animation;
        anim.jump_bob.reshape(a.jump_bob_height, a.jump_bob_duration);
        anim.arm_swing.reshape(-PI * 0.4, a.arm_swing_duration);
        anim.blink.rate_per_second = a.blink_rate_per_second;
        anim.blink.speed = a.blink_speed;
    }

    if fired_by.contains(&entity) {
        anim.arm_swing.trigger();
    }
    anim.observe_jump(body.state.has_jumped);

    let moving = body.state.horizontal_velocity.length_squared() > 1e-4;
    let swing = anim.walk.tick(dt, moving, ctx.settings.animation.walk_cycle_speed);
    let bob = anim.jump_bob.advance(dt);
    let reach = anim.arm_swing.advance(dt);
    let eye_scale = anim.blink.tick(dt, &mut thread_rng());

    for mut root in &mut ctx.roots {
        root.translation.y = bob;
    }

    for (limb, mut tf) in &mut ctx.limbs {
        let mut angle = swing * limb.phase_sign();
        if *limb == Limb::RightArm && anim.arm_swing.is_active() {
            angle = reach;
        }
        tf.rotation = Quat::from_rotation_x(angle);
    }

    for mut tf in &mut ctx.eyes {
        tf.scale.y = eye_scale.max(0.05);
    }
}
