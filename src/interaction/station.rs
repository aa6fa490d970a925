//! Portfolio stations: the interactables placed in the scene, the probe
//! system that targets them and their hover/pop feedback.

use bevy::prelude::*;

use crate::anim::{Ease, PingPong, Tween};
use crate::avatar::{Avatar, AvatarIntent, KinematicBody};
use crate::interaction::{probe, Bounds, InteractableRef, InteractionTrigger};
use crate::settings::Settings;

const HOVER_SCALE: f32 = 1.1;
const HOVER_TWEEN_SECONDS: f32 = 0.3;
const POP_EXTRA_SCALE: f32 = 0.3;
const POP_HALF_SECONDS: f32 = 0.2;

/// An interactive station opening a portfolio section.
#[derive(Component, Debug, Clone)]
pub struct Station {
    pub title: String,
    /// Portfolio section id shown when the station is used.
    pub section: String,
    /// Bounds relative to the station's translation.
    pub bounds: Bounds,
    pub enabled: bool,
    /// Position in the candidate list; lower wins equal-distance ties.
    pub order: u32,
    pub hovered: bool,
}

impl Station {
    #[must_use]
    pub fn new(title: impl Into<String>, section: impl Into<String>, order: u32) -> Self {
        Self {
            title: title.into(),
            section: section.into(),
            bounds: Bounds::Sphere { center: Vec3::new(0.0, 1.0, 0.0), radius: 1.2 },
            enabled: true,
            order,
            hovered: false,
        }
    }
}

/// Glowing orb above a station; spins and pulses.
#[derive(Component, Debug, Clone)]
pub struct StationGlow {
    pub material: Handle<StandardMaterial>,
    pub base: LinearRgba,
}

/// Scale feedback for hover and interaction.
#[derive(Component, Debug, Clone, Copy)]
pub struct StationFeedback {
    pub hover: Tween,
    pub pop: PingPong,
}

impl Default for StationFeedback {
    fn default() -> Self {
        Self {
            hover: Tween::at(1.0),
            pop: PingPong::new(POP_EXTRA_SCALE, POP_HALF_SECONDS, Ease::QuadOut, Ease::QuadIn),
        }
    }
}

impl StationFeedback {
    /// Tween towards the hovered or resting scale.
    pub fn set_hovered(&mut self, hovered: bool) {
        let to = if hovered { HOVER_SCALE } else { 1.0 };
        self.hover.retarget(to, HOVER_TWEEN_SECONDS, Ease::BackOut);
    }

    /// Advance both animations and return the station's uniform scale.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.hover.advance(dt) + self.pop.advance(dt)
    }
}

/// Fired once per interact press that lands on a station.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interacted {
    pub target: Entity,
    pub actor: Entity,
}

/// Station the avatar's eye ray currently rests on.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTarget(pub Option<Entity>);

/// Gather the stations as probe candidates in their configured order.
#[must_use]
pub fn station_candidates<'a>(
    stations: impl Iterator<Item = (Entity, &'a Station, &'a Transform)>,
) -> Vec<InteractableRef<Entity>> {
    let mut ordered: Vec<_> = stations.collect();
    ordered.sort_by_key(|(_, station, _)| station.order);
    ordered
        .into_iter()
        .map(|(entity, station, tf)| InteractableRef {
            key: entity,
            bounds: station.bounds.translated(tf.translation),
            enabled: station.enabled,
        })
        .collect()
}

/// Probe from the avatar's post-move position and fire `Interacted` on an
/// interact press edge.
#[allow(clippy::needless_pass_by_value)]
pub fn interaction_probe(
    settings: Res<Settings>,
    mut target: ResMut<ProbeTarget>,
    mut events: EventWriter<Interacted>,
    mut avatars: Query<(Entity, &AvatarIntent, &KinematicBody, &mut InteractionTrigger), With<Avatar>>,
    stations: Query<(Entity, &Station, &Transform)>,
) {
    let candidates = station_candidates(stations.iter());
    let range = &settings.interaction;

    let mut current = None;
    for (actor, intent, body, mut trigger) in &mut avatars {
        let hit = probe(body.state.position, body.forward(), &candidates, range.max_range, range.eye_offset)
            .map(|c| c.key);
        current = current.or(hit);
        if let Some(target) = trigger.update(intent.0.interact_requested, hit) {
            events.send(Interacted { target, actor });
        }
    }

    if target.0 != current {
        target.0 = current;
    }
}

/// Flip hover state by horizontal distance to the avatar.
#[allow(clippy::needless_pass_by_value)]
pub fn station_hover(
    settings: Res<Settings>,
    avatars: Query<&KinematicBody, With<Avatar>>,
    mut stations: Query<(&mut Station, &mut StationFeedback, &Transform)>,
) {
    let Ok(body) = avatars.get_single() else { return };
    let avatar = body.state.position.xz();
    let reach = settings.interaction.hover_distance;

    for (mut station, mut feedback, tf) in &mut stations {
        let hovered = station.enabled && avatar.distance(tf.translation.xz()) <= reach;
        if hovered != station.hovered {
            station.hovered = hovered;
            feedback.set_hovered(hovered);
        }
    }
}

/// Apply the pop on interaction, then scale, spin and pulse every station.
///
/// An `Interacted` whose target no longer exists is dropped silently.
#[allow(clippy::needless_pass_by_value)]
pub fn station_feedback(
    time: Res<Time>,
    dt: Res<crate::avatar::FrameDelta>,
    mut interactions: EventReader<Interacted>,
    mut stations: Query<(&Station, &mut StationFeedback, &mut Transform), Without<StationGlow>>,
    mut glows: Query<(&Parent, &StationGlow, &mut Transform), Without<Station>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for ev in interactions.read() {
        if let Ok((_, mut feedback, _)) = stations.get_mut(ev.target) {
            feedback.pop.trigger();
        }
    }

    for (_, mut feedback, mut tf) in &mut stations {
        tf.scale = Vec3::splat(feedback.advance(dt.0));
    }

    let t = time.elapsed_seconds();
    for (parent, glow, mut tf) in &mut glows {
        let hovered = stations.get(parent.get()).is_ok_and(|(s, _, _)| s.hovered);
        tf.rotation = Quat::from_euler(EulerRot::YXZ, t * 0.6, 0.0, t * 0.3);
        tf.scale = Vec3::splat(1.0 + 0.05 * (t * 2.0).sin());
        let boost = if hovered { 3.0 } else { 1.0 };
        if let Some(material) = materials.get_mut(&glow.material) {
            material.emissive = glow.base * boost;
        }
    }
}
