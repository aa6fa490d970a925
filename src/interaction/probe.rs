//! Ray-based interaction probe.
//!
//! A ray leaves the actor at eye height along its facing direction and is
//! tested against every enabled candidate's bounds. The nearest hit inside
//! `max_range` wins; equal distances keep the earlier candidate.
//!
//! # Example
//!
//! ```
//! use bevy::math::Vec3;
//! use promenade::interaction::{probe, Bounds, InteractableRef};
//!
//! let kiosk = InteractableRef::new("kiosk", Bounds::Sphere { center: Vec3::new(0.0, 1.0, 2.0), radius: 0.5 });
//! let hit = probe(Vec3::ZERO, Vec3::Z, std::slice::from_ref(&kiosk), 3.0, 1.0);
//! assert_eq!(hit.map(|c| c.key), Some("kiosk"));
//! ```

use bevy::math::bounding::{Aabb3d, BoundingSphere, RayCast3d};
use bevy::math::{Dir3, Ray3d, Vec3};

/// Hit-test geometry of an interactable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    Sphere { center: Vec3, radius: f32 },
    Aabb { center: Vec3, half_size: Vec3 },
}

impl Bounds {
    /// The same shape moved by `offset`.
    #[must_use]
    pub fn translated(self, offset: Vec3) -> Self {
        match self {
            Bounds::Sphere { center, radius } => Bounds::Sphere { center: center + offset, radius },
            Bounds::Aabb { center, half_size } => Bounds::Aabb { center: center + offset, half_size },
        }
    }

    /// Distance along `ray` to the first intersection, if any.
    #[must_use]
    pub fn ray_distance(&self, ray: &RayCast3d) -> Option<f32> {
        match *self {
            Bounds::Sphere { center, radius } => ray.sphere_intersection_at(&BoundingSphere::new(center, radius)),
            Bounds::Aabb { center, half_size } => ray.aabb_intersection_at(&Aabb3d::new(center, half_size)),
        }
    }
}

/// A candidate for the probe, keyed by whatever the caller uses to find the
/// real object again (an `Entity` in the running app).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractableRef<K> {
    pub key: K,
    pub bounds: Bounds,
    pub enabled: bool,
}

impl<K> InteractableRef<K> {
    #[must_use]
    pub fn new(key: K, bounds: Bounds) -> Self {
        Self { key, bounds, enabled: true }
    }
}

/// Find the nearest enabled candidate hit by the actor's eye ray.
///
/// # Arguments
/// * `actor_position` - feet position of the actor
/// * `actor_forward` - facing direction; a zero vector never hits
/// * `candidates` - in priority order for equal distances
/// * `max_range` - ray length
/// * `eye_offset` - height of the ray origin above `actor_position`
#[must_use]
pub fn probe<'a, K>(
    actor_position: Vec3,
    actor_forward: Vec3,
    candidates: &'a [InteractableRef<K>],
    max_range: f32,
    eye_offset: f32,
) -> Option<&'a InteractableRef<K>> {
    let direction = Dir3::new(actor_forward).ok()?;
    let ray = RayCast3d::from_ray(
        Ray3d { origin: actor_position + Vec3::Y * eye_offset, direction },
        max_range.max(0.0),
    );

    let mut best: Option<(f32, &InteractableRef<K>)> = None;
    for candidate in candidates.iter().filter(|c| c.enabled) {
        let Some(distance) = candidate.bounds.ray_distance(&ray) else { continue };
        if distance > max_range {
            continue;
        }
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, c)| c)
}

/// Edge trigger for the interact input.
///
/// A press arms the trigger. While armed and still held, the first frame
/// with a probe hit fires once and disarms; releasing disarms as well. A key
/// held down across many frames therefore fires at most once per press.
#[derive(bevy::prelude::Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionTrigger {
    held: bool,
    armed: bool,
}

impl InteractionTrigger {
    /// Feed this frame's input and probe result; returns the target to fire.
    pub fn update<K>(&mut self, pressed: bool, hit: Option<K>) -> Option<K> {
        if pressed && !self.held {
            self.armed = true;
        }
        if !pressed {
            self.armed = false;
        }
        self.held = pressed;

        if self.armed && hit.is_some() {
            self.armed = false;
            return hit;
        }
        None
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(z: f32, radius: f32) -> Bounds {
        Bounds::Sphere { center: Vec3::new(0.0, 1.0, z), radius }
    }

    #[test]
    fn holding_interact_fires_once_per_press() {
        let candidates = [InteractableRef::new(1u32, sphere(2.0, 0.5))];
        let mut trigger = InteractionTrigger::default();
        let mut fired = 0;
        for _ in 0..10 {
            let hit = probe(Vec3::ZERO, Vec3::Z, &candidates, 3.0, 1.0).map(|c| c.key);
            if trigger.update(true, hit).is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);

        assert_eq!(trigger.update(false, Some(1u32)), None);
        assert_eq!(trigger.update(true, Some(1u32)), Some(1));
    }

    #[test]
    fn press_before_reaching_target_fires_on_arrival() {
        let mut trigger = InteractionTrigger::default();
        assert_eq!(trigger.update::<u32>(true, None), None);
        assert!(trigger.is_armed());
        assert_eq!(trigger.update(true, Some(7u32)), Some(7));
        assert_eq!(trigger.update(true, Some(7u32)), None);
    }

    #[test]
    fn nearest_hit_wins_and_ties_keep_list_order() {
        let candidates = [
            InteractableRef::new("far", sphere(2.5, 0.3)),
            InteractableRef::new("first", sphere(1.5, 0.3)),
            InteractableRef::new("second", sphere(1.5, 0.3)),
        ];
        let hit = probe(Vec3::ZERO, Vec3::Z, &candidates, 3.0, 1.0);
        assert_eq!(hit.map(|c| c.key), Some("first"));
    }

    #[test]
    fn disabled_candidates_are_not_hit_tested() {
        let mut near = InteractableRef::new("near", sphere(1.0, 0.3));
        near.enabled = false;
        let candidates = [near, InteractableRef::new("behind", sphere(2.0, 0.3))];
        let hit = probe(Vec3::ZERO, Vec3::Z, &candidates, 3.0, 1.0);
        assert_eq!(hit.map(|c| c.key), Some("behind"));
    }

    #[test]
    fn range_and_direction_limit_hits() {
        let candidates = [InteractableRef::new((), sphere(5.0, 0.5))];
        assert!(probe(Vec3::ZERO, Vec3::Z, &candidates, 3.0, 1.0).is_none());
        assert!(probe(Vec3::ZERO, Vec3::Z, &candidates, 6.0, 1.0).is_some());
        assert!(probe(Vec3::ZERO, -Vec3::Z, &candidates, 6.0, 1.0).is_none());
        assert!(probe(Vec3::ZERO, Vec3::ZERO, &candidates, 6.0, 1.0).is_none());
    }

    #[test]
    fn boxes_are_hit_tested() {
        let crate_box = Bounds::Aabb { center: Vec3::new(2.0, 1.0, 0.0), half_size: Vec3::splat(0.5) };
        let candidates = [InteractableRef::new('b', crate_box)];
        assert!(probe(Vec3::ZERO, Vec3::X, &candidates, 3.0, 1.0).is_some());
        // Eye ray passes above a box sitting on the ground.
        let low = crate_box.translated(Vec3::new(0.0, -1.0, 0.0));
        let candidates = [InteractableRef::new('b', low.translated(Vec3::new(0.0, -0.2, 0.0)))];
        assert!(probe(Vec3::ZERO, Vec3::X, &candidates, 3.0, 1.0).is_none());
    }

    #[test]
    fn empty_candidate_list_is_a_miss() {
        let candidates: [InteractableRef<u8>; 0] = [];
        assert!(probe(Vec3::ZERO, Vec3::Z, &candidates, 3.0, 1.0).is_none());
    }
}
