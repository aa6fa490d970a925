//! Ambient scenery: a few stylised trees and a ring of clouds.
use bevy::prelude::*;
use rand::Rng;

pub const TREE_POSITIONS: [(f32, f32); 5] = [(10.0, 10.0), (-8.0, 12.0), (15.0, -5.0), (-12.0, -8.0), (5.0, -15.0)];

/// Randomised cloud placement: `(position, size)` on a ring 30..50 units out
/// and 15..25 units up.
pub fn cloud_layout<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<(Vec3, f32)> {
    (0..count)
        .map(|_| {
            let radius = rng.gen_range(30.0..50.0);
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let height = rng.gen_range(15.0..25.0);
            let size = rng.gen_range(1.0..3.0);
            (Vec3::new(angle.cos() * radius, height, angle.sin() * radius), size)
        })
        .collect()
}

#[allow(clippy::needless_pass_by_value)]
pub fn spawn_scenery(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let trunk_mesh = meshes.add(Cylinder::new(0.4, 2.5));
    let leaves_mesh = meshes.add(Sphere::new(2.0).mesh().ico(0).unwrap_or_else(|_| Sphere::new(2.0).into()));
    let trunk = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.27, 0.07),
        perceptual_roughness: 0.9,
        ..default()
    });
    let leaves = materials.add(StandardMaterial {
        base_color: Color::srgb(0.18, 0.55, 0.34),
        perceptual_roughness: 0.8,
        ..default()
    });

    for (x, z) in TREE_POSITIONS {
        commands
            .spawn(SpatialBundle::from_transform(Transform::from_xyz(x, 0.0, z)))
            .with_children(|tree| {
                tree.spawn(PbrBundle {
                    mesh: trunk_mesh.clone(),
                    material: trunk.clone(),
                    transform: Transform::from_xyz(0.0, 1.25, 0.0),
                    ..default()
                });
                tree.spawn(PbrBundle {
                    mesh: leaves_mesh.clone(),
                    material: leaves.clone(),
                    transform: Transform::from_xyz(0.0, 3.5, 0.0).with_scale(Vec3::new(1.0, 1.5, 1.0)),
                    ..default()
                });
            });
    }

    let puff = meshes.add(Sphere::new(1.0));
    let cloud = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.9),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.9,
        ..default()
    });
    // Centre puff plus four smaller ones around it.
    let puffs = [(0.0, 0.0, 1.0), (0.8, 0.0, 0.6), (-0.8, 0.0, 0.6), (0.0, 0.7, 0.7), (0.0, -0.7, 0.7)];

    for (position, size) in cloud_layout(&mut rand::thread_rng(), 15) {
        commands
            .spawn(SpatialBundle::from_transform(Transform::from_translation(position)))
            .with_children(|c| {
                for (ox, oz, scale) in puffs {
                    c.spawn(PbrBundle {
                        mesh: puff.clone(),
                        material: cloud.clone(),
                        transform: Transform::from_xyz(ox * size, 0.0, oz * size).with_scale(Vec3::splat(scale * size)),
                        ..default()
                    });
                }
            });
    }
}
