//! Startup system building the scene.
//!
//! Spawns lights, the ground, the avatar, one station per portfolio section
//! that has a placement, and the camera. Ambient scenery lives in
//! `app::scenery`.
use bevy::pbr::{FogFalloff, FogSettings};
use bevy::prelude::*;
use promenade::avatar::{spawn_avatar_visual, Avatar, AvatarAnimation, AvatarIntent, BodyParams, KinematicBody};
use promenade::camera::{CameraRig, CameraTarget, DebugOrbit, RigParams};
use promenade::interaction::{InteractionTrigger, StationFeedback, StationGlow};
use promenade::portfolio::{Portfolio, PortfolioSection};
use promenade::settings::Settings;

pub const SKY_COLOR: Color = Color::srgb(0.53, 0.81, 0.92);

/// Spawn the static scene, the avatar and the camera.
///
/// # Arguments
/// - `commands`: Commands used to spawn entities and insert resources.
/// - `meshes`, `materials`: asset storage for the procedural meshes.
/// - `settings`: tuning for the avatar body and camera rig.
/// - `portfolio`: sections to place stations for.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
    portfolio: Res<Portfolio>,
) {
    commands.insert_resource(ClearColor(SKY_COLOR));
    commands.insert_resource(AmbientLight { color: Color::WHITE, brightness: 400.0 });

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight { shadows_enabled: true, illuminance: 9000.0, ..default() },
        transform: Transform::from_xyz(5.0, 10.0, 7.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            shadows_enabled: false,
            illuminance: 2500.0,
            color: Color::srgb(0.56, 0.78, 1.0),
            ..default()
        },
        transform: Transform::from_xyz(-5.0, 3.0, -5.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    commands.spawn(PbrBundle {
        mesh: meshes.add(Plane3d::default().mesh().size(60.0, 60.0)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.49, 0.73, 0.48),
            perceptual_roughness: 0.8,
            ..default()
        }),
        transform: Transform::from_xyz(0.0, settings.avatar.ground_level, 0.0),
        ..default()
    });

    let spawn = Vec3::new(0.0, settings.avatar.ground_level, 0.0);
    let body = KinematicBody::new(spawn, 0.0, BodyParams::from(&settings.avatar));
    let target = CameraTarget { position: body.state.position, facing: body.state.facing };
    commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_translation(body.state.position)),
            Avatar,
            AvatarIntent::default(),
            InteractionTrigger::default(),
            AvatarAnimation::from_settings(&settings.animation),
            body,
        ))
        .with_children(|parent| spawn_avatar_visual(parent, &mut meshes, &mut materials));

    for section in portfolio.sections() {
        spawn_station(&mut commands, &mut meshes, &mut materials, section);
    }

    let params = RigParams::from_settings(&settings.camera, settings.controls.mouse_sensitivity);
    let mut rig = CameraRig::new(params, &settings.camera, Vec3::ZERO);
    let start = rig.desired_position(&target);
    rig.sync_position(start);
    let look_at = target.position + Vec3::Y * params.look_height;

    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(start).looking_at(look_at, Vec3::Y),
            ..default()
        },
        FogSettings {
            color: SKY_COLOR,
            falloff: FogFalloff::Exponential { density: 0.02 },
            ..default()
        },
        rig,
        DebugOrbit::default(),
    ));
}

/// Spawn the station for `section`, if it has a placement.
fn spawn_station(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    section: &PortfolioSection,
) {
    let (Some(place), Some(station)) = (section.station, section.station()) else { return };
    let accent = section.accent();
    let (x, y, z) = place.position;

    let base = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 0.2, 0.2),
        metallic: 0.5,
        perceptual_roughness: 0.7,
        ..default()
    });
    let stand = materials.add(StandardMaterial {
        base_color: Color::srgb(0.4, 0.4, 0.4),
        metallic: 0.7,
        perceptual_roughness: 0.5,
        ..default()
    });
    let glow_base = LinearRgba::from(accent) * 0.5;
    let glow = materials.add(StandardMaterial {
        base_color: accent,
        emissive: glow_base,
        metallic: 0.8,
        perceptual_roughness: 0.3,
        ..default()
    });
    let panel = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.7),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    commands
        .spawn((
            SpatialBundle::from_transform(
                Transform::from_xyz(x, y, z).with_rotation(Quat::from_rotation_y(place.yaw)),
            ),
            station,
            StationFeedback::default(),
        ))
        .with_children(|station| {
            station.spawn(PbrBundle {
                mesh: meshes.add(Cylinder::new(0.8, 0.2)),
                material: base,
                transform: Transform::from_xyz(0.0, 0.1, 0.0),
                ..default()
            });
            station.spawn(PbrBundle {
                mesh: meshes.add(Cylinder::new(0.1, 1.2)),
                material: stand,
                transform: Transform::from_xyz(0.0, 0.7, 0.0),
                ..default()
            });
            station.spawn((
                PbrBundle {
                    mesh: meshes.add(Sphere::new(0.3)),
                    material: glow.clone(),
                    transform: Transform::from_xyz(0.0, 1.4, 0.0),
                    ..default()
                },
                StationGlow { material: glow, base: glow_base },
            ));
            station.spawn(PbrBundle {
                mesh: meshes.add(Rectangle::new(2.0, 0.5)),
                material: panel,
                transform: Transform::from_xyz(0.0, 1.8, 0.0)
                    .with_rotation(Quat::from_rotation_x(-std::f32::consts::PI / 12.0)),
                ..default()
            });
        });
}
