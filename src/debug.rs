//! Debug dump (F3 by default): writes a timestamped snapshot of the avatar,
//! camera rig and stations to `./debug-dumps/`.
//!
//! Handy for reporting "the camera jumped here" style problems without a
//! debugger attached: the dump holds the exact numbers the core was working
//! with on that frame.
use crate::avatar::{Avatar, KinematicBody};
use crate::camera::CameraRig;
use crate::interaction::{ProbeTarget, Station};
use crate::settings::Settings;
use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::fs;

pub const DUMP_DIR: &str = "debug-dumps";

pub struct DebugDumpPlugin;

impl Plugin for DebugDumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, debug_input_system);
    }
}

/// One station as it appears in a dump.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSnapshot {
    pub title: String,
    pub section: String,
    pub position: Vec3,
    pub enabled: bool,
    pub hovered: bool,
    pub targeted: bool,
}

/// Everything a dump reports, gathered from the world first so the
/// formatting can be tested without an app.
#[derive(Debug, Clone, Default)]
pub struct DebugSnapshot {
    pub fps: f64,
    pub frame_time: f64,
    pub entities: usize,
    pub avatar: Option<KinematicBody>,
    pub rig: Option<CameraRig>,
    pub stations: Vec<StationSnapshot>,
}

impl DebugSnapshot {
    /// Render the dump body.
    #[must_use]
    pub fn snapshot_text(&self, timestamp: &DateTime<Utc>) -> String {
        let mut out = String::new();
        writeln!(out, "Debug dump: {}", timestamp.format("%Y-%m-%d %H:%M:%S")).ok();
        writeln!(out, "FPS: {:.1}, frame_time: {:.4} ms", self.fps, self.frame_time * 1000.0).ok();
        writeln!(out, "Entities: {}", self.entities).ok();

        writeln!(out, "\nAvatar:").ok();
        if let Some(body) = &self.avatar {
            let s = &body.state;
            writeln!(out, "  position: ({:.3}, {:.3}, {:.3})", s.position.x, s.position.y, s.position.z).ok();
            writeln!(out, "  horizontal_velocity: ({:.3}, {:.3})", s.horizontal_velocity.x, s.horizontal_velocity.y).ok();
            writeln!(out, "  vertical_velocity: {:.3}", s.vertical_velocity).ok();
            writeln!(out, "  grounded: {} has_jumped: {}", s.grounded, s.has_jumped).ok();
            writeln!(out, "  facing: {:.4} rad", s.facing).ok();
        } else {
            writeln!(out, "  (none)").ok();
        }

        writeln!(out, "\nCamera rig:").ok();
        if let Some(rig) = &self.rig {
            writeln!(out, "  mode: {}", rig.mode().label()).ok();
            writeln!(out, "  polar: {:.4} azimuth: {:.4}", rig.state.polar_angle, rig.state.azimuth_angle).ok();
            writeln!(out, "  dragging: {} debug_orbit: {}", rig.state.dragging, rig.debug_orbit_enabled()).ok();
        } else {
            writeln!(out, "  (none)").ok();
        }

        writeln!(out, "\nStations:").ok();
        if self.stations.is_empty() {
            writeln!(out, "  (none)").ok();
        }
        for st in &self.stations {
            writeln!(
                out,
                "  {} [{}] at ({:.2}, {:.2}, {:.2}) enabled={} hovered={}{}",
                st.title,
                st.section,
                st.position.x,
                st.position.y,
                st.position.z,
                st.enabled,
                st.hovered,
                if st.targeted { " <- target" } else { "" }
            )
            .ok();
        }
        out
    }
}

#[derive(bevy::ecs::system::SystemParam)]
pub struct DebugDumpCtx<'w, 's> {
    pub settings: Res<'w, Settings>,
    pub keys: Res<'w, ButtonInput<KeyCode>>,
    pub diagnostics: Res<'w, DiagnosticsStore>,
    pub probe: Res<'w, ProbeTarget>,
    pub entities: Query<'w, 's, Entity>,
    pub avatars: Query<'w, 's, &'static KinematicBody, With<Avatar>>,
    pub rigs: Query<'w, 's, &'static CameraRig>,
    pub stations: Query<'w, 's, (Entity, &'static Station, &'static Transform)>,
}

/// Write a dump when the dump key is pressed.
fn debug_input_system(ctx: DebugDumpCtx) {
    if !ctx.settings.keys_for("dump_debug").iter().any(|k| ctx.keys.just_pressed(*k)) {
        return;
    }

    let fps = ctx
        .diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);
    let frame_time = ctx
        .diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let mut stations: Vec<_> = ctx
        .stations
        .iter()
        .map(|(entity, st, tf)| {
            (
                st.order,
                StationSnapshot {
                    title: st.title.clone(),
                    section: st.section.clone(),
                    position: tf.translation,
                    enabled: st.enabled,
                    hovered: st.hovered,
                    targeted: ctx.probe.0 == Some(entity),
                },
            )
        })
        .collect();
    stations.sort_by_key(|(order, _)| *order);

    let snapshot = DebugSnapshot {
        fps,
        frame_time,
        entities: ctx.entities.iter().count(),
        avatar: ctx.avatars.get_single().ok().cloned(),
        rig: ctx.rigs.get_single().ok().cloned(),
        stations: stations.into_iter().map(|(_, s)| s).collect(),
    };

    let now: DateTime<Utc> = Utc::now();
    let fname = format!("{DUMP_DIR}/debug-{}.txt", now.format("%Y%m%d-%H%M%S"));
    let out = snapshot.snapshot_text(&now);

    if let Err(e) = fs::create_dir_all(DUMP_DIR) {
        error!("debug dump: failed to create dir '{DUMP_DIR}': {e}");
        return;
    }
    if let Err(e) = fs::write(&fname, out) {
        error!("debug dump: failed to write {fname}: {e}");
    } else {
        info!("wrote debug dump: {fname}");
    }
}
