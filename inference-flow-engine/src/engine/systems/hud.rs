//! On-screen readout: phase, refinement progress, tour progress, FPS, and
//! the controls legend.

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use constants::pipeline_settings::RAR_UNIT_COUNT;

use crate::engine::camera::tour_director::TourDirector;
use crate::engine::pipeline::orchestrator::PipelineOrchestrator;
use crate::engine::pipeline::phase::Phase;

#[derive(Component)]
pub struct PhaseText;

#[derive(Component)]
pub struct RarText;

#[derive(Component)]
pub struct TourText;

#[derive(Component)]
pub struct FpsText;

const LEGEND: &str =
    "space start · p pause · [ ] speed · o loop · esc reset · t tour · c manual · 0-8 focus";

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Phase: Idle"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.95, 1.0)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                PhaseText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.6, 0.95)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(36.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                RarText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.85, 0.95)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(58.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                TourText,
            ));
            parent.spawn((
                Text::new(LEGEND),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.6)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
            ));
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.0, 0.0)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

pub fn phase_text_update(
    orchestrator: Res<PipelineOrchestrator>,
    mut query: Query<&mut Text, With<PhaseText>>,
) {
    for mut text in &mut query {
        let paused = if orchestrator.is_paused() {
            " (paused)"
        } else {
            ""
        };
        let mode = if orchestrator.continuous() {
            "loop"
        } else {
            "one-shot"
        };
        text.0 = format!(
            "Phase: {}{paused} · x{:.2} · {mode}",
            orchestrator.state_name(),
            orchestrator.speed()
        );
    }
}

pub fn rar_text_update(
    orchestrator: Res<PipelineOrchestrator>,
    mut query: Query<&mut Text, With<RarText>>,
) {
    for mut text in &mut query {
        if orchestrator.state() != Phase::RarLoop {
            if !text.0.is_empty() {
                text.0.clear();
            }
            continue;
        }
        let sim = orchestrator.convergence();
        text.0 = format!(
            "RAR {}/{} · {}/{} converged · gamma {:.2}",
            sim.iteration(),
            sim.max_iterations(),
            sim.converged_count(),
            RAR_UNIT_COUNT,
            sim.global_gamma()
        );
    }
}

pub fn tour_text_update(
    tour: Option<Res<TourDirector>>,
    mut query: Query<&mut Text, With<TourText>>,
) {
    for mut text in &mut query {
        match &tour {
            Some(tour) if tour.is_active() => {
                text.0 = format!("Tour {:>3.0}%", tour.progress() * 100.0);
            }
            _ => {
                if !text.0.is_empty() {
                    text.0.clear();
                }
            }
        }
    }
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}
