//! Keyboard control of the pipeline run: start, pause, playback speed, and
//! continuous-loop mode.

use bevy::prelude::*;

use constants::pipeline_settings::SPEED_STEP_FACTOR;

use crate::engine::particles::ParticlePool;
use crate::engine::path::PipelinePaths;
use crate::engine::pipeline::orchestrator::PipelineOrchestrator;
use crate::engine::scene::registry::SceneRegistry;

pub fn playback_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut orchestrator: ResMut<PipelineOrchestrator>,
    mut pool: ResMut<ParticlePool>,
    mut registry: ResMut<SceneRegistry>,
    paths: Option<Res<PipelinePaths>>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        if let Some(paths) = &paths {
            orchestrator.start(&mut pool, paths);
        }
    }

    if keyboard.just_pressed(KeyCode::KeyP) {
        let paused = orchestrator.toggle_pause();
        info!("pipeline {}", if paused { "paused" } else { "resumed" });
    }

    if keyboard.just_pressed(KeyCode::BracketRight) {
        let speed = orchestrator.speed() * SPEED_STEP_FACTOR;
        orchestrator.set_speed(speed);
        info!("playback speed x{:.2}", orchestrator.speed());
    }

    if keyboard.just_pressed(KeyCode::BracketLeft) {
        let speed = orchestrator.speed() / SPEED_STEP_FACTOR;
        orchestrator.set_speed(speed);
        info!("playback speed x{:.2}", orchestrator.speed());
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        orchestrator.dispose(&mut pool, &mut registry);
        info!("pipeline reset");
    }

    if keyboard.just_pressed(KeyCode::KeyO) {
        let continuous = !orchestrator.continuous();
        orchestrator.set_continuous(continuous);
        info!(
            "pipeline mode: {}",
            if continuous { "continuous" } else { "one-shot" }
        );
    }
}
