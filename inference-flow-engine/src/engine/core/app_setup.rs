//! Application construction: plugins, resources, events, and the system
//! schedule for every lifecycle state.

use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use constants::pipeline_settings::PIPELINE_SEED;

use crate::engine::assets::stage_map::{StageMap, StageMapLoader, resolve_stage_map};
use crate::engine::camera::flight_camera::camera_controller;
use crate::engine::camera::tour_director::tour_system;
use crate::engine::core::app_state::AppState;
use crate::engine::core::window_config::create_window_config;
use crate::engine::particles::{ParticlePool, spawn_particle_pool, sync_particle_visuals};
use crate::engine::pipeline::orchestrator::{
    PhaseChanged, PipelineOrchestrator, RunCompleted, pipeline_driver,
};
use crate::engine::scene::builder::{build_stage_scene, setup_viewer};
use crate::engine::scene::registry::{SceneRegistry, apply_registry_emissive};
use crate::engine::systems::hud::{
    fps_text_update_system, phase_text_update, rar_text_update, spawn_hud, tour_text_update,
};
use crate::tools::playback::playback_controls;
use crate::tools::view_presets::view_controls;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(JsonAssetPlugin::<StageMap>::new(&["json"]))
        .init_state::<AppState>()
        .add_event::<PhaseChanged>()
        .add_event::<RunCompleted>()
        .init_resource::<StageMapLoader>()
        .init_resource::<ParticlePool>()
        .init_resource::<SceneRegistry>()
        .insert_resource(PipelineOrchestrator::new(PIPELINE_SEED))
        .add_systems(Startup, (setup_viewer, spawn_particle_pool, spawn_hud))
        .add_systems(
            Update,
            resolve_stage_map.run_if(in_state(AppState::Loading)),
        )
        .add_systems(OnEnter(AppState::SceneReady), build_stage_scene)
        .add_systems(
            Update,
            (
                playback_controls,
                view_controls,
                tour_system,
                pipeline_driver,
                camera_controller,
                apply_registry_emissive,
                sync_particle_visuals,
            )
                .chain()
                .run_if(in_state(AppState::Running)),
        )
        .add_systems(
            Update,
            (
                phase_text_update,
                rar_text_update,
                tour_text_update,
                fps_text_update_system,
            )
                .run_if(in_state(AppState::Running)),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
