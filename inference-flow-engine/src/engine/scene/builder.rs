//! Builds the stage from the resolved layout: region shells, the tagged
//! refinement-unit ring, the ground grid, the travel paths, the tour rails,
//! and the viewer camera's starting pose. Runs once on entering
//! `SceneReady`, then hands the app over to `Running`.

use bevy::prelude::*;
use std::f32::consts::TAU;

use constants::camera_settings::{OVERVIEW_OFFSET, OVERVIEW_PRESET};
use constants::pipeline_settings::RAR_UNIT_COUNT;
use constants::scene_settings::{
    RAR_CORE, REGION_EMISSIVE_BASELINE, REGION_ORDER, REGION_PALETTE, UNIT_MARKER_RADIUS,
    UNIT_TAG,
};
use constants::tour_settings::PATH_TENSION;

use crate::engine::assets::stage_map::ResolvedStageMap;
use crate::engine::camera::flight_camera::FlightCamera;
use crate::engine::camera::tour_director::TourDirector;
use crate::engine::core::app_state::AppState;
use crate::engine::path::{PathCurve, PipelinePaths};
use crate::engine::scene::grid::create_ground_grid;
use crate::engine::scene::registry::{EmissiveSurface, SceneGroup, SceneNode, SceneRegistry};

/// Marker on spawned region shell entities.
#[derive(Component)]
pub struct RegionShell;

/// Marker on the refinement-unit orbs.
#[derive(Component)]
pub struct UnitMarker {
    pub index: usize,
}

pub fn build_stage_scene(
    mut commands: Commands,
    map: Res<ResolvedStageMap>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let map = &map.0;
    let mut registry = SceneRegistry::default();

    for (order, name) in REGION_ORDER.iter().enumerate() {
        let Some(region) = map.region(name) else {
            warn!("stage map has no {name} region, skipping");
            continue;
        };
        let center = region.center();
        let (r, g, b) = REGION_PALETTE[order];
        let baseline = LinearRgba::rgb(r, g, b) * REGION_EMISSIVE_BASELINE;
        let material = materials.add(StandardMaterial {
            base_color: Color::srgba(r, g, b, 0.55),
            emissive: baseline,
            alpha_mode: AlphaMode::Blend,
            ..default()
        });

        let mesh = if *name == RAR_CORE {
            meshes.add(Torus::new(region.size * 0.12, region.size))
        } else {
            meshes.add(Cuboid::new(region.size, region.size * 0.6, region.size))
        };
        commands.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(center),
            RegionShell,
        ));

        let mut nodes = vec![SceneNode::Emissive(EmissiveSurface::new(material, baseline))];

        if *name == RAR_CORE {
            nodes.extend(spawn_unit_ring(
                &mut commands,
                &mut meshes,
                &mut materials,
                center,
                map.rar_ring_radius,
            ));
        }

        registry.insert_group(*name, SceneGroup { nodes });
    }

    let stage_center = map.center();
    create_ground_grid(&mut commands, stage_center, &mut meshes, &mut materials);

    let main_points = map.main_path_points();
    let ring_points = ring_points(
        map.region_position(RAR_CORE).unwrap_or(stage_center),
        map.rar_ring_radius * 1.5,
        8,
    );
    match (
        PathCurve::closed(main_points, PATH_TENSION),
        PathCurve::closed(ring_points, PATH_TENSION),
    ) {
        (Some(main), Some(rar_ring)) => {
            commands.insert_resource(PipelinePaths { main, rar_ring });
        }
        _ => warn!("stage layout too sparse for travel paths, pipeline stays idle"),
    }

    if let Some(tour) = TourDirector::from_stage_map(map) {
        commands.insert_resource(tour);
    } else {
        warn!("stage layout too sparse for a tour");
    }

    commands.insert_resource(registry);
    commands.insert_resource(FlightCamera::new(
        stage_center + OVERVIEW_OFFSET,
        stage_center,
    ));

    println!(
        "=== STAGE BUILT: {} regions, {} focus presets ===",
        map.regions.len(),
        map.regions.len() + 1
    );
    info!("focus presets: 0={OVERVIEW_PRESET}, 1..={:?}", REGION_ORDER);
    next_state.set(AppState::Running);
}

/// Spawns the sixteen tagged unit markers in a ring inside the refinement
/// core and returns their registry nodes.
fn spawn_unit_ring(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    center: Vec3,
    radius: f32,
) -> Vec<SceneNode> {
    let mesh = meshes.add(Sphere::new(UNIT_MARKER_RADIUS));
    let baseline = LinearRgba::rgb(0.85, 0.45, 0.95) * 0.3;
    (0..RAR_UNIT_COUNT)
        .map(|index| {
            let angle = TAU * index as f32 / RAR_UNIT_COUNT as f32;
            let offset = Vec3::new(angle.cos() * radius, 0.6, angle.sin() * radius);
            let material = materials.add(StandardMaterial {
                base_color: Color::srgb(0.9, 0.7, 1.0),
                emissive: baseline,
                ..default()
            });
            commands.spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(center + offset),
                UnitMarker { index },
            ));
            SceneNode::Tagged {
                tag: UNIT_TAG.to_string(),
                index,
                surface: EmissiveSurface::new(material, baseline),
            }
        })
        .collect()
}

/// Evenly spaced control points on a horizontal circle.
fn ring_points(center: Vec3, radius: f32, count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            center + Vec3::new(angle.cos() * radius, 0.8, angle.sin() * radius)
        })
        .collect()
}

/// Viewer entities that exist for the whole session: the render camera and
/// key light.
pub fn setup_viewer(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-2.5, 24.0, 38.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            illuminance: 9_000.0,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}
