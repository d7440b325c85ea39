/// Flat line-field grid under the stage.
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;

use constants::scene_settings::{GRID_CELL_SIZE, GRID_HALF_EXTENT};

#[derive(Component)]
pub struct GroundGrid;

/// Create the ground grid as a single line-list mesh centred on the stage.
pub fn create_ground_grid(
    commands: &mut Commands,
    center: Vec3,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    let grid_material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.12),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let line_count = (GRID_HALF_EXTENT * 2.0 / GRID_CELL_SIZE).round() as i32;
    for line in 0..=line_count {
        let offset = -GRID_HALF_EXTENT + line as f32 * GRID_CELL_SIZE;
        positions.push([offset, 0.0, -GRID_HALF_EXTENT]);
        positions.push([offset, 0.0, GRID_HALF_EXTENT]);
        positions.push([-GRID_HALF_EXTENT, 0.0, offset]);
        positions.push([GRID_HALF_EXTENT, 0.0, offset]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::LineList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(grid_material),
        Transform::from_translation(Vec3::new(center.x, 0.0, center.z)),
        GroundGrid,
    ));
}
