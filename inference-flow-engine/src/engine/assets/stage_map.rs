//! Stage layout manifest.
//!
//! The layout of the named regions is data: a JSON asset mirroring
//! `StageMap` exactly, loaded through `bevy_common_assets`. A bundled copy
//! is compiled in so a missing or unparseable asset degrades to the default
//! layout instead of an error.

use bevy::asset::LoadState;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use constants::scene_settings::{REGION_ORDER, REGION_SIZE_DEFAULT};

use crate::engine::core::app_state::AppState;

/// One named scene region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionEntry {
    pub name: String,
    pub position: [f32; 3],
    #[serde(default = "default_region_size")]
    pub size: f32,
}

fn default_region_size() -> f32 {
    REGION_SIZE_DEFAULT
}

impl RegionEntry {
    pub fn center(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Complete stage layout as a Bevy asset. Mirrors the JSON structure.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath)]
pub struct StageMap {
    pub regions: Vec<RegionEntry>,
    /// Radius of the unit-marker ring inside the refinement core.
    pub rar_ring_radius: f32,
}

impl StageMap {
    pub fn region(&self, name: &str) -> Option<&RegionEntry> {
        self.regions.iter().find(|region| region.name == name)
    }

    pub fn region_position(&self, name: &str) -> Option<Vec3> {
        self.region(name).map(RegionEntry::center)
    }

    /// Ordered control points of the main travel path: one per region, in
    /// pipeline order. Regions missing from the manifest are skipped.
    pub fn main_path_points(&self) -> Vec<Vec3> {
        REGION_ORDER
            .iter()
            .filter_map(|name| self.region_position(name))
            .collect()
    }

    pub fn center(&self) -> Vec3 {
        if self.regions.is_empty() {
            return Vec3::ZERO;
        }
        let sum: Vec3 = self.regions.iter().map(RegionEntry::center).sum();
        sum / self.regions.len() as f32
    }

    /// Layout shipped with the binary, used when no asset is present.
    pub fn bundled() -> Self {
        match serde_json::from_str(include_str!("../../../assets/stage_map.json")) {
            Ok(map) => map,
            Err(err) => {
                warn!("bundled stage map failed to parse ({err}), using generated layout");
                Self::generated()
            }
        }
    }

    /// Minimal generated layout: regions on a horseshoe arc around the
    /// origin.
    fn generated() -> Self {
        let count = REGION_ORDER.len();
        let regions = REGION_ORDER
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let angle = std::f32::consts::PI * (0.15 + 0.7 * i as f32 / (count - 1) as f32);
                RegionEntry {
                    name: (*name).to_string(),
                    position: [angle.cos() * 22.0, 1.5, -angle.sin() * 22.0],
                    size: REGION_SIZE_DEFAULT,
                }
            })
            .collect();
        Self {
            regions,
            rar_ring_radius: 4.0,
        }
    }
}

/// Polls the stage-map asset and resolves it into a plain resource, falling
/// back to the bundled layout when loading fails.
#[derive(Resource, Default)]
pub struct StageMapLoader {
    handle: Option<Handle<StageMap>>,
}

/// The resolved layout the rest of the app reads.
#[derive(Resource, Debug, Clone)]
pub struct ResolvedStageMap(pub StageMap);

pub fn resolve_stage_map(
    mut loader: ResMut<StageMapLoader>,
    asset_server: Res<AssetServer>,
    maps: Res<Assets<StageMap>>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(handle) = loader.handle.clone() else {
        info!("loading stage map asset");
        loader.handle = Some(asset_server.load("stage_map.json"));
        return;
    };

    if let Some(map) = maps.get(&handle) {
        info!("stage map loaded: {} regions", map.regions.len());
        commands.insert_resource(ResolvedStageMap(map.clone()));
        next_state.set(AppState::SceneReady);
    } else if matches!(
        asset_server.get_load_state(handle.id()),
        Some(LoadState::Failed(_))
    ) {
        warn!("stage map asset unavailable, using bundled layout");
        commands.insert_resource(ResolvedStageMap(StageMap::bundled()));
        next_state.set(AppState::SceneReady);
    }
}
