//! Keyboard control of the viewpoint: tour toggle, manual reclaim, and
//! per-region focus presets.

use bevy::prelude::*;

use constants::camera_settings::OVERVIEW_PRESET;
use constants::scene_settings::REGION_ORDER;

use crate::engine::assets::stage_map::ResolvedStageMap;
use crate::engine::camera::flight_camera::FlightCamera;
use crate::engine::camera::tour_director::TourDirector;

const FOCUS_KEYS: [KeyCode; 8] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
];

pub fn view_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    camera: Option<ResMut<FlightCamera>>,
    mut tour: Option<ResMut<TourDirector>>,
    map: Option<Res<ResolvedStageMap>>,
) {
    let Some(mut camera) = camera else {
        return;
    };

    if keyboard.just_pressed(KeyCode::KeyT) {
        if let Some(tour) = tour.as_mut() {
            let active = tour.toggle();
            info!("tour {}", if active { "engaged" } else { "released" });
        }
    }

    if keyboard.just_pressed(KeyCode::KeyC) {
        if let Some(tour) = tour.as_mut() {
            if tour.is_active() {
                tour.stop();
            }
        }
        camera.reclaim_manual();
        info!("manual flight reclaimed");
    }

    let Some(map) = map else {
        return;
    };

    let mut focus = |name: &str, camera: &mut FlightCamera| {
        if let Some(tour) = tour.as_mut() {
            if tour.is_active() {
                tour.stop();
            }
        }
        camera.focus_on(name, &map.0);
        info!("focus: {name}");
    };

    if keyboard.just_pressed(KeyCode::Digit0) {
        focus(OVERVIEW_PRESET, &mut camera);
    }
    for (key, name) in FOCUS_KEYS.iter().zip(REGION_ORDER) {
        if keyboard.just_pressed(*key) {
            focus(name, &mut camera);
        }
    }
}
