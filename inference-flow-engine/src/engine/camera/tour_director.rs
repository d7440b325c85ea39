//! Scripted, looping camera tour.
//!
//! Two parallel closed rails (one for the camera position, one for its
//! look-at) run above the stage regions. While active, the director
//! advances a wrapped progress scalar and re-issues a spring fly-to every
//! tick, so the camera chases the rail continuously instead of snapping
//! between waypoints.

use bevy::prelude::*;

use constants::tour_settings::{
    PATH_TENSION, TOUR_DURATION, TOUR_HEIGHT, TOUR_SPEED_DEFAULT, TOUR_SPREAD,
};

use crate::engine::assets::stage_map::StageMap;
use crate::engine::camera::flight_camera::FlightCamera;
use crate::engine::path::PathCurve;

#[derive(Resource)]
pub struct TourDirector {
    position_rail: PathCurve,
    look_rail: PathCurve,
    progress: f32,
    active: bool,
    duration: f32,
    speed: f32,
}

impl TourDirector {
    pub fn new(position_rail: PathCurve, look_rail: PathCurve) -> Self {
        Self {
            position_rail,
            look_rail,
            progress: 0.0,
            active: false,
            duration: TOUR_DURATION,
            speed: TOUR_SPEED_DEFAULT,
        }
    }

    /// Builds the rails over every region of the stage layout: elevated,
    /// pushed outward from the centre for the camera; at region height for
    /// the look-at.
    pub fn from_stage_map(map: &StageMap) -> Option<Self> {
        let waypoints = map.main_path_points();
        if waypoints.len() < 3 {
            return None;
        }
        let center = map.center();
        let position_points = waypoints
            .iter()
            .map(|point| {
                let outward = (*point - center) * TOUR_SPREAD;
                center + outward + Vec3::Y * TOUR_HEIGHT
            })
            .collect();
        let position_rail = PathCurve::closed(position_points, PATH_TENSION)?;
        let look_rail = PathCurve::closed(waypoints, PATH_TENSION)?;
        Some(Self::new(position_rail, look_rail))
    }

    pub fn start(&mut self) {
        self.active = true;
        info!("tour started");
    }

    pub fn stop(&mut self) {
        self.active = false;
        info!("tour stopped");
    }

    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current lap progress, always in [0, 1).
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Advances the lap and chases the camera spring after the rails.
    pub fn update(&mut self, dt: f32, camera: &mut FlightCamera) {
        if !self.active {
            return;
        }
        self.progress = (self.progress + dt * self.speed / self.duration).rem_euclid(1.0);
        camera.fly_to(
            self.position_rail.point_at(self.progress),
            self.look_rail.point_at(self.progress),
        );
    }
}

/// Per-frame driver while a tour exists.
pub fn tour_system(
    time: Res<Time>,
    tour: Option<ResMut<TourDirector>>,
    camera: Option<ResMut<FlightCamera>>,
) {
    let (Some(mut tour), Some(mut camera)) = (tour, camera) else {
        return;
    };
    tour.update(time.delta_secs(), &mut camera);
}
