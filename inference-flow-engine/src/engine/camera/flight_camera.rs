//! Dual-mode viewer camera.
//!
//! Manual mode is free 6DOF flight: mouse-drag look with a clamped pitch,
//! damped velocity from directional keys, scroll-tuned speed. Spring mode is
//! entered by `fly_to` and chases a target position and look-at with
//! exponential-decay interpolation; it never hands control back on its own.
//! Reclaiming manual flight is an explicit user action.

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use constants::camera_settings::{
    FLY_SPEED_DEFAULT, FLY_SPEED_MAX, FLY_SPEED_MIN, FOCUS_OFFSET, OVERVIEW_OFFSET,
    OVERVIEW_PRESET, PITCH_LIMIT, PITCH_SENSITIVITY, SCROLL_SPEED_STEP, SPRING_STIFFNESS,
    VELOCITY_DAMPING, YAW_SENSITIVITY,
};

use crate::engine::assets::stage_map::StageMap;

/// Exclusive camera modes: manual input only moves the camera in `Manual`,
/// spring motion only runs in `Spring`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Manual,
    Spring,
}

#[derive(Resource)]
pub struct FlightCamera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    velocity: Vec3,
    rotation: Quat,
    mode: CameraMode,
    spring_target: Vec3,
    spring_look_at: Vec3,
    stiffness: f32,
    move_speed: f32,
}

impl FlightCamera {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        let rotation = Transform::from_translation(position)
            .looking_at(look_at, Vec3::Y)
            .rotation;
        let (yaw, pitch, _) = rotation.to_euler(EulerRot::YXZ);
        Self {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            velocity: Vec3::ZERO,
            rotation,
            mode: CameraMode::Manual,
            spring_target: position,
            spring_look_at: look_at,
            stiffness: SPRING_STIFFNESS,
            move_speed: FLY_SPEED_DEFAULT,
        }
    }

    /// Mouse-drag look. Honoured in manual mode only.
    pub fn apply_look(&mut self, delta: Vec2) {
        if self.mode != CameraMode::Manual {
            return;
        }
        self.yaw -= delta.x * YAW_SENSITIVITY;
        self.pitch = (self.pitch - delta.y * PITCH_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Directional flight input in camera-local axes (x right, y world up,
    /// z back). Accumulates into the damped velocity. Manual mode only.
    pub fn apply_move(&mut self, input: Vec3, dt: f32) {
        if self.mode != CameraMode::Manual || input == Vec3::ZERO {
            return;
        }
        let planar = self.rotation * Vec3::new(input.x, 0.0, input.z);
        let world = (planar + Vec3::Y * input.y).normalize_or_zero();
        self.velocity += world * self.move_speed * dt;
    }

    /// Scroll wheel tunes the manual flight speed inside a clamped range.
    pub fn adjust_speed(&mut self, scroll: f32) {
        if scroll == 0.0 {
            return;
        }
        let factor = SCROLL_SPEED_STEP.powf(scroll);
        self.move_speed = (self.move_speed * factor).clamp(FLY_SPEED_MIN, FLY_SPEED_MAX);
    }

    /// Starts a spring flight towards `target`, oriented at `look_at`.
    /// Cancels manual control; a later call simply redefines the target.
    pub fn fly_to(&mut self, target: Vec3, look_at: Vec3) {
        self.mode = CameraMode::Spring;
        self.velocity = Vec3::ZERO;
        self.spring_target = target;
        self.spring_look_at = look_at;
    }

    /// Flies to a named preset resolved from the stage layout. Unknown
    /// names are ignored.
    pub fn focus_on(&mut self, name: &str, map: &StageMap) {
        let Some((position, look_at)) = resolve_focus(name, map) else {
            return;
        };
        self.fly_to(position, look_at);
    }

    /// Hands control back to manual flight, keeping the current pose.
    pub fn reclaim_manual(&mut self) {
        if self.mode == CameraMode::Manual {
            return;
        }
        self.mode = CameraMode::Manual;
        let (yaw, pitch, _) = self.rotation.to_euler(EulerRot::YXZ);
        self.yaw = yaw;
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.velocity = Vec3::ZERO;
    }

    /// Per-tick integration for the active mode.
    pub fn update(&mut self, dt: f32) {
        match self.mode {
            CameraMode::Manual => {
                self.rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
                self.position += self.velocity * dt;
                self.velocity *= VELOCITY_DAMPING;
            }
            CameraMode::Spring => {
                let k = (self.stiffness * dt).min(1.0);
                self.position = self.position.lerp(self.spring_target, k);
                let desired = Transform::from_translation(self.position)
                    .looking_at(self.spring_look_at, Vec3::Y)
                    .rotation;
                self.rotation = self.rotation.slerp(desired, k);
            }
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn spring_target(&self) -> Vec3 {
        self.spring_target
    }
}

/// Resolves a named focus preset to a (camera position, look-at) pair.
pub fn resolve_focus(name: &str, map: &StageMap) -> Option<(Vec3, Vec3)> {
    if name == OVERVIEW_PRESET {
        let center = map.center();
        return Some((center + OVERVIEW_OFFSET, center));
    }
    let center = map.region_position(name)?;
    Some((center + FOCUS_OFFSET, center))
}

/// Collects frame input, advances the camera, and writes its pose onto the
/// render camera entity.
pub fn camera_controller(
    time: Res<Time>,
    mut camera: ResMut<FlightCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut transforms: Query<&mut Transform, With<Camera3d>>,
) {
    let dt = time.delta_secs();

    let mouse_delta: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        camera.apply_look(mouse_delta);
    }

    let mut scroll = 0.0;
    for event in scroll_events.read() {
        scroll += match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y * 0.05,
        };
    }
    camera.adjust_speed(scroll);

    let mut input = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        input.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        input.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        input.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        input.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        input.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyQ) {
        input.y -= 1.0;
    }
    camera.apply_move(input, dt);

    camera.update(dt);

    if let Ok(mut transform) = transforms.single_mut() {
        transform.translation = camera.position;
        transform.rotation = camera.rotation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: f32 = 1.0 / 60.0;

    #[test]
    fn spring_distance_is_non_increasing_and_converges() {
        let mut camera = FlightCamera::new(Vec3::new(30.0, 10.0, 30.0), Vec3::ZERO);
        let target = Vec3::new(-5.0, 4.0, 2.0);
        camera.fly_to(target, Vec3::ZERO);
        let mut distance = camera.position.distance(target);
        let mut converged_at = None;
        for tick in 0..600 {
            camera.update(TICK);
            let next = camera.position.distance(target);
            assert!(next <= distance + 1e-5, "distance increased on tick {tick}");
            distance = next;
            if distance < 1e-2 && converged_at.is_none() {
                converged_at = Some(tick);
            }
        }
        // a handful of spring time-constants at 60 Hz
        assert!(converged_at.is_some(), "never converged: {distance}");
    }

    #[test]
    fn manual_input_is_ignored_while_springing() {
        let mut camera = FlightCamera::new(Vec3::ZERO, Vec3::NEG_Z);
        camera.fly_to(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
        let pose = (camera.position, camera.rotation());
        camera.apply_look(Vec2::new(500.0, 300.0));
        camera.apply_move(Vec3::new(1.0, 0.0, -1.0), TICK);
        assert_eq!(camera.position, pose.0);
        assert_eq!(camera.rotation(), pose.1);
        assert_eq!(camera.mode(), CameraMode::Spring);
    }

    #[test]
    fn pitch_is_clamped_short_of_gimbal_flip() {
        let mut camera = FlightCamera::new(Vec3::ZERO, Vec3::NEG_Z);
        camera.apply_look(Vec2::new(0.0, 100_000.0));
        camera.update(TICK);
        let (_, pitch, _) = camera.rotation().to_euler(EulerRot::YXZ);
        assert!(pitch >= -PITCH_LIMIT - 1e-3);
        camera.apply_look(Vec2::new(0.0, -200_000.0));
        camera.update(TICK);
        let (_, pitch, _) = camera.rotation().to_euler(EulerRot::YXZ);
        assert!(pitch <= PITCH_LIMIT + 1e-3);
    }

    #[test]
    fn velocity_decays_after_input_stops() {
        let mut camera = FlightCamera::new(Vec3::ZERO, Vec3::NEG_Z);
        for _ in 0..30 {
            camera.apply_move(Vec3::new(0.0, 0.0, -1.0), TICK);
            camera.update(TICK);
        }
        let coasting_start = camera.position;
        let mut travelled = 0.0;
        for _ in 0..600 {
            camera.update(TICK);
            travelled = camera.position.distance(coasting_start);
        }
        let settled = camera.position;
        camera.update(TICK);
        assert!(travelled > 0.0);
        assert!(camera.position.distance(settled) < 1e-3, "still drifting");
    }

    #[test]
    fn scroll_speed_stays_inside_the_clamp_range() {
        let mut camera = FlightCamera::new(Vec3::ZERO, Vec3::NEG_Z);
        camera.adjust_speed(1_000.0);
        assert_eq!(camera.move_speed(), FLY_SPEED_MAX);
        camera.adjust_speed(-1_000.0);
        assert_eq!(camera.move_speed(), FLY_SPEED_MIN);
    }

    #[test]
    fn reclaim_returns_to_manual_with_a_sane_pose() {
        let mut camera = FlightCamera::new(Vec3::new(10.0, 5.0, 10.0), Vec3::ZERO);
        camera.fly_to(Vec3::new(-4.0, 8.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        for _ in 0..120 {
            camera.update(TICK);
        }
        camera.reclaim_manual();
        assert_eq!(camera.mode(), CameraMode::Manual);
        let before = camera.rotation();
        camera.update(TICK);
        // manual orientation rebuilt from recovered yaw/pitch stays close to
        // the spring pose, no snap
        assert!(before.angle_between(camera.rotation()) < 0.05);
    }

    #[test]
    fn fly_to_overrides_a_previous_target() {
        let mut camera = FlightCamera::new(Vec3::ZERO, Vec3::NEG_Z);
        camera.fly_to(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
        camera.fly_to(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        assert_eq!(camera.spring_target(), Vec3::new(0.0, 0.0, 10.0));
        for _ in 0..600 {
            camera.update(TICK);
        }
        assert!(camera.position.distance(Vec3::new(0.0, 0.0, 10.0)) < 1e-2);
    }
}
