//! Pooled lifecycle for the "thought" particles.
//!
//! A fixed set of orb entities is created once at startup and parked hidden;
//! spawning hands out a free slot, recycling parks it again. Pool state is
//! plain data; `sync_particle_visuals` copies it onto the entities each
//! frame.

use bevy::prelude::*;
use constants::scene_settings::{
    PARTICLE_BOB_AMPLITUDE, PARTICLE_BOB_FREQUENCY, PARTICLE_EMISSIVE_BASE,
    PARTICLE_EMISSIVE_CERTAINTY_GAIN, PARTICLE_POOL_CAPACITY, PARTICLE_RADIUS,
};

use crate::engine::path::PathCurve;

/// Key into the particle pool, valid for the lifetime of one spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticleKey(usize);

/// One pooled particle.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec3,
    pub scale: f32,
    /// Certainty drives the orb's glow, not any real confidence measure.
    pub certainty: f32,
    /// Accumulated progress for `move_along_path`; wraps per lap.
    pub path_progress: f32,
    pub visible: bool,
    in_use: bool,
    bob_clock: f32,
}

impl Particle {
    fn parked() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: 1.0,
            certainty: 0.0,
            path_progress: 0.0,
            visible: false,
            in_use: false,
            bob_clock: 0.0,
        }
    }

    /// Render position: logic position plus the idle bob offset.
    pub fn render_position(&self) -> Vec3 {
        self.position
            + Vec3::Y * (self.bob_clock * PARTICLE_BOB_FREQUENCY).sin() * PARTICLE_BOB_AMPLITUDE
    }
}

/// Pooled spawn/recycle/move-along-path manager.
#[derive(Resource)]
pub struct ParticlePool {
    slots: Vec<Particle>,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new(PARTICLE_POOL_CAPACITY)
    }
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| Particle::parked()).collect(),
        }
    }

    /// Claims a free slot. `None` when the pool is exhausted.
    pub fn spawn(&mut self, position: Vec3, scale: f32) -> Option<ParticleKey> {
        let index = self.slots.iter().position(|slot| !slot.in_use)?;
        let slot = &mut self.slots[index];
        *slot = Particle::parked();
        slot.in_use = true;
        slot.visible = true;
        slot.position = position;
        slot.scale = scale;
        Some(ParticleKey(index))
    }

    /// Returns a slot to the pool. Stale keys are ignored.
    pub fn recycle(&mut self, key: ParticleKey) {
        let Some(slot) = self.slots.get_mut(key.0) else {
            return;
        };
        *slot = Particle::parked();
    }

    pub fn get(&self, key: ParticleKey) -> Option<&Particle> {
        self.slots.get(key.0).filter(|slot| slot.in_use)
    }

    pub fn get_mut(&mut self, key: ParticleKey) -> Option<&mut Particle> {
        self.slots.get_mut(key.0).filter(|slot| slot.in_use)
    }

    pub fn set_certainty(&mut self, key: ParticleKey, certainty: f32) {
        if let Some(slot) = self.get_mut(key) {
            slot.certainty = certainty.clamp(0.0, 1.0);
        }
    }

    /// Advances the slot's accumulated progress by `speed_fraction * dt`
    /// (laps per second) and moves it along the curve. Returns true on each
    /// completed lap.
    pub fn move_along_path(
        &mut self,
        key: ParticleKey,
        curve: &PathCurve,
        speed_fraction: f32,
        dt: f32,
    ) -> bool {
        let Some(slot) = self.get_mut(key) else {
            return false;
        };
        slot.path_progress += speed_fraction * dt;
        let done = slot.path_progress >= 1.0;
        if done {
            slot.path_progress -= 1.0;
        }
        slot.position = curve.point_at(slot.path_progress);
        done
    }

    /// Places the slot at a normalised point on the curve without touching
    /// its accumulated progress.
    pub fn place_on_path(&mut self, key: ParticleKey, curve: &PathCurve, t: f32) {
        if let Some(slot) = self.get_mut(key) {
            slot.position = curve.point_at(t);
        }
    }

    /// Per-tick upkeep, run before the phase handler: advances the idle bob
    /// of every live particle.
    pub fn update(&mut self, dt: f32) {
        for slot in &mut self.slots {
            if slot.in_use {
                slot.bob_clock += dt;
            }
        }
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.in_use).count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn slot_at(&self, index: usize) -> Option<&Particle> {
        self.slots.get(index)
    }
}

/// Marker tying one pooled orb entity to its pool slot.
#[derive(Component)]
pub struct ParticleVisual {
    pub index: usize,
}

/// Creates the orb entities once, hidden, one per pool slot.
pub fn spawn_particle_pool(
    mut commands: Commands,
    pool: Res<ParticlePool>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = meshes.add(Sphere::new(PARTICLE_RADIUS));
    for index in 0..pool.capacity() {
        let material = materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.95, 1.0),
            emissive: LinearRgba::rgb(0.9, 0.95, 1.0) * PARTICLE_EMISSIVE_BASE,
            ..default()
        });
        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material),
            Transform::default(),
            Visibility::Hidden,
            ParticleVisual { index },
        ));
    }
}

/// Copies pool state onto the orb entities: transform, visibility, and a
/// glow proportional to certainty.
pub fn sync_particle_visuals(
    pool: Res<ParticlePool>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut orbs: Query<(
        &ParticleVisual,
        &mut Transform,
        &mut Visibility,
        &MeshMaterial3d<StandardMaterial>,
    )>,
) {
    for (visual, mut transform, mut visibility, material) in &mut orbs {
        let Some(slot) = pool.slot_at(visual.index) else {
            continue;
        };
        *visibility = if slot.in_use && slot.visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        transform.translation = slot.render_position();
        transform.scale = Vec3::splat(slot.scale);
        if let Some(mat) = materials.get_mut(&material.0) {
            let glow =
                PARTICLE_EMISSIVE_BASE + slot.certainty * PARTICLE_EMISSIVE_CERTAINTY_GAIN;
            mat.emissive = LinearRgba::rgb(0.9, 0.95, 1.0) * glow;
        }
    }
}
