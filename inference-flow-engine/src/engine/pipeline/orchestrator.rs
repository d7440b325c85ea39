//! Top-level animation state machine.
//!
//! One orchestrator drives one run at a time: it owns the active particle,
//! walks the phase sequence on accumulated time, delegates the refinement
//! stage to the convergence simulator, and writes pulse levels into the
//! scene registry. The particle pool, registry, and paths are externally
//! owned and borrowed per tick; every touch is guarded so their absence
//! degrades to a visually static scene rather than an error.

use bevy::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

use constants::pipeline_settings::{
    FULL_CONVERGENCE_CERTAINTY_MAX, FULL_CONVERGENCE_CERTAINTY_MIN, PARTIAL_CERTAINTY_BASE,
    PARTIAL_CERTAINTY_SCALE, RAR_ORBIT_SPEED, RAR_TICK_INTERVAL, SPEED_MULTIPLIER_MAX,
    SPEED_MULTIPLIER_MIN,
};
use constants::scene_settings::{
    PARTICLE_SCALE_DEFAULT, RAR_CORE, UNIT_CONVERGED_FLASH, UNIT_GLOW_GAIN, UNIT_TAG,
};

use crate::engine::particles::{ParticleKey, ParticlePool};
use crate::engine::path::PipelinePaths;
use crate::engine::scene::registry::SceneRegistry;

use super::convergence::ConvergenceSimulator;
use super::phase::{Phase, PhaseTiming, RAR_EXIT_T};

/// Raised on every phase transition, the implicit Complete → Idle restart
/// included.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PhaseChanged {
    pub from: Phase,
    pub to: Phase,
}

/// Raised once per finished run.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RunCompleted;

/// Internal notification queue, drained into Bevy events by the driver
/// system so any number of readers can observe a run.
#[derive(Debug, Clone, Copy)]
pub enum OrchestratorEvent {
    Phase(PhaseChanged),
    Completed,
}

#[derive(Resource)]
pub struct PipelineOrchestrator {
    phase: Phase,
    phase_timer: f32,
    phase_timing: PhaseTiming,
    speed_multiplier: f32,
    paused: bool,
    continuous: bool,
    particle: Option<ParticleKey>,
    rar_clock: f32,
    sim: ConvergenceSimulator,
    rng: SmallRng,
    events: Vec<OrchestratorEvent>,
}

impl PipelineOrchestrator {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: Phase::Idle,
            phase_timer: 0.0,
            phase_timing: Phase::Idle.timing(),
            speed_multiplier: 1.0,
            paused: false,
            continuous: true,
            particle: None,
            rar_clock: 0.0,
            sim: ConvergenceSimulator::new(seed.rotate_left(17)),
            rng: SmallRng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Begins a run. Ignored unless the pipeline is parked at Idle or
    /// Complete. A failed spawn leaves the phase at Idle so the caller may
    /// retry.
    pub fn start(&mut self, pool: &mut ParticlePool, paths: &PipelinePaths) {
        if !matches!(self.phase, Phase::Idle | Phase::Complete) {
            return;
        }
        if self.phase == Phase::Complete {
            self.transition(Phase::Idle);
        }
        let origin = paths.main.point_at(0.0);
        let Some(key) = pool.spawn(origin, PARTICLE_SCALE_DEFAULT) else {
            warn!("particle pool exhausted, pipeline stays idle");
            return;
        };
        self.particle = Some(key);
        self.transition(Phase::Translating);
    }

    /// Advances the run. A no-op while paused; otherwise dt is scaled by the
    /// clamped speed multiplier, pool bookkeeping runs, and the active
    /// phase's handler, transitions included, completes before returning.
    pub fn update(
        &mut self,
        dt: f32,
        pool: &mut ParticlePool,
        registry: &mut SceneRegistry,
        paths: &PipelinePaths,
    ) {
        if self.paused {
            return;
        }
        let dt = dt * self.speed_multiplier;
        pool.update(dt);
        match self.phase {
            Phase::Idle => {}
            Phase::RarLoop => self.drive_rar(dt, pool, registry, paths),
            Phase::Complete => self.drive_complete(dt, pool, paths),
            _ => self.drive_timed(dt, pool, registry, paths),
        }
    }

    /// Shared driver for every timed phase: accumulate the timer, walk the
    /// particle across the phase's path span, pulse the profile's region,
    /// and hand over when the duration expires.
    fn drive_timed(
        &mut self,
        dt: f32,
        pool: &mut ParticlePool,
        registry: &mut SceneRegistry,
        paths: &PipelinePaths,
    ) {
        let PhaseTiming::Timed(duration) = self.phase_timing else {
            return;
        };
        let Some(profile) = self.phase.profile() else {
            return;
        };
        self.phase_timer += dt;
        let t = (self.phase_timer / duration).min(1.0);
        if let Some(key) = self.particle {
            let position = paths.main.point_in_span(profile.path_span, t);
            if let Some(particle) = pool.get_mut(key) {
                particle.position = position;
            }
        }
        registry.pulse(profile.pulse_group, (t * PI).sin() * profile.pulse_amplitude);
        if self.phase_timer >= duration {
            registry.clear_pulse(profile.pulse_group);
            if let Some(next) = self.phase.next() {
                self.transition(next);
            }
        }
    }

    /// Refinement stage: the particle orbits the ring while the simulator
    /// ticks on a fixed cadence, each tick mirrored onto the tagged unit
    /// markers. Ends on full convergence or budget exhaustion.
    fn drive_rar(
        &mut self,
        dt: f32,
        pool: &mut ParticlePool,
        registry: &mut SceneRegistry,
        paths: &PipelinePaths,
    ) {
        if let Some(key) = self.particle {
            pool.move_along_path(key, &paths.rar_ring, RAR_ORBIT_SPEED, dt);
        }
        // core shell brightens with the weakest-link aggregate
        registry.pulse(RAR_CORE, self.sim.global_gamma() * 0.8);
        self.rar_clock += dt;
        while self.rar_clock >= RAR_TICK_INTERVAL {
            self.rar_clock -= RAR_TICK_INTERVAL;
            let all_converged = self.sim.iterate();
            for unit in self.sim.units() {
                let flash = if unit.converged_at == Some(self.sim.iteration()) {
                    debug!(
                        "unit {} ({}) converged on iteration {}",
                        unit.index,
                        unit.role.label(),
                        self.sim.iteration()
                    );
                    UNIT_CONVERGED_FLASH
                } else {
                    0.0
                };
                registry.set_tagged(
                    RAR_CORE,
                    UNIT_TAG,
                    unit.index,
                    unit.intensity * UNIT_GLOW_GAIN + flash,
                );
            }
            if all_converged || self.sim.budget_exhausted() {
                self.finish_rar(pool, registry, paths);
                return;
            }
        }
    }

    /// Derives the run's final certainty from the simulation outcome, parks
    /// the particle at the loop exit, and moves on.
    fn finish_rar(
        &mut self,
        pool: &mut ParticlePool,
        registry: &mut SceneRegistry,
        paths: &PipelinePaths,
    ) {
        let certainty = if self.sim.all_converged() {
            self.rng
                .gen_range(FULL_CONVERGENCE_CERTAINTY_MIN..FULL_CONVERGENCE_CERTAINTY_MAX)
        } else {
            PARTIAL_CERTAINTY_BASE + PARTIAL_CERTAINTY_SCALE * self.sim.global_gamma()
        };
        if let Some(key) = self.particle {
            pool.set_certainty(key, certainty);
            pool.place_on_path(key, &paths.main, RAR_EXIT_T);
        }
        registry.clear_pulse(RAR_CORE);
        self.transition(Phase::CpuRouting);
    }

    /// Settle hold: recycle the finished particle, wait, then park at Idle
    /// and restart immediately when running continuously.
    fn drive_complete(&mut self, dt: f32, pool: &mut ParticlePool, paths: &PipelinePaths) {
        if let Some(key) = self.particle.take() {
            pool.recycle(key);
        }
        let PhaseTiming::Timed(settle) = self.phase_timing else {
            return;
        };
        self.phase_timer += dt;
        if self.phase_timer < settle {
            return;
        }
        self.transition(Phase::Idle);
        if self.continuous {
            self.start(pool, paths);
        }
    }

    fn transition(&mut self, to: Phase) {
        let from = self.phase;
        self.phase = to;
        self.phase_timer = 0.0;
        self.phase_timing = to.timing();
        if to == Phase::RarLoop {
            self.rar_clock = 0.0;
            self.sim.reset();
        }
        self.events.push(OrchestratorEvent::Phase(PhaseChanged { from, to }));
        if to == Phase::Complete {
            self.events.push(OrchestratorEvent::Completed);
        }
        info!(
            "pipeline phase: {} -> {}",
            from.display_name(),
            to.display_name()
        );
    }

    /// Freezes every timer and the simulator without touching the phase.
    /// Resuming is lossless.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Playback rate, silently clamped to the configured range.
    pub fn set_speed(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier.clamp(SPEED_MULTIPLIER_MIN, SPEED_MULTIPLIER_MAX);
    }

    pub fn speed(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn set_continuous(&mut self, continuous: bool) {
        self.continuous = continuous;
    }

    pub fn continuous(&self) -> bool {
        self.continuous
    }

    pub fn state(&self) -> Phase {
        self.phase
    }

    pub fn state_name(&self) -> &'static str {
        self.phase.display_name()
    }

    /// Elapsed time inside the current phase.
    pub fn phase_timer(&self) -> f32 {
        self.phase_timer
    }

    pub fn particle(&self) -> Option<ParticleKey> {
        self.particle
    }

    pub fn convergence(&self) -> &ConvergenceSimulator {
        &self.sim
    }

    pub fn drain_events(&mut self) -> Vec<OrchestratorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tears the run down: recycles the particle, restores every surface,
    /// and parks at Idle.
    pub fn dispose(&mut self, pool: &mut ParticlePool, registry: &mut SceneRegistry) {
        if let Some(key) = self.particle.take() {
            pool.recycle(key);
        }
        registry.clear_all();
        if self.phase != Phase::Idle {
            self.transition(Phase::Idle);
        }
        self.phase_timer = 0.0;
    }
}

/// Per-frame driver: advances the orchestrator and fans its notifications
/// out to Bevy event readers.
pub fn pipeline_driver(
    time: Res<Time>,
    mut orchestrator: ResMut<PipelineOrchestrator>,
    mut pool: ResMut<ParticlePool>,
    mut registry: ResMut<SceneRegistry>,
    paths: Option<Res<PipelinePaths>>,
    mut phase_events: EventWriter<PhaseChanged>,
    mut completed_events: EventWriter<RunCompleted>,
) {
    let Some(paths) = paths else {
        return;
    };
    orchestrator.update(time.delta_secs(), &mut pool, &mut registry, &paths);
    for event in orchestrator.drain_events() {
        match event {
            OrchestratorEvent::Phase(changed) => {
                phase_events.send(changed);
            }
            OrchestratorEvent::Completed => {
                completed_events.send(RunCompleted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::path::PathCurve;

    fn paths() -> PipelinePaths {
        let main = PathCurve::closed(
            vec![
                Vec3::new(-10.0, 0.0, -10.0),
                Vec3::new(10.0, 0.0, -10.0),
                Vec3::new(10.0, 0.0, 10.0),
                Vec3::new(-10.0, 0.0, 10.0),
            ],
            0.5,
        )
        .unwrap();
        let rar_ring = PathCurve::closed(
            vec![
                Vec3::new(-2.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, -2.0),
                Vec3::new(2.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 2.0),
            ],
            0.5,
        )
        .unwrap();
        PipelinePaths { main, rar_ring }
    }

    fn fixture() -> (PipelineOrchestrator, ParticlePool, SceneRegistry, PipelinePaths) {
        let mut orchestrator = PipelineOrchestrator::new(42);
        orchestrator.set_continuous(false);
        (
            orchestrator,
            ParticlePool::new(4),
            SceneRegistry::default(),
            paths(),
        )
    }

    fn observed_transitions(orchestrator: &mut PipelineOrchestrator) -> Vec<(Phase, Phase)> {
        orchestrator
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                OrchestratorEvent::Phase(changed) => Some((changed.from, changed.to)),
                OrchestratorEvent::Completed => None,
            })
            .collect()
    }

    fn run_to_idle(
        orchestrator: &mut PipelineOrchestrator,
        pool: &mut ParticlePool,
        registry: &mut SceneRegistry,
        paths: &PipelinePaths,
    ) -> Vec<(Phase, Phase)> {
        let mut transitions = Vec::new();
        for _ in 0..20_000 {
            orchestrator.update(0.05, pool, registry, paths);
            transitions.extend(observed_transitions(orchestrator));
            if orchestrator.state() == Phase::Idle {
                break;
            }
        }
        transitions
    }

    #[test]
    fn full_run_walks_the_declared_sequence() {
        let (mut orchestrator, mut pool, mut registry, paths) = fixture();
        orchestrator.start(&mut pool, &paths);
        let mut transitions = observed_transitions(&mut orchestrator);
        transitions.extend(run_to_idle(
            &mut orchestrator,
            &mut pool,
            &mut registry,
            &paths,
        ));
        let visited: Vec<Phase> = std::iter::once(Phase::Idle)
            .chain(transitions.iter().map(|(_, to)| *to))
            .collect();
        let mut expected: Vec<Phase> = Phase::SEQUENCE.to_vec();
        expected.push(Phase::Idle);
        assert_eq!(visited, expected);
        // transitions chain: every `from` matches the previous `to`
        for pair in transitions.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn completed_fires_once_per_run() {
        let (mut orchestrator, mut pool, mut registry, paths) = fixture();
        orchestrator.start(&mut pool, &paths);
        let mut completions = 0;
        for _ in 0..20_000 {
            orchestrator.update(0.05, &mut pool, &mut registry, &paths);
            completions += orchestrator
                .drain_events()
                .iter()
                .filter(|event| matches!(event, OrchestratorEvent::Completed))
                .count();
            if orchestrator.state() == Phase::Idle {
                break;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn double_start_spawns_exactly_one_particle() {
        let (mut orchestrator, mut pool, _, paths) = fixture();
        orchestrator.start(&mut pool, &paths);
        orchestrator.start(&mut pool, &paths);
        assert_eq!(pool.live_count(), 1);
        assert_eq!(orchestrator.state(), Phase::Translating);
    }

    #[test]
    fn failed_spawn_leaves_the_pipeline_idle() {
        let (mut orchestrator, _, _, paths) = fixture();
        let mut empty_pool = ParticlePool::new(0);
        orchestrator.start(&mut empty_pool, &paths);
        assert_eq!(orchestrator.state(), Phase::Idle);
    }

    #[test]
    fn pause_freezes_the_phase_timer_losslessly() {
        let (mut orchestrator, mut pool, mut registry, paths) = fixture();
        orchestrator.start(&mut pool, &paths);
        orchestrator.update(0.5, &mut pool, &mut registry, &paths);
        let before = orchestrator.phase_timer();
        let phase = orchestrator.state();
        orchestrator.set_paused(true);
        for _ in 0..50 {
            orchestrator.update(0.1, &mut pool, &mut registry, &paths);
        }
        assert_eq!(orchestrator.phase_timer(), before);
        assert_eq!(orchestrator.state(), phase);
        orchestrator.set_paused(false);
        orchestrator.update(0.1, &mut pool, &mut registry, &paths);
        assert!(orchestrator.phase_timer() > before);
    }

    #[test]
    fn speed_is_clamped_to_the_configured_range() {
        let (mut orchestrator, ..) = fixture();
        orchestrator.set_speed(10.0);
        assert_eq!(orchestrator.speed(), 4.0);
        orchestrator.set_speed(0.01);
        assert_eq!(orchestrator.speed(), 0.25);
    }

    #[test]
    fn rar_iterations_are_not_phase_transitions() {
        let (mut orchestrator, mut pool, mut registry, paths) = fixture();
        orchestrator.start(&mut pool, &paths);
        let mut rar_transitions = 0;
        for _ in 0..20_000 {
            orchestrator.update(0.05, &mut pool, &mut registry, &paths);
            for (from, to) in observed_transitions(&mut orchestrator) {
                if from == Phase::RarLoop || to == Phase::RarLoop {
                    rar_transitions += 1;
                }
            }
            if orchestrator.state() == Phase::Idle {
                break;
            }
        }
        // exactly one entry and one exit
        assert_eq!(rar_transitions, 2);
    }

    #[test]
    fn rar_exit_assigns_certainty_and_repositions_the_particle() {
        let (mut orchestrator, mut pool, mut registry, paths) = fixture();
        orchestrator.start(&mut pool, &paths);
        for _ in 0..20_000 {
            orchestrator.update(0.05, &mut pool, &mut registry, &paths);
            if orchestrator.state() == Phase::CpuRouting {
                break;
            }
        }
        assert_eq!(orchestrator.state(), Phase::CpuRouting);
        let key = orchestrator.particle().unwrap();
        let particle = pool.get(key).unwrap();
        assert!(particle.certainty > 0.0);
        // fully converged runs land in the tight high band
        if orchestrator.convergence().all_converged() {
            assert!(particle.certainty >= FULL_CONVERGENCE_CERTAINTY_MIN);
            assert!(particle.certainty <= FULL_CONVERGENCE_CERTAINTY_MAX);
        }
    }

    #[test]
    fn continuous_mode_restarts_after_the_settle_delay() {
        let (mut orchestrator, mut pool, mut registry, paths) = fixture();
        orchestrator.set_continuous(true);
        orchestrator.start(&mut pool, &paths);
        let mut restarted = false;
        let mut seen_complete = false;
        for _ in 0..40_000 {
            orchestrator.update(0.05, &mut pool, &mut registry, &paths);
            for (from, to) in observed_transitions(&mut orchestrator) {
                if to == Phase::Complete {
                    seen_complete = true;
                }
                if seen_complete && from == Phase::Idle && to == Phase::Translating {
                    restarted = true;
                }
            }
            if restarted {
                break;
            }
        }
        assert!(restarted);
        assert_eq!(pool.live_count(), 1);
    }

    #[test]
    fn start_midway_is_rejected() {
        let (mut orchestrator, mut pool, mut registry, paths) = fixture();
        orchestrator.start(&mut pool, &paths);
        for _ in 0..100 {
            orchestrator.update(0.05, &mut pool, &mut registry, &paths);
        }
        let phase = orchestrator.state();
        assert_ne!(phase, Phase::Idle);
        orchestrator.start(&mut pool, &paths);
        assert_eq!(orchestrator.state(), phase);
        assert_eq!(pool.live_count(), 1);
    }

    #[test]
    fn dispose_recycles_and_parks_at_idle() {
        let (mut orchestrator, mut pool, mut registry, paths) = fixture();
        orchestrator.start(&mut pool, &paths);
        for _ in 0..100 {
            orchestrator.update(0.05, &mut pool, &mut registry, &paths);
        }
        orchestrator.dispose(&mut pool, &mut registry);
        assert_eq!(orchestrator.state(), Phase::Idle);
        assert_eq!(pool.live_count(), 0);
        assert!(orchestrator.particle().is_none());
    }
}
