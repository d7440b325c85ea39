//! Per-unit convergence simulation behind the refinement-loop stage.
//!
//! Sixteen units settle independently across discrete iterations. Each unit
//! owns a pre-seeded iteration threshold; progress ramps towards 1.0 and
//! freezes there once the threshold is crossed. The aggregate certainty is
//! deliberately weakest-link: the minimum glow among converged units, so the
//! readout never implies more confidence than the least-resolved unit.

use constants::pipeline_settings::{
    CONVERGED_INTENSITY_MAX, CONVERGED_INTENSITY_MIN, EXPLORATORY_INTENSITY_MAX,
    EXPLORATORY_INTENSITY_MIN, RAR_MAX_ITERATIONS, RAR_THRESHOLD_MAX, RAR_THRESHOLD_MIN,
    RAR_UNIT_COUNT,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Semantic role carried by one refinement unit. The first nine are the
/// fixed roles of the depicted engine; the remainder are free extension
/// slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitRole {
    Agent,
    Predicate,
    Patient,
    Location,
    Time,
    Manner,
    Instrument,
    Cause,
    Result,
    Free(u8),
}

impl UnitRole {
    pub const fn for_index(index: usize) -> Self {
        match index {
            0 => Self::Agent,
            1 => Self::Predicate,
            2 => Self::Patient,
            3 => Self::Location,
            4 => Self::Time,
            5 => Self::Manner,
            6 => Self::Instrument,
            7 => Self::Cause,
            8 => Self::Result,
            n => Self::Free((n - 9) as u8),
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::Agent => "agent".into(),
            Self::Predicate => "predicate".into(),
            Self::Patient => "patient".into(),
            Self::Location => "location".into(),
            Self::Time => "time".into(),
            Self::Manner => "manner".into(),
            Self::Instrument => "instrument".into(),
            Self::Cause => "cause".into(),
            Self::Result => "result".into(),
            Self::Free(n) => format!("free-{n}"),
        }
    }
}

/// One independently converging unit.
#[derive(Debug, Clone)]
pub struct ConvergenceUnit {
    pub index: usize,
    pub role: UnitRole,
    /// Iteration at which the unit locks in.
    pub threshold: u32,
    /// Monotonic ramp towards 1.0; frozen at exactly 1.0 after convergence.
    pub progress: f32,
    pub converged: bool,
    /// Iteration on which the unit converged, if it has.
    pub converged_at: Option<u32>,
    /// Glow level: exploratory band while settling, re-rolled exactly once
    /// into the converged band on lock-in.
    pub intensity: f32,
}

/// Simulates the refinement loop over a fixed collection of units.
pub struct ConvergenceSimulator {
    iteration: u32,
    max_iterations: u32,
    units: Vec<ConvergenceUnit>,
    rng: SmallRng,
}

impl ConvergenceSimulator {
    pub fn new(seed: u64) -> Self {
        let units = (0..RAR_UNIT_COUNT)
            .map(|index| ConvergenceUnit {
                index,
                role: UnitRole::for_index(index),
                threshold: RAR_THRESHOLD_MIN,
                progress: 0.0,
                converged: false,
                converged_at: None,
                intensity: 0.0,
            })
            .collect();
        let mut sim = Self {
            iteration: 0,
            max_iterations: RAR_MAX_ITERATIONS,
            units,
            rng: SmallRng::seed_from_u64(seed),
        };
        sim.reset();
        sim
    }

    /// Zeroes the run: iteration counter, per-unit progress and convergence
    /// flags, fresh thresholds, exploratory glow.
    pub fn reset(&mut self) {
        self.iteration = 0;
        for unit in &mut self.units {
            unit.threshold = self
                .rng
                .gen_range(RAR_THRESHOLD_MIN..=RAR_THRESHOLD_MAX);
            unit.progress = 0.0;
            unit.converged = false;
            unit.converged_at = None;
            unit.intensity = self
                .rng
                .gen_range(EXPLORATORY_INTENSITY_MIN..EXPLORATORY_INTENSITY_MAX);
        }
    }

    /// Advances the simulation one iteration. Converged units are skipped;
    /// the rest ramp towards their threshold and lock in the moment the
    /// counter reaches it. Returns whether every unit has now converged.
    pub fn iterate(&mut self) -> bool {
        self.iteration += 1;
        for unit in &mut self.units {
            if unit.converged {
                continue;
            }
            unit.progress = (self.iteration as f32 / unit.threshold as f32).min(1.0);
            if self.iteration >= unit.threshold {
                unit.converged = true;
                unit.converged_at = Some(self.iteration);
                unit.progress = 1.0;
                unit.intensity = self
                    .rng
                    .gen_range(CONVERGED_INTENSITY_MIN..CONVERGED_INTENSITY_MAX);
            }
        }
        self.all_converged()
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn budget_exhausted(&self) -> bool {
        self.iteration >= self.max_iterations
    }

    pub fn all_converged(&self) -> bool {
        self.units.iter().all(|unit| unit.converged)
    }

    pub fn active_count(&self) -> usize {
        self.units.iter().filter(|unit| !unit.converged).count()
    }

    pub fn converged_count(&self) -> usize {
        self.units.iter().filter(|unit| unit.converged).count()
    }

    pub fn units(&self) -> &[ConvergenceUnit] {
        &self.units
    }

    /// Weakest-link aggregate: the minimum glow among converged units, or
    /// 0.0 while none have converged.
    pub fn global_gamma(&self) -> f32 {
        self.units
            .iter()
            .filter(|unit| unit.converged)
            .map(|unit| unit.intensity)
            .fold(None, |acc: Option<f32>, v| Some(acc.map_or(v, |a| a.min(v))))
            .unwrap_or(0.0)
    }

    #[cfg(test)]
    pub(crate) fn units_mut(&mut self) -> &mut [ConvergenceUnit] {
        &mut self.units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_monotonic_and_freezes_at_one() {
        let mut sim = ConvergenceSimulator::new(7);
        let mut last: Vec<f32> = sim.units().iter().map(|u| u.progress).collect();
        for _ in 0..RAR_MAX_ITERATIONS {
            sim.iterate();
            for (unit, prev) in sim.units().iter().zip(&last) {
                assert!(unit.progress >= *prev, "progress regressed");
                if unit.converged {
                    assert_eq!(unit.progress, 1.0);
                }
            }
            last = sim.units().iter().map(|u| u.progress).collect();
        }
        assert!(sim.all_converged());
    }

    #[test]
    fn converges_on_the_exact_threshold_iteration() {
        let mut sim = ConvergenceSimulator::new(11);
        let threshold = 9;
        sim.units_mut()[0].threshold = threshold;
        for i in 1..threshold {
            sim.iterate();
            let unit = &sim.units()[0];
            assert!(!unit.converged, "converged early at iteration {i}");
            assert!(unit.progress < 1.0);
        }
        sim.iterate();
        let unit = &sim.units()[0];
        assert!(unit.converged);
        assert_eq!(unit.converged_at, Some(threshold));
        assert_eq!(unit.progress, 1.0);
    }

    #[test]
    fn converged_intensity_rerolls_exactly_once() {
        let mut sim = ConvergenceSimulator::new(23);
        sim.units_mut()[0].threshold = 3;
        sim.iterate();
        sim.iterate();
        sim.iterate();
        let locked = sim.units()[0].intensity;
        assert!((CONVERGED_INTENSITY_MIN..CONVERGED_INTENSITY_MAX).contains(&locked));
        for _ in 0..10 {
            sim.iterate();
            assert_eq!(sim.units()[0].intensity, locked);
        }
    }

    #[test]
    fn gamma_is_zero_before_any_convergence() {
        let sim = ConvergenceSimulator::new(3);
        assert_eq!(sim.converged_count(), 0);
        assert_eq!(sim.global_gamma(), 0.0);
    }

    #[test]
    fn gamma_takes_the_minimum_converged_intensity() {
        let mut sim = ConvergenceSimulator::new(5);
        for (unit, intensity) in sim.units_mut().iter_mut().zip([0.9, 0.75, 0.95]) {
            unit.converged = true;
            unit.progress = 1.0;
            unit.intensity = intensity;
        }
        assert!((sim.global_gamma() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn reset_returns_units_to_the_exploratory_band() {
        let mut sim = ConvergenceSimulator::new(13);
        while !sim.iterate() {}
        sim.reset();
        assert_eq!(sim.iteration(), 0);
        assert_eq!(sim.converged_count(), 0);
        for unit in sim.units() {
            assert_eq!(unit.progress, 0.0);
            assert!(!unit.converged);
            assert!(unit.converged_at.is_none());
            assert!(
                (EXPLORATORY_INTENSITY_MIN..EXPLORATORY_INTENSITY_MAX).contains(&unit.intensity)
            );
            assert!((RAR_THRESHOLD_MIN..=RAR_THRESHOLD_MAX).contains(&unit.threshold));
        }
    }

    #[test]
    fn budget_trips_at_the_configured_cap() {
        let mut sim = ConvergenceSimulator::new(17);
        for _ in 0..RAR_MAX_ITERATIONS {
            assert!(!sim.budget_exhausted() || sim.iteration() == RAR_MAX_ITERATIONS);
            sim.iterate();
        }
        assert!(sim.budget_exhausted());
    }

    #[test]
    fn roles_cover_fixed_then_free_slots() {
        assert_eq!(UnitRole::for_index(0), UnitRole::Agent);
        assert_eq!(UnitRole::for_index(8), UnitRole::Result);
        assert_eq!(UnitRole::for_index(9), UnitRole::Free(0));
        assert_eq!(UnitRole::for_index(15), UnitRole::Free(6));
        assert_eq!(UnitRole::for_index(15).label(), "free-6");
    }
}
