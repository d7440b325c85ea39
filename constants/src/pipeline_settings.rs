/// Timed phase durations in seconds. The refinement loop has no duration;
/// it runs until convergence or budget exhaustion.
pub const TRANSLATING_DURATION: f32 = 2.2;
pub const PREFETCHING_DURATION: f32 = 1.8;
pub const CPU_ROUTING_DURATION: f32 = 1.4;
pub const CPU_EXECUTING_DURATION: f32 = 2.4;
pub const CPU_SAFETY_DURATION: f32 = 1.6;
pub const DECODING_DURATION: f32 = 2.0;
pub const STORING_DURATION: f32 = 1.8;

/// Hold on the completed run before parking at idle (and restarting, in
/// continuous mode).
pub const COMPLETE_SETTLE_DELAY: f32 = 1.5;

/// Playback speed multiplier clamp range.
pub const SPEED_MULTIPLIER_MIN: f32 = 0.25;
pub const SPEED_MULTIPLIER_MAX: f32 = 4.0;
pub const SPEED_STEP_FACTOR: f32 = 1.25;

/// Refinement loop sizing. Sixteen units, iteration budget matching the
/// depicted engine's default inference config.
pub const RAR_UNIT_COUNT: usize = 16;
pub const RAR_MAX_ITERATIONS: u32 = 50;

/// Wall-clock seconds between simulated iterations.
pub const RAR_TICK_INTERVAL: f32 = 0.35;

/// Per-unit convergence thresholds are seeded uniformly from this range,
/// kept well inside the iteration budget.
pub const RAR_THRESHOLD_MIN: u32 = 6;
pub const RAR_THRESHOLD_MAX: u32 = 26;

/// Unit glow bands: dim and jittery while exploring, bright and stable once
/// converged.
pub const EXPLORATORY_INTENSITY_MIN: f32 = 0.15;
pub const EXPLORATORY_INTENSITY_MAX: f32 = 0.45;
pub const CONVERGED_INTENSITY_MIN: f32 = 0.70;
pub const CONVERGED_INTENSITY_MAX: f32 = 0.95;

/// Final particle certainty after the loop: a tight high band when every
/// unit converged, otherwise a mid band scaled by the aggregate.
pub const FULL_CONVERGENCE_CERTAINTY_MIN: f32 = 0.92;
pub const FULL_CONVERGENCE_CERTAINTY_MAX: f32 = 0.98;
pub const PARTIAL_CERTAINTY_BASE: f32 = 0.35;
pub const PARTIAL_CERTAINTY_SCALE: f32 = 0.35;

/// Orbit rate of the particle around the refinement ring, in laps per second.
pub const RAR_ORBIT_SPEED: f32 = 0.4;

/// Seed for the run's random streams. Fixed so repeated launches read the
/// same on demo hardware.
pub const PIPELINE_SEED: u64 = 0x56_4f_4c_54;
