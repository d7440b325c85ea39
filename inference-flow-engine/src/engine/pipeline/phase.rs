use constants::pipeline_settings::{
    COMPLETE_SETTLE_DELAY, CPU_EXECUTING_DURATION, CPU_ROUTING_DURATION, CPU_SAFETY_DURATION,
    DECODING_DURATION, PREFETCHING_DURATION, STORING_DURATION, TRANSLATING_DURATION,
};
use constants::scene_settings::{
    CPU_STRANDS, DECODER, GHOST_CACHE, MEMORY_TIERS, PULSE_AMPLITUDE_DEFAULT, ROUTER, TRANSLATOR,
    VETO_GATE,
};

/// Ordered stages of the pipeline walk-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Translating,
    Prefetching,
    RarLoop,
    CpuRouting,
    CpuExecuting,
    CpuSafety,
    Decoding,
    Storing,
    Complete,
}

/// How a phase is scheduled: a fixed wall-clock duration, or driven by
/// something other than a timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseTiming {
    Timed(f32),
    Untimed,
}

/// Drive parameters consumed by the shared timed-stage driver: where on the
/// main path the particle travels and which region group glows.
#[derive(Debug, Clone, Copy)]
pub struct StageProfile {
    /// Sub-range of the main path covered during the phase.
    pub path_span: (f32, f32),
    pub pulse_group: &'static str,
    pub pulse_amplitude: f32,
}

/// Path parameter at which the particle leaves the refinement ring and
/// rejoins the main route.
pub const RAR_EXIT_T: f32 = 0.42;

impl Phase {
    pub const SEQUENCE: [Phase; 10] = [
        Phase::Idle,
        Phase::Translating,
        Phase::Prefetching,
        Phase::RarLoop,
        Phase::CpuRouting,
        Phase::CpuExecuting,
        Phase::CpuSafety,
        Phase::Decoding,
        Phase::Storing,
        Phase::Complete,
    ];

    /// Successor in the strictly forward sequence. `Complete` loops back via
    /// the orchestrator, not through this table.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Idle => Some(Phase::Translating),
            Phase::Translating => Some(Phase::Prefetching),
            Phase::Prefetching => Some(Phase::RarLoop),
            Phase::RarLoop => Some(Phase::CpuRouting),
            Phase::CpuRouting => Some(Phase::CpuExecuting),
            Phase::CpuExecuting => Some(Phase::CpuSafety),
            Phase::CpuSafety => Some(Phase::Decoding),
            Phase::Decoding => Some(Phase::Storing),
            Phase::Storing => Some(Phase::Complete),
            Phase::Complete => None,
        }
    }

    pub fn timing(self) -> PhaseTiming {
        match self {
            Phase::Idle | Phase::RarLoop => PhaseTiming::Untimed,
            Phase::Translating => PhaseTiming::Timed(TRANSLATING_DURATION),
            Phase::Prefetching => PhaseTiming::Timed(PREFETCHING_DURATION),
            Phase::CpuRouting => PhaseTiming::Timed(CPU_ROUTING_DURATION),
            Phase::CpuExecuting => PhaseTiming::Timed(CPU_EXECUTING_DURATION),
            Phase::CpuSafety => PhaseTiming::Timed(CPU_SAFETY_DURATION),
            Phase::Decoding => PhaseTiming::Timed(DECODING_DURATION),
            Phase::Storing => PhaseTiming::Timed(STORING_DURATION),
            Phase::Complete => PhaseTiming::Timed(COMPLETE_SETTLE_DELAY),
        }
    }

    /// Stage profile for phases run by the timed driver. `None` for the
    /// untimed phases and the settle hold.
    pub fn profile(self) -> Option<StageProfile> {
        let (path_span, pulse_group) = match self {
            Phase::Translating => ((0.00, 0.14), TRANSLATOR),
            Phase::Prefetching => ((0.14, 0.30), GHOST_CACHE),
            Phase::CpuRouting => ((RAR_EXIT_T, 0.55), ROUTER),
            Phase::CpuExecuting => ((0.55, 0.68), CPU_STRANDS),
            Phase::CpuSafety => ((0.68, 0.78), VETO_GATE),
            Phase::Decoding => ((0.78, 0.90), DECODER),
            Phase::Storing => ((0.90, 1.00), MEMORY_TIERS),
            _ => return None,
        };
        Some(StageProfile {
            path_span,
            pulse_group,
            pulse_amplitude: PULSE_AMPLITUDE_DEFAULT,
        })
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Translating => "Translating",
            Phase::Prefetching => "Prefetching",
            Phase::RarLoop => "RAR Loop",
            Phase::CpuRouting => "Routing",
            Phase::CpuExecuting => "Executing",
            Phase::CpuSafety => "Safety Sweep",
            Phase::Decoding => "Decoding",
            Phase::Storing => "Storing",
            Phase::Complete => "Complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_walks_strictly_forward() {
        for pair in Phase::SEQUENCE.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
        assert_eq!(Phase::Complete.next(), None);
    }

    #[test]
    fn only_idle_and_the_loop_are_untimed() {
        for phase in Phase::SEQUENCE {
            let untimed = matches!(phase.timing(), PhaseTiming::Untimed);
            assert_eq!(untimed, matches!(phase, Phase::Idle | Phase::RarLoop));
        }
    }

    #[test]
    fn timed_spans_tile_the_main_path_in_order() {
        let mut cursor = 0.0;
        for phase in Phase::SEQUENCE {
            let Some(profile) = phase.profile() else {
                continue;
            };
            let (start, end) = profile.path_span;
            assert!(start >= cursor - 1e-6, "{phase:?} span out of order");
            assert!(end > start);
            cursor = end;
        }
        assert!((cursor - 1.0).abs() < 1e-6);
    }
}
