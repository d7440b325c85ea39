/// Stage region names, in pipeline order. These are the keys of the scene
/// registry, the stage-map manifest entries, and the focus presets.
pub const TRANSLATOR: &str = "translator";
pub const GHOST_CACHE: &str = "ghost-cache";
pub const RAR_CORE: &str = "rar-core";
pub const ROUTER: &str = "router";
pub const CPU_STRANDS: &str = "cpu-strands";
pub const VETO_GATE: &str = "veto-gate";
pub const DECODER: &str = "decoder";
pub const MEMORY_TIERS: &str = "memory-tiers";

pub const REGION_ORDER: [&str; 8] = [
    TRANSLATOR,
    GHOST_CACHE,
    RAR_CORE,
    ROUTER,
    CPU_STRANDS,
    VETO_GATE,
    DECODER,
    MEMORY_TIERS,
];

/// Tag carried by the individually addressable refinement-unit markers
/// inside the rar-core group.
pub const UNIT_TAG: &str = "rar-unit";

/// Base colours per region, pipeline order (linear RGB).
pub const REGION_PALETTE: [(f32, f32, f32); 8] = [
    (0.25, 0.55, 0.95), // translator
    (0.35, 0.80, 0.85), // ghost-cache
    (0.85, 0.45, 0.95), // rar-core
    (0.95, 0.75, 0.25), // router
    (0.95, 0.45, 0.25), // cpu-strands
    (0.90, 0.20, 0.30), // veto-gate
    (0.40, 0.90, 0.45), // decoder
    (0.60, 0.60, 0.95), // memory-tiers
];

/// Resting emissive strength of region shells, and the default pulse
/// amplitude layered on top during a phase.
pub const REGION_EMISSIVE_BASELINE: f32 = 0.35;
pub const PULSE_AMPLITUDE_DEFAULT: f32 = 1.6;

/// Refinement-unit marker glow: gain applied to simulated intensity, plus
/// the one-shot flash when a unit locks in.
pub const UNIT_GLOW_GAIN: f32 = 2.0;
pub const UNIT_CONVERGED_FLASH: f32 = 1.2;

/// Region shell and unit marker mesh sizing.
pub const REGION_SIZE_DEFAULT: f32 = 3.0;
pub const UNIT_MARKER_RADIUS: f32 = 0.28;

/// Thought-particle pool.
pub const PARTICLE_POOL_CAPACITY: usize = 8;
pub const PARTICLE_RADIUS: f32 = 0.35;
pub const PARTICLE_SCALE_DEFAULT: f32 = 1.0;
pub const PARTICLE_BOB_FREQUENCY: f32 = 2.4;
pub const PARTICLE_BOB_AMPLITUDE: f32 = 0.18;
pub const PARTICLE_EMISSIVE_BASE: f32 = 1.2;
pub const PARTICLE_EMISSIVE_CERTAINTY_GAIN: f32 = 3.0;

/// Ground grid extents, a line field under the stage.
pub const GRID_HALF_EXTENT: f32 = 40.0;
pub const GRID_CELL_SIZE: f32 = 2.0;
