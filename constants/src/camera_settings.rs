use bevy::prelude::*;

/// Manual flight speed in units per second, plus the scroll-adjustable range.
pub const FLY_SPEED_DEFAULT: f32 = 14.0;
pub const FLY_SPEED_MIN: f32 = 2.0;
pub const FLY_SPEED_MAX: f32 = 60.0;

/// Multiplicative speed change per scroll line.
pub const SCROLL_SPEED_STEP: f32 = 1.2;

/// Mouse-look sensitivities (radians per pixel) and the pitch clamp that
/// keeps the camera short of gimbal flip.
pub const YAW_SENSITIVITY: f32 = 0.0035;
pub const PITCH_SENSITIVITY: f32 = 0.0030;
pub const PITCH_LIMIT: f32 = 1.55;

/// Velocity retained each tick in manual mode.
pub const VELOCITY_DAMPING: f32 = 0.90;

/// Spring-follow stiffness for fly-to motion.
pub const SPRING_STIFFNESS: f32 = 3.2;

/// Offset from a region centre when focusing on it, and the elevated
/// overview vantage.
pub const FOCUS_OFFSET: Vec3 = Vec3::new(0.0, 6.0, 13.0);
pub const OVERVIEW_OFFSET: Vec3 = Vec3::new(0.0, 34.0, 40.0);

/// Name resolved by the overview focus preset.
pub const OVERVIEW_PRESET: &str = "overview";
