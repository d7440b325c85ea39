/// Seconds for one full tour lap at speed 1.0.
pub const TOUR_DURATION: f32 = 48.0;
pub const TOUR_SPEED_DEFAULT: f32 = 1.0;

/// Height of the camera rail above the stage floor and how far the rail is
/// pushed outward from the stage centre.
pub const TOUR_HEIGHT: f32 = 11.0;
pub const TOUR_SPREAD: f32 = 1.45;

/// Cardinal spline tension shared by the tour rails and travel paths.
pub const PATH_TENSION: f32 = 0.5;
