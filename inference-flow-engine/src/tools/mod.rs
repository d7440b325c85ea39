//! Interactive keyboard tools.
//!
//! Playback controls drive the pipeline run (start, pause, speed, loop
//! mode); view controls drive the camera (tour toggle, manual reclaim,
//! per-region focus presets). Both log what they change, so the terminal
//! doubles as an action trace.

/// Pipeline run controls: start, pause, speed, continuous mode.
pub mod playback;

/// Camera controls: tour toggle, manual reclaim, focus presets.
pub mod view_presets;
