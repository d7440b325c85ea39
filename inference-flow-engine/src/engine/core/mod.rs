//! Core application setup and state management.

/// Application construction, plugin wiring, and the system schedule.
pub mod app_setup;

/// Lifecycle state machine from stage-map loading to the run loop.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
pub mod window_config;
