//! Platform-specific window configuration for native and WASM builds.

use bevy::prelude::*;
use bevy::window::PresentMode;

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            title: "Inference Flow".into(),
            canvas: Some("#inference-flow".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Inference Flow".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
