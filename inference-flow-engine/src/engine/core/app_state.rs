//! Application lifecycle state: stage-map loading, scene construction, then
//! the run loop.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    SceneReady,
    Running,
}
