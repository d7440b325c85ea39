//! Stage scene: typed registry of addressable groups, the builder that
//! spawns them from the layout manifest, and the ground grid.

/// Builds region shells, unit markers, paths, and the tour from the layout.
pub mod builder;

/// Flat line-field grid under the stage.
pub mod grid;

/// Typed name → group registry with explicit pulse/flash capabilities.
pub mod registry;
