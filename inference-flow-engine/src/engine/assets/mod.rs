/// Stage layout manifest: JSON asset, loader, and bundled fallback.
pub mod stage_map;
