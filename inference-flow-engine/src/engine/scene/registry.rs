//! Typed registry of the named scene groups the animator may address.
//!
//! The animator only ever asks for two things: a brief emissive pulse across
//! a whole group, or a targeted glow on an individually tagged element. Both
//! capabilities are explicit in the node variants; anything else in the
//! scene is simply not registered. Unknown group names are ignored.

use bevy::prelude::*;
use std::collections::HashMap;

/// A surface that can glow: its material, the resting emissive colour, and
/// the boost currently requested on top of it. Boost 0.0 restores the
/// baseline.
#[derive(Debug, Clone)]
pub struct EmissiveSurface {
    pub material: Handle<StandardMaterial>,
    pub baseline: LinearRgba,
    pub boost: f32,
}

impl EmissiveSurface {
    pub fn new(material: Handle<StandardMaterial>, baseline: LinearRgba) -> Self {
        Self {
            material,
            baseline,
            boost: 0.0,
        }
    }
}

/// A registered scene element with its capability explicit.
#[derive(Debug, Clone)]
pub enum SceneNode {
    /// Region shell; participates in whole-group pulses.
    Emissive(EmissiveSurface),
    /// Individually addressable marker, located by tag and index.
    Tagged {
        tag: String,
        index: usize,
        surface: EmissiveSurface,
    },
}

#[derive(Debug, Clone)]
pub struct SceneGroup {
    pub nodes: Vec<SceneNode>,
}

/// Name → group map, built once by the scene builder and borrowed by the
/// animator for the session.
#[derive(Resource, Default)]
pub struct SceneRegistry {
    groups: HashMap<String, SceneGroup>,
}

impl SceneRegistry {
    pub fn insert_group(&mut self, name: impl Into<String>, group: SceneGroup) {
        self.groups.insert(name.into(), group);
    }

    pub fn group(&self, name: &str) -> Option<&SceneGroup> {
        self.groups.get(name)
    }

    /// Requests an emissive boost on every pulse-capable node of the named
    /// group. Tagged markers keep their own levels.
    pub fn pulse(&mut self, name: &str, boost: f32) {
        let Some(group) = self.groups.get_mut(name) else {
            return;
        };
        for node in &mut group.nodes {
            if let SceneNode::Emissive(surface) = node {
                surface.boost = boost.max(0.0);
            }
        }
    }

    /// Restores the baseline across the named group, tagged markers
    /// included.
    pub fn clear_pulse(&mut self, name: &str) {
        let Some(group) = self.groups.get_mut(name) else {
            return;
        };
        for node in &mut group.nodes {
            match node {
                SceneNode::Emissive(surface) => surface.boost = 0.0,
                SceneNode::Tagged { surface, .. } => surface.boost = 0.0,
            }
        }
    }

    /// Sets the glow of one tagged element inside a group. Missing groups,
    /// tags, or indices are ignored.
    pub fn set_tagged(&mut self, name: &str, tag: &str, index: usize, boost: f32) {
        let Some(group) = self.groups.get_mut(name) else {
            return;
        };
        for node in &mut group.nodes {
            if let SceneNode::Tagged {
                tag: node_tag,
                index: node_index,
                surface,
            } = node
            {
                if node_tag == tag && *node_index == index {
                    surface.boost = boost.max(0.0);
                    return;
                }
            }
        }
    }

    /// Restores every registered surface to its baseline.
    pub fn clear_all(&mut self) {
        for group in self.groups.values_mut() {
            for node in &mut group.nodes {
                match node {
                    SceneNode::Emissive(surface) => surface.boost = 0.0,
                    SceneNode::Tagged { surface, .. } => surface.boost = 0.0,
                }
            }
        }
    }

    fn surfaces(&self) -> impl Iterator<Item = &EmissiveSurface> {
        self.groups.values().flat_map(|group| {
            group.nodes.iter().map(|node| match node {
                SceneNode::Emissive(surface) => surface,
                SceneNode::Tagged { surface, .. } => surface,
            })
        })
    }
}

/// Folds requested boosts into the materials, scaling each surface's stored
/// baseline. Runs after the animator has written its levels for the frame.
pub fn apply_registry_emissive(
    registry: Res<SceneRegistry>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !registry.is_changed() {
        return;
    }
    for surface in registry.surfaces() {
        if let Some(material) = materials.get_mut(&surface.material) {
            material.emissive = surface.baseline * (1.0 + surface.boost);
        }
    }
}
