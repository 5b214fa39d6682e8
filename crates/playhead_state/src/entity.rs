// SPDX-License-Identifier: MIT OR Apache-2.0
//! Entity capability contract consumed by the snapshot system.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared handle to a live scene entity.
///
/// Entities are shared mutably between the playback tick path and host
/// code; the cooperative scheduling model guarantees the two never
/// interleave partway through a tick.
pub type EntityHandle = Arc<Mutex<dyn Mobject + Send>>;

/// Per-frame updater callback attached to an entity.
pub type Updater = Box<dyn FnMut(&mut VisualState, f64) + Send>;

/// Visual style of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Fill color (RGBA, each channel 0.0-1.0)
    pub fill_color: [f32; 4],
    /// Stroke color (RGBA, each channel 0.0-1.0)
    pub stroke_color: [f32; 4],
    /// Stroke width in scene units
    pub stroke_width: f64,
    /// Overall opacity multiplier (0.0-1.0)
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill_color: [1.0, 1.0, 1.0, 1.0],
            stroke_color: [1.0, 1.0, 1.0, 1.0],
            stroke_width: 2.0,
            opacity: 1.0,
        }
    }
}

/// Flat visual state of a single entity, children excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    /// Position in scene units
    pub position: [f64; 2],
    /// Rotation in radians
    pub rotation: f64,
    /// Scale factors
    pub scale: [f64; 2],
    /// Visual style
    pub style: Style,
    /// Bezier control points of the entity's curve
    pub points: Vec<[f64; 2]>,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            rotation: 0.0,
            scale: [1.0, 1.0],
            style: Style::default(),
            points: Vec::new(),
        }
    }
}

/// Capability set the playback core needs from a live entity.
///
/// The core does not own entity identity; it only reads and writes
/// through this contract. Concrete entity types (text, shapes, groups)
/// are supplied by the host's geometry layer.
pub trait Mobject {
    /// Run attached per-frame updater callbacks.
    fn update(&mut self, dt: f64);

    /// Whether the renderer needs to redraw this entity.
    fn is_dirty(&self) -> bool;

    /// Set the render-dirty flag.
    fn set_dirty(&mut self, dirty: bool);

    /// Return the visual state to its constructed baseline.
    fn reset(&mut self);

    /// Read the flat visual state.
    fn visual(&self) -> VisualState;

    /// Overwrite the flat visual state.
    fn set_visual(&mut self, state: &VisualState);

    /// Child entities in traversal order.
    fn children(&self) -> Vec<EntityHandle> {
        Vec::new()
    }
}

/// Straightforward entity with a visual state, optional children, and
/// attached per-frame updaters.
///
/// Hosts with richer geometry implement [`Mobject`] themselves; this
/// type covers groups, tests, and simple scripted scenes.
#[derive(Default)]
pub struct BasicMobject {
    state: VisualState,
    baseline: VisualState,
    dirty: bool,
    children: Vec<EntityHandle>,
    updaters: Vec<Updater>,
}

impl BasicMobject {
    /// Create an entity with the default visual state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity with the given visual state as its baseline.
    pub fn with_state(state: VisualState) -> Self {
        Self {
            baseline: state.clone(),
            state,
            dirty: true,
            children: Vec::new(),
            updaters: Vec::new(),
        }
    }

    /// Wrap this entity in a shared handle.
    pub fn handle(self) -> EntityHandle {
        Arc::new(Mutex::new(self))
    }

    /// Attach a per-frame updater. Updaters run in attachment order.
    pub fn add_updater(&mut self, updater: impl FnMut(&mut VisualState, f64) + Send + 'static) {
        self.updaters.push(Box::new(updater));
    }

    /// Remove all attached updaters.
    pub fn clear_updaters(&mut self) {
        self.updaters.clear();
    }

    /// Add a child entity.
    pub fn add_child(&mut self, child: EntityHandle) {
        self.children.push(child);
    }

    /// Read access to the visual state.
    pub fn state(&self) -> &VisualState {
        &self.state
    }

    /// Mutable access to the visual state; marks the entity dirty.
    pub fn state_mut(&mut self) -> &mut VisualState {
        self.dirty = true;
        &mut self.state
    }
}

impl Mobject for BasicMobject {
    fn update(&mut self, dt: f64) {
        for updater in &mut self.updaters {
            updater(&mut self.state, dt);
        }
        if !self.updaters.is_empty() {
            self.dirty = true;
        }
        for child in &self.children {
            child.lock().update(dt);
        }
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    fn reset(&mut self) {
        self.state = self.baseline.clone();
        self.dirty = true;
    }

    fn visual(&self) -> VisualState {
        self.state.clone()
    }

    fn set_visual(&mut self, state: &VisualState) {
        self.state = state.clone();
        self.dirty = true;
    }

    fn children(&self) -> Vec<EntityHandle> {
        self.children.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updaters_run_in_order() {
        let mut entity = BasicMobject::new();
        entity.add_updater(|state, dt| state.position[0] += dt);
        entity.add_updater(|state, _| state.position[0] *= 2.0);

        entity.update(1.0);
        assert_eq!(entity.state().position[0], 2.0);
        assert!(entity.is_dirty());
    }

    #[test]
    fn test_reset_restores_baseline() {
        let mut state = VisualState::default();
        state.position = [3.0, 4.0];
        let mut entity = BasicMobject::with_state(state.clone());

        entity.state_mut().position = [9.0, 9.0];
        entity.reset();
        assert_eq!(entity.state().position, state.position);
    }

    #[test]
    fn test_update_recurses_into_children() {
        let mut child = BasicMobject::new();
        child.add_updater(|state, dt| state.position[1] += dt);
        let child = child.handle();

        let mut parent = BasicMobject::new();
        parent.add_child(child.clone());
        parent.update(0.5);

        assert_eq!(child.lock().visual().position[1], 0.5);
    }
}
