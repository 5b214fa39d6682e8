// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo stacks of whole-scene snapshots.
//!
//! The manager is deliberately not wired into the playback tick path:
//! undo and redo are discrete host-triggered operations, and mixing them
//! into the frame loop would leave "what time is it" undefined for an
//! undone scene. Hosts pause or stop playback before calling in here.

use crate::entity::EntityHandle;
use crate::record::{capture, restore, EntityRecord};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Default maximum undo history depth
const DEFAULT_MAX_DEPTH: usize = 50;

/// Unique identifier for a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub Uuid);

impl SnapshotId {
    /// Create a new random snapshot ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole-scene snapshot: one record per top-level entity, positional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Unique snapshot ID
    pub id: SnapshotId,
    /// Optional human-readable label
    pub label: Option<String>,
    /// Capture time (UNIX seconds)
    pub timestamp: u64,
    /// Entity records in top-level scene order
    pub entities: Vec<EntityRecord>,
}

impl SceneSnapshot {
    /// Capture the current state of the given live entities.
    pub fn of(entities: &[EntityHandle], label: Option<&str>) -> Self {
        Self {
            id: SnapshotId::new(),
            label: label.map(str::to_string),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            entities: entities.iter().map(capture).collect(),
        }
    }

    /// Apply onto the live entity list.
    ///
    /// Restore is index-matched: if the live count and the snapshot
    /// count differ, only the overlapping prefix is restored.
    pub fn apply(&self, entities: &[EntityHandle]) {
        let count = entities.len().min(self.entities.len());
        for index in 0..count {
            restore(&entities[index], &self.entities[index]);
        }
    }

    /// Number of entity records in this snapshot.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

/// Undo/redo manager over whole-scene snapshots.
///
/// The live entity list is supplied per call so the manager always
/// reflects the current scene rather than a frozen one.
pub struct StateManager {
    undo_stack: VecDeque<SceneSnapshot>,
    redo_stack: VecDeque<SceneSnapshot>,
    checkpoints: IndexMap<String, SceneSnapshot>,
    max_depth: usize,
}

impl StateManager {
    /// Create a manager with the default history depth.
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Create a manager with a custom maximum history depth.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            checkpoints: IndexMap::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Capture the current scene, push it onto the undo stack, and
    /// invalidate the redo branch. Returns the snapshot.
    pub fn save(&mut self, entities: &[EntityHandle], label: Option<&str>) -> SceneSnapshot {
        let snapshot = SceneSnapshot::of(entities, label);
        self.push_undo(snapshot.clone());
        self.redo_stack.clear();
        tracing::debug!(depth = self.undo_stack.len(), "saved scene snapshot");
        snapshot
    }

    /// Undo one step. Captures the pre-undo live state onto the redo
    /// stack first, so redo reverses exactly this step. Returns false
    /// when there is nothing to undo.
    pub fn undo(&mut self, entities: &[EntityHandle]) -> bool {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return false;
        };
        // The pre-undo push is not depth-limited; the undo pop above
        // keeps the pair balanced.
        self.redo_stack
            .push_back(SceneSnapshot::of(entities, Some("(pre-undo)")));
        snapshot.apply(entities);
        tracing::debug!(remaining = self.undo_stack.len(), "applied undo");
        true
    }

    /// Redo one step. Captures the pre-redo live state onto the undo
    /// stack first (depth-limited). Returns false when there is nothing
    /// to redo.
    pub fn redo(&mut self, entities: &[EntityHandle]) -> bool {
        let Some(snapshot) = self.redo_stack.pop_back() else {
            return false;
        };
        self.push_undo(SceneSnapshot::of(entities, Some("(pre-redo)")));
        snapshot.apply(entities);
        tracing::debug!(remaining = self.redo_stack.len(), "applied redo");
        true
    }

    /// Capture the current scene without touching either stack.
    pub fn get_state(&self, entities: &[EntityHandle], label: Option<&str>) -> SceneSnapshot {
        SceneSnapshot::of(entities, label)
    }

    /// Apply a snapshot without touching either stack.
    pub fn set_state(&self, snapshot: &SceneSnapshot, entities: &[EntityHandle]) {
        snapshot.apply(entities);
    }

    /// Save a named checkpoint, overwriting any previous one of the
    /// same name. Checkpoints live outside the undo chain.
    pub fn save_checkpoint(&mut self, name: impl Into<String>, entities: &[EntityHandle]) {
        let name = name.into();
        let snapshot = SceneSnapshot::of(entities, Some(&name));
        self.checkpoints.insert(name, snapshot);
    }

    /// Restore a named checkpoint without disturbing the undo chain.
    /// Returns false when no checkpoint of that name exists.
    pub fn restore_checkpoint(&mut self, name: &str, entities: &[EntityHandle]) -> bool {
        let Some(snapshot) = self.checkpoints.get(name) else {
            return false;
        };
        snapshot.apply(entities);
        true
    }

    /// Remove a named checkpoint. Returns false when it did not exist.
    pub fn drop_checkpoint(&mut self, name: &str) -> bool {
        self.checkpoints.shift_remove(name).is_some()
    }

    /// Empty both stacks. Checkpoints are kept.
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get undo stack depth.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get redo stack depth.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Maximum undo history depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Labels of the undo stack, oldest first. Intended for host UIs.
    pub fn undo_labels(&self) -> impl Iterator<Item = Option<&str>> {
        self.undo_stack.iter().map(|s| s.label.as_deref())
    }

    fn push_undo(&mut self, snapshot: SceneSnapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BasicMobject, VisualState};

    fn entity_at(x: f64) -> EntityHandle {
        let mut state = VisualState::default();
        state.position = [x, 0.0];
        BasicMobject::with_state(state).handle()
    }

    fn position_of(entity: &EntityHandle) -> f64 {
        entity.lock().visual().position[0]
    }

    fn move_to(entity: &EntityHandle, x: f64) {
        let mut state = entity.lock().visual();
        state.position[0] = x;
        entity.lock().set_visual(&state);
    }

    #[test]
    fn test_undo_is_inverse_of_mutation() {
        let entities = vec![entity_at(1.0), entity_at(2.0)];
        let mut manager = StateManager::new();

        manager.save(&entities, Some("before move"));
        move_to(&entities[0], 100.0);
        move_to(&entities[1], 200.0);

        assert!(manager.undo(&entities));
        assert_eq!(position_of(&entities[0]), 1.0);
        assert_eq!(position_of(&entities[1]), 2.0);
    }

    #[test]
    fn test_undo_then_redo_round_trips() {
        let entities = vec![entity_at(1.0)];
        let mut manager = StateManager::new();

        manager.save(&entities, None);
        move_to(&entities[0], 50.0);

        assert!(manager.undo(&entities));
        assert_eq!(position_of(&entities[0]), 1.0);

        assert!(manager.redo(&entities));
        assert_eq!(position_of(&entities[0]), 50.0);
    }

    #[test]
    fn test_save_clears_redo_branch() {
        let entities = vec![entity_at(0.0)];
        let mut manager = StateManager::new();

        manager.save(&entities, None);
        move_to(&entities[0], 5.0);
        assert!(manager.undo(&entities));
        assert!(manager.can_redo());

        manager.save(&entities, None);
        assert!(!manager.can_redo());
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let entities = vec![entity_at(7.0)];
        let mut manager = StateManager::new();

        assert!(!manager.undo(&entities));
        assert!(!manager.redo(&entities));
        assert_eq!(position_of(&entities[0]), 7.0);
    }

    #[test]
    fn test_bounded_depth_keeps_most_recent() {
        let entities = vec![entity_at(0.0)];
        let mut manager = StateManager::with_max_depth(50);

        for i in 0..55 {
            move_to(&entities[0], f64::from(i));
            manager.save(&entities, Some(&format!("save {i}")));
        }

        assert_eq!(manager.undo_depth(), 50);
        let labels: Vec<_> = manager.undo_labels().map(|l| l.unwrap().to_string()).collect();
        assert_eq!(labels.first().unwrap(), "save 5");
        assert_eq!(labels.last().unwrap(), "save 54");
    }

    #[test]
    fn test_snapshot_count_mismatch_truncates() {
        let entities = vec![entity_at(1.0), entity_at(2.0)];
        let mut manager = StateManager::new();
        manager.save(&entities, None);

        // Scene shrank since the snapshot: only the first entity is restored.
        move_to(&entities[0], 11.0);
        let shrunk = vec![entities[0].clone()];
        assert!(manager.undo(&shrunk));
        assert_eq!(position_of(&entities[0]), 1.0);
        assert_eq!(position_of(&entities[1]), 2.0);
    }

    #[test]
    fn test_get_set_state_leave_stacks_alone() {
        let entities = vec![entity_at(3.0)];
        let manager = StateManager::new();

        let snapshot = manager.get_state(&entities, Some("checkpoint"));
        move_to(&entities[0], 30.0);
        manager.set_state(&snapshot, &entities);

        assert_eq!(position_of(&entities[0]), 3.0);
        assert!(!manager.can_undo());
        assert!(!manager.can_redo());
    }

    #[test]
    fn test_named_checkpoints() {
        let entities = vec![entity_at(4.0)];
        let mut manager = StateManager::new();

        manager.save_checkpoint("intro", &entities);
        move_to(&entities[0], 40.0);

        assert!(manager.restore_checkpoint("intro", &entities));
        assert_eq!(position_of(&entities[0]), 4.0);
        assert!(!manager.restore_checkpoint("missing", &entities));
        assert!(manager.drop_checkpoint("intro"));
        assert!(!manager.restore_checkpoint("intro", &entities));
    }

    #[test]
    fn test_clear_history() {
        let entities = vec![entity_at(0.0)];
        let mut manager = StateManager::new();
        manager.save(&entities, None);
        manager.undo(&entities);

        manager.clear_history();
        assert!(!manager.can_undo());
        assert!(!manager.can_redo());
    }
}
