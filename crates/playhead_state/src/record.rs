// SPDX-License-Identifier: MIT OR Apache-2.0
//! Recursive visual-state records and their JSON round-trip.

use crate::entity::{EntityHandle, VisualState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when encoding or decoding record text.
#[derive(Debug, Error)]
pub enum RecordError {
    /// JSON encode/decode failure
    #[error("record JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Snapshot of one entity's visual state and, recursively, its
/// children's. Pure data with no live references; safe to store
/// indefinitely or ship to the host as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Flat visual state of the entity itself
    pub state: VisualState,
    /// Child records in traversal order
    #[serde(default)]
    pub children: Vec<EntityRecord>,
}

impl EntityRecord {
    /// Encode to JSON text. This is the only externally persistable
    /// artifact of the core; persistence itself is the host's business.
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON text.
    pub fn from_json(text: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Capture the visual state of an entity and its children.
pub fn capture(entity: &EntityHandle) -> EntityRecord {
    let guard = entity.lock();
    let state = guard.visual();
    let children = guard.children();
    drop(guard);

    EntityRecord {
        state,
        children: children.iter().map(capture).collect(),
    }
}

/// Restore a record into a live entity, recursively over children.
///
/// Children are matched by index, not identity: only the overlapping
/// prefix of the live children and the recorded children is restored.
/// Extra entries on either side are left untouched.
pub fn restore(entity: &EntityHandle, record: &EntityRecord) {
    let mut guard = entity.lock();
    guard.set_visual(&record.state);
    guard.set_dirty(true);
    let children = guard.children();
    drop(guard);

    let count = children.len().min(record.children.len());
    for index in 0..count {
        restore(&children[index], &record.children[index]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::BasicMobject;

    fn entity_at(x: f64, y: f64) -> EntityHandle {
        let mut state = VisualState::default();
        state.position = [x, y];
        BasicMobject::with_state(state).handle()
    }

    #[test]
    fn test_capture_recurses_over_children() {
        let mut parent = BasicMobject::new();
        parent.add_child(entity_at(1.0, 0.0));
        parent.add_child(entity_at(2.0, 0.0));
        let parent = parent.handle();

        let record = capture(&parent);
        assert_eq!(record.children.len(), 2);
        assert_eq!(record.children[0].state.position, [1.0, 0.0]);
        assert_eq!(record.children[1].state.position, [2.0, 0.0]);
    }

    #[test]
    fn test_restore_is_index_matched() {
        // Record has two children, live entity has three: only the
        // overlapping prefix is restored.
        let record = EntityRecord {
            state: VisualState::default(),
            children: vec![
                EntityRecord {
                    state: {
                        let mut s = VisualState::default();
                        s.position = [10.0, 0.0];
                        s
                    },
                    children: Vec::new(),
                },
                EntityRecord {
                    state: {
                        let mut s = VisualState::default();
                        s.position = [20.0, 0.0];
                        s
                    },
                    children: Vec::new(),
                },
            ],
        };

        let first = entity_at(0.0, 0.0);
        let second = entity_at(0.0, 0.0);
        let third = entity_at(99.0, 99.0);
        let mut parent = BasicMobject::new();
        parent.add_child(first.clone());
        parent.add_child(second.clone());
        parent.add_child(third.clone());
        let parent = parent.handle();

        restore(&parent, &record);

        assert_eq!(first.lock().visual().position, [10.0, 0.0]);
        assert_eq!(second.lock().visual().position, [20.0, 0.0]);
        assert_eq!(third.lock().visual().position, [99.0, 99.0]);
    }

    #[test]
    fn test_restore_marks_dirty() {
        let entity = entity_at(1.0, 1.0);
        entity.lock().set_dirty(false);

        let record = capture(&entity);
        restore(&entity, &record);
        assert!(entity.lock().is_dirty());
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let mut state = VisualState::default();
        state.position = [1.5, -2.5];
        state.rotation = 0.75;
        state.points = vec![[0.0, 0.0], [1.0, 2.0], [3.0, 4.0]];
        let record = EntityRecord {
            state,
            children: vec![EntityRecord {
                state: VisualState::default(),
                children: Vec::new(),
            }],
        };

        let text = record.to_json().unwrap();
        let decoded = EntityRecord::from_json(&text).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(EntityRecord::from_json("not json").is_err());
    }
}
