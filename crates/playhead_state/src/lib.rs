// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene state capture and undo/redo history for the Playhead engine.
//!
//! This crate provides the snapshot layer of the playback core:
//! - The entity capability contract consumed by the snapshot system
//! - Recursive, JSON-safe visual-state records
//! - Bounded undo/redo stacks of whole-scene snapshots
//!
//! ## Architecture
//!
//! Snapshots are pure data: one record per top-level entity, each
//! recursively containing its children's records in traversal order.
//! Restoring is index-matched, not identity-matched, so a snapshot taken
//! against an older entity list applies to the overlapping prefix of the
//! current one.

pub mod entity;
pub mod manager;
pub mod record;

pub use entity::{BasicMobject, EntityHandle, Mobject, Style, VisualState};
pub use manager::{SceneSnapshot, SnapshotId, StateManager};
pub use record::{capture, restore, EntityRecord, RecordError};
