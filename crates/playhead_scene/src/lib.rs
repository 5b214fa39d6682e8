// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene orchestrator and cooperative playback scheduler for the
//! Playhead engine.
//!
//! This crate ties the sequencer and the snapshot layer together:
//! - A [`Scene`] owning the entity list, the active timeline, and the
//!   undo/redo manager
//! - A dual-clock frame scheduler (foreground frame callbacks plus a
//!   coarse background watchdog for throttled tabs)
//! - Render and audio sink contracts
//!
//! ## Architecture
//!
//! Scheduling is single-threaded cooperative: each tick runs entity
//! updaters, the timeline step, the camera updater, a render trigger,
//! and a finish check synchronously to completion before yielding. The
//! only suspension points are between ticks.

pub mod audio;
pub mod config;
pub mod render;
pub mod scene;
pub mod scheduler;

pub use audio::{AudioSink, NullAudio};
pub use config::SceneConfig;
pub use render::{NullRenderer, RenderSink};
pub use scene::{CameraUpdater, PlaybackFinished, Scene, SharedScene};
pub use scheduler::{drive, FrameClock};

pub use playhead_sequencer::{Animation, AnimationHandle, Position, Timeline, Wait};
pub use playhead_state::{
    BasicMobject, EntityHandle, EntityRecord, Mobject, SceneSnapshot, StateManager, Style,
    VisualState,
};
