// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline sequencer for the Playhead engine.
//!
//! This crate maps a declarative add-order of animations onto absolute
//! start/end times and tracks the playback position:
//! - Relative/absolute placement tokens (`'>'`, `'<'`, `'+=N'`, `'-=N'`,
//!   absolute seconds)
//! - Scheduled animation records with one-time begin marking
//! - Seek with backward-seek re-trigger semantics
//!
//! ## Architecture
//!
//! A [`Timeline`] is built fresh for every play session and discarded
//! when the session ends. Animations are consumed purely through the
//! [`Animation`] capability trait; concrete behaviors (fade, transform,
//! create, ...) live in the host's animation layer.

pub mod animation;
pub mod position;
pub mod timeline;

pub use animation::{Animation, AnimationHandle, Wait};
pub use position::Position;
pub use timeline::{ScheduledAnimation, Timeline};
