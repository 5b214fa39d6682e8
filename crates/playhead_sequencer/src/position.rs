// SPDX-License-Identifier: MIT OR Apache-2.0
//! Relative and absolute placement tokens for timeline composition.

use serde::{Deserialize, Serialize};

/// Where a new animation starts relative to the previous entry.
///
/// The string forms accepted by [`Position::parse`] mirror the
/// authoring syntax: `">"` (sequential, the default), `"<"` (parallel
/// with the previous entry), `"+=N"` / `"-=N"` (offset from the
/// previous end), or a bare non-negative number (absolute seconds).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Position {
    /// Absolute time in seconds, clamped to >= 0
    At(f64),
    /// Start at the previous animation's end (sequential composition)
    #[default]
    AfterPrevious,
    /// Start together with the previous animation's start
    WithPrevious,
    /// Offset in seconds from the previous animation's end; a negative
    /// offset clamps the result to >= 0
    Offset(f64),
}

impl Position {
    /// Parse a position token. Parsing never fails: a malformed token
    /// logs a warning and falls back to sequential placement.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match token {
            ">" => return Self::AfterPrevious,
            "<" => return Self::WithPrevious,
            _ => {}
        }
        if let Some(rest) = token.strip_prefix("+=") {
            if let Ok(offset) = rest.trim().parse::<f64>() {
                if offset.is_finite() {
                    return Self::Offset(offset);
                }
            }
        } else if let Some(rest) = token.strip_prefix("-=") {
            if let Ok(offset) = rest.trim().parse::<f64>() {
                if offset.is_finite() {
                    return Self::Offset(-offset);
                }
            }
        } else if let Ok(time) = token.parse::<f64>() {
            if time.is_finite() {
                return Self::At(time.max(0.0));
            }
        }
        tracing::warn!(token, "malformed position token, falling back to sequential placement");
        Self::AfterPrevious
    }

    /// Resolve to an absolute start time given the previous entry's
    /// start and end times (both 0 on an empty timeline).
    pub fn resolve(self, prev_start: f64, prev_end: f64) -> f64 {
        match self {
            Self::At(time) => time.max(0.0),
            Self::AfterPrevious => prev_end,
            Self::WithPrevious => prev_start,
            Self::Offset(offset) => (prev_end + offset).max(0.0),
        }
    }
}

impl From<f64> for Position {
    fn from(time: f64) -> Self {
        Self::At(time.max(0.0))
    }
}

impl From<&str> for Position {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}
