// SPDX-License-Identifier: MIT OR Apache-2.0
//! Runtime configuration for a scene's playback loop.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback loop settings.
///
/// Values are defensively clamped on use; a nonsense frame rate never
/// produces a zero or negative interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Target frame rate for the foreground clock
    pub frame_rate: f64,
    /// Maximum undo history depth
    pub history_depth: usize,
    /// Background watchdog firing interval in milliseconds
    pub watchdog_interval_ms: u64,
    /// Foreground stall threshold in milliseconds before the watchdog
    /// takes over a tick
    pub watchdog_stall_ms: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            history_depth: 50,
            watchdog_interval_ms: 100,
            watchdog_stall_ms: 200,
        }
    }
}

impl SceneConfig {
    /// Interval between foreground ticks at the target frame rate.
    pub fn target_frame_interval(&self) -> Duration {
        let rate = if self.frame_rate.is_finite() {
            self.frame_rate.clamp(1.0, 240.0)
        } else {
            60.0
        };
        Duration::from_secs_f64(1.0 / rate)
    }

    /// Interval between background watchdog checks.
    pub fn watchdog_interval(&self) -> Duration {
        Duration::from_millis(self.watchdog_interval_ms.max(1))
    }

    /// Foreground stall threshold before the watchdog acts.
    pub fn watchdog_stall(&self) -> Duration {
        Duration::from_millis(self.watchdog_stall_ms.max(1))
    }
}
