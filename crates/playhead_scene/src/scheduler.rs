// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cooperative frame pacing.
//!
//! Two independent clock sources feed the same tick path:
//! - The foreground clock is the host's per-frame callback
//!   (animation-frame style). Hosting browsers suspend it when the tab
//!   is backgrounded.
//! - The background watchdog is a coarse timer that keeps firing
//!   regardless of tab visibility. It performs a tick only when the
//!   foreground clock has stalled past a threshold, so at most one
//!   clock performs any given logical tick.
//!
//! All clock state lives in one [`FrameClock`] instance; multiple
//! scenes can run side by side without cross-talk.

use crate::scene::SharedScene;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Fraction of the target frame interval that must elapse before a
/// foreground tick is processed. Caps the effective frame rate below
/// the display's native rate without busy-waiting.
const THROTTLE_FACTOR: f64 = 0.9;

/// Shared pacing state for the foreground and background clocks.
#[derive(Debug)]
pub struct FrameClock {
    running: bool,
    last_tick: Option<Instant>,
    target_frame_interval: Duration,
    watchdog_stall: Duration,
}

impl FrameClock {
    /// Create a stopped clock.
    pub fn new(target_frame_interval: Duration, watchdog_stall: Duration) -> Self {
        Self {
            running: false,
            last_tick: None,
            target_frame_interval,
            watchdog_stall,
        }
    }

    /// Start ticking from `now`. No-op when already running.
    pub fn start(&mut self, now: Instant) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_tick = Some(now);
    }

    /// Stop ticking. No-op when already stopped.
    pub fn stop(&mut self) {
        self.running = false;
        self.last_tick = None;
    }

    /// Whether the clock is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Foreground gate. Returns the elapsed seconds to process, or
    /// `None` when stopped or when the elapsed time is still under the
    /// throttle threshold (the tick is skipped entirely, with no state
    /// mutation).
    pub fn frame_elapsed(&mut self, now: Instant) -> Option<f64> {
        if !self.running {
            return None;
        }
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return None;
        };
        let elapsed = now.saturating_duration_since(last);
        if elapsed.as_secs_f64() < THROTTLE_FACTOR * self.target_frame_interval.as_secs_f64() {
            return None;
        }
        self.last_tick = Some(now);
        Some(elapsed.as_secs_f64())
    }

    /// Background watchdog gate. Acts only when the foreground clock
    /// has not processed a tick for longer than the stall threshold.
    /// Shares `last_tick` with the foreground gate, so the two never
    /// process the same logical tick.
    pub fn stalled_elapsed(&mut self, now: Instant) -> Option<f64> {
        if !self.running {
            return None;
        }
        let last = self.last_tick?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.watchdog_stall {
            return None;
        }
        self.last_tick = Some(now);
        Some(elapsed.as_secs_f64())
    }
}

/// Drive a scene's cooperative loop until the current play session
/// stops the clock.
///
/// Intended for headless and automated playback; a browser host calls
/// [`Scene::frame_tick`](crate::Scene::frame_tick) and
/// [`Scene::watchdog_tick`](crate::Scene::watchdog_tick) from its own
/// timers instead. Each tick runs to completion under the scene lock
/// before the loop yields.
pub async fn drive(scene: &SharedScene) {
    let (frame_interval, watchdog_interval) = {
        let scene = scene.lock();
        (
            scene.config().target_frame_interval(),
            scene.config().watchdog_interval(),
        )
    };

    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut watchdog = tokio::time::interval(watchdog_interval);
    watchdog.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = frames.tick() => {
                if !scene.lock().frame_tick(Instant::now()) {
                    break;
                }
            }
            _ = watchdog.tick() => {
                if !scene.lock().watchdog_tick(Instant::now()) {
                    break;
                }
            }
        }
    }
}
