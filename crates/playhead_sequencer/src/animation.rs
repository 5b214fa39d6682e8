// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation capability contract consumed by the timeline.

use parking_lot::Mutex;
use std::sync::Arc;

/// Shared handle to an animation object.
///
/// The animation is shared between the timeline and the caller that
/// constructed it; the scheduled record owns the placement, not the
/// animation itself.
pub type AnimationHandle = Arc<Mutex<dyn Animation + Send>>;

/// Capability set the timeline needs from an animation.
///
/// A time-bounded behavior that mutates entity state as a function of
/// elapsed local time. The timeline delivers local time (timeline time
/// minus the assigned start time); how the animation maps that onto an
/// alpha or visual change is its own business.
pub trait Animation {
    /// Nominal duration in seconds.
    fn duration(&self) -> f64;

    /// One-time begin signal, delivered when the playback position
    /// first crosses the assigned start time.
    fn begin(&mut self);

    /// Per-tick update with the local time in seconds. May be called
    /// past the nominal duration while [`Animation::is_finished`]
    /// reports false.
    fn update(&mut self, local_time: f64);

    /// Whether the animation considers itself complete. Indefinite or
    /// externally-driven animations may report false past their nominal
    /// end and keep receiving updates.
    fn is_finished(&self) -> bool;

    /// When true, the host removes the animated entity from the scene
    /// once the owning play session completes.
    fn is_remover(&self) -> bool {
        false
    }

    /// Start time assigned by the timeline at first touch.
    fn start_time(&self) -> f64;

    /// Assign the resolved start time.
    fn set_start_time(&mut self, time: f64);

    /// Return to the not-yet-begun state. Delivered on a backward seek
    /// past the start time and on timeline reset; must be idempotent.
    fn reset(&mut self);
}

/// A pure timing hold with no visual effect.
///
/// The one concrete animation that belongs to the sequencing layer
/// itself; `scene.wait(1.0)` plays one of these.
#[derive(Debug, Clone)]
pub struct Wait {
    duration: f64,
    start_time: f64,
    elapsed: f64,
    begun: bool,
}

impl Wait {
    /// Create a hold of the given duration (clamped to >= 0).
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            start_time: 0.0,
            elapsed: 0.0,
            begun: false,
        }
    }

    /// Create a hold already wrapped in a shared handle.
    pub fn handle(duration: f64) -> AnimationHandle {
        Arc::new(Mutex::new(Self::new(duration)))
    }
}

impl Animation for Wait {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn begin(&mut self) {
        self.begun = true;
    }

    fn update(&mut self, local_time: f64) {
        self.elapsed = local_time.max(0.0);
    }

    fn is_finished(&self) -> bool {
        self.begun && self.elapsed >= self.duration
    }

    fn start_time(&self) -> f64 {
        self.start_time
    }

    fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    fn reset(&mut self) {
        self.begun = false;
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_finishes_at_duration() {
        let mut wait = Wait::new(1.0);
        assert!(!wait.is_finished());

        wait.begin();
        wait.update(0.5);
        assert!(!wait.is_finished());

        wait.update(1.0);
        assert!(wait.is_finished());
    }

    #[test]
    fn test_wait_reset_unbegins() {
        let mut wait = Wait::new(0.5);
        wait.begin();
        wait.update(1.0);
        assert!(wait.is_finished());

        wait.reset();
        assert!(!wait.is_finished());
    }

    #[test]
    fn test_negative_duration_clamps_to_zero() {
        let wait = Wait::new(-3.0);
        assert_eq!(wait.duration(), 0.0);
    }
}
