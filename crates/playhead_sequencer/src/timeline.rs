// SPDX-License-Identifier: MIT OR Apache-2.0
//! The timeline: resolves placement tokens into absolute start/end
//! times and drives scheduled animations as the playback position
//! advances.

use crate::animation::AnimationHandle;
use crate::position::Position;

/// One animation placed on the timeline.
///
/// Insertion order doubles as the priority order for tie-breaks when
/// several entries share a start time.
#[derive(Clone)]
pub struct ScheduledAnimation {
    /// Shared animation object (shared with the caller, not owned)
    pub animation: AnimationHandle,
    /// Absolute start time in seconds
    pub start_time: f64,
    /// `start_time` plus the animation's duration, derived at
    /// scheduling time
    pub end_time: f64,
    /// Whether the one-time begin signal has been delivered
    started: bool,
}

impl ScheduledAnimation {
    /// Whether this entry has crossed its start time and received its
    /// begin signal.
    pub fn started(&self) -> bool {
        self.started
    }
}

/// Sequencer for one play session.
///
/// Built fresh per `play()` call, mutated while the session runs, and
/// discarded when the session ends. All inputs are defensively
/// clamped; there is no error path.
#[derive(Default)]
pub struct Timeline {
    scheduled: Vec<ScheduledAnimation>,
    duration: f64,
    current_time: f64,
    playing: bool,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `position` to an absolute start time and append the
    /// animation, extending the total duration if needed.
    pub fn add(
        &mut self,
        animation: AnimationHandle,
        position: impl Into<Position>,
    ) -> &mut Self {
        let start_time = self.resolve_start(position.into());
        self.push_scheduled(animation, start_time);
        self
    }

    /// Resolve one start time from `position` and apply it to every
    /// animation in the batch, so they all run concurrently.
    pub fn add_parallel(
        &mut self,
        animations: Vec<AnimationHandle>,
        position: impl Into<Position>,
    ) -> &mut Self {
        let start_time = self.resolve_start(position.into());
        for animation in animations {
            self.push_scheduled(animation, start_time);
        }
        self
    }

    /// Move the playback position, clamped to `[0, duration]`.
    ///
    /// On a backward seek, every entry whose start time is still in the
    /// future relative to the new position is reset and un-begun, so
    /// replaying forward re-triggers begin semantics instead of leaving
    /// the animation in a stale finished state. Still-relevant entries
    /// are then updated to reflect the new position.
    pub fn seek(&mut self, time: f64) -> &mut Self {
        let time = clamp_time(time, self.duration);
        if time < self.current_time {
            for entry in &mut self.scheduled {
                if entry.start_time > time {
                    entry.animation.lock().reset();
                    entry.started = false;
                }
            }
        }
        self.current_time = time;
        self.update_animations_at(time);
        self
    }

    /// Advance the playback position by `dt` seconds. No-op unless
    /// playing; reaching the total duration clamps and stops playback.
    pub fn update(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        self.current_time = clamp_time(self.current_time + dt, self.duration);
        if self.current_time >= self.duration {
            self.playing = false;
        }
        self.update_animations_at(self.current_time);
    }

    /// Start advancing on `update` calls. Does not touch the position.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Stop advancing on `update` calls. Does not touch the position.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Return to time 0, stop playing, and reset every scheduled
    /// animation to its not-yet-begun state.
    pub fn reset(&mut self) {
        self.current_time = 0.0;
        self.playing = false;
        for entry in &mut self.scheduled {
            entry.animation.lock().reset();
            entry.started = false;
        }
    }

    /// Whether the playback position has reached the total duration.
    pub fn is_finished(&self) -> bool {
        self.current_time >= self.duration
    }

    /// Whether `update` calls currently advance the position.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current playback position in seconds.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Total duration: the maximum end time over all scheduled entries.
    /// Monotonically non-decreasing as animations are added.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Scheduled entries in insertion order.
    pub fn scheduled(&self) -> &[ScheduledAnimation] {
        &self.scheduled
    }

    /// Number of scheduled entries.
    pub fn animation_count(&self) -> usize {
        self.scheduled.len()
    }

    /// Handles of animations flagged as removers; the host drops their
    /// entities once the owning play session completes.
    pub fn remover_animations(&self) -> Vec<AnimationHandle> {
        self.scheduled
            .iter()
            .filter(|entry| entry.animation.lock().is_remover())
            .map(|entry| entry.animation.clone())
            .collect()
    }

    fn resolve_start(&self, position: Position) -> f64 {
        let (prev_start, prev_end) = match self.scheduled.last() {
            Some(prev) => (prev.start_time, prev.end_time),
            None => (0.0, 0.0),
        };
        position.resolve(prev_start, prev_end)
    }

    fn push_scheduled(&mut self, animation: AnimationHandle, start_time: f64) {
        let duration = animation.lock().duration().max(0.0);
        let end_time = start_time + duration;
        self.scheduled.push(ScheduledAnimation {
            animation,
            start_time,
            end_time,
            started: false,
        });
        // max() keeps the total duration from ever shrinking on add
        self.duration = self.duration.max(end_time);
    }

    /// Activation pass: begin-mark and update every entry the playback
    /// position has reached.
    fn update_animations_at(&mut self, time: f64) {
        for entry in &mut self.scheduled {
            if time < entry.start_time {
                continue;
            }
            let mut animation = entry.animation.lock();
            if !entry.started {
                // First touch: assign the resolved start time and
                // deliver the one-time begin signal.
                animation.set_start_time(entry.start_time);
                animation.begin();
                entry.started = true;
            }
            // Entries keep receiving updates past their nominal end
            // while they self-report unfinished; this covers
            // variable-duration and externally-driven animations.
            if time <= entry.end_time || !animation.is_finished() {
                animation.update(time - entry.start_time);
            }
        }
    }
}

/// Clamp a time value into `[0, duration]`; NaN collapses to 0.
fn clamp_time(time: f64, duration: f64) -> f64 {
    if time.is_nan() {
        return 0.0;
    }
    time.clamp(0.0, duration.max(0.0))
}
