// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene orchestrator.
//!
//! Owns the live entity list, the active play session's timeline, the
//! undo/redo manager, and the frame clock, and funnels both clock
//! sources into one tick path. Within a tick the ordering is a hard
//! contract: entity updaters run before the timeline step, the camera
//! updater runs after it, then the render trigger, then the finish
//! check.

use crate::audio::{AudioSink, NullAudio};
use crate::config::SceneConfig;
use crate::render::{NullRenderer, RenderSink};
use crate::scheduler::FrameClock;
use parking_lot::Mutex;
use playhead_sequencer::{AnimationHandle, Position, Timeline, Wait};
use playhead_state::{EntityHandle, SceneSnapshot, StateManager};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;

/// Scene shared between the host and the frame drivers.
pub type SharedScene = Arc<Mutex<Scene>>;

/// Per-frame camera/view updater, run after the timeline step so that
/// view-follow behavior sees the latest animated positions.
pub type CameraUpdater = Box<dyn FnMut(f64) + Send>;

/// Completion signal for one play session.
///
/// Resolves exactly once when the timeline finishes. When the session
/// is stopped or superseded by a new `play()`, the signal resolves as
/// cancelled instead.
pub struct PlaybackFinished {
    receiver: oneshot::Receiver<()>,
}

impl PlaybackFinished {
    /// Wait for the session to end. Returns true when playback ran to
    /// completion, false when it was stopped or superseded.
    pub async fn wait(self) -> bool {
        self.receiver.await.is_ok()
    }
}

/// The scene: entity list, play session, history, and frame clock.
pub struct Scene {
    entities: Vec<EntityHandle>,
    state: StateManager,
    clock: FrameClock,
    timeline: Option<Timeline>,
    camera_updater: Option<CameraUpdater>,
    renderer: Box<dyn RenderSink>,
    audio: Box<dyn AudioSink>,
    completion: Option<oneshot::Sender<()>>,
    config: SceneConfig,
}

impl Scene {
    /// Create an empty scene with the given configuration.
    pub fn new(config: SceneConfig) -> Self {
        Self {
            entities: Vec::new(),
            state: StateManager::with_max_depth(config.history_depth),
            clock: FrameClock::new(config.target_frame_interval(), config.watchdog_stall()),
            timeline: None,
            camera_updater: None,
            renderer: Box::new(NullRenderer),
            audio: Box::new(NullAudio::default()),
            completion: None,
            config,
        }
    }

    /// Wrap this scene in a shared handle for the frame drivers.
    pub fn shared(self) -> SharedScene {
        Arc::new(Mutex::new(self))
    }

    /// Replace the render sink.
    pub fn set_renderer(&mut self, renderer: Box<dyn RenderSink>) {
        self.renderer = renderer;
    }

    /// Replace the audio sink.
    pub fn set_audio(&mut self, audio: Box<dyn AudioSink>) {
        self.audio = audio;
    }

    /// Install the camera/view updater.
    pub fn set_camera_updater(&mut self, updater: impl FnMut(f64) + Send + 'static) {
        self.camera_updater = Some(Box::new(updater));
    }

    /// Remove the camera/view updater.
    pub fn clear_camera_updater(&mut self) {
        self.camera_updater = None;
    }

    /// Add a top-level entity.
    pub fn add_entity(&mut self, entity: EntityHandle) {
        self.entities.push(entity);
    }

    /// Remove a top-level entity by index.
    pub fn remove_entity(&mut self, index: usize) -> Option<EntityHandle> {
        if index < self.entities.len() {
            Some(self.entities.remove(index))
        } else {
            None
        }
    }

    /// Top-level entities in scene order.
    pub fn entities(&self) -> &[EntityHandle] {
        &self.entities
    }

    /// Number of top-level entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Playback configuration.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Start a play session: the batch runs concurrently on a fresh
    /// timeline and the frame clock starts ticking.
    ///
    /// Precondition: at most one session may be outstanding. Calling
    /// `play` again before the previous completion resolved supersedes
    /// the old session; its completion resolves as cancelled.
    pub fn play(&mut self, animations: Vec<AnimationHandle>) -> PlaybackFinished {
        if self.completion.is_some() {
            tracing::warn!("play() called while a session is outstanding; superseding it");
        }

        let mut timeline = Timeline::new();
        timeline.add_parallel(animations, Position::AfterPrevious);
        timeline.play();
        tracing::info!(
            animations = timeline.animation_count(),
            duration = timeline.duration(),
            "playback started"
        );
        self.timeline = Some(timeline);

        self.audio.seek(0.0);
        self.audio.play();
        self.clock.stop();
        self.clock.start(Instant::now());

        let (sender, receiver) = oneshot::channel();
        // Dropping a stale sender resolves the old future as cancelled
        self.completion = Some(sender);
        PlaybackFinished { receiver }
    }

    /// Play a pure timing hold of the given duration.
    pub fn wait(&mut self, seconds: f64) -> PlaybackFinished {
        self.play(vec![Wait::handle(seconds)])
    }

    /// Stop future ticks, keeping the playback position (resumable).
    pub fn pause(&mut self) {
        if !self.clock.is_running() {
            return;
        }
        self.clock.stop();
        if let Some(timeline) = &mut self.timeline {
            timeline.pause();
        }
        self.audio.pause();
        tracing::info!("playback paused");
    }

    /// Resume a paused session. No-op when already running or when no
    /// session exists.
    pub fn resume(&mut self) {
        if self.clock.is_running() {
            return;
        }
        let Some(timeline) = &mut self.timeline else {
            return;
        };
        timeline.play();
        self.audio.play();
        self.clock.start(Instant::now());
        tracing::info!("playback resumed");
    }

    /// Halt both clocks and reset the playback position to 0. A
    /// pending completion resolves as cancelled.
    pub fn stop(&mut self) {
        self.clock.stop();
        if let Some(timeline) = &mut self.timeline {
            timeline.reset();
        }
        self.audio.stop();
        if self.completion.take().is_some() {
            tracing::info!("playback stopped");
        }
    }

    /// Move the playback position of the active session. A backward
    /// seek un-begins animations whose start is back in the future;
    /// the scene renders once at the new position.
    pub fn seek(&mut self, time: f64) {
        let Some(timeline) = &mut self.timeline else {
            return;
        };
        timeline.seek(time);
        self.audio.seek(timeline.current_time());
        self.renderer.render();
    }

    /// Playback position of the active session, 0 when none exists.
    pub fn current_time(&self) -> f64 {
        self.timeline.as_ref().map_or(0.0, Timeline::current_time)
    }

    /// Whether the frame clock is currently ticking.
    pub fn is_playing(&self) -> bool {
        self.clock.is_running()
    }

    /// Animations of the current session flagged as removers; the host
    /// drops their entities after the session completes.
    pub fn remover_animations(&self) -> Vec<AnimationHandle> {
        self.timeline
            .as_ref()
            .map(Timeline::remover_animations)
            .unwrap_or_default()
    }

    /// Foreground clock entry point, called once per host animation
    /// frame. Returns whether the clock is still running.
    pub fn frame_tick(&mut self, now: Instant) -> bool {
        if let Some(dt) = self.clock.frame_elapsed(now) {
            self.process_tick(dt);
        }
        self.clock.is_running()
    }

    /// Background watchdog entry point, called from a coarse timer
    /// that keeps firing when the tab is backgrounded. Performs the
    /// same tick as the foreground clock, but only after a stall.
    /// Returns whether the clock is still running.
    pub fn watchdog_tick(&mut self, now: Instant) -> bool {
        if let Some(dt) = self.clock.stalled_elapsed(now) {
            tracing::debug!(dt, "watchdog tick");
            self.process_tick(dt);
        }
        self.clock.is_running()
    }

    /// Empty the undo and redo stacks. Named checkpoints are kept.
    pub fn clear_history(&mut self) {
        self.state.clear_history();
    }

    /// Capture the current scene onto the undo stack. Invalidates the
    /// redo branch.
    pub fn save_state(&mut self, label: Option<&str>) -> SceneSnapshot {
        self.state.save(&self.entities, label)
    }

    /// Undo one step and render. Returns false when there is nothing
    /// to undo. Pause or stop playback before calling.
    pub fn undo(&mut self) -> bool {
        self.warn_if_playing("undo");
        let applied = self.state.undo(&self.entities);
        if applied {
            self.renderer.render();
        }
        applied
    }

    /// Redo one step and render. Returns false when there is nothing
    /// to redo. Pause or stop playback before calling.
    pub fn redo(&mut self) -> bool {
        self.warn_if_playing("redo");
        let applied = self.state.redo(&self.entities);
        if applied {
            self.renderer.render();
        }
        applied
    }

    /// Capture the current scene without touching the undo chain.
    pub fn get_state(&self, label: Option<&str>) -> SceneSnapshot {
        self.state.get_state(&self.entities, label)
    }

    /// Apply a snapshot without touching the undo chain, then render.
    pub fn set_state(&mut self, snapshot: &SceneSnapshot) {
        self.warn_if_playing("set_state");
        self.state.set_state(snapshot, &self.entities);
        self.renderer.render();
    }

    /// Save a named checkpoint outside the undo chain.
    pub fn checkpoint(&mut self, name: impl Into<String>) {
        self.state.save_checkpoint(name, &self.entities);
    }

    /// Restore a named checkpoint and render. Returns false when no
    /// checkpoint of that name exists.
    pub fn restore_checkpoint(&mut self, name: &str) -> bool {
        self.warn_if_playing("restore_checkpoint");
        let applied = self.state.restore_checkpoint(name, &self.entities);
        if applied {
            self.renderer.render();
        }
        applied
    }

    /// Undo/redo manager, for host UIs that surface history depth.
    pub fn state_manager(&self) -> &StateManager {
        &self.state
    }

    /// One logical tick. The ordering here is the contract: entity
    /// updaters, timeline step, camera updater, render, finish check.
    fn process_tick(&mut self, dt: f64) {
        for entity in &self.entities {
            entity.lock().update(dt);
        }

        let Some(timeline) = &mut self.timeline else {
            self.renderer.render();
            return;
        };
        timeline.update(dt);
        let current_time = timeline.current_time();

        if let Some(camera) = &mut self.camera_updater {
            camera(current_time);
        }

        self.renderer.render();

        if timeline.is_finished() {
            self.finish_playback();
        }
    }

    /// End the current session: stop the clocks, pause audio, and
    /// resolve the pending completion exactly once.
    fn finish_playback(&mut self) {
        self.clock.stop();
        self.audio.pause();
        if let Some(sender) = self.completion.take() {
            // The receiver may already have been dropped by the host
            let _ = sender.send(());
        }
        tracing::info!(
            removers = self.remover_animations().len(),
            "playback finished"
        );
    }

    fn warn_if_playing(&self, operation: &str) {
        if self.clock.is_running() {
            tracing::warn!(operation, "state operation while playback is running; pause or stop first");
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}
