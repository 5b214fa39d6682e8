// SPDX-License-Identifier: MIT OR Apache-2.0
//! Audio transport contract.
//!
//! The audio subsystem runs its own timeline; the scene keeps it
//! aligned with playback transitions (seek to 0 and play when a
//! session starts, pause/stop mirrored). The sequencer's timeline has
//! no audio awareness of its own.

/// Transport controls of the sibling audio timeline.
pub trait AudioSink: Send {
    /// Jump the audio timeline to `time` seconds.
    fn seek(&mut self, time: f64);

    /// Start or resume audio playback.
    fn play(&mut self);

    /// Pause audio playback, keeping the position.
    fn pause(&mut self);

    /// Stop audio playback and return to the start.
    fn stop(&mut self);

    /// Whether audio is currently playing.
    fn is_playing(&self) -> bool;
}

/// Audio sink that tracks transport state but produces no sound;
/// the default when no audio subsystem is attached.
#[derive(Debug, Default)]
pub struct NullAudio {
    playing: bool,
    position: f64,
}

impl NullAudio {
    /// Current transport position in seconds.
    pub fn position(&self) -> f64 {
        self.position
    }
}

impl AudioSink for NullAudio {
    fn seek(&mut self, time: f64) {
        self.position = time.max(0.0);
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.position = 0.0;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_audio_transport_state() {
        let mut audio = NullAudio::default();
        audio.seek(2.0);
        audio.play();
        assert!(audio.is_playing());
        assert_eq!(audio.position(), 2.0);

        audio.pause();
        assert!(!audio.is_playing());
        assert_eq!(audio.position(), 2.0);

        audio.stop();
        assert_eq!(audio.position(), 0.0);
    }
}
