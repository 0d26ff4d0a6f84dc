use std::sync::mpsc::Sender;

use crate::audio::{AudioCmd, ProgressEvent, ProgressSubscription, SeekSerial};

/// Transport view-model for one track's detail view.
///
/// The surface never owns the audio handle; it holds a progress
/// subscription and a clone of the command channel, so it works the same
/// whether or not the shell that mounted it is still around.
pub struct PlayerSurface {
    track_index: usize,
    /// Authoritative duration in seconds, from the catalog. `None` disables
    /// scrubbing (the range would be meaningless).
    duration: Option<f64>,
    /// Displayed elapsed seconds. Optimistically updated on scrub, clamped
    /// to the duration for display.
    elapsed: f64,
    /// Serial of the last seek this surface issued. Progress events carrying
    /// an older serial predate the seek and are ignored.
    last_issued_seek: u64,
    serial: SeekSerial,
    commands: Sender<AudioCmd>,
    subscription: ProgressSubscription,
}

impl PlayerSurface {
    pub fn mount(
        track_index: usize,
        duration_secs: Option<f64>,
        initial_elapsed_secs: f64,
        subscription: ProgressSubscription,
        serial: SeekSerial,
        commands: Sender<AudioCmd>,
    ) -> Self {
        let elapsed = match duration_secs {
            Some(d) => initial_elapsed_secs.clamp(0.0, d),
            None => initial_elapsed_secs.max(0.0),
        };
        Self {
            track_index,
            duration: duration_secs,
            elapsed,
            last_issued_seek: 0,
            serial,
            commands,
            subscription,
        }
    }

    pub fn track_index(&self) -> usize {
        self.track_index
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.duration
    }

    pub fn remaining_secs(&self) -> Option<f64> {
        self.duration.map(|d| (d - self.elapsed).max(0.0))
    }

    /// Scrub-bar fill in `[0, 1]`; 0 when the duration is unknown.
    pub fn ratio(&self) -> f64 {
        match self.duration {
            Some(d) if d > 0.0 => (self.elapsed / d).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    pub fn can_scrub(&self) -> bool {
        self.duration.is_some()
    }

    /// Drain queued progress notifications and fold them into the displayed
    /// time. Called once per UI frame.
    pub fn poll(&mut self) {
        for event in self.subscription.drain() {
            self.apply_progress(event);
        }
    }

    pub(super) fn apply_progress(&mut self, event: ProgressEvent) {
        // A notification that predates our last seek would drag the display
        // back to the pre-scrub position; drop it.
        if event.seek_serial < self.last_issued_seek {
            return;
        }
        // The surface stays bound to its track even if playback moved on.
        if event.index != Some(self.track_index) {
            return;
        }
        let secs = event.elapsed.as_secs_f64();
        self.elapsed = match self.duration {
            Some(d) => secs.min(d),
            None => secs,
        };
    }

    /// Jump to an absolute position: update the display immediately, then
    /// ask the audio thread to follow.
    pub fn scrub_to(&mut self, target_secs: f64) {
        let Some(d) = self.duration else {
            return;
        };
        let target = if target_secs.is_finite() {
            target_secs.clamp(0.0, d)
        } else {
            0.0
        };

        self.elapsed = target;
        let serial = self.serial.next();
        self.last_issued_seek = serial;
        let _ = self.commands.send(AudioCmd::Seek {
            secs: target,
            serial,
        });
    }

    pub fn scrub_by(&mut self, delta_secs: f64) {
        self.scrub_to(self.elapsed + delta_secs);
    }

    /// Pause when currently playing, resume otherwise. One command per
    /// call; the shell routes its play/pause gesture here while the detail
    /// view is open so the pill and the surface can never double-toggle.
    pub fn toggle_play(&self, currently_playing: bool) {
        let cmd = if currently_playing {
            AudioCmd::Pause
        } else {
            AudioCmd::Resume
        };
        let _ = self.commands.send(cmd);
    }
}
