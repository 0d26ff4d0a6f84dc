//! Audio-related small types and handles.

use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Stop whatever is playing, load the track at the given catalog index
    /// and start playing it. Loading the same, already-playing track is a
    /// no-op.
    Load(usize),
    /// Pause the current sink; no-op when nothing is loaded.
    Pause,
    /// Resume the current sink; no-op when nothing is loaded.
    Resume,
    /// Jump to an absolute position. The caller clamps `secs` to the
    /// track's authoritative duration; the audio thread only knows what the
    /// decoder gives it. `serial` is echoed back in progress events so the
    /// UI can tell pre-seek notifications from post-seek ones.
    Seek { secs: f64, serial: u64 },
    /// Quit the audio thread, optionally fading out over `fade_out_ms`.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    /// Currently loaded track index in the catalog (if any).
    pub index: Option<usize>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Set when the most recent load failed; cleared by the next load.
    pub load_error: Option<String>,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            index: None,
            elapsed: Duration::ZERO,
            playing: false,
            load_error: None,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// One progress notification, published on a fixed cadence and after every
/// state change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    pub index: Option<usize>,
    pub elapsed: Duration,
    pub playing: bool,
    /// Serial of the last seek the audio thread has applied. Events with an
    /// older serial than a subscriber's last issued seek are stale.
    pub seek_serial: u64,
}
