use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::{AudioSettings, PlaybackSettings};
use crate::library::Track;

use super::progress::{ProgressBus, ProgressSubscription};
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Monotonic seek-serial source, shared between the facade and any surface
/// that issues seeks. Serial 0 is the "no seek yet" baseline.
#[derive(Clone, Default)]
pub struct SeekSerial(Arc<AtomicU64>);

impl SeekSerial {
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Facade over the audio thread: the one playback handle for the session.
///
/// Views come and go; this stays alive from startup to quit, which is what
/// keeps audio running across detail-view open/close.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    progress: ProgressBus,
    seek_serial: SeekSerial,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(
        tracks: Vec<Track>,
        audio_settings: AudioSettings,
        playback_settings: PlaybackSettings,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let progress = ProgressBus::new();

        let audio_handle = spawn_audio_thread(
            tracks,
            rx,
            playback_info.clone(),
            progress.clone(),
            audio_settings,
            playback_settings,
        );

        Self {
            tx,
            playback: playback_info,
            progress,
            seek_serial: SeekSerial::default(),
            join: Mutex::new(Some(audio_handle)),
        }
    }

    /// Shared snapshot of playback state, for read sites that only need the
    /// latest values (the now-playing pill).
    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    /// Register a progress observer; dropping the subscription removes it.
    pub fn subscribe_progress(&self) -> ProgressSubscription {
        self.progress.subscribe()
    }

    /// The command channel. Surfaces hold a clone so they can drive
    /// transport without reaching back into the shell.
    pub fn commands(&self) -> Sender<AudioCmd> {
        self.tx.clone()
    }

    pub fn seek_serial(&self) -> SeekSerial {
        self.seek_serial.clone()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
