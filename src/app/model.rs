//! Application model types: `App` and `PlaybackState`.

use std::sync::mpsc::Sender;

use crate::audio::{AudioCmd, PlaybackHandle};
use crate::library::Track;
use crate::surface::PlayerSurface;

/// The playback state of the application.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing has been selected yet this session.
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Result of a selection gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// The track was already current; nothing to do.
    Unchanged,
    /// A different track became current and must be loaded.
    Switched,
}

/// The main application model.
///
/// `current` (what is playing) and `open_detail` (what is being looked at)
/// are deliberately independent: closing the detail view must never touch
/// playback, and the pill can reopen the detail view for whatever is
/// current.
pub struct App {
    pub tracks: Vec<Track>,
    /// Grid cursor.
    pub selected: usize,
    /// Currently playing/loaded track, if any.
    pub current: Option<usize>,
    pub playback: PlaybackState,
    /// Track whose detail view is open, if any.
    pub open_detail: Option<usize>,
    pub playback_handle: Option<PlaybackHandle>,
}

impl App {
    /// Create a new `App` over the provided catalog.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: 0,
            current: None,
            playback: PlaybackState::Idle,
            open_detail: None,
            playback_handle: None,
        }
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn open_track(&self) -> Option<&Track> {
        self.open_detail.and_then(|i| self.tracks.get(i))
    }

    pub fn detail_open(&self) -> bool {
        self.open_detail.is_some()
    }

    /// Make the track at `idx` current. Identity is the title key: selecting
    /// the track that is already current is ignored, so a repeated gesture
    /// cannot restart playback. Selecting anything else replaces the current
    /// track and marks the session playing; the caller issues the actual
    /// load command. Never opens the detail view.
    pub fn select_track(&mut self, idx: usize) -> Selection {
        if idx >= self.tracks.len() {
            return Selection::Unchanged;
        }

        let same = self
            .current
            .map(|cur| self.tracks[cur].title == self.tracks[idx].title)
            .unwrap_or(false);
        if same {
            return Selection::Unchanged;
        }

        self.current = Some(idx);
        self.playback = PlaybackState::Playing;
        Selection::Switched
    }

    /// The selection gesture: make `idx` current and, when that actually
    /// switched tracks, queue exactly one load command. The audio thread
    /// stops the old sink before touching the new source.
    pub fn play_track(&mut self, idx: usize, commands: &Sender<AudioCmd>) {
        if self.select_track(idx) == Selection::Switched {
            let _ = commands.send(AudioCmd::Load(idx));
        }
    }

    /// The play/pause gesture. While the detail view is open its surface
    /// carries the command; otherwise the command goes straight to the
    /// audio thread. Either way the playing state flips exactly once, and
    /// both the pill and any remote control funnel through here, so the two
    /// trigger points cannot double-toggle.
    pub fn toggle_play_pause(
        &mut self,
        surface: Option<&PlayerSurface>,
        commands: &Sender<AudioCmd>,
    ) {
        match self.playback {
            // Nothing has ever been loaded; pause/resume would be no-ops.
            PlaybackState::Idle => {}
            PlaybackState::Playing => {
                match surface {
                    Some(s) => s.toggle_play(true),
                    None => {
                        let _ = commands.send(AudioCmd::Pause);
                    }
                }
                self.playback = PlaybackState::Paused;
            }
            PlaybackState::Paused => {
                match surface {
                    Some(s) => s.toggle_play(false),
                    None => {
                        let _ = commands.send(AudioCmd::Resume);
                    }
                }
                self.playback = PlaybackState::Playing;
            }
        }
    }

    /// Show the detail view for `idx`. Playback is unaffected.
    pub fn open_details(&mut self, idx: usize) {
        if idx < self.tracks.len() {
            self.open_detail = Some(idx);
        }
    }

    /// Close the detail view. Playback is unaffected; this is the design
    /// decision that keeps music running across incidental navigation.
    pub fn close_details(&mut self) {
        self.open_detail = None;
    }

    /// Pill activation: open the detail view for whatever is current.
    /// Returns whether a view was opened.
    pub fn open_now_playing(&mut self) -> bool {
        match self.current {
            Some(idx) => {
                self.open_details(idx);
                true
            }
            None => false,
        }
    }

    /// Move the grid cursor down, wrapping.
    pub fn next(&mut self) {
        if !self.tracks.is_empty() {
            self.selected = (self.selected + 1) % self.tracks.len();
        }
    }

    /// Move the grid cursor up, wrapping.
    pub fn prev(&mut self) {
        if !self.tracks.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.tracks.len() - 1);
        }
    }

    /// Catalog index after the current track, if any.
    pub fn next_after_current(&self) -> Option<usize> {
        self.current.map(|i| i + 1).filter(|&n| n < self.tracks.len())
    }

    /// Catalog index before the current track, if any.
    pub fn prev_before_current(&self) -> Option<usize> {
        self.current.and_then(|i| i.checked_sub(1))
    }
}
