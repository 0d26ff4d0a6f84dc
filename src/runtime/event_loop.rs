use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, PlaybackState};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::surface::PlayerSurface;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// The mounted detail-view surface; present exactly while the detail
    /// view is open. Dropping it releases its progress subscription.
    pub surface: Option<PlayerSurface>,
    /// A selection sent to the audio thread but not yet visible in its
    /// published state. While set, the snapshot sync must not undo the
    /// optimistic switch.
    pub pending_select: Option<usize>,
    /// Last-known playing index as emitted to MPRIS.
    pub last_mpris_index: Option<usize>,
    /// Last-known playback state as emitted to MPRIS.
    pub last_mpris_playback: PlaybackState,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App) -> Self {
        Self {
            surface: None,
            pending_select: None,
            last_mpris_index: None,
            last_mpris_playback: app.playback,
        }
    }
}

fn do_select(
    app: &mut App,
    state: &mut EventLoopState,
    commands: &mpsc::Sender<AudioCmd>,
    idx: usize,
) {
    state.pending_select = Some(idx);
    app.play_track(idx, commands);
}

/// Main terminal event loop: handles input, UI drawing, sync with the audio
/// thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let commands = audio_player.commands();

    loop {
        // Sync playback state from the audio thread.
        let mut playback_index_snapshot: Option<usize> = None;
        let mut elapsed_snapshot = 0.0_f64;
        if let Some(handle) = app.playback_handle.as_ref().cloned() {
            if let Ok(info) = handle.lock() {
                playback_index_snapshot = info.index;
                let is_playing = info.playing;
                elapsed_snapshot = info.elapsed.as_secs_f64();
                drop(info);

                if let Some(idx) = playback_index_snapshot {
                    if state.pending_select == Some(idx) {
                        state.pending_select = None;
                    }
                    if state.pending_select.is_none() {
                        // Follow the audio thread: auto-advance changes the
                        // current track without any gesture.
                        if app.current != Some(idx) {
                            app.current = Some(idx);
                        }
                        app.playback = if is_playing {
                            PlaybackState::Playing
                        } else {
                            PlaybackState::Paused
                        };
                    }
                }
            }
        }

        // Detail-view surface lifecycle: mount while open, drop on close.
        match app.open_detail {
            Some(idx) => {
                let stale = state
                    .surface
                    .as_ref()
                    .map(|s| s.track_index() != idx)
                    .unwrap_or(true);
                if stale {
                    let duration = app.tracks.get(idx).and_then(|t| t.duration_secs());
                    let initial = if app.current == Some(idx) {
                        elapsed_snapshot
                    } else {
                        0.0
                    };
                    state.surface = Some(PlayerSurface::mount(
                        idx,
                        duration,
                        initial,
                        audio_player.subscribe_progress(),
                        audio_player.seek_serial(),
                        commands.clone(),
                    ));
                }
            }
            None => {
                state.surface = None;
            }
        }

        if let Some(s) = state.surface.as_mut() {
            s.poll();
        }

        // Keep MPRIS in sync even when playback changes come from media keys
        // or auto-advance.
        if playback_index_snapshot != state.last_mpris_index
            || app.playback != state.last_mpris_playback
        {
            update_mpris(mpris, app);
            state.last_mpris_index = playback_index_snapshot;
            state.last_mpris_playback = app.playback;
        }

        terminal.draw(|f| {
            ui::draw(f, app, state.surface.as_ref(), &settings.ui, &settings.controls)
        })?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, audio_player, mpris, &commands, state)? {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, audio_player, control_tx, &commands, state)?
                {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    commands: &mpsc::Sender<AudioCmd>,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        ControlCmd::Quit => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        ControlCmd::Play => match app.playback {
            PlaybackState::Idle => {
                if app.has_tracks() {
                    do_select(app, state, commands, app.selected);
                }
            }
            PlaybackState::Paused => {
                app.toggle_play_pause(state.surface.as_ref(), commands);
            }
            PlaybackState::Playing => {}
        },
        ControlCmd::Pause => {
            if app.playback == PlaybackState::Playing {
                app.toggle_play_pause(state.surface.as_ref(), commands);
            }
        }
        ControlCmd::PlayPause => match app.playback {
            PlaybackState::Idle => {
                if app.has_tracks() {
                    do_select(app, state, commands, app.selected);
                }
            }
            _ => {
                app.toggle_play_pause(state.surface.as_ref(), commands);
            }
        },
        ControlCmd::Stop => {
            // The session has no stopped-after-play state: pause and rewind,
            // keeping the track current.
            if app.playback == PlaybackState::Playing {
                app.toggle_play_pause(state.surface.as_ref(), commands);
            }
            match state.surface.as_mut() {
                Some(s) => s.scrub_to(0.0),
                None => {
                    if app.current.is_some() {
                        let serial = audio_player.seek_serial().next();
                        let _ = commands.send(AudioCmd::Seek { secs: 0.0, serial });
                    }
                }
            }
        }
        ControlCmd::Next => {
            if let Some(n) = app.next_after_current() {
                do_select(app, state, commands, n);
            }
        }
        ControlCmd::Prev => {
            if let Some(p) = app.prev_before_current() {
                do_select(app, state, commands, p);
            }
        }
    }

    update_mpris(mpris, app);
    Ok(false)
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    control_tx: &mpsc::Sender<ControlCmd>,
    commands: &mpsc::Sender<AudioCmd>,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    // Detail view open: the surface owns transport keys.
    if app.detail_open() {
        match key.code {
            KeyCode::Esc => {
                // Close the view, not the music.
                app.close_details();
                state.surface = None;
            }
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                let _ = control_tx.send(ControlCmd::PlayPause);
            }
            KeyCode::Char('l') | KeyCode::Right => {
                let secs = settings.controls.scrub_seconds as f64;
                if let Some(s) = state.surface.as_mut() {
                    s.scrub_by(secs);
                }
            }
            KeyCode::Char('h') | KeyCode::Left => {
                let secs = settings.controls.scrub_seconds as f64;
                if let Some(s) = state.surface.as_mut() {
                    s.scrub_by(-secs);
                }
            }
            KeyCode::Char('q') => {
                audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
                return Ok(true);
            }
            _ => {}
        }

        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.prev();
        }
        KeyCode::Enter => {
            // Play the track under the cursor. Selection and viewing are
            // separate gestures; this never opens the detail view.
            if app.has_tracks() {
                do_select(app, state, commands, app.selected);
            }
        }
        KeyCode::Char('o') => {
            if app.has_tracks() {
                app.open_details(app.selected);
            }
        }
        KeyCode::Char('n') => {
            // Pill activation: reopen the detail view for what is playing.
            app.open_now_playing();
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        _ => {}
    }

    Ok(false)
}
