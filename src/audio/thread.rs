use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::config::{AudioSettings, PlaybackSettings};
use crate::library::Track;

use super::progress::ProgressBus;
use super::sink::create_sink_at;
use super::source::{SourceData, resolve_source};
use super::types::{AudioCmd, PlaybackHandle, ProgressEvent};

pub(super) fn spawn_audio_thread(
    tracks: Vec<Track>,
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    progress: ProgressBus,
    audio_settings: AudioSettings,
    playback_settings: PlaybackSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        let mut index: Option<usize> = None;
        let mut paused = true;
        let mut sink: Option<Sink> = None;
        // Resolved data for the loaded track; seeking rebuilds the sink from
        // it without touching disk or network again.
        let mut loaded: Option<SourceData> = None;

        // Track start time and accumulated elapsed when paused.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        let mut load_error: Option<String> = None;
        let mut applied_serial: u64 = 0;

        let tick = Duration::from_millis(audio_settings.progress_interval_ms.max(1));

        fn elapsed_now(accumulated: Duration, started_at: Option<Instant>) -> Duration {
            accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed())
        }

        fn publish(
            playback_info: &PlaybackHandle,
            progress: &ProgressBus,
            index: Option<usize>,
            elapsed: Duration,
            playing: bool,
            load_error: &Option<String>,
            seek_serial: u64,
        ) {
            if let Ok(mut info) = playback_info.lock() {
                info.index = index;
                info.elapsed = elapsed;
                info.playing = playing;
                info.load_error = load_error.clone();
            }
            progress.publish(ProgressEvent {
                index,
                elapsed,
                playing,
                seek_serial,
            });
        }

        fn do_load(
            i: usize,
            stream: &OutputStream,
            tracks: &[Track],
            sink: &mut Option<Sink>,
            loaded: &mut Option<SourceData>,
            index: &mut Option<usize>,
            paused: &mut bool,
            started_at: &mut Option<Instant>,
            accumulated: &mut Duration,
            load_error: &mut Option<String>,
        ) {
            // Old audio stops before the new source is touched.
            if let Some(s) = sink.take() {
                s.stop();
            }
            *started_at = None;
            *accumulated = Duration::ZERO;
            *index = Some(i);

            let track = &tracks[i];
            let resolved = resolve_source(&track.source)
                .and_then(|data| create_sink_at(stream, &data, Duration::ZERO).map(|s| (data, s)));

            match resolved {
                Ok((data, new_sink)) => {
                    new_sink.play();
                    *sink = Some(new_sink);
                    *loaded = Some(data);
                    *paused = false;
                    *started_at = Some(Instant::now());
                    *load_error = None;
                }
                Err(e) => {
                    // Fire-and-forget semantics: playback just does not
                    // start, the error only surfaces through the snapshot.
                    log::warn!("load failed for {:?}: {e}", track.title);
                    *loaded = None;
                    *paused = true;
                    *load_error = Some(e.to_string());
                }
            }
        }

        fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
            if fade_out_ms == 0 {
                sink.set_volume(0.0);
                return;
            }
            let steps: u64 = 20;
            let step_ms = (fade_out_ms / steps).max(1);
            sink.set_volume(1.0);
            for step in 1..=steps {
                let t = step as f32 / steps as f32;
                sink.set_volume(1.0 - t);
                thread::sleep(Duration::from_millis(step_ms));
            }
            sink.set_volume(0.0);
        }

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load(i) => {
                        if i >= tracks.len() {
                            continue;
                        }
                        // Selecting the already-playing track again does nothing.
                        if index == Some(i) && !paused && sink.is_some() {
                            continue;
                        }
                        do_load(
                            i,
                            &stream,
                            &tracks,
                            &mut sink,
                            &mut loaded,
                            &mut index,
                            &mut paused,
                            &mut started_at,
                            &mut accumulated,
                            &mut load_error,
                        );
                        publish(
                            &playback_info,
                            &progress,
                            index,
                            Duration::ZERO,
                            !paused,
                            &load_error,
                            applied_serial,
                        );
                    }

                    AudioCmd::Pause => {
                        if let Some(ref s) = sink {
                            if !paused {
                                s.pause();
                                if let Some(st) = started_at {
                                    accumulated += Instant::now() - st;
                                }
                                started_at = None;
                                paused = true;
                                publish(
                                    &playback_info,
                                    &progress,
                                    index,
                                    accumulated,
                                    false,
                                    &load_error,
                                    applied_serial,
                                );
                            }
                        }
                    }

                    AudioCmd::Resume => {
                        if let Some(ref s) = sink {
                            if paused {
                                s.play();
                                started_at = Some(Instant::now());
                                paused = false;
                                publish(
                                    &playback_info,
                                    &progress,
                                    index,
                                    accumulated,
                                    true,
                                    &load_error,
                                    applied_serial,
                                );
                            }
                        }
                    }

                    AudioCmd::Seek { secs, serial } => {
                        // Acknowledge the seek even when nothing is loaded,
                        // so subscribers stop treating events as stale.
                        applied_serial = applied_serial.max(serial);

                        let Some(data) = loaded.as_ref() else {
                            continue;
                        };

                        let target = Duration::from_secs_f64(secs.max(0.0));

                        // Scrubbing rebuilds the sink and skips into the source.
                        if let Some(s) = sink.take() {
                            s.stop();
                        }
                        match create_sink_at(&stream, data, target) {
                            Ok(new_sink) => {
                                if paused {
                                    started_at = None;
                                } else {
                                    new_sink.play();
                                    started_at = Some(Instant::now());
                                }
                                sink = Some(new_sink);
                                accumulated = target;
                            }
                            Err(e) => {
                                log::warn!("seek rebuild failed: {e}");
                                started_at = None;
                                paused = true;
                                load_error = Some(e.to_string());
                            }
                        }
                        publish(
                            &playback_info,
                            &progress,
                            index,
                            accumulated,
                            !paused && sink.is_some(),
                            &load_error,
                            applied_serial,
                        );
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = sink {
                            // Fade out gently before stopping.
                            fade_out_sink(s, fade_out_ms);
                            s.stop();
                        }
                        // Update shared state so observers don't keep showing Playing.
                        publish(
                            &playback_info,
                            &progress,
                            index,
                            elapsed_now(accumulated, started_at),
                            false,
                            &load_error,
                            applied_serial,
                        );
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Natural end of track?
                    let drained = matches!(&sink, Some(s) if !paused && s.empty());
                    if drained {
                        let next = index.map(|i| i + 1).filter(|&n| n < tracks.len());
                        match next {
                            Some(n) if playback_settings.auto_advance => {
                                do_load(
                                    n,
                                    &stream,
                                    &tracks,
                                    &mut sink,
                                    &mut loaded,
                                    &mut index,
                                    &mut paused,
                                    &mut started_at,
                                    &mut accumulated,
                                    &mut load_error,
                                );
                                publish(
                                    &playback_info,
                                    &progress,
                                    index,
                                    Duration::ZERO,
                                    !paused,
                                    &load_error,
                                    applied_serial,
                                );
                            }
                            _ => {
                                // End of catalog (or auto-advance off): stop
                                // playing but stay on the track; the session
                                // never returns to an empty selection.
                                sink = None;
                                paused = true;
                                started_at = None;
                                if let Some(total) =
                                    index.and_then(|i| tracks[i].duration)
                                {
                                    accumulated = total;
                                }
                                publish(
                                    &playback_info,
                                    &progress,
                                    index,
                                    accumulated,
                                    false,
                                    &load_error,
                                    applied_serial,
                                );
                            }
                        }
                    } else {
                        publish(
                            &playback_info,
                            &progress,
                            index,
                            elapsed_now(accumulated, started_at),
                            !paused && sink.is_some(),
                            &load_error,
                            applied_serial,
                        );
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
