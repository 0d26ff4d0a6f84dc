use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use super::*;
use crate::audio::{AudioCmd, ProgressBus, ProgressEvent, SeekSerial};

struct Rig {
    bus: ProgressBus,
    serial: SeekSerial,
    cmd_rx: Receiver<AudioCmd>,
    cmd_tx: Sender<AudioCmd>,
}

impl Rig {
    fn new() -> Self {
        let (cmd_tx, cmd_rx) = channel();
        Self {
            bus: ProgressBus::new(),
            serial: SeekSerial::default(),
            cmd_rx,
            cmd_tx,
        }
    }

    fn mount(&self, track_index: usize, duration: Option<f64>, initial: f64) -> PlayerSurface {
        PlayerSurface::mount(
            track_index,
            duration,
            initial,
            self.bus.subscribe(),
            self.serial.clone(),
            self.cmd_tx.clone(),
        )
    }

    fn progress(&self, index: usize, elapsed: f64, seek_serial: u64) {
        self.bus.publish(ProgressEvent {
            index: Some(index),
            elapsed: Duration::from_secs_f64(elapsed),
            playing: true,
            seek_serial,
        });
    }
}

#[test]
fn progress_events_move_displayed_elapsed() {
    let rig = Rig::new();
    let mut surface = rig.mount(0, Some(100.0), 0.0);

    rig.progress(0, 12.5, 0);
    surface.poll();
    assert!((surface.elapsed_secs() - 12.5).abs() < 1e-9);
    assert!((surface.remaining_secs().unwrap() - 87.5).abs() < 1e-9);
}

#[test]
fn displayed_elapsed_never_exceeds_catalog_duration() {
    let rig = Rig::new();
    let mut surface = rig.mount(0, Some(100.0), 0.0);

    // The handle is the source of truth for playback, but display clamps.
    rig.progress(0, 140.0, 0);
    surface.poll();
    assert_eq!(surface.elapsed_secs(), 100.0);
    assert_eq!(surface.ratio(), 1.0);
}

#[test]
fn scrub_updates_display_immediately_and_sends_one_seek() {
    let rig = Rig::new();
    let mut surface = rig.mount(0, Some(100.0), 0.0);

    surface.scrub_to(42.0);
    assert_eq!(surface.elapsed_secs(), 42.0);

    let cmds: Vec<AudioCmd> = rig.cmd_rx.try_iter().collect();
    assert_eq!(cmds.len(), 1);
    assert!(matches!(cmds[0], AudioCmd::Seek { secs, serial: 1 } if secs == 42.0));
}

#[test]
fn scrub_targets_clamp_to_the_duration_range() {
    let rig = Rig::new();
    let mut surface = rig.mount(0, Some(100.0), 50.0);

    surface.scrub_to(250.0);
    assert_eq!(surface.elapsed_secs(), 100.0);

    surface.scrub_to(-3.0);
    assert_eq!(surface.elapsed_secs(), 0.0);

    surface.scrub_by(130.0);
    assert_eq!(surface.elapsed_secs(), 100.0);
}

#[test]
fn stale_progress_cannot_overwrite_an_optimistic_scrub() {
    let rig = Rig::new();
    let mut surface = rig.mount(0, Some(100.0), 0.0);

    // A pre-scrub notification is already queued when the user scrubs.
    rig.progress(0, 10.0, 0);
    surface.scrub_to(80.0);
    surface.poll();
    assert_eq!(surface.elapsed_secs(), 80.0);

    // Another notification from before the seek was applied: still stale.
    rig.progress(0, 10.2, 0);
    surface.poll();
    assert_eq!(surface.elapsed_secs(), 80.0);

    // Once the audio thread acknowledges the seek, events flow again.
    rig.progress(0, 80.4, 1);
    surface.poll();
    assert!((surface.elapsed_secs() - 80.4).abs() < 1e-9);
}

#[test]
fn progress_for_other_tracks_is_ignored() {
    let rig = Rig::new();
    let mut surface = rig.mount(3, Some(200.0), 30.0);

    rig.progress(4, 90.0, 0);
    surface.poll();
    assert_eq!(surface.elapsed_secs(), 30.0);
}

#[test]
fn unknown_duration_disables_scrubbing() {
    let rig = Rig::new();
    let mut surface = rig.mount(0, None, 0.0);

    assert!(!surface.can_scrub());
    assert_eq!(surface.ratio(), 0.0);

    surface.scrub_to(10.0);
    assert_eq!(surface.elapsed_secs(), 0.0);
    assert!(rig.cmd_rx.try_iter().next().is_none());
}

#[test]
fn toggle_play_sends_exactly_one_transport_command() {
    let rig = Rig::new();
    let surface = rig.mount(0, Some(100.0), 0.0);

    surface.toggle_play(true);
    surface.toggle_play(false);

    let cmds: Vec<AudioCmd> = rig.cmd_rx.try_iter().collect();
    assert_eq!(cmds.len(), 2);
    assert!(matches!(cmds[0], AudioCmd::Pause));
    assert!(matches!(cmds[1], AudioCmd::Resume));
}

#[test]
fn dropping_a_surface_releases_its_subscription() {
    let rig = Rig::new();
    let surface = rig.mount(0, Some(100.0), 0.0);
    assert_eq!(rig.bus.subscriber_count(), 1);
    drop(surface);
    assert_eq!(rig.bus.subscriber_count(), 0);
}

#[test]
fn format_clock_matches_player_display_rules() {
    assert_eq!(format_clock(0.0), "0:00");
    assert_eq!(format_clock(59.9), "0:59");
    assert_eq!(format_clock(60.0), "1:00");
    assert_eq!(format_clock(337.0), "5:37");
    assert_eq!(format_clock(-4.0), "0:00");
    assert_eq!(format_clock(f64::NAN), "0:00");
    assert_eq!(format_clock_opt(None), "--:--");
    assert_eq!(format_clock_opt(Some(61.0)), "1:01");
}
