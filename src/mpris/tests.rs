use super::*;
use crate::library::TrackSource;
use std::time::Duration;

fn make_track() -> Track {
    Track {
        title: "Test Title".to_string(),
        description: "Test Artist".to_string(),
        artwork: None,
        source: TrackSource::Path("/tmp/music/test.mp3".into()),
        duration: Some(Duration::from_secs(120)),
    }
}

fn make_handle() -> MprisHandle {
    MprisHandle {
        state: Arc::new(Mutex::new(SharedState::default())),
    }
}

#[test]
fn set_now_playing_sets_and_clears_shared_state() {
    let handle = make_handle();

    handle.set_now_playing(Some(&make_track()));
    {
        let s = handle.state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.description.as_deref(), Some("Test Artist"));
    }

    handle.set_now_playing(None);
    {
        let s = handle.state.lock().unwrap();
        assert!(s.title.is_none());
        assert!(s.description.is_none());
    }
}

#[test]
fn empty_descriptions_are_not_exported() {
    let handle = make_handle();
    let mut track = make_track();
    track.description = String::new();

    handle.set_now_playing(Some(&track));
    let s = handle.state.lock().unwrap();
    assert_eq!(s.title.as_deref(), Some("Test Title"));
    assert!(s.description.is_none());
}

#[test]
fn set_playback_updates_status() {
    let handle = make_handle();

    handle.set_playback(PlaybackState::Playing);
    assert_eq!(
        handle.state.lock().unwrap().playback,
        PlaybackState::Playing
    );

    handle.set_playback(PlaybackState::Paused);
    assert_eq!(handle.state.lock().unwrap().playback, PlaybackState::Paused);
}
