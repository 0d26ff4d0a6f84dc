use super::*;
use crate::config::LibrarySettings;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_catalog(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn load_catalog_parses_entries_in_order() {
    let (_dir, path) = write_catalog(
        r#"
[[track]]
title = "Massive"
description = "Drake"
artwork = "https://example.com/massive.jpg"
source = "https://example.com/massive.mp3"
duration = 337.0

[[track]]
title = "Virtual Insanity"
description = "Jamiroquai"
source = "/music/virtual-insanity.mp3"
duration = 234.72
"#,
    );

    let tracks = load_catalog(&path).unwrap();
    assert_eq!(tracks.len(), 2);

    assert_eq!(tracks[0].title, "Massive");
    assert_eq!(tracks[0].description, "Drake");
    assert_eq!(
        tracks[0].artwork.as_deref(),
        Some("https://example.com/massive.jpg")
    );
    assert_eq!(
        tracks[0].source,
        TrackSource::Url("https://example.com/massive.mp3".to_string())
    );
    assert_eq!(tracks[0].duration_secs(), Some(337.0));

    assert_eq!(tracks[1].title, "Virtual Insanity");
    assert_eq!(
        tracks[1].source,
        TrackSource::Path("/music/virtual-insanity.mp3".into())
    );
    // Fractional durations survive the float -> Duration conversion.
    let secs = tracks[1].duration_secs().unwrap();
    assert!((secs - 234.72).abs() < 1e-9);
}

#[test]
fn load_catalog_rejects_duplicate_titles() {
    let (_dir, path) = write_catalog(
        r#"
[[track]]
title = "Jungle"
source = "a.mp3"
duration = 195.0

[[track]]
title = "Jungle"
source = "b.mp3"
duration = 100.0
"#,
    );

    let err = load_catalog(&path).unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateTitle { title } if title == "Jungle"));
}

#[test]
fn load_catalog_rejects_non_finite_or_non_positive_durations() {
    for bad in ["duration = -1.0", "duration = 0.0", "duration = inf", "duration = nan"] {
        let (_dir, path) = write_catalog(&format!(
            "[[track]]\ntitle = \"X\"\nsource = \"x.mp3\"\n{bad}\n"
        ));
        let err = load_catalog(&path).unwrap_err();
        assert!(
            matches!(err, CatalogError::InvalidDuration { .. }),
            "expected InvalidDuration for {bad:?}, got {err:?}"
        );
    }
}

#[test]
fn load_catalog_rejects_empty_titles_and_empty_files() {
    let (_dir, path) = write_catalog("");
    assert!(matches!(load_catalog(&path).unwrap_err(), CatalogError::Empty));

    let (_dir2, path2) = write_catalog("[[track]]\ntitle = \"  \"\nsource = \"x.mp3\"\n");
    assert!(matches!(
        load_catalog(&path2).unwrap_err(),
        CatalogError::EmptyTitle { index: 0 }
    ));
}

#[test]
fn missing_duration_on_unreadable_local_file_stays_unknown() {
    let dir = tempdir().unwrap();
    let audio = dir.path().join("noise.mp3");
    fs::write(&audio, b"not a real mp3").unwrap();

    let (_dir, path) = write_catalog(&format!(
        "[[track]]\ntitle = \"Noise\"\nsource = {:?}\n",
        audio.to_str().unwrap()
    ));

    let tracks = load_catalog(&path).unwrap();
    assert_eq!(tracks[0].duration, None);
}

#[test]
fn track_source_parse_classifies_urls_and_paths() {
    assert_eq!(
        TrackSource::parse("https://audio.example/x"),
        TrackSource::Url("https://audio.example/x".to_string())
    );
    assert_eq!(
        TrackSource::parse("http://audio.example/x"),
        TrackSource::Url("http://audio.example/x".to_string())
    );
    assert_eq!(
        TrackSource::parse("/music/a.mp3"),
        TrackSource::Path("/music/a.mp3".into())
    );
    assert_eq!(
        TrackSource::parse("relative/b.ogg"),
        TrackSource::Path("relative/b.ogg".into())
    );
}

#[test]
fn scan_filters_non_audio_and_sorts_by_title_case_insensitive() {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
    fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

    let tracks = scan(dir.path(), &LibrarySettings::default());
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].title, "A");
    assert_eq!(tracks[1].title, "b");
    assert!(matches!(tracks[0].source, TrackSource::Path(_)));
    // Unreadable fixtures have no probe-able duration.
    assert_eq!(tracks[0].duration, None);
}

#[test]
fn scan_respects_include_hidden_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

    let settings = LibrarySettings {
        include_hidden: false,
        ..LibrarySettings::default()
    };
    let tracks = scan(dir.path(), &settings);

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "visible");
}

#[test]
fn scan_respects_recursive_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"not real").unwrap();

    let settings = LibrarySettings {
        recursive: false,
        ..LibrarySettings::default()
    };
    let tracks = scan(dir.path(), &settings);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "root");
}

#[test]
fn scan_extension_filter_is_configurable() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("keep.flac"), b"not real").unwrap();
    fs::write(dir.path().join("skip.mp3"), b"not real").unwrap();

    let settings = LibrarySettings {
        extensions: vec![".FLAC".into()],
        ..LibrarySettings::default()
    };
    let tracks = scan(dir.path(), &settings);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "keep");
}

#[test]
fn probe_duration_is_none_for_garbage() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("junk.mp3");
    fs::write(&p, b"garbage").unwrap();
    assert_eq!(probe_duration(Path::new(&p)), None);
}
