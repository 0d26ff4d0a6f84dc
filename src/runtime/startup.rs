use std::collections::HashSet;
use std::path::Path;

use crate::config::Settings;
use crate::library::{self, Track};

/// Build the track registry: the catalog file, optionally supplemented by a
/// scanned local directory. Scanned tracks whose titles collide with
/// catalog entries are skipped so the title identity key stays unique.
pub fn assemble_catalog(
    catalog_path: &Path,
    settings: &Settings,
) -> Result<Vec<Track>, Box<dyn std::error::Error>> {
    let mut tracks = match library::load_catalog(catalog_path) {
        Ok(tracks) => tracks,
        Err(e) if settings.library.scan_dir.is_some() => {
            // A scan directory can stand in for a missing catalog file.
            log::warn!("catalog unavailable ({e}); falling back to scan only");
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(dir) = &settings.library.scan_dir {
        let mut titles: HashSet<String> = tracks.iter().map(|t| t.title.clone()).collect();
        for track in library::scan(dir, &settings.library) {
            if titles.insert(track.title.clone()) {
                tracks.push(track);
            } else {
                log::debug!("scan: skipping duplicate title {:?}", track.title);
            }
        }
    }

    if tracks.is_empty() {
        return Err("no tracks to play (empty catalog and scan)".into());
    }

    Ok(tracks)
}
