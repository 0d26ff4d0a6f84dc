use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use super::model::{Track, TrackSource};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("catalog contains no tracks")]
    Empty,
    #[error("track {index} has an empty title")]
    EmptyTitle { index: usize },
    #[error("duplicate track title {title:?}")]
    DuplicateTitle { title: String },
    #[error("track {title:?} has an invalid duration (must be a finite, positive number of seconds)")]
    InvalidDuration { title: String },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    track: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    artwork: Option<String>,
    source: String,
    #[serde(default)]
    duration: Option<f64>,
}

/// Load the track catalog from a TOML file.
///
/// The file holds ordered `[[track]]` entries; order is preserved. Titles
/// must be unique since they are the identity key for selection. A declared
/// `duration` (float seconds) is authoritative; when absent, local files
/// fall back to the duration probed from their metadata.
pub fn load_catalog(path: &Path) -> Result<Vec<Track>, CatalogError> {
    let text = fs::read_to_string(path).map_err(|e| CatalogError::Read {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CatalogFile = toml::from_str(&text).map_err(|e| CatalogError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;

    if file.track.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut tracks: Vec<Track> = Vec::with_capacity(file.track.len());

    for (index, entry) in file.track.into_iter().enumerate() {
        let title = entry.title.trim().to_string();
        if title.is_empty() {
            return Err(CatalogError::EmptyTitle { index });
        }
        if !seen.insert(title.clone()) {
            return Err(CatalogError::DuplicateTitle { title });
        }

        let duration = match entry.duration {
            Some(secs) => {
                if !secs.is_finite() || secs <= 0.0 {
                    return Err(CatalogError::InvalidDuration { title });
                }
                Some(Duration::from_secs_f64(secs))
            }
            None => None,
        };

        let source = TrackSource::parse(entry.source.trim());
        let duration = duration.or_else(|| match &source {
            TrackSource::Path(p) => probe_duration(p),
            TrackSource::Url(_) => None,
        });

        if duration.is_none() {
            log::warn!("catalog: no duration for {title:?}; scrubbing will be disabled");
        }

        tracks.push(Track {
            title,
            description: entry.description.trim().to_string(),
            artwork: entry.artwork,
            source,
            duration,
        });
    }

    log::info!("catalog: loaded {} tracks from {}", tracks.len(), path.display());
    Ok(tracks)
}

/// Probe a local file's duration from its metadata.
pub(crate) fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
}
