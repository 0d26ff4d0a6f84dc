//! Resolving a `TrackSource` into bytes the decoder can replay.
//!
//! Local files are decoded straight from disk. Remote sources are fetched
//! once into memory and kept for the lifetime of the loaded track, so
//! seeking (which rebuilds the sink) never re-downloads.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::library::TrackSource;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// Decodable audio data for the currently loaded track.
#[derive(Clone)]
pub enum SourceData {
    File(PathBuf),
    Memory(Arc<[u8]>),
}

impl SourceData {
    pub fn describe(&self) -> String {
        match self {
            Self::File(p) => p.display().to_string(),
            Self::Memory(b) => format!("{} fetched bytes", b.len()),
        }
    }
}

/// Resolve a track source. For URLs this blocks on the download; the audio
/// thread is the only caller, so the UI stays responsive.
pub fn resolve_source(source: &TrackSource) -> Result<SourceData, LoadError> {
    match source {
        TrackSource::Path(path) => Ok(SourceData::File(path.clone())),
        TrackSource::Url(url) => {
            let bytes = reqwest::blocking::get(url)
                .and_then(|resp| resp.error_for_status())
                .and_then(|resp| resp.bytes())
                .map_err(|e| LoadError::Fetch {
                    url: url.clone(),
                    source: e,
                })?;
            Ok(SourceData::Memory(Arc::from(bytes.to_vec())))
        }
    }
}
