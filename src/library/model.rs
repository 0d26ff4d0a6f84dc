use std::path::PathBuf;
use std::time::Duration;

/// Where a track's audio comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackSource {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// A remote `http(s)` resource, fetched at load time.
    Url(String),
}

impl TrackSource {
    /// Classify a catalog `source` string: anything with an `http(s)` scheme
    /// is remote, everything else is a local path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::Path(PathBuf::from(raw))
        }
    }
}

/// One catalog entry. `title` is the identity key: unique within the
/// catalog, and what selection compares against.
#[derive(Clone, Debug)]
pub struct Track {
    pub title: String,
    pub description: String,
    pub artwork: Option<String>,
    pub source: TrackSource,
    /// Authoritative total length. Drives the scrub range and time display
    /// independent of whatever the decoder reports.
    pub duration: Option<Duration>,
}

impl Track {
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration.map(|d| d.as_secs_f64())
    }
}
