//! Utilities for creating `rodio` sinks from resolved source data.
//!
//! The helper here encapsulates decoding and preparing a paused `Sink` at
//! the requested start position.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::source::{LoadError, SourceData};

/// Create a paused `Sink` for `data` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    data: &SourceData,
    start_at: Duration,
) -> Result<Sink, LoadError> {
    let sink = Sink::connect_new(handle.mixer());

    match data {
        SourceData::File(path) => {
            let file = File::open(path).map_err(|e| LoadError::Open {
                path: path.clone(),
                source: e,
            })?;
            let source = Decoder::new(BufReader::new(file))
                .map_err(|e| LoadError::Decode {
                    name: path.display().to_string(),
                    source: e,
                })?
                // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
                .skip_duration(start_at);
            sink.append(source);
        }
        SourceData::Memory(bytes) => {
            let source = Decoder::new(Cursor::new(bytes.clone()))
                .map_err(|e| LoadError::Decode {
                    name: data.describe(),
                    source: e,
                })?
                .skip_duration(start_at);
            sink.append(source);
        }
    }

    sink.pause();
    Ok(sink)
}
