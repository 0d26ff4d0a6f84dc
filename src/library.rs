//! Track registry: the immutable, ordered catalog of playable tracks.
//!
//! Tracks come from a TOML catalog file (`library::load_catalog`) and,
//! optionally, from scanning a local directory (`library::scan`). The
//! registry is read-only after startup.

mod catalog;
mod model;
mod scan;

pub use catalog::*;
pub use model::*;
pub use scan::*;

#[cfg(test)]
mod tests;
