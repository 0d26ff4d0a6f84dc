//! Player surface: the detail view's transport view-model.
//!
//! A `PlayerSurface` is bound to one track and that track's authoritative
//! catalog duration. It observes playback progress through its own
//! subscription, scrubs optimistically, and drives pause/resume through the
//! shared command channel. Dropping it releases the subscription without
//! touching playback.

mod format;
mod model;

pub use format::*;
pub use model::*;

#[cfg(test)]
mod tests;
