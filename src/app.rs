//! Application module: the shell's state model.
//!
//! The `App` model in `app::model` is the single source of truth for what
//! is selected, what is playing and which detail view is open.

mod model;

pub use model::*;
