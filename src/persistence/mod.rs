//! Save/load of progression and avatar vitals
//!
//! Features:
//! - Plain JSON document, no versioning
//! - Atomic replace (tmp file, then rename over the save)
//! - Per-field defaulting for partial or damaged saves
//!
//! Storage is touched only at loop boundaries: session start, restart, exit.

pub mod save;

pub use save::{PersistError, SaveState, SaveStore};
