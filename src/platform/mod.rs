//! Platform abstraction layer
//!
//! Handles the native terminal frontend:
//! - Pre-game menu (name, difficulty, color)
//! - Input events (key mapping to `InputEvent`)
//! - Drawing (a character-cell `Canvas`)

pub mod terminal;

pub use terminal::{Menu, MenuStep, TerminalCanvas, poll_input, run_menu};
