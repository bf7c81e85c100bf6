//! Interactive front end: state reducer plus the ratatui renderer.

pub mod state;
pub mod tui;
