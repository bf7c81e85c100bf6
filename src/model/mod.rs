//! Data types shared by the dispatcher, the renderer and the UI.

pub mod types;
