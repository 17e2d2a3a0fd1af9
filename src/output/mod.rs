//! Human-readable report rendering

pub mod messages;

pub use messages::{trim_path, Color, Palette};
