//! # Booth Engine
//!
//! The engine ties the capture scheduler, frame source, filter pipeline, and
//! strip compositor into one photobooth session with start/stop/download
//! commands.

pub mod engine;

pub use engine::PhotoBooth;
