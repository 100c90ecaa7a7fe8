//! # Snapify
//!
//! A countdown-driven photobooth engine: capture three stills from a frame
//! source, convert each to sepia through remote upload and transform
//! services, and compose either photo set into a vertical photostrip.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snapify::{
//!     booth::PhotoBooth,
//!     capture::TestPatternSource,
//!     config::Config,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let source = Box::new(TestPatternSource::new(1280, 720));
//!
//! let mut booth = PhotoBooth::new(config, source, None)?;
//! booth.start_capture().await;
//! booth.wait().await;
//!
//! booth.download_raw("shots/").await;
//! booth.download_raw_strip("shots/").await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`capture`] - Frame sources, the countdown scheduler, and session state
//! - [`pipeline`] - The two-stage remote sepia filter
//! - [`strip`] - Photostrip layout and composition
//! - [`booth`] - The engine wiring it all together
//! - [`config`] - Configuration management
//!
//! ## Custom frame sources
//!
//! Anything that can produce a still image on demand can drive the booth by
//! implementing the [`FrameSource`](capture::FrameSource) trait:
//!
//! ```rust,no_run
//! use snapify::capture::{FrameSource, Photo};
//!
//! struct MyCamera;
//!
//! impl FrameSource for MyCamera {
//!     fn capture_frame(&mut self) -> Option<Photo> {
//!         // Grab a frame from your device; None means a missed capture
//!         None
//!     }
//! }
//! ```

pub mod booth;
pub mod capture;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod strip;

// Re-export commonly used types for convenience
pub use crate::{
    booth::PhotoBooth,
    capture::{CaptureSession, FrameSource, Photo},
    config::Config,
    error::{Result, SnapifyError},
    pipeline::FilterPipeline,
    strip::{ImageHandle, StripCompositor},
};
