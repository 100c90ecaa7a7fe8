//! # Remote Filter Pipeline
//!
//! Two-stage sepia conversion delegated to external services: each raw photo
//! is uploaded to a storage service, then the stored URL is handed to the
//! transform service, whose response bytes become the sepia [`Photo`].
//!
//! Failures at either stage drop the photo from the sepia sequence and are
//! logged; they never interrupt the capture run.
//!
//! [`Photo`]: crate::capture::Photo

pub mod filter;
pub mod sepia;
pub mod upload;

pub use filter::{FilterPipeline, RemoteFilterPipeline};
pub use sepia::SepiaClient;
pub use upload::UploadClient;
