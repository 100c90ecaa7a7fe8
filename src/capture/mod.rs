//! # Capture Module
//!
//! The capture surface and the countdown state machine that drives it.
//!
//! A [`FrameSource`] produces one still [`Photo`] per invocation (or a miss).
//! The [`CaptureScheduler`] counts down once per tick and fires a capture
//! each time the countdown expires, stopping once the run's photo quota is
//! reached. Run state lives in a [`CaptureSession`].

pub mod photo;
pub mod scheduler;
pub mod session;
pub mod source;

pub use photo::Photo;
pub use scheduler::{CaptureScheduler, SchedulerState, TickOutcome};
pub use session::CaptureSession;
pub use source::{DirectorySource, FrameSource, TestPatternSource};
