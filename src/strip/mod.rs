//! # Photostrip Compositor
//!
//! Lays three photos out on a fixed 600x1500 canvas: white background, each
//! photo scaled to 560x420 with 20px padding, and the caption centered in the
//! band below the last photo.

pub mod caption;
pub mod compositor;
pub mod handle;
pub mod layout;

pub use caption::CaptionRenderer;
pub use compositor::StripCompositor;
pub use handle::ImageHandle;
pub use layout::{StripLayout, PHOTOS_PER_STRIP};
