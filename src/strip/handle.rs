use std::path::PathBuf;

use crate::capture::Photo;

/// An opaque reference to image bytes the compositor can load
///
/// Photos may live in memory (just captured), on disk (already downloaded),
/// behind a URL (uploaded or transformed remotely), or inside a data URI.
#[derive(Debug, Clone)]
pub enum ImageHandle {
    /// An in-memory photo
    Photo(Photo),

    /// A local image file
    Path(PathBuf),

    /// A remote image URL
    Url(String),

    /// A base64 data URI
    DataUri(String),
}

impl ImageHandle {
    /// Short description for diagnostics
    pub fn describe(&self) -> String {
        match self {
            Self::Photo(photo) => format!("in-memory {}x{}", photo.width(), photo.height()),
            Self::Path(path) => format!("file {}", path.display()),
            Self::Url(url) => format!("url {}", url),
            Self::DataUri(_) => "data uri".to_string(),
        }
    }
}

impl From<Photo> for ImageHandle {
    fn from(photo: Photo) -> Self {
        Self::Photo(photo)
    }
}

impl From<PathBuf> for ImageHandle {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}
