use thiserror::Error;

/// Main error type for the Snapify library
#[derive(Error, Debug)]
pub enum SnapifyError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Filter pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Photostrip error: {0}")]
    Strip(#[from] StripError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Capture-surface and photo-encoding errors
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Frame source unavailable: {path}")]
    SourceUnavailable { path: String },

    #[error("No image files found in: {path}")]
    NoFramesFound { path: String },

    #[error("Photo decoding failed: {reason}")]
    DecodeFailed { reason: String },

    #[error("Photo encoding failed: {reason}")]
    EncodeFailed { reason: String },
}

/// Remote filter pipeline errors
///
/// Either stage failing drops the photo from the sepia sequence; the capture
/// run itself is never interrupted.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Upload failed: {reason}")]
    UploadFailed { reason: String },

    #[error("Sepia transform failed: {reason}")]
    TransformFailed { reason: String },
}

/// Photostrip composition errors
#[derive(Error, Debug)]
pub enum StripError {
    #[error("Photostrip needs exactly {expected} photos, got {count}")]
    InvalidInput { expected: usize, count: usize },

    #[error("Image load failed: {reason}")]
    LoadFailed { reason: String },

    #[error("Caption rendering failed: {reason}")]
    CaptionFailed { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using SnapifyError
pub type Result<T> = std::result::Result<T, SnapifyError>;

impl SnapifyError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // IO and remote-service errors might be temporary
            Self::Io(_) => true,
            Self::Pipeline(_) => true,
            // Most other errors are permanent
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Capture(CaptureError::NoFramesFound { path }) => {
                format!("No image files found in '{}'. Point --frames at a directory of still images.", path)
            }
            Self::Strip(StripError::InvalidInput { expected, count }) => {
                format!("A photostrip needs exactly {} photos, but {} were available.", expected, count)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
