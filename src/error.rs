use std::path::PathBuf;

/// Every way a rectification run can fail.
#[derive(thiserror::Error, Debug)]
pub enum RectifyError {
    /// Wrong number of positional arguments (or any other argument error).
    #[error("{0}")]
    Usage(String),

    /// The corners file is missing, is not valid JSON, or does not hold four numeric points.
    #[error("Invalid corners: {0}")]
    CorrespondenceInput(String),

    /// The source image could not be read or decoded.
    #[error("Failed to load image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The output path has no supported image extension.
    #[error("Unsupported output format for {0:?}")]
    UnsupportedOutputFormat(PathBuf),

    /// The result could not be encoded or written.
    #[error("Failed to write image {path:?}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The corner correspondence does not determine an invertible homography.
    #[error("Cannot compute perspective transform: {0}")]
    Transform(String),
}

impl RectifyError {
    /// Kind name as used in the failure taxonomy.
    pub fn kind(&self) -> &'static str {
        match self {
            RectifyError::Usage(_) => "UsageError",
            RectifyError::CorrespondenceInput(_) => "CorrespondenceInputError",
            RectifyError::ImageLoad { .. } => "ImageLoadError",
            RectifyError::UnsupportedOutputFormat(_) | RectifyError::ImageWrite { .. } => {
                "ImageWriteError"
            }
            RectifyError::Transform(_) => "TransformError",
        }
    }
}

pub type Result<T, E = RectifyError> = std::result::Result<T, E>;
