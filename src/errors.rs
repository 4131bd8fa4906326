use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while sweeping the target directory.
///
/// The first group aborts the whole run before any file is touched. The second
/// group is scoped to a single file: the processor reports it and moves on to
/// the next image, so it never becomes a process failure.
#[derive(Error, Debug)]
pub enum BgRemoveError {
    #[error("Background removal model not available at {}: {reason}", .path.display())]
    ExtractorUnavailable { path: PathBuf, reason: String },

    #[error("Directory {} not found.", .path.display())]
    TargetDirectoryNotFound { path: PathBuf },

    #[error("Failed to list {}: {source}", .path.display())]
    Listing {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("read failed: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source}")]
    Transform {
        path: PathBuf,
        #[source]
        source: TransformError,
    },

    #[error("write failed: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BgRemoveError>;

/// Failure of the subject-extraction capability for one image.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),

    #[error("invalid image: {reason}")]
    InvalidImage { reason: String },

    #[error("mask is {mask:?} but image is {image:?}")]
    MaskDimensions { image: (u32, u32), mask: (u32, u32) },

    #[error("model inference failed: {0}")]
    Inference(#[from] ort::Error),

    #[error("unexpected model output shape {shape:?}")]
    UnexpectedOutput { shape: Vec<usize> },
}

