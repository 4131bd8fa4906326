use crate::errors::{BgRemoveError, TransformError};
use crate::processor::RunSummary;
use image::{DynamicImage, GrayImage};
use std::path::Path;

/// Turns an encoded image into an encoded image with its background removed.
///
/// The processor only ever sees bytes in and bytes out, so any local or remote
/// segmentation backend can stand behind this trait.
pub trait SubjectExtractor: Send + Sync {
    fn extract(&self, input: &[u8]) -> Result<Vec<u8>, TransformError>;
}

/// Predicts a foreground mask for a decoded image.
///
/// The returned mask must have the same dimensions as `image`; 255 marks
/// subject pixels, 0 marks background.
pub trait MaskPredictor: Send + Sync {
    fn predict_mask(&self, image: &DynamicImage) -> Result<GrayImage, TransformError>;
}

/// Receives progress of a run.
pub trait Reporter {
    fn run_started(&mut self, total: usize, target_dir: &Path);

    fn file_started(&mut self, name: &str);

    fn file_finished(&mut self, name: &str);

    fn file_failed(&mut self, name: &str, error: &BgRemoveError);

    fn run_finished(&mut self, summary: &RunSummary);
}

impl<T: SubjectExtractor + ?Sized> SubjectExtractor for &T {
    fn extract(&self, input: &[u8]) -> Result<Vec<u8>, TransformError> {
        (**self).extract(input)
    }
}

impl<T: SubjectExtractor + ?Sized> SubjectExtractor for Box<T> {
    fn extract(&self, input: &[u8]) -> Result<Vec<u8>, TransformError> {
        (**self).extract(input)
    }
}
