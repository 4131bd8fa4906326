use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use parking_lot::Mutex;

use crate::errors::{BgRemoveError, TransformError};
use crate::processor::RunSummary;
use crate::traits::{MaskPredictor, Reporter, SubjectExtractor};

/// Prefix the mock extractor puts in front of every input it accepts.
pub const CUTOUT_MARKER: &[u8] = b"cutout:";

/// テスト用の抽出器：入力の先頭にマーカーを付けて返す
#[derive(Debug, Default)]
pub struct MockExtractor {
    fail_prefix: Option<Vec<u8>>,
    calls: Mutex<Vec<Vec<u8>>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects any input starting with `prefix`.
    pub fn failing_on(prefix: &[u8]) -> Self {
        Self {
            fail_prefix: Some(prefix.to_vec()),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Inputs seen so far, in call order.
    pub fn calls(&self) -> Vec<Vec<u8>> {
        self.calls.lock().clone()
    }
}

impl SubjectExtractor for MockExtractor {
    fn extract(&self, input: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.calls.lock().push(input.to_vec());

        if let Some(prefix) = &self.fail_prefix {
            if input.starts_with(prefix) {
                return Err(TransformError::InvalidImage {
                    reason: "mock rejected input".to_string(),
                });
            }
        }

        Ok([CUTOUT_MARKER, input].concat())
    }
}

/// テスト用のマスク予測器：全画素に同じ値を返す
#[derive(Debug, Clone, Copy)]
pub struct UniformMask {
    pub level: u8,
}

impl UniformMask {
    pub const fn new(level: u8) -> Self {
        Self { level }
    }
}

impl MaskPredictor for UniformMask {
    fn predict_mask(&self, image: &DynamicImage) -> Result<GrayImage, TransformError> {
        let (width, height) = image.dimensions();
        Ok(GrayImage::from_pixel(width, height, Luma([self.level])))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    RunStarted { total: usize, target_dir: PathBuf },
    FileStarted(String),
    FileFinished(String),
    FileFailed { name: String, error: String },
    RunFinished,
}

/// テスト用のレポーター：受け取ったイベントを記録する
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<ReportEvent>,
}

impl Reporter for RecordingReporter {
    fn run_started(&mut self, total: usize, target_dir: &Path) {
        self.events.push(ReportEvent::RunStarted {
            total,
            target_dir: target_dir.to_path_buf(),
        });
    }

    fn file_started(&mut self, name: &str) {
        self.events.push(ReportEvent::FileStarted(name.to_string()));
    }

    fn file_finished(&mut self, name: &str) {
        self.events.push(ReportEvent::FileFinished(name.to_string()));
    }

    fn file_failed(&mut self, name: &str, error: &BgRemoveError) {
        self.events.push(ReportEvent::FileFailed {
            name: name.to_string(),
            error: error.to_string(),
        });
    }

    fn run_finished(&mut self, _summary: &RunSummary) {
        self.events.push(ReportEvent::RunFinished);
    }
}
