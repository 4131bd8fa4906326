use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::Config;
use crate::errors::{BgRemoveError, Result};
use crate::listing::{collect_images, ImageFile};
use crate::traits::{Reporter, SubjectExtractor};

/// An image whose read, transform or write step failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedImage {
    pub name: String,
    pub error: String,
}

/// Outcome of one sweep over the target directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedImage>,
}

/// Replaces every selected image in the target directory with its cutout.
pub struct BackgroundRemover<E: SubjectExtractor> {
    extractor: E,
    target_dir: PathBuf,
    suffix: String,
}

impl<E: SubjectExtractor> BackgroundRemover<E> {
    pub fn new(extractor: E, config: &Config) -> Self {
        Self {
            extractor,
            target_dir: config.target_dir.clone(),
            suffix: config.suffix.clone(),
        }
    }

    /// Processes the directory sequentially.
    ///
    /// Only a missing or unreadable directory is returned as an error; per-file
    /// failures are handed to the reporter and collected in the summary.
    pub fn process_directory<R: Reporter + ?Sized>(&self, reporter: &mut R) -> Result<RunSummary> {
        let images = collect_images(&self.target_dir, &self.suffix)?;

        let mut summary = RunSummary {
            total: images.len(),
            ..RunSummary::default()
        };
        reporter.run_started(images.len(), &self.target_dir);

        for image in &images {
            reporter.file_started(&image.name);

            match self.process_single_image(image) {
                Ok(()) => {
                    reporter.file_finished(&image.name);
                    summary.succeeded.push(image.name.clone());
                }
                Err(e) => {
                    debug!(file = %image.path.display(), error = %e, "image failed");
                    reporter.file_failed(&image.name, &e);
                    summary.failed.push(FailedImage {
                        name: image.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            total = summary.total,
            succeeded = summary.succeeded.len(),
            failed = summary.failed.len(),
            "run complete"
        );
        reporter.run_finished(&summary);
        Ok(summary)
    }

    /// Reads, transforms and overwrites one image in place.
    ///
    /// The original is only touched once the transform has succeeded.
    pub fn process_single_image(&self, image: &ImageFile) -> Result<()> {
        let input = fs::read(&image.path).map_err(|source| BgRemoveError::Read {
            path: image.path.clone(),
            source,
        })?;
        debug!(file = %image.name, bytes = input.len(), "read image");

        let output = self
            .extractor
            .extract(&input)
            .map_err(|source| BgRemoveError::Transform {
                path: image.path.clone(),
                source,
            })?;

        fs::write(&image.path, &output).map_err(|source| BgRemoveError::Write {
            path: image.path.clone(),
            source,
        })?;
        debug!(file = %image.name, bytes = output.len(), "wrote cutout");

        Ok(())
    }
}
