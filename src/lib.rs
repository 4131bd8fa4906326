pub mod config;
pub mod cutout;
pub mod errors;
pub mod listing;
pub mod logging;
pub mod model;
pub mod processor;
pub mod reporter;
pub mod traits;

pub mod mocks;

pub use config::Config;
pub use cutout::Cutout;
pub use errors::{BgRemoveError, Result, TransformError};
pub use listing::{collect_images, ImageFile};
pub use model::U2NetModel;
pub use processor::{BackgroundRemover, FailedImage, RunSummary};
pub use reporter::ConsoleReporter;
pub use traits::*;

/// Background removal backed by the u2net model.
pub type RemBg = Cutout<U2NetModel>;

impl RemBg {
    /// Loads the model named by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Cutout::new(U2NetModel::new(&config.model_path)?))
    }
}
