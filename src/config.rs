use clap::Parser;
use std::env;
use std::path::PathBuf;

/// Directory swept by the binary, relative to the working directory.
pub const TARGET_DIR: &str = "public/products";

/// Only file names ending with this suffix are processed.
pub const IMAGE_SUFFIX: &str = ".png";

const MODEL_FILE: &str = "u2net.onnx";

/// Run settings.
///
/// Nothing here is exposed as a flag and the command line never aborts a run:
/// clap only carries the `about`/`version` metadata, every field is fixed.
#[derive(Parser, Clone, Debug, PartialEq, Eq)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[arg(skip = PathBuf::from(TARGET_DIR))]
    pub target_dir: PathBuf,

    #[arg(skip = String::from(IMAGE_SUFFIX))]
    pub suffix: String,

    #[arg(skip = default_model_path())]
    pub model_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from(TARGET_DIR),
            suffix: String::from(IMAGE_SUFFIX),
            model_path: default_model_path(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::from_args(env::args_os())
    }

    /// Resolves the settings, ignoring whatever arguments were passed.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).unwrap_or_default()
    }
}

/// Where the u2net weights live: `$U2NET_HOME`, falling back to `.u2net` under
/// `$XDG_DATA_HOME` or the home directory.
pub fn default_model_path() -> PathBuf {
    model_path_from(|key| env::var_os(key).filter(|v| !v.is_empty()))
}

fn model_path_from<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<std::ffi::OsString>,
{
    if let Some(home) = lookup("U2NET_HOME") {
        return PathBuf::from(home).join(MODEL_FILE);
    }

    let base = lookup("XDG_DATA_HOME")
        .or_else(|| lookup("HOME"))
        .map(PathBuf::from)
        .unwrap_or_default();
    base.join(".u2net").join(MODEL_FILE)
}
