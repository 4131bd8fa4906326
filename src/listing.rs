use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::{BgRemoveError, Result};

/// A candidate image inside the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// File name as printed in progress lines.
    pub name: String,
    pub path: PathBuf,
}

/// Lists the direct entries of `dir` whose name ends with `suffix`.
///
/// Entries come back in enumeration order. Selection looks at the name only,
/// so a subdirectory called `x.png` is listed and later fails to read.
pub fn collect_images(dir: &Path, suffix: &str) -> Result<Vec<ImageFile>> {
    if !dir.is_dir() {
        return Err(BgRemoveError::TargetDirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| BgRemoveError::Listing {
            path: dir.to_path_buf(),
            source,
        })?;

        if has_suffix(entry.path(), suffix) {
            images.push(ImageFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.into_path(),
            });
        }
    }

    Ok(images)
}

pub fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().ends_with(suffix.as_bytes()))
}
