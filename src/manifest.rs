//! Category manifest generation.
//!
//! The build step of the site. Scans the projects directory, where every
//! subdirectory is a category, and writes one JSON array of image filenames
//! per category into the data directory:
//!
//! ```text
//! projects/                      data/
//! ├── kitchen/                   ├── kitchen.json
//! │   ├── island.jpg             │     ["island.jpg", "pantry.webp"]
//! │   ├── notes.txt   (skipped)  │
//! │   └── pantry.webp            │
//! ├── premium-living/            └── premium-living.json
//! │   └── lounge.PNG                   ["lounge.PNG"]
//! └── README.md       (skipped)
//! ```
//!
//! ## Rules
//!
//! - Only directories directly under the root are categories; anything else
//!   at the root is ignored. Symlinked directories are not followed.
//! - A file is listed when its extension is one of
//!   [`IMAGE_EXTENSIONS`](crate::entry::IMAGE_EXTENSIONS), case-insensitively.
//! - Filenames are listed in sorted order, so re-running on unchanged input
//!   rewrites byte-identical files.
//! - A missing root is not an error: the build reports it and writes nothing.
//!
//! Categories are independent, so they are scanned and written in parallel
//! on the global rayon pool.

use crate::entry::is_image_filename;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// One written manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryManifest {
    /// Directory name of the category.
    pub category: String,
    /// Listed filenames, in output order.
    pub files: Vec<String>,
    /// Path of the written `{category}.json`.
    pub output: PathBuf,
}

/// Result of a manifest build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// The projects directory did not exist; nothing was written.
    pub missing_root: bool,
    /// Written manifests, sorted by category name.
    pub manifests: Vec<CategoryManifest>,
}

impl BuildReport {
    pub fn image_count(&self) -> usize {
        self.manifests.iter().map(|m| m.files.len()).sum()
    }
}

/// Scan `projects_dir` and write `{category}.json` files into `data_dir`.
pub fn build_manifests(projects_dir: &Path, data_dir: &Path) -> Result<BuildReport, ManifestError> {
    if !projects_dir.is_dir() {
        log::warn!(
            "projects directory {} not found, skipping manifest generation",
            projects_dir.display()
        );
        return Ok(BuildReport {
            missing_root: true,
            manifests: Vec::new(),
        });
    }

    fs::create_dir_all(data_dir)?;

    let categories = category_dirs(projects_dir)?;
    let manifests = categories
        .par_iter()
        .map(|(name, dir)| write_category(name, dir, data_dir))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BuildReport {
        missing_root: false,
        manifests,
    })
}

/// Image filenames of one category directory, sorted.
pub fn scan_category(dir: &Path) -> Result<Vec<String>, ManifestError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ManifestError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            log::warn!("skipping non UTF-8 filename in {}", dir.display());
            continue;
        };
        if is_image_filename(name) {
            files.push(name.to_string());
        }
    }
    Ok(files)
}

/// Category subdirectories of the root as `(name, path)`, sorted by name.
fn category_dirs(root: &Path) -> Result<Vec<(String, PathBuf)>, ManifestError> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ManifestError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => dirs.push((name.to_string(), entry.into_path())),
            None => log::warn!("skipping non UTF-8 category in {}", root.display()),
        }
    }
    Ok(dirs)
}

fn write_category(
    name: &str,
    dir: &Path,
    data_dir: &Path,
) -> Result<CategoryManifest, ManifestError> {
    let files = scan_category(dir)?;
    let output = data_dir.join(format!("{name}.json"));
    let json = serde_json::to_string_pretty(&files)?;
    fs::write(&output, json)?;
    log::debug!("wrote {} ({} images)", output.display(), files.len());
    Ok(CategoryManifest {
        category: name.to_string(),
        files,
        output,
    })
}
