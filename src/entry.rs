//! Image entries: manifest filenames resolved to image URLs.

use crate::category::Category;
use std::path::Path;

/// Extensions accepted by the manifest builder, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// A resolved image URL, `/projects/{category}/{filename}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageEntry {
    pub url: String,
}

/// Whether a filename carries one of the image extensions.
pub fn is_image_filename(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

pub fn image_url(category: &str, filename: &str) -> String {
    format!("/projects/{category}/{filename}")
}

/// Map manifest filenames to entries, in manifest order.
///
/// An empty filename would produce `/projects/{category}/`, which points at
/// a directory rather than an image; such entries are dropped.
pub fn derive_entries(category: Category, files: &[String]) -> Vec<ImageEntry> {
    files
        .iter()
        .map(|f| ImageEntry {
            url: image_url(category.key(), f),
        })
        .filter(|e| !is_degenerate(&e.url, category))
        .collect()
}

fn is_degenerate(url: &str, category: Category) -> bool {
    url.is_empty() || url == "/projects//" || url == image_url(category.key(), "")
}
