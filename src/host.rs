//! Capabilities the gallery needs from the page it runs in.
//!
//! In a browser these are `fetch`, an off-screen `Image` decode and
//! `document.getElementById`. Keeping them behind traits lets the loading,
//! layout and reveal logic run against a site directory on disk
//! ([`SiteDir`](crate::site::SiteDir)) or against in-memory fakes in tests.

use std::future::Future;
use thiserror::Error;

/// Natural size of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Rendered height at the given width, keeping the aspect ratio.
    pub fn height_at(self, width: f64) -> f64 {
        if self.width == 0 {
            return width;
        }
        width * f64::from(self.height) / f64::from(self.width)
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {status} for {path}")]
    Status { path: String, status: u16 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("decode failed for {url}: {message}")]
    Decode { url: String, message: String },
}

/// Retrieves a manifest by its site path, e.g. `/data/kitchen.json`.
pub trait ManifestSource {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// Attempts to load an image out of band, resolving once it has decoded or
/// failed.
pub trait ImageProbe {
    fn probe(&self, url: &str) -> impl Future<Output = Result<Dimensions, ProbeError>>;
}

/// The page's element tree, as far as the gallery reads it.
pub trait Host {
    /// Whether an element with this id exists.
    fn has_container(&self, id: &str) -> bool;
    /// Computed `--columns` value on the element, if set.
    fn columns_property(&self, id: &str) -> Option<String>;
}
