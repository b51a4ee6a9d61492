//! Shared test fakes for the room-gallery test suite.
//!
//! In-memory stand-ins for the three host capabilities, so loader, pipeline
//! and gallery tests run without a browser or a site on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = MemorySource::new().with_manifest(Category::Kitchen, &["a.jpg"]);
//! let probe = MapProbe::all_ok(["/projects/kitchen/a.jpg".to_string()], dims(300, 200));
//! let host = StaticHost::with_containers(&[Category::Kitchen]).columns("2");
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::future::{Future, ready};

use crate::category::Category;
use crate::host::{Dimensions, FetchError, Host, ImageProbe, ManifestSource, ProbeError};

pub fn dims(width: u32, height: u32) -> Dimensions {
    Dimensions { width, height }
}

// =========================================================================
// Manifest source
// =========================================================================

/// Serves manifest bodies from memory; unknown paths answer 404.
/// Every request is recorded.
#[derive(Debug, Default)]
pub struct MemorySource {
    bodies: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a JSON array of the given filenames for a category.
    pub fn with_manifest(self, category: Category, files: &[&str]) -> Self {
        let body = serde_json::to_string(files).unwrap();
        self.with_body(category, &body)
    }

    /// Serve a raw body for a category's manifest path.
    pub fn with_body(mut self, category: Category, body: &str) -> Self {
        self.bodies
            .insert(category.manifest_path(), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl ManifestSource for MemorySource {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, FetchError>> {
        self.requests.borrow_mut().push(path.to_string());
        let result = self
            .bodies
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                path: path.to_string(),
                status: 404,
            });
        ready(result)
    }
}

// =========================================================================
// Image probe
// =========================================================================

/// Decodes the URLs it knows; everything else fails. Optional per-URL
/// delays (in scheduler yields) reorder completion without changing results.
#[derive(Debug, Default)]
pub struct MapProbe {
    images: HashMap<String, Dimensions>,
    delays: HashMap<String, usize>,
    calls: Cell<usize>,
}

impl MapProbe {
    pub fn all_ok<I>(urls: I, dimensions: Dimensions) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            images: urls.into_iter().map(|u| (u, dimensions)).collect(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, url: &str, yields: usize) -> Self {
        self.delays.insert(url.to_string(), yields);
        self
    }

    /// Number of probes issued so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ImageProbe for MapProbe {
    fn probe(&self, url: &str) -> impl Future<Output = Result<Dimensions, ProbeError>> {
        self.calls.set(self.calls.get() + 1);
        let outcome = self
            .images
            .get(url)
            .copied()
            .ok_or_else(|| ProbeError::NotFound(url.to_string()));
        let delay = self.delays.get(url).copied().unwrap_or(0);
        async move {
            for _ in 0..delay {
                tokio::task::yield_now().await;
            }
            outcome
        }
    }
}

// =========================================================================
// Host
// =========================================================================

/// A page with a fixed set of container ids and one `--columns` value.
#[derive(Debug, Default)]
pub struct StaticHost {
    containers: HashSet<String>,
    columns: Option<String>,
}

impl StaticHost {
    pub fn with_containers(categories: &[Category]) -> Self {
        Self {
            containers: categories.iter().map(|c| c.container_id()).collect(),
            columns: None,
        }
    }

    /// Add arbitrary element ids, such as the fullscreen overlay.
    pub fn with_ids(mut self, ids: &[&str]) -> Self {
        self.containers.extend(ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn columns(mut self, value: &str) -> Self {
        self.columns = Some(value.to_string());
        self
    }
}

impl Host for StaticHost {
    fn has_container(&self, id: &str) -> bool {
        self.containers.contains(id)
    }

    fn columns_property(&self, _id: &str) -> Option<String> {
        self.columns.clone()
    }
}
