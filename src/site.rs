//! A site directory on disk acting as the page host.
//!
//! Serves `/data/...` from the configured data directory and
//! `/projects/...` from the projects directory, so a built site can be
//! previewed from the command line exactly as the browser would load it.
//! Image probes decode only the header (via the `image` crate) on tokio's
//! blocking pool.

use crate::config::GalleryConfig;
use crate::host::{Dimensions, FetchError, Host, ImageProbe, ManifestSource, ProbeError};
use std::collections::HashSet;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SiteDir {
    data_dir: PathBuf,
    projects_dir: PathBuf,
    /// Container ids present on the page; `None` means every id resolves.
    containers: Option<HashSet<String>>,
    columns: Option<String>,
}

impl SiteDir {
    pub fn new(root: &Path, config: &GalleryConfig) -> Self {
        Self {
            data_dir: root.join(&config.paths.data),
            projects_dir: root.join(&config.paths.projects),
            containers: None,
            columns: None,
        }
    }

    /// Restrict the page to these container ids.
    pub fn with_containers<I: IntoIterator<Item = String>>(mut self, ids: I) -> Self {
        self.containers = Some(ids.into_iter().collect());
        self
    }

    /// Value reported for the `--columns` property of every container.
    pub fn with_columns(mut self, value: Option<String>) -> Self {
        self.columns = value;
        self
    }

    /// Map a site URL path to a file, refusing anything that escapes the
    /// mounted directory.
    pub fn file_for(&self, url: &str) -> Option<PathBuf> {
        let (base, rest) = if let Some(rest) = url.strip_prefix("/data/") {
            (&self.data_dir, rest)
        } else if let Some(rest) = url.strip_prefix("/projects/") {
            (&self.projects_dir, rest)
        } else {
            return None;
        };
        let relative = Path::new(rest);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(base.join(relative))
    }
}

impl ManifestSource for SiteDir {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, FetchError>> {
        let file = self.file_for(path);
        let path = path.to_string();
        async move {
            let Some(file) = file else {
                return Err(FetchError::Status { path, status: 404 });
            };
            match tokio::fs::read_to_string(&file).await {
                Ok(body) => Ok(body),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    Err(FetchError::Status { path, status: 404 })
                }
                Err(e) => Err(FetchError::Io(e)),
            }
        }
    }
}

impl ImageProbe for SiteDir {
    fn probe(&self, url: &str) -> impl Future<Output = Result<Dimensions, ProbeError>> {
        let file = self.file_for(url);
        let url = url.to_string();
        async move {
            let Some(file) = file else {
                return Err(ProbeError::NotFound(url));
            };
            let decoded = tokio::task::spawn_blocking(move || image::image_dimensions(&file)).await;
            match decoded {
                Ok(Ok((width, height))) => Ok(Dimensions { width, height }),
                Ok(Err(image::ImageError::IoError(e))) if e.kind() == ErrorKind::NotFound => {
                    Err(ProbeError::NotFound(url))
                }
                Ok(Err(e)) => Err(ProbeError::Decode {
                    url,
                    message: e.to_string(),
                }),
                Err(join) => Err(ProbeError::Decode {
                    url,
                    message: join.to_string(),
                }),
            }
        }
    }
}

impl Host for SiteDir {
    fn has_container(&self, id: &str) -> bool {
        self.containers.as_ref().is_none_or(|ids| ids.contains(id))
    }

    fn columns_property(&self, _id: &str) -> Option<String> {
        self.columns.clone()
    }
}
