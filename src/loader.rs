//! Category loading.
//!
//! Loading one category is a short, failure-tolerant sequence:
//!
//! 1. find the `{category}Gallery` container on the host
//! 2. fetch `/data/{category}.json`
//! 3. require a JSON array of filename strings
//! 4. derive image URLs, dropping degenerate ones
//! 5. hand them to the [`pipeline`](crate::pipeline)
//!
//! Any failure aborts that category only. A page with several categories
//! (the premium page) loads them side by side; one broken manifest leaves
//! its container empty and never holds up the others. Nothing is retried and
//! nothing is shown to the visitor: errors are logged and returned.

use crate::category::{Category, PageTarget, resolve};
use crate::config::GalleryConfig;
use crate::entry::derive_entries;
use crate::gallery::{Gallery, GallerySettings};
use crate::host::{FetchError, Host, ImageProbe, ManifestSource};
use crate::layout::column_count;
use crate::pipeline::{FillReport, fill};
use futures::future::join_all;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("container #{0} not found")]
    MissingContainer(String),
    #[error("manifest fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("manifest is not a JSON array")]
    NotArray,
    #[error("manifest entry {0} is not a string")]
    NonStringEntry(usize),
}

/// Parse a manifest body into filenames.
pub fn parse_manifest(body: &str) -> Result<Vec<String>, LoadError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let items = value.as_array().ok_or(LoadError::NotArray)?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or(LoadError::NonStringEntry(i))
        })
        .collect()
}

/// A category that loaded.
#[derive(Debug)]
pub struct LoadedGallery {
    pub gallery: Gallery,
    pub report: FillReport,
}

#[derive(Debug)]
pub struct CategoryLoad {
    pub category: Category,
    pub result: Result<LoadedGallery, LoadError>,
}

/// Everything a page load produced.
#[derive(Debug)]
pub struct PageLoad {
    pub target: Option<PageTarget>,
    /// One entry per category of the target, in page order.
    pub loads: Vec<CategoryLoad>,
}

/// Loads categories against a manifest source, an image probe and a host.
pub struct Loader<'a, S, P, H> {
    source: &'a S,
    probe: &'a P,
    host: &'a H,
    config: &'a GalleryConfig,
}

impl<'a, S, P, H> Loader<'a, S, P, H>
where
    S: ManifestSource,
    P: ImageProbe,
    H: Host,
{
    pub fn new(source: &'a S, probe: &'a P, host: &'a H, config: &'a GalleryConfig) -> Self {
        Self {
            source,
            probe,
            host,
            config,
        }
    }

    /// Load one category into a fresh gallery.
    pub async fn load_category(&self, category: Category) -> Result<LoadedGallery, LoadError> {
        let container = category.container_id();
        if !self.host.has_container(&container) {
            return Err(LoadError::MissingContainer(container));
        }

        let path = category.manifest_path();
        log::debug!("{category}: fetching {path}");
        let body = self.source.fetch(&path).await?;
        let files = parse_manifest(&body)?;
        let entries = derive_entries(category, &files);
        log::debug!("{category}: {} images in manifest", entries.len());

        let options = self.config.pipeline_options(category.is_premium());
        let columns = column_count(
            self.host.columns_property(&container).as_deref(),
            self.config.layout.default_columns,
        );
        let mut gallery = Gallery::new(
            category,
            GallerySettings {
                columns,
                column_width: self.config.layout.column_width,
                policy: options.policy,
                reveal: self.config.reveal_options(),
            },
        );

        let report = fill(&mut gallery, self.probe, entries, &options).await;
        gallery.finish_loading();
        Ok(LoadedGallery { gallery, report })
    }

    /// Resolve a page path and load its categories concurrently.
    ///
    /// Unknown pages load nothing and issue no requests.
    pub async fn load_page(&self, path: &str) -> PageLoad {
        let Some(target) = resolve(path) else {
            log::info!("no gallery on page {path}");
            return PageLoad {
                target: None,
                loads: Vec::new(),
            };
        };

        let loads = join_all(target.categories().into_iter().map(|category| async move {
            let result = self.load_category(category).await;
            if let Err(err) = &result {
                log::error!("{category}: {err}");
            }
            CategoryLoad { category, result }
        }))
        .await;

        PageLoad {
            target: Some(target),
            loads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::LoadState;
    use crate::test_helpers::*;

    // =========================================================================
    // Manifest parsing
    // =========================================================================

    #[test]
    fn parse_array_of_strings() {
        let files = parse_manifest(r#"["a.jpg", "b.png"]"#).unwrap();
        assert_eq!(files, vec!["a.jpg", "b.png"]);
    }

    #[test]
    fn parse_rejects_object() {
        assert!(matches!(
            parse_manifest(r#"{"files": []}"#),
            Err(LoadError::NotArray)
        ));
    }

    #[test]
    fn parse_rejects_non_json() {
        assert!(matches!(
            parse_manifest("<html>404</html>"),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn parse_rejects_nested_values() {
        assert!(matches!(
            parse_manifest(r#"["a.jpg", {"name": "b.jpg"}]"#),
            Err(LoadError::NonStringEntry(1))
        ));
    }

    #[test]
    fn parse_empty_array() {
        assert!(parse_manifest("[]").unwrap().is_empty());
    }

    // =========================================================================
    // Category loading
    // =========================================================================

    #[tokio::test]
    async fn loads_every_manifest_entry() {
        let files = ["a.jpg", "b.jpg", "", "c.webp"];
        let source = MemorySource::new().with_manifest(Category::Kitchen, &files);
        let probe = MapProbe::all_ok(
            ["a.jpg", "b.jpg", "c.webp"].map(|f| format!("/projects/kitchen/{f}")),
            dims(300, 300),
        );
        let host = StaticHost::with_containers(&[Category::Kitchen]);
        let config = GalleryConfig::default();
        let loader = Loader::new(&source, &probe, &host, &config);

        let loaded = loader.load_category(Category::Kitchen).await.unwrap();

        let mut urls = loaded.gallery.rendered_urls();
        urls.sort();
        assert_eq!(
            urls,
            vec![
                "/projects/kitchen/a.jpg",
                "/projects/kitchen/b.jpg",
                "/projects/kitchen/c.webp",
            ]
        );
        assert!(!loaded.gallery.is_loading());
    }

    #[tokio::test]
    async fn missing_container_aborts_before_fetch() {
        let source = MemorySource::new().with_manifest(Category::Kitchen, &["a.jpg"]);
        let probe = MapProbe::default();
        let host = StaticHost::default();
        let config = GalleryConfig::default();
        let loader = Loader::new(&source, &probe, &host, &config);

        let result = loader.load_category(Category::Kitchen).await;

        assert!(matches!(result, Err(LoadError::MissingContainer(id)) if id == "kitchenGallery"));
        assert!(source.requests().is_empty());
    }

    #[tokio::test]
    async fn missing_manifest_is_a_fetch_error() {
        let source = MemorySource::new();
        let probe = MapProbe::default();
        let host = StaticHost::with_containers(&[Category::Living]);
        let config = GalleryConfig::default();
        let loader = Loader::new(&source, &probe, &host, &config);

        let result = loader.load_category(Category::Living).await;

        assert!(matches!(
            result,
            Err(LoadError::Fetch(FetchError::Status { status: 404, .. }))
        ));
        assert_eq!(source.requests(), vec!["/data/living.json"]);
    }

    #[tokio::test]
    async fn columns_come_from_host_property() {
        let source = MemorySource::new().with_manifest(Category::Dining, &["a.jpg"]);
        let probe = MapProbe::all_ok(["/projects/dining/a.jpg".to_string()], dims(300, 300));
        let host = StaticHost::with_containers(&[Category::Dining]).columns("5");
        let config = GalleryConfig::default();
        let loader = Loader::new(&source, &probe, &host, &config);

        let loaded = loader.load_category(Category::Dining).await.unwrap();
        assert_eq!(loaded.gallery.masonry().column_count(), 5);
    }

    #[tokio::test]
    async fn junk_column_property_uses_default() {
        let source = MemorySource::new().with_manifest(Category::Dining, &["a.jpg"]);
        let probe = MapProbe::all_ok(["/projects/dining/a.jpg".to_string()], dims(300, 300));
        let host = StaticHost::with_containers(&[Category::Dining]).columns("auto");
        let config = GalleryConfig::default();
        let loader = Loader::new(&source, &probe, &host, &config);

        let loaded = loader.load_category(Category::Dining).await.unwrap();
        assert_eq!(loaded.gallery.masonry().column_count(), 3);
    }

    // =========================================================================
    // Page loading
    // =========================================================================

    #[tokio::test]
    async fn unknown_page_issues_no_request() {
        let source = MemorySource::new().with_manifest(Category::Kitchen, &["a.jpg"]);
        let probe = MapProbe::default();
        let host = StaticHost::with_containers(&Category::ALL);
        let config = GalleryConfig::default();
        let loader = Loader::new(&source, &probe, &host, &config);

        let page = loader.load_page("/about.html").await;

        assert!(page.target.is_none());
        assert!(page.loads.is_empty());
        assert!(source.requests().is_empty());
        assert_eq!(probe.calls(), 0);
    }

    #[tokio::test]
    async fn premium_page_failure_is_isolated() {
        let mut source = MemorySource::new();
        let mut urls = Vec::new();
        for category in Category::PREMIUM {
            if category == Category::PremiumDining {
                continue;
            }
            source = source.with_manifest(category, &["one.jpg", "two.jpg"]);
            urls.push(format!("/projects/{category}/one.jpg"));
            urls.push(format!("/projects/{category}/two.jpg"));
        }
        source = source.with_body(Category::PremiumBathroom, "not json");
        let probe = MapProbe::all_ok(urls, dims(300, 400));
        let host = StaticHost::with_containers(&Category::PREMIUM);
        let config = GalleryConfig::default();
        let loader = Loader::new(&source, &probe, &host, &config);

        let page = loader.load_page("/premium.html").await;

        assert_eq!(page.target, Some(PageTarget::Premium));
        assert_eq!(page.loads.len(), 6);
        for load in &page.loads {
            match load.category {
                Category::PremiumDining => assert!(matches!(load.result, Err(LoadError::Fetch(_)))),
                Category::PremiumBathroom => assert!(matches!(load.result, Err(LoadError::Json(_)))),
                _ => assert_eq!(load.result.as_ref().unwrap().gallery.len(), 2),
            }
        }
    }

    #[tokio::test]
    async fn premium_categories_never_render_failed_images() {
        let source = MemorySource::new().with_manifest(
            Category::PremiumKitchen,
            &["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg", "f.jpg", "g.jpg", "h.jpg"],
        );
        let probe = MapProbe::all_ok(
            ["a.jpg", "c.jpg", "e.jpg", "g.jpg", "h.jpg"]
                .map(|f| format!("/projects/premium-kitchen/{f}")),
            dims(300, 300),
        );
        let host = StaticHost::with_containers(&[Category::PremiumKitchen]);
        let config = GalleryConfig::default();
        let loader = Loader::new(&source, &probe, &host, &config);

        let loaded = loader
            .load_category(Category::PremiumKitchen)
            .await
            .unwrap();

        assert_eq!(loaded.report.dropped, 3);
        assert_eq!(loaded.gallery.len(), 5);
        assert_eq!(loaded.gallery.count(LoadState::Failed), 0);
    }

    #[tokio::test]
    async fn regular_category_head_batch_is_ten() {
        let names: Vec<String> = (0..14).map(|i| format!("{i}.jpg")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let source = MemorySource::new().with_manifest(Category::Bedroom, &refs);
        let probe = MapProbe::all_ok(
            names.iter().map(|f| format!("/projects/bedroom/{f}")),
            dims(300, 300),
        );
        let host = StaticHost::with_containers(&[Category::Bedroom]);
        let config = GalleryConfig::default();
        let loader = Loader::new(&source, &probe, &host, &config);

        let loaded = loader.load_category(Category::Bedroom).await.unwrap();

        assert_eq!(loaded.report.head_rendered, 10);
        assert_eq!(loaded.report.tail_queued, 4);
        assert_eq!(loaded.gallery.count(LoadState::Revealed), 10);
    }
}
