//! The rendered state of one category container.
//!
//! A [`Gallery`] is what the browser's `{category}Gallery` element holds after
//! a load: masonry columns of image elements, each with a [`LoadState`], plus
//! the reveal watch list for the lazy ones.
//!
//! ## Element lifecycle
//!
//! ```text
//! head batch:   (probed) ──────────────► Revealed | Failed (lenient only)
//! tail:         Queued ──► Probing ────► Revealed | Failed (lenient) | removed (strict)
//!                  ▲          │
//!                  └─ reveal ─┘  one-shot: only Queued elements are promoted
//! ```
//!
//! ## Resizing while loading
//!
//! A gallery is created in the loading state. Resize requests that arrive
//! before [`Gallery::finish_loading`] are held back (the last one wins) and
//! applied when the load settles, so the initial placement is never
//! interleaved with a rebuild.
//!
//! [`Loader::load_category`](crate::loader::Loader::load_category) settles
//! the load before handing the gallery out. A host that embeds the gallery
//! and forwards window resizes while [`fill`](crate::pipeline::fill) is
//! still running calls [`Gallery::resize`] in that window and gets the
//! deferred behavior.

use crate::category::Category;
use crate::entry::ImageEntry;
use crate::host::{Dimensions, ImageProbe, ProbeError};
use crate::layout::{ElementId, Masonry, Rect};
use crate::pipeline::FailurePolicy;
use crate::reveal::{RevealOptions, RevealScheduler, Viewport};
use crate::viewer::Viewer;
use futures::future::join_all;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadState {
    /// Rendered as a placeholder, real source held back.
    Queued,
    /// Source promoted, decode in flight.
    Probing,
    /// Decoded and shown ("settled").
    Revealed,
    /// Decode failed; shown broken.
    Failed,
}

/// One `<img>` in the container.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub id: ElementId,
    /// The image URL; also what the fullscreen viewer opens.
    pub url: String,
    /// Live source, set once the element may load.
    pub src: Option<String>,
    /// Held-back source of a lazy placeholder.
    pub deferred_src: Option<String>,
    pub state: LoadState,
}

impl ImageElement {
    pub fn is_settled(&self) -> bool {
        self.state == LoadState::Revealed
    }
}

/// Layout-affecting settings of a gallery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GallerySettings {
    pub columns: usize,
    pub column_width: f64,
    pub policy: FailurePolicy,
    pub reveal: RevealOptions,
}

#[derive(Debug, Clone)]
pub struct Gallery {
    category: Category,
    masonry: Masonry,
    elements: BTreeMap<ElementId, ImageElement>,
    scheduler: RevealScheduler,
    column_width: f64,
    policy: FailurePolicy,
    next_id: usize,
    loading: bool,
    pending_columns: Option<usize>,
}

impl Gallery {
    pub fn new(category: Category, settings: GallerySettings) -> Self {
        Self {
            category,
            masonry: Masonry::create_columns(settings.columns),
            elements: BTreeMap::new(),
            scheduler: RevealScheduler::new(settings.reveal),
            column_width: settings.column_width,
            policy: settings.policy,
            next_id: 0,
            loading: true,
            pending_columns: None,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn masonry(&self) -> &Masonry {
        &self.masonry
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn element(&self, id: ElementId) -> Option<&ImageElement> {
        self.elements.get(&id)
    }

    pub fn state(&self, id: ElementId) -> Option<LoadState> {
        self.elements.get(&id).map(|e| e.state)
    }

    /// Elements in document order.
    pub fn elements(&self) -> Vec<&ImageElement> {
        self.masonry
            .elements()
            .into_iter()
            .filter_map(|id| self.elements.get(&id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// URLs of every element in the container, loaded or not.
    pub fn rendered_urls(&self) -> Vec<&str> {
        self.elements().into_iter().map(|e| e.url.as_str()).collect()
    }

    pub fn count(&self, state: LoadState) -> usize {
        self.elements.values().filter(|e| e.state == state).count()
    }

    /// Placeholders still waiting for the viewport.
    pub fn pending_reveals(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.masonry.rect(id)
    }

    fn placeholder_height(&self) -> f64 {
        self.column_width
    }

    fn insert(&mut self, entry: ImageEntry, state: LoadState, height: f64) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        let (src, deferred_src) = match state {
            LoadState::Queued => (None, Some(entry.url.clone())),
            _ => (Some(entry.url.clone()), None),
        };
        self.masonry.place(id, height);
        self.elements.insert(
            id,
            ImageElement {
                id,
                url: entry.url,
                src,
                deferred_src,
                state,
            },
        );
        id
    }

    /// Render an image whose preload succeeded.
    pub fn render_loaded(&mut self, entry: ImageEntry, dimensions: Dimensions) -> ElementId {
        let height = dimensions.height_at(self.column_width);
        self.insert(entry, LoadState::Revealed, height)
    }

    /// Render an image whose preload failed; the browser shows it broken.
    pub fn render_broken(&mut self, entry: ImageEntry) -> ElementId {
        let height = self.placeholder_height();
        self.insert(entry, LoadState::Failed, height)
    }

    /// Render a lazy placeholder and start watching it.
    pub fn render_deferred(&mut self, entry: ImageEntry) -> ElementId {
        let height = self.placeholder_height();
        let id = self.insert(entry, LoadState::Queued, height);
        self.scheduler.observe(id);
        id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Mark the initial load as settled and apply any held-back resize.
    pub fn finish_loading(&mut self) {
        self.loading = false;
        if let Some(columns) = self.pending_columns.take() {
            self.masonry.rebuild(columns);
        }
    }

    /// Rebuild the columns for a new column count. Returns `false` when the
    /// rebuild was deferred because the gallery is still loading.
    pub fn resize(&mut self, columns: usize) -> bool {
        if self.loading {
            log::debug!("{}: resize to {columns} deferred until load settles", self.category);
            self.pending_columns = Some(columns);
            return false;
        }
        self.masonry.rebuild(columns);
        true
    }

    /// Queued elements that now intersect the viewport, in delivery order.
    /// They are no longer watched afterwards.
    pub fn intersecting(&mut self, viewport: Viewport) -> Vec<ElementId> {
        let masonry = &self.masonry;
        let hits = self
            .scheduler
            .take_intersecting(viewport, |id| masonry.rect(id));
        hits.into_iter()
            .filter(|id| self.state(*id) == Some(LoadState::Queued))
            .collect()
    }

    /// Promote a queued element's deferred source to its live source.
    ///
    /// Returns the source to load, or `None` if the element was already
    /// promoted (or does not exist).
    pub fn begin_reveal(&mut self, id: ElementId) -> Option<String> {
        let element = self.elements.get_mut(&id)?;
        if element.state != LoadState::Queued {
            return None;
        }
        let src = element.deferred_src.take()?;
        element.src = Some(src.clone());
        element.state = LoadState::Probing;
        self.scheduler.unobserve(id);
        Some(src)
    }

    /// Apply the decode outcome of a promoted element.
    pub fn settle(&mut self, id: ElementId, outcome: Result<Dimensions, ProbeError>) {
        if self.state(id) != Some(LoadState::Probing) {
            return;
        }
        match outcome {
            Ok(dimensions) => {
                self.masonry
                    .set_height(id, dimensions.height_at(self.column_width));
                if let Some(element) = self.elements.get_mut(&id) {
                    element.state = LoadState::Revealed;
                }
            }
            Err(err) => {
                log::warn!("{}: lazy image failed: {err}", self.category);
                match self.policy {
                    FailurePolicy::Strict => {
                        self.masonry.remove(id);
                        self.elements.remove(&id);
                    }
                    FailurePolicy::Lenient => {
                        if let Some(element) = self.elements.get_mut(&id) {
                            element.state = LoadState::Failed;
                        }
                    }
                }
            }
        }
    }

    /// Run one reveal pass: promote every intersecting placeholder, load
    /// them together and settle each. Returns the promoted ids in delivery
    /// order.
    pub async fn reveal<P: ImageProbe>(&mut self, viewport: Viewport, probe: &P) -> Vec<ElementId> {
        let promoted: Vec<(ElementId, String)> = self
            .intersecting(viewport)
            .into_iter()
            .filter_map(|id| self.begin_reveal(id).map(|src| (id, src)))
            .collect();

        let outcomes = join_all(promoted.iter().map(|(_, src)| probe.probe(src))).await;

        for ((id, _), outcome) in promoted.iter().zip(outcomes) {
            self.settle(*id, outcome);
        }
        promoted.into_iter().map(|(id, _)| id).collect()
    }

    /// Click on an element: show it fullscreen.
    pub fn activate(&self, id: ElementId, viewer: &mut Viewer) -> bool {
        match self.elements.get(&id) {
            Some(element) => {
                viewer.open(&element.url);
                true
            }
            None => false,
        }
    }
}
