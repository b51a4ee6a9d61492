//! Progressive image loading.
//!
//! A category's entries are split into a head batch and a tail:
//!
//! ```text
//! entries  [e0 e1 e2 e3 e4 e5 | e6 e7 e8 ...]
//!           └──── head ──────┘ └── tail ──┘
//!
//! head: probe all ──► barrier (wait for every probe) ──► render in order
//! tail: render placeholders immediately ──► reveal scheduler
//! ```
//!
//! Waiting for the whole head batch means the first screen never flickers
//! through half-loaded images; the price is that it appears only when the
//! slowest head image has settled.
//!
//! With `prevalidate` (the premium page) every entry is probed before the
//! split and failures are dropped, so no broken image can ever be rendered.

use crate::entry::ImageEntry;
use crate::gallery::Gallery;
use crate::host::{Dimensions, ImageProbe, ProbeError};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

/// What to do with an image that fails to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Render it anyway; the browser shows it broken.
    #[default]
    Lenient,
    /// Leave it out.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub head_batch: usize,
    pub policy: FailurePolicy,
    pub prevalidate: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            head_batch: 10,
            policy: FailurePolicy::Lenient,
            prevalidate: false,
        }
    }
}

/// Counts from one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Entries removed by prevalidation.
    pub dropped: usize,
    /// Head entries rendered, loaded or broken.
    pub head_rendered: usize,
    /// Head entries whose preload failed.
    pub head_failed: usize,
    /// Placeholders handed to the reveal scheduler.
    pub tail_queued: usize,
}

/// Split off the first `head` items.
pub fn partition<T>(mut items: Vec<T>, head: usize) -> (Vec<T>, Vec<T>) {
    let tail = items.split_off(head.min(items.len()));
    (items, tail)
}

/// Probe every entry concurrently; outcomes are in entry order.
pub async fn probe_all<P: ImageProbe>(
    probe: &P,
    entries: &[ImageEntry],
) -> Vec<Result<Dimensions, ProbeError>> {
    join_all(entries.iter().map(|e| probe.probe(&e.url))).await
}

/// Keep only the entries that load, with their dimensions.
pub async fn prevalidate<P: ImageProbe>(
    probe: &P,
    entries: Vec<ImageEntry>,
) -> Vec<(ImageEntry, Dimensions)> {
    let outcomes = probe_all(probe, &entries).await;
    entries
        .into_iter()
        .zip(outcomes)
        .filter_map(|(entry, outcome)| match outcome {
            Ok(dimensions) => Some((entry, dimensions)),
            Err(err) => {
                log::warn!("dropping unverified image: {err}");
                None
            }
        })
        .collect()
}

/// Render `entries` into the gallery: head batch behind a barrier, tail as
/// deferred placeholders.
pub async fn fill<P: ImageProbe>(
    gallery: &mut Gallery,
    probe: &P,
    entries: Vec<ImageEntry>,
    options: &PipelineOptions,
) -> FillReport {
    let mut report = FillReport::default();
    let total = entries.len();

    let candidates: Vec<(ImageEntry, Option<Dimensions>)> = if options.prevalidate {
        let verified = prevalidate(probe, entries).await;
        report.dropped = total - verified.len();
        verified.into_iter().map(|(e, d)| (e, Some(d))).collect()
    } else {
        entries.into_iter().map(|e| (e, None)).collect()
    };

    let (head, tail) = partition(candidates, options.head_batch);

    log::debug!(
        "{}: preloading {} images, {} lazy",
        gallery.category(),
        head.len(),
        tail.len()
    );
    let outcomes = join_all(head.iter().map(|(entry, known)| async move {
        match known {
            Some(dimensions) => Ok(*dimensions),
            None => probe.probe(&entry.url).await,
        }
    }))
    .await;

    for ((entry, _), outcome) in head.into_iter().zip(outcomes) {
        match outcome {
            Ok(dimensions) => {
                gallery.render_loaded(entry, dimensions);
                report.head_rendered += 1;
            }
            Err(err) => {
                report.head_failed += 1;
                match options.policy {
                    FailurePolicy::Strict => {
                        log::warn!("{}: skipping image: {err}", gallery.category());
                    }
                    FailurePolicy::Lenient => {
                        log::warn!("{}: preload failed: {err}", gallery.category());
                        gallery.render_broken(entry);
                        report.head_rendered += 1;
                    }
                }
            }
        }
    }

    for (entry, _) in tail {
        gallery.render_deferred(entry);
        report.tail_queued += 1;
    }

    report
}
