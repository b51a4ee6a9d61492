//! Viewport-triggered reveal of deferred images.
//!
//! Lazy images are rendered as placeholders whose real source is held back.
//! A [`RevealScheduler`] watches them the way an `IntersectionObserver` with
//! `rootMargin: "300px 0px"` and `threshold: 0.01` would: once a placeholder
//! comes within the margin of the viewport and enough of it is inside the
//! extended box, it is reported once and dropped from the watch list.
//!
//! Each gallery load owns its own scheduler, so categories loading side by
//! side never see each other's placeholders.

use crate::layout::{ElementId, Rect};

/// The visible part of the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Scroll offset.
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    /// Margin added above and below the viewport.
    pub root_margin: f64,
    /// Minimum fraction of the element inside the extended viewport.
    pub threshold: f64,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            root_margin: 300.0,
            threshold: 0.01,
        }
    }
}

/// Fraction of `rect` inside the viewport extended by `margin` on both
/// edges. A zero-height element counts as fully inside when its top edge is
/// within the extended box.
pub fn intersection_ratio(rect: Rect, viewport: Viewport, margin: f64) -> f64 {
    let root_top = viewport.top - margin;
    let root_bottom = viewport.top + viewport.height + margin;

    if rect.height <= 0.0 {
        return if rect.top >= root_top && rect.top <= root_bottom {
            1.0
        } else {
            0.0
        };
    }

    let overlap = rect.bottom().min(root_bottom) - rect.top.max(root_top);
    if overlap <= 0.0 {
        0.0
    } else {
        (overlap / rect.height).min(1.0)
    }
}

/// Watch list of deferred elements for one gallery.
#[derive(Debug, Clone, Default)]
pub struct RevealScheduler {
    options: RevealOptions,
    observed: Vec<ElementId>,
}

impl RevealScheduler {
    pub fn new(options: RevealOptions) -> Self {
        Self {
            options,
            observed: Vec::new(),
        }
    }

    pub fn options(&self) -> RevealOptions {
        self.options
    }

    pub fn observe(&mut self, id: ElementId) {
        if !self.observed.contains(&id) {
            self.observed.push(id);
        }
    }

    pub fn unobserve(&mut self, id: ElementId) {
        self.observed.retain(|&o| o != id);
    }

    pub fn is_observing(&self, id: ElementId) -> bool {
        self.observed.contains(&id)
    }

    /// Number of elements still waiting to be revealed.
    pub fn pending(&self) -> usize {
        self.observed.len()
    }

    /// Report every watched element that now intersects, in observation
    /// order, and stop watching them. Elements without geometry (removed from
    /// the layout) are dropped as well.
    pub fn take_intersecting<F>(&mut self, viewport: Viewport, rect_of: F) -> Vec<ElementId>
    where
        F: Fn(ElementId) -> Option<Rect>,
    {
        let options = self.options;
        let mut hits = Vec::new();
        self.observed.retain(|&id| match rect_of(id) {
            None => false,
            Some(rect) => {
                let ratio = intersection_ratio(rect, viewport, options.root_margin);
                if ratio > 0.0 && ratio >= options.threshold {
                    hits.push(id);
                    false
                } else {
                    true
                }
            }
        });
        hits
    }
}
