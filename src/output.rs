//! CLI output formatting.
//!
//! Each command has a `format_*` function returning `Vec<String>` and a
//! `print_*` wrapper that writes to stdout. Format functions are pure, so
//! tests assert on exact lines.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Manifests
//! 001 bedroom (0 images)
//!     Output: data/bedroom.json
//! 002 kitchen (2 images)
//!     Output: data/kitchen.json
//! Generated 2 manifests, 2 images
//! ```
//!
//! ## Preview
//!
//! ```text
//! Page /kitchen.html → kitchen
//! kitchen (2 columns, 3 images)
//!     Column 1 (300px)
//!         001 /projects/kitchen/a.jpg [revealed]
//!     Column 2 (400px)
//!         002 /projects/kitchen/b.jpg [revealed]
//!         003 /projects/kitchen/c.jpg [queued]
//!     2 preloaded, 0 failed, 1 lazy
//! ```

use crate::category::{Category, PageTarget};
use crate::gallery::{Gallery, LoadState};
use crate::loader::PageLoad;
use crate::manifest::BuildReport;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn state_label(state: LoadState) -> &'static str {
    match state {
        LoadState::Queued => "queued",
        LoadState::Probing => "probing",
        LoadState::Revealed => "revealed",
        LoadState::Failed => "failed",
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format the result of a manifest build.
pub fn format_build_output(report: &BuildReport, projects_dir: &Path) -> Vec<String> {
    if report.missing_root {
        return vec![format!(
            "No projects directory at {}, nothing to generate",
            projects_dir.display()
        )];
    }

    let mut lines = vec!["Manifests".to_string()];
    for (i, manifest) in report.manifests.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            manifest.category,
            plural(manifest.files.len(), "image")
        ));
        lines.push(format!(
            "{}Output: {}",
            indent(1),
            manifest.output.display()
        ));
    }
    lines.push(format!(
        "Generated {}, {}",
        plural(report.manifests.len(), "manifest"),
        plural(report.image_count(), "image")
    ));
    lines
}

pub fn print_build_output(report: &BuildReport, projects_dir: &Path) {
    for line in format_build_output(report, projects_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Resolve
// ============================================================================

fn target_label(target: PageTarget) -> String {
    match target {
        PageTarget::Category(c) => c.key().to_string(),
        PageTarget::Premium => format!("premium ({} categories)", Category::PREMIUM.len()),
    }
}

/// Format what a page path resolves to.
pub fn format_resolve_output(path: &str, target: Option<PageTarget>) -> Vec<String> {
    match target {
        None => vec![format!("Page {} → no gallery", path)],
        Some(target) => {
            let mut lines = vec![format!("Page {} → {}", path, target_label(target))];
            for category in target.categories() {
                lines.push(format!(
                    "{}{} → {} in #{}",
                    indent(1),
                    category,
                    category.manifest_path(),
                    category.container_id()
                ));
            }
            lines
        }
    }
}

pub fn print_resolve_output(path: &str, target: Option<PageTarget>) {
    for line in format_resolve_output(path, target) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview
// ============================================================================

/// Format one gallery's columns, with each element's position in the
/// original load order.
pub fn format_gallery(gallery: &Gallery) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({}, {})",
        gallery.category(),
        plural(gallery.masonry().column_count(), "column"),
        plural(gallery.len(), "image")
    )];

    for (i, column) in gallery.masonry().columns().iter().enumerate() {
        lines.push(format!(
            "{}Column {} ({}px)",
            indent(1),
            i + 1,
            column.height().round()
        ));
        for id in column.ids() {
            if let Some(element) = gallery.element(id) {
                lines.push(format!(
                    "{}{} {} [{}]",
                    indent(2),
                    format_index(id.0 + 1),
                    element.url,
                    state_label(element.state)
                ));
            }
        }
    }
    lines
}

/// Format a whole page load: every category, loaded or failed.
pub fn format_preview_output(path: &str, page: &PageLoad) -> Vec<String> {
    let Some(target) = page.target else {
        return format_resolve_output(path, None);
    };

    let mut lines = vec![format!("Page {} → {}", path, target_label(target))];
    for load in &page.loads {
        match &load.result {
            Ok(loaded) => {
                lines.extend(format_gallery(&loaded.gallery));
                let report = loaded.report;
                let mut summary = format!(
                    "{}{} preloaded, {} failed, {} lazy",
                    indent(1),
                    report.head_rendered,
                    report.head_failed,
                    report.tail_queued
                );
                if report.dropped > 0 {
                    summary.push_str(&format!(", {} dropped", report.dropped));
                }
                lines.push(summary);
            }
            Err(err) => lines.push(format!("{}: {}", load.category, err)),
        }
    }
    lines
}

pub fn print_preview_output(path: &str, page: &PageLoad) {
    for line in format_preview_output(path, page) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
