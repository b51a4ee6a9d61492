//! # Room Gallery
//!
//! Manifest builder and gallery engine for an image catalog organized by
//! room: kitchen, living, bedroom, dining, bathroom, furniture, and a premium
//! variant of each.
//!
//! # Architecture: Build Once, Load Progressively
//!
//! ```text
//! build time    projects/<category>/*.jpg  →  data/<category>.json
//! page load     path → categories → manifest → entries → columns
//!                                     head batch (barrier) + lazy tail
//! scrolling     placeholders near the viewport → revealed
//! ```
//!
//! The site itself is static: the only "backend" is one JSON array per
//! category. Everything that happens in the browser is modeled here against
//! three small capabilities ([`host::ManifestSource`], [`host::ImageProbe`],
//! [`host::Host`]) so layout and ordering rules are plain functions with
//! plain tests. [`site::SiteDir`] implements all three over a site directory
//! on disk for the `preview` command.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`manifest`] | Build step: scans category folders, writes `{category}.json` |
//! | [`category`] | Closed set of categories and page path → category resolution |
//! | [`entry`] | Manifest filenames → image URLs |
//! | [`loader`] | Fetches and validates a manifest, runs the pipeline, isolates failures |
//! | [`pipeline`] | Head-batch preloading, lazy tail, premium prevalidation |
//! | [`layout`] | Masonry columns: shortest-column placement, rebuild on resize |
//! | [`reveal`] | Viewport intersection and the per-gallery reveal watch list |
//! | [`gallery`] | Rendered state of one container: elements, load states, resize policy |
//! | [`viewer`] | The shared fullscreen overlay |
//! | [`host`] | Capability traits and their error types |
//! | [`site`] | Filesystem-backed host used by the CLI |
//! | [`config`] | `gallery.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Barrier Before the First Screen
//!
//! The head batch is rendered only after every one of its images has either
//! decoded or failed. The first screen therefore appears complete in one
//! step, at the cost of waiting for its slowest image.
//!
//! ## Strict Premium Pages
//!
//! Premium categories probe every image before anything is laid out and
//! drop the failures. A visitor never sees a broken premium image; the price
//! is one full round of image requests before the first render.
//!
//! ## Resize Waits for the Load
//!
//! A resize that arrives while a gallery is still loading is held back and
//! applied once the load settles, so a rebuild never interleaves with the
//! initial placement.

pub mod category;
pub mod config;
pub mod entry;
pub mod gallery;
pub mod host;
pub mod layout;
pub mod loader;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod reveal;
pub mod site;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_helpers;
