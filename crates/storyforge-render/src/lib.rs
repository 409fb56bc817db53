//! Story HTML renderer.
//!
//! Transforms a stored story document into a standalone AMP HTML document
//! through a fixed pipeline: html start-tag decoration, head region
//! replacement, poster injection, analytics insertion, admin-bar display and
//! a final markup optimization pass. Every stage degrades gracefully when its
//! target structure is absent; rendering always returns a document string.

pub mod dom;
pub mod optimizer;
pub mod providers;
pub mod renderer;

pub use optimizer::{Optimized, Optimizer, TransformOptimizer};
pub use providers::{
    AnalyticsProvider, HeadProvider, PosterDeriver, PosterImages, SiteConfig, SuffixDeriver,
};
pub use renderer::{HtmlRenderer, HEAD_END_MARKER, HEAD_START_MARKER};
