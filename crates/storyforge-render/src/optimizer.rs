//! Markup optimization pass.
//!
//! The optimizer is the last transformation before serialization. It is a
//! trait boundary so a real AMP optimizer can be plugged in; the built-in
//! implementation performs the self-transform marking and honestly reports
//! the passes it cannot run server-side as diagnostics.

use scraper::Html;

use crate::dom;

/// Result of an optimization pass. Optimization is best-effort and never
/// fails; incomplete passes surface as diagnostics.
#[derive(Debug, Clone)]
pub struct Optimized {
    /// Optimized document markup.
    pub html: String,

    /// Human-readable notes about passes that could not be completed.
    pub diagnostics: Vec<String>,
}

/// A markup sanitizer/optimizer.
pub trait Optimizer {
    fn optimize(&self, html: &str) -> Optimized;
}

/// Built-in optimizer.
///
/// Marks the document as self-transformed (`transformed="self;v=<n>"`) and
/// reports the server-side rendering pass as incomplete, since computing AMP
/// layout sizes ahead of time requires the full optimizer toolchain.
#[derive(Debug, Clone, Copy)]
pub struct TransformOptimizer {
    version: u32,
}

impl TransformOptimizer {
    pub fn new() -> Self {
        Self { version: 1 }
    }

    /// Override the advertised transform version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

impl Default for TransformOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for TransformOptimizer {
    fn optimize(&self, html: &str) -> Optimized {
        let mut doc = Html::parse_document(html);
        let mut diagnostics = Vec::new();

        match dom::select_first(&doc, "html") {
            Some(root) => {
                dom::set_attr(
                    &mut doc,
                    root,
                    "transformed",
                    &format!("self;v={}", self.version),
                );
            }
            None => diagnostics.push("document has no root element to mark".to_string()),
        }

        diagnostics.push("server-side rendering of AMP layouts was skipped".to_string());

        Optimized {
            html: dom::serialize(&doc),
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_document_as_self_transformed() {
        let result = TransformOptimizer::new()
            .optimize("<html><head></head><body><amp-story></amp-story></body></html>");

        assert!(result.html.contains("transformed=\"self;v=1\""));
    }

    #[test]
    fn transform_version_is_configurable() {
        let result = TransformOptimizer::new()
            .with_version(5)
            .optimize("<html></html>");

        assert!(result.html.contains("transformed=\"self;v=5\""));
    }

    #[test]
    fn reports_incomplete_passes() {
        let result = TransformOptimizer::new().optimize("<html></html>");
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn output_is_a_complete_document() {
        let result = TransformOptimizer::new().optimize("<html><body>x</body></html>");
        assert!(result.html.starts_with("<!DOCTYPE html>"));
        assert!(result.html.ends_with("</html>"));
    }
}
