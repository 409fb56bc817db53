//! Injected collaborators for the render pipeline.
//!
//! Rendering takes its analytics markup, head fragments and poster derivation
//! as explicit parameters instead of consulting an ambient hook registry, so
//! a render call is a pure function of the story plus these providers.

/// Supplies analytics markup to embed in the story, if any.
pub trait AnalyticsProvider {
    /// Markup to append inside the story element, or `None` to leave the
    /// document free of analytics artifacts.
    fn analytics_markup(&self) -> Option<String>;
}

impl<F> AnalyticsProvider for F
where
    F: Fn() -> Option<String>,
{
    fn analytics_markup(&self) -> Option<String> {
        self()
    }
}

/// Contributes a markup fragment to the generated head region.
pub trait HeadProvider {
    fn head_markup(&self) -> String;
}

impl<F> HeadProvider for F
where
    F: Fn() -> String,
{
    fn head_markup(&self) -> String {
        self()
    }
}

/// Poster image URLs in the three aspect-ratio variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosterImages {
    pub portrait: Option<String>,
    pub square: Option<String>,
    pub landscape: Option<String>,
}

impl PosterImages {
    /// Whether no variant was derived at all.
    pub fn is_empty(&self) -> bool {
        self.portrait.is_none() && self.square.is_none() && self.landscape.is_none()
    }
}

/// Derives the poster variants from a story's feature image URL.
pub trait PosterDeriver {
    fn derive(&self, source: &str) -> PosterImages;
}

/// Default deriver: the source URL is the portrait poster; square and
/// landscape variants add a suffix before the file extension
/// (`poster.png` -> `poster-square.png`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixDeriver;

impl SuffixDeriver {
    fn with_suffix(source: &str, suffix: &str) -> String {
        match source.rfind('.') {
            // Only treat the dot as an extension separator if it comes after
            // the last path segment separator.
            Some(dot) if !source[dot..].contains('/') => {
                format!("{}{}{}", &source[..dot], suffix, &source[dot..])
            }
            _ => format!("{}{}", source, suffix),
        }
    }
}

impl PosterDeriver for SuffixDeriver {
    fn derive(&self, source: &str) -> PosterImages {
        if source.is_empty() {
            return PosterImages::default();
        }

        PosterImages {
            portrait: Some(source.to_string()),
            square: Some(Self::with_suffix(source, "-square")),
            landscape: Some(Self::with_suffix(source, "-landscape")),
        }
    }
}

/// Ambient site configuration resolved at render time.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// BCP 47 locale written to the html start tag.
    pub locale: String,

    /// Whether to inject the admin bar and its viewport offset rule.
    pub admin_bar: bool,

    /// Generator name advertised in the replaced head region.
    pub generator_name: String,

    /// Generator version advertised in the replaced head region.
    pub generator_version: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            admin_bar: false,
            generator_name: "StoryForge".to_string(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn suffix_deriver_produces_all_variants() {
        let posters = SuffixDeriver.derive("https://example.com/media/poster.png");

        assert_eq!(
            posters.portrait.as_deref(),
            Some("https://example.com/media/poster.png")
        );
        assert_eq!(
            posters.square.as_deref(),
            Some("https://example.com/media/poster-square.png")
        );
        assert_eq!(
            posters.landscape.as_deref(),
            Some("https://example.com/media/poster-landscape.png")
        );
    }

    #[test]
    fn suffix_deriver_handles_extensionless_urls() {
        let posters = SuffixDeriver.derive("https://example.com/img/poster");
        assert_eq!(
            posters.square.as_deref(),
            Some("https://example.com/img/poster-square")
        );
    }

    #[test]
    fn dotted_path_segments_are_not_extensions() {
        let posters = SuffixDeriver.derive("https://example.co.uk/poster");
        assert_eq!(
            posters.landscape.as_deref(),
            Some("https://example.co.uk/poster-landscape")
        );
    }

    #[test]
    fn empty_source_derives_nothing() {
        assert!(SuffixDeriver.derive("").is_empty());
    }

    #[test]
    fn closures_act_as_providers() {
        let analytics = || Some("<amp-analytics></amp-analytics>".to_string());
        assert!(AnalyticsProvider::analytics_markup(&analytics).is_some());

        let head = || "<meta name=\"extra\">".to_string();
        assert_eq!(HeadProvider::head_markup(&head), "<meta name=\"extra\">");
    }
}
