//! The story model.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Publication status of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryStatus {
    /// Not yet published; hidden from the public index.
    Draft,
    /// Publicly visible.
    Published,
}

impl StoryStatus {
    /// Stable identifier used in filters and templates.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryStatus::Draft => "draft",
            StoryStatus::Published => "published",
        }
    }
}

/// A persisted story.
///
/// Holds the raw markup plus metadata extracted from the root `<amp-story>`
/// element. Immutable for the duration of a render; the renderer produces a
/// new output string per call and never writes back into the story.
#[derive(Debug, Clone, Serialize)]
pub struct Story {
    /// URL slug identifying the story.
    pub slug: String,

    /// Story title.
    pub title: String,

    /// Publisher name.
    pub publisher: String,

    /// Publisher logo URL.
    pub publisher_logo: String,

    /// Feature image URL used to derive poster variants, if any.
    pub poster: Option<String>,

    /// Publication status.
    pub status: StoryStatus,

    /// Raw stored markup (the full HTML document).
    #[serde(skip)]
    pub content: String,
}

impl Story {
    /// Build a story from its stored document, extracting metadata from the
    /// first `<amp-story>` element.
    ///
    /// A document without an `<amp-story>` element still yields a story; its
    /// metadata fields are simply empty. Decoding never fails on malformed
    /// markup thanks to html5ever's error recovery.
    pub fn from_document(slug: impl Into<String>, content: impl Into<String>) -> Self {
        let slug = slug.into();
        let content = content.into();

        let document = Html::parse_document(&content);
        let selector = Selector::parse("amp-story").expect("static selector");

        let mut story = Self {
            slug,
            title: String::new(),
            publisher: String::new(),
            publisher_logo: String::new(),
            poster: None,
            status: StoryStatus::Published,
            content,
        };

        if let Some(root) = document.select(&selector).next() {
            let element = root.value();
            story.title = element.attr("title").unwrap_or_default().to_string();
            story.publisher = element.attr("publisher").unwrap_or_default().to_string();
            story.publisher_logo = element
                .attr("publisher-logo-src")
                .unwrap_or_default()
                .to_string();
            story.poster = element.attr("poster-portrait-src").map(str::to_string);
        }

        story
    }

    /// Override the feature image used for poster derivation.
    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }

    /// Override the publication status.
    pub fn with_status(mut self, status: StoryStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the story has a feature image to derive posters from.
    pub fn has_poster(&self) -> bool {
        self.poster.is_some()
    }
}
