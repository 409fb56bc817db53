//! The render pipeline.

use scraper::Html;

use storyforge_model::Story;

use crate::dom;
use crate::optimizer::{Optimizer, TransformOptimizer};
use crate::providers::{AnalyticsProvider, HeadProvider, PosterDeriver, SiteConfig, SuffixDeriver};

/// `name` attribute of the meta element opening the replaceable head region.
pub const HEAD_START_MARKER: &str = "storyforge-head-start";

/// `name` attribute of the meta element closing the replaceable head region.
pub const HEAD_END_MARKER: &str = "storyforge-head-end";

/// AMP analytics runtime, referenced whenever analytics markup is embedded.
const ANALYTICS_RUNTIME: &str = "<script async custom-element=\"amp-analytics\" \
     src=\"https://cdn.ampproject.org/v0/amp-analytics-0.1.js\"></script>";

/// Pixel offset applied to the story viewport while the admin bar shows.
const ADMIN_BAR_HEIGHT: u32 = 32;

/// Renders a story into a standalone AMP HTML document.
///
/// Collaborators are injected up front; given the same story and providers,
/// [`HtmlRenderer::render`] is a pure function producing a fresh document
/// string per call.
pub struct HtmlRenderer<'a> {
    story: &'a Story,
    site: SiteConfig,
    analytics: Option<Box<dyn AnalyticsProvider + 'a>>,
    head_providers: Vec<Box<dyn HeadProvider + 'a>>,
    poster_deriver: Box<dyn PosterDeriver + 'a>,
    optimizer: Box<dyn Optimizer + 'a>,
}

impl<'a> HtmlRenderer<'a> {
    /// Create a renderer with default site configuration and providers.
    pub fn new(story: &'a Story) -> Self {
        Self {
            story,
            site: SiteConfig::default(),
            analytics: None,
            head_providers: Vec::new(),
            poster_deriver: Box::new(SuffixDeriver),
            optimizer: Box::new(TransformOptimizer::new()),
        }
    }

    pub fn with_site(mut self, site: SiteConfig) -> Self {
        self.site = site;
        self
    }

    pub fn with_analytics(mut self, provider: impl AnalyticsProvider + 'a) -> Self {
        self.analytics = Some(Box::new(provider));
        self
    }

    /// Add a head fragment provider. Repeatable; fragments appear in
    /// registration order inside the generated head region.
    pub fn with_head_provider(mut self, provider: impl HeadProvider + 'a) -> Self {
        self.head_providers.push(Box::new(provider));
        self
    }

    pub fn with_poster_deriver(mut self, deriver: impl PosterDeriver + 'a) -> Self {
        self.poster_deriver = Box::new(deriver);
        self
    }

    pub fn with_optimizer(mut self, optimizer: impl Optimizer + 'a) -> Self {
        self.optimizer = Box::new(optimizer);
        self
    }

    /// Run the full pipeline and return the final document.
    ///
    /// Malformed input never fails the render: stages whose target elements
    /// are absent are skipped, and the output simply lacks those decorations.
    pub fn render(&self) -> String {
        let mut doc = Html::parse_document(&self.story.content);

        // First match wins; absence skips every stage that targets it.
        let story_root = dom::select_first(&doc, "amp-story");

        self.transform_html_start_tag(&mut doc, story_root.is_some());
        self.replace_document_head(&mut doc);
        self.add_poster_images(&mut doc, story_root);
        self.insert_analytics_configuration(&mut doc, story_root);
        self.display_admin_bar(&mut doc);
        self.optimize_markup(doc)
    }

    /// Stage 2: decorate the html start tag with `amp` and the locale.
    ///
    /// A document without a story root element must not carry any `amp`
    /// artifact, so the attribute is only added when the root is present.
    fn transform_html_start_tag(&self, doc: &mut Html, has_story_root: bool) {
        let Some(html_el) = dom::select_first(doc, "html") else {
            return;
        };

        if has_story_root {
            dom::set_attr(doc, html_el, "amp", "");
        }
        dom::set_attr(doc, html_el, "lang", &self.site.locale);
    }

    /// Stage 3: replace the marker-bounded head region with generated markup.
    ///
    /// Everything from the start marker to the end marker, markers included,
    /// is removed; content outside the markers is preserved verbatim. Without
    /// a well-formed marker pair the document is left untouched.
    fn replace_document_head(&self, doc: &mut Html) {
        let start = dom::select_first(doc, &meta_selector(HEAD_START_MARKER));
        let end = dom::select_first(doc, &meta_selector(HEAD_END_MARKER));

        let (Some(start), Some(end)) = (start, end) else {
            tracing::debug!("no head markers found; leaving head untouched");
            return;
        };

        let Some(range) = dom::sibling_range(doc, start, end) else {
            tracing::warn!("mismatched head markers; leaving head untouched");
            return;
        };

        dom::insert_fragment_before(doc, start, &self.head_markup());
        dom::detach_all(doc, &range);
    }

    /// Generated markup for the replaced head region: generator identity
    /// plus every injected head fragment.
    fn head_markup(&self) -> String {
        let mut markup = format!(
            "<meta name=\"story-generator-name\" content=\"{}\"/>\
             <meta name=\"story-generator-version\" content=\"{}\"/>",
            dom::escape_attr(&self.site.generator_name),
            dom::escape_attr(&self.site.generator_version),
        );

        for provider in &self.head_providers {
            markup.push_str(&provider.head_markup());
        }

        markup
    }

    /// Stage 4: derive and set the three poster variants.
    ///
    /// A story without any poster cannot be valid AMP, so when no variant was
    /// derived and the element carries no pre-existing portrait poster, the
    /// `amp` attribute added in stage 2 is removed again.
    fn add_poster_images(&self, doc: &mut Html, story_root: Option<ego_tree::NodeId>) {
        let Some(root) = story_root else {
            return;
        };

        if let Some(source) = &self.story.poster {
            let posters = self.poster_deriver.derive(source);

            if let Some(portrait) = &posters.portrait {
                dom::set_attr(doc, root, "poster-portrait-src", portrait);
            }
            if let Some(square) = &posters.square {
                dom::set_attr(doc, root, "poster-square-src", square);
            }
            if let Some(landscape) = &posters.landscape {
                dom::set_attr(doc, root, "poster-landscape-src", landscape);
            }
        }

        if dom::get_attr(doc, root, "poster-portrait-src").is_none() {
            tracing::warn!(
                story = %self.story.slug,
                "story has no poster image; dropping the amp attribute"
            );
            if let Some(html_el) = dom::select_first(doc, "html") {
                dom::remove_attr(doc, html_el, "amp");
            }
        }
    }

    /// Stage 5: embed analytics markup and its runtime script reference.
    ///
    /// Both appear together or not at all.
    fn insert_analytics_configuration(&self, doc: &mut Html, story_root: Option<ego_tree::NodeId>) {
        let Some(markup) = self.analytics.as_ref().and_then(|p| p.analytics_markup()) else {
            return;
        };
        let Some(root) = story_root else {
            return;
        };

        dom::append_fragment(doc, root, &markup);

        if let Some(head) = dom::select_first(doc, "head") {
            dom::append_fragment(doc, head, ANALYTICS_RUNTIME);
        }
    }

    /// Stage 6: show the admin bar and offset the story viewport below it.
    fn display_admin_bar(&self, doc: &mut Html) {
        if !self.site.admin_bar {
            return;
        }

        if let Some(body) = dom::select_first(doc, "body") {
            let bar = format!(
                "<div id=\"admin-bar\" class=\"admin-bar\">\
                 <a href=\"/\">Dashboard</a>\
                 <span class=\"admin-bar-title\">{}</span>\
                 </div>",
                dom::escape_text(&self.story.title),
            );
            dom::prepend_fragment(doc, body, &bar);
        }

        if let Some(head) = dom::select_first(doc, "head") {
            let style = format!(
                "<style>#admin-bar{{position:fixed;top:0;left:0;right:0;height:{h}px}}\
                 amp-story{{top:{h}px}}</style>",
                h = ADMIN_BAR_HEIGHT,
            );
            dom::append_fragment(doc, head, &style);
        }
    }

    /// Stage 7+8: run the optimizer and serialize.
    ///
    /// Incomplete optimization is non-fatal; diagnostics are embedded as a
    /// single comment in the best-effort output.
    fn optimize_markup(&self, doc: Html) -> String {
        let assembled = dom::serialize(&doc);
        let optimized = self.optimizer.optimize(&assembled);

        if optimized.diagnostics.is_empty() {
            return optimized.html;
        }

        let mut doc = Html::parse_document(&optimized.html);
        let Some(html_el) = dom::select_first(&doc, "html") else {
            return optimized.html;
        };

        let note = format!(
            "<!-- optimization could not be completed: {} -->",
            optimized.diagnostics.join("; "),
        );
        dom::append_fragment(&mut doc, html_el, &note);

        dom::serialize(&doc)
    }
}

fn meta_selector(marker: &str) -> String {
    format!("meta[name=\"{}\"]", marker)
}
