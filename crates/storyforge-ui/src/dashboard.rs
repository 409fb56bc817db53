//! Dashboard page rendering.

use minijinja::{context, Environment};

use storyforge_model::{Story, StoryStatus};

use crate::toggle::{ButtonDescriptor, ToggleButtonGroup};

/// Status filter backing the dashboard's toggle button group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Drafts,
    Published,
}

impl StatusFilter {
    /// Every filter, in display order.
    pub fn all() -> [StatusFilter; 3] {
        [
            StatusFilter::All,
            StatusFilter::Drafts,
            StatusFilter::Published,
        ]
    }

    /// Stable key used in toggle buttons and query strings.
    pub fn key(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Drafts => "drafts",
            StatusFilter::Published => "published",
        }
    }

    /// Visible label text.
    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All Stories",
            StatusFilter::Drafts => "Drafts",
            StatusFilter::Published => "Published Stories",
        }
    }

    /// Parse a filter from its key; unknown keys fall back to `All`.
    pub fn from_key(key: &str) -> StatusFilter {
        match key {
            "drafts" => StatusFilter::Drafts,
            "published" => StatusFilter::Published,
            _ => StatusFilter::All,
        }
    }

    pub fn matches(&self, status: StoryStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Drafts => status == StoryStatus::Draft,
            StatusFilter::Published => status == StoryStatus::Published,
        }
    }
}

/// Context for rendering the dashboard page.
#[derive(Debug)]
pub struct DashboardContext<'a> {
    /// Site title shown in the page header.
    pub site_title: String,

    /// Every loaded story; filtering happens at render time.
    pub stories: &'a [Story],

    /// Currently selected status filter.
    pub filter: StatusFilter,
}

/// Template engine for dashboard pages, using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");
        env.add_template_owned("dashboard.html".to_string(), DASHBOARD_TEMPLATE.to_string())
            .expect("Failed to add dashboard template");
        env.add_template_owned("not_found.html".to_string(), NOT_FOUND_TEMPLATE.to_string())
            .expect("Failed to add not-found template");

        Self { env }
    }

    /// Render the dashboard listing page.
    pub fn render_dashboard(&self, ctx: &DashboardContext<'_>) -> Result<String, minijinja::Error> {
        let toggle = status_toggle_group(ctx.filter).render_html();

        let stories: Vec<&Story> = ctx
            .stories
            .iter()
            .filter(|s| ctx.filter.matches(s.status))
            .collect();

        let tmpl = self.env.get_template("dashboard.html")?;
        tmpl.render(context! {
            site_title => &ctx.site_title,
            toggle => toggle,
            stories => stories,
            filter => ctx.filter.key(),
        })
    }

    /// Render the page shown for an unknown story slug.
    pub fn render_not_found(&self, slug: &str) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("not_found.html")?;
        tmpl.render(context! { slug => slug })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the status filter toggle group for the dashboard.
///
/// Buttons link filters through their `data-key`; the active descriptor is
/// the currently selected filter.
pub fn status_toggle_group(active: StatusFilter) -> ToggleButtonGroup {
    let buttons = StatusFilter::all()
        .into_iter()
        .map(|filter| {
            ButtonDescriptor::new(filter.key(), filter.label())
                .active(filter == active)
                .on_click(|key| tracing::debug!(filter = key, "status filter selected"))
        })
        .collect();

    ToggleButtonGroup::new(buttons)
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% block title %}{% endblock %}</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 800px; margin: 2rem auto; padding: 0 1rem; }
    .toggle-button-group { display: inline-flex; gap: 0.25rem; height: 60px; align-items: center; }
    .toggle-button { border: 1px solid #ccc; border-radius: 1rem; padding: 0.25rem 1rem; background: none; cursor: pointer; }
    .toggle-button.is-active { background: #1a73e8; color: #fff; border-color: #1a73e8; }
    .toggle-button[disabled] { opacity: 0.5; cursor: default; }
    .story-card { border-bottom: 1px solid #eee; padding: 0.75rem 0; }
    .story-status { color: #666; font-size: 0.85rem; margin-left: 0.5rem; }
  </style>
</head>
<body>
  {% block content %}{% endblock %}
</body>
</html>"##;

const DASHBOARD_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block title %}{{ site_title }}{% endblock %}

{% block content %}
<h1>{{ site_title }}</h1>
{{ toggle | safe }}
<ul class="story-list">
{% for story in stories %}
  <li class="story-card">
    <a href="/stories/{{ story.slug }}">{{ story.title if story.title else story.slug }}</a>
    <span class="story-status">{{ story.status }}</span>
  </li>
{% else %}
  <li class="story-card">No stories yet.</li>
{% endfor %}
</ul>
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block title %}Story not found{% endblock %}

{% block content %}
<h1>Story not found</h1>
<p>No story with slug <code>{{ slug }}</code>.</p>
<p><a href="/">Back to the dashboard</a></p>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;
    use storyforge_model::Story;

    fn stories() -> Vec<Story> {
        vec![
            Story::from_document(
                "published-one",
                "<html><body><amp-story title=\"Published One\"></amp-story></body></html>",
            ),
            Story::from_document(
                "draft-one",
                "<html><body><amp-story title=\"Draft One\"></amp-story></body></html>",
            )
            .with_status(StoryStatus::Draft),
        ]
    }

    #[test]
    fn dashboard_lists_all_stories_by_default() {
        let stories = stories();
        let engine = TemplateEngine::new();
        let html = engine
            .render_dashboard(&DashboardContext {
                site_title: "My Stories".to_string(),
                stories: &stories,
                filter: StatusFilter::All,
            })
            .unwrap();

        assert!(html.contains("<title>My Stories</title>"));
        assert!(html.contains("Published One"));
        assert!(html.contains("Draft One"));
        assert!(html.contains("href=\"/stories/published-one\""));
    }

    #[test]
    fn drafts_filter_hides_published_stories() {
        let stories = stories();
        let engine = TemplateEngine::new();
        let html = engine
            .render_dashboard(&DashboardContext {
                site_title: "My Stories".to_string(),
                stories: &stories,
                filter: StatusFilter::Drafts,
            })
            .unwrap();

        assert!(html.contains("Draft One"));
        assert!(!html.contains("Published One"));
    }

    #[test]
    fn active_filter_is_reflected_in_the_toggle_group() {
        let html = status_toggle_group(StatusFilter::Drafts).render_html();

        assert!(html.contains("is-active\" data-key=\"drafts\""));
        assert!(!html.contains("is-active\" data-key=\"all\""));
    }

    #[test]
    fn filter_keys_round_trip() {
        for filter in StatusFilter::all() {
            assert_eq!(StatusFilter::from_key(filter.key()), filter);
        }
        assert_eq!(StatusFilter::from_key("bogus"), StatusFilter::All);
    }

    #[test]
    fn filters_match_expected_statuses() {
        assert!(StatusFilter::All.matches(StoryStatus::Draft));
        assert!(StatusFilter::Drafts.matches(StoryStatus::Draft));
        assert!(!StatusFilter::Drafts.matches(StoryStatus::Published));
        assert!(StatusFilter::Published.matches(StoryStatus::Published));
    }

    #[test]
    fn renders_not_found_page() {
        let engine = TemplateEngine::new();
        let html = engine.render_not_found("missing-story").unwrap();

        assert!(html.contains("missing-story"));
        assert!(html.contains("Story not found"));
    }
}
