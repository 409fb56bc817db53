//! Batch build command: render every story plus the dashboard index.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;

use storyforge_model::{Story, StoryLoader};
use storyforge_render::HtmlRenderer;
use storyforge_ui::{DashboardContext, StatusFilter, TemplateEngine};

use crate::config::ConfigFile;

/// Run the build command.
pub fn run(config: &ConfigFile, output: Option<PathBuf>) -> Result<()> {
    let start = Instant::now();

    let output_dir = output.unwrap_or_else(|| PathBuf::from(&config.content.output));
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let stories = StoryLoader::new(&config.content.dir).load_dir()?;
    tracing::info!("Rendering {} stories...", stories.len());

    // Render stories in parallel
    let results: Vec<Result<()>> = stories
        .par_iter()
        .map(|story| build_story(config, &output_dir, story))
        .collect();

    for result in results {
        result?;
    }

    build_dashboard(config, &output_dir, &stories)?;
    build_story_index(&output_dir, &stories)?;

    tracing::info!(
        "Built {} stories in {}ms",
        stories.len(),
        start.elapsed().as_millis()
    );
    tracing::info!("Output: {}", output_dir.display());

    Ok(())
}

/// Render one story to `<output>/<slug>/index.html`.
fn build_story(config: &ConfigFile, output_dir: &PathBuf, story: &Story) -> Result<()> {
    let mut renderer = HtmlRenderer::new(story).with_site(config.site_config());
    if let Some(markup) = config.site.analytics.clone() {
        renderer = renderer.with_analytics(move || Some(markup.clone()));
    }

    let html = renderer.render();

    let story_dir = output_dir.join(&story.slug);
    fs::create_dir_all(&story_dir)
        .with_context(|| format!("Failed to create {}", story_dir.display()))?;
    fs::write(story_dir.join("index.html"), html)
        .with_context(|| format!("Failed to write story {}", story.slug))?;

    Ok(())
}

/// Render the dashboard listing to `<output>/index.html`.
fn build_dashboard(config: &ConfigFile, output_dir: &PathBuf, stories: &[Story]) -> Result<()> {
    let engine = TemplateEngine::new();
    let html = engine
        .render_dashboard(&DashboardContext {
            site_title: config.site.title.clone(),
            stories,
            filter: StatusFilter::All,
        })
        .context("Failed to render dashboard")?;

    fs::write(output_dir.join("index.html"), html).context("Failed to write dashboard")?;
    Ok(())
}

/// Write the machine-readable story index.
fn build_story_index(output_dir: &PathBuf, stories: &[Story]) -> Result<()> {
    let json = serde_json::to_string_pretty(stories).context("Failed to serialize story index")?;
    fs::write(output_dir.join("stories.json"), json).context("Failed to write story index")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builds_stories_dashboard_and_index() {
        let temp = tempdir().unwrap();
        let content = temp.path().join("stories");
        let out = temp.path().join("dist");
        fs::create_dir_all(&content).unwrap();
        fs::write(
            content.join("demo.html"),
            "<html><head></head><body><amp-story title=\"Demo\" \
             poster-portrait-src=\"https://example.com/p.png\"></amp-story></body></html>",
        )
        .unwrap();

        let config = ConfigFile {
            content: crate::config::ContentConfig {
                dir: content.display().to_string(),
                output: out.display().to_string(),
            },
            ..ConfigFile::default()
        };

        run(&config, None).unwrap();

        assert!(out.join("demo/index.html").exists());
        assert!(out.join("index.html").exists());

        let index = fs::read_to_string(out.join("stories.json")).unwrap();
        assert!(index.contains("\"demo\""));

        let rendered = fs::read_to_string(out.join("demo/index.html")).unwrap();
        assert!(rendered.starts_with("<!DOCTYPE html>"));
        assert!(rendered.contains("transformed=\"self;v=1\""));
    }
}
