//! Single-story render command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use storyforge_model::StoryLoader;
use storyforge_render::HtmlRenderer;

use crate::config::ConfigFile;

/// Run the render command.
pub fn run(config: &ConfigFile, file: &Path, output: Option<PathBuf>) -> Result<()> {
    let story = StoryLoader::load_file(file)
        .with_context(|| format!("Failed to load story from {}", file.display()))?;

    let mut renderer = HtmlRenderer::new(&story).with_site(config.site_config());
    if let Some(markup) = config.site.analytics.clone() {
        renderer = renderer.with_analytics(move || Some(markup.clone()));
    }

    let html = renderer.render();

    match output {
        Some(path) => {
            fs::write(&path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Rendered {} to {}", story.slug, path.display());
        }
        None => println!("{}", html),
    }

    Ok(())
}
