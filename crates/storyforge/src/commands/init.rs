//! Project scaffolding command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use storyforge_render::{HEAD_END_MARKER, HEAD_START_MARKER};

const CONFIG_TEMPLATE: &str = r#"[content]
dir = "stories"
output = "dist"

[site]
title = "My Stories"
locale = "en-US"
admin_bar = true

[server]
host = "127.0.0.1"
port = 4000
"#;

/// Run the init command.
pub fn run(force: bool) -> Result<()> {
    write_if_absent(Path::new("storyforge.toml"), CONFIG_TEMPLATE, force)?;

    fs::create_dir_all("stories").context("Failed to create stories directory")?;
    write_if_absent(
        Path::new("stories/hello-world.html"),
        &sample_story(),
        force,
    )?;

    tracing::info!("Scaffolded storyforge.toml and stories/hello-world.html");
    tracing::info!("Run 'storyforge serve' to preview");

    Ok(())
}

fn write_if_absent(path: &Path, content: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Pass --force to overwrite.",
            path.display()
        );
    }

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn sample_story() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="{start}"/>
  <meta name="{end}"/>
</head>
<body>
  <amp-story standalone=""
      title="Hello World"
      publisher="My Stories"
      publisher-logo-src="https://example.com/logo.png"
      poster-portrait-src="https://example.com/poster.png">
    <amp-story-page id="cover">
      <amp-story-grid-layer template="vertical">
        <h1>Hello World</h1>
        <p>Edit stories/hello-world.html to get started.</p>
      </amp-story-grid-layer>
    </amp-story-page>
  </amp-story>
</body>
</html>
"#,
        start = HEAD_START_MARKER,
        end = HEAD_END_MARKER,
    )
}
