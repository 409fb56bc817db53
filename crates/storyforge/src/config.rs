//! Configuration file loading (storyforge.toml).

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use storyforge_render::SiteConfig;

/// Configuration file structure (storyforge.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize)]
pub struct ContentConfig {
    /// Directory holding story documents
    #[serde(default = "default_content_dir")]
    pub dir: String,

    /// Output directory for builds
    #[serde(default = "default_output")]
    pub output: String,
}

#[derive(Debug, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_locale")]
    pub locale: String,

    /// Show the admin bar on rendered stories
    #[serde(default)]
    pub admin_bar: bool,

    /// Analytics markup embedded in every rendered story
    pub analytics: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            output: default_output(),
        }
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            locale: default_locale(),
            admin_bar: false,
            analytics: None,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_content_dir() -> String {
    "stories".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_title() -> String {
    "StoryForge".to_string()
}
fn default_locale() -> String {
    "en-US".to_string()
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    4000
}

impl ConfigFile {
    /// Load configuration from the given path if it exists.
    ///
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            let config: ConfigFile = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
            tracing::info!("Loaded config from {}", path.display());
            return Ok(config);
        }
        Ok(ConfigFile::default())
    }

    /// Ambient site configuration for the renderer.
    pub fn site_config(&self) -> SiteConfig {
        SiteConfig {
            locale: self.site.locale.clone(),
            admin_bar: self.site.admin_bar,
            ..SiteConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ConfigFile::load(Path::new("/nonexistent/storyforge.toml")).unwrap();
        assert_eq!(config.content.dir, "stories");
        assert_eq!(config.server.port, 4000);
        assert!(!config.site.admin_bar);
    }

    #[test]
    fn parses_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[site]\ntitle = \"My Stories\"\nadmin_bar = true\n\n[server]\nport = 8080"
        )
        .unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        assert_eq!(config.site.title, "My Stories");
        assert!(config.site.admin_bar);
        assert_eq!(config.server.port, 8080);
        // Unspecified sections keep their defaults.
        assert_eq!(config.content.output, "dist");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not toml [[").unwrap();

        assert!(ConfigFile::load(file.path()).is_err());
    }
}
