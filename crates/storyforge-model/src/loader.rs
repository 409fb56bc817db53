//! Filesystem discovery of story documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::story::{Story, StoryStatus};

/// Errors that can occur while loading stories.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("Content directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Failed to read story: {path}: {message}")]
    Io { path: String, message: String },

    #[error("Story document is empty: {0}")]
    EmptyDocument(String),
}

/// Loads stories from a content directory.
///
/// Story documents are `*.html` files; files under a `drafts/` subdirectory
/// load with [`StoryStatus::Draft`]. Slugs are derived from file stems.
#[derive(Debug, Default)]
pub struct StoryLoader {
    content_dir: PathBuf,
}

impl StoryLoader {
    /// Create a loader rooted at the given content directory.
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    /// Load a single story document from a file.
    pub fn load_file(path: &Path) -> Result<Story, StoryError> {
        let content = fs::read_to_string(path).map_err(|e| StoryError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        if content.trim().is_empty() {
            return Err(StoryError::EmptyDocument(path.display().to_string()));
        }

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("story");

        Ok(Story::from_document(slugify(stem), content))
    }

    /// Discover and load every story in the content directory, sorted by slug.
    ///
    /// Unreadable files are skipped with a warning rather than failing the
    /// whole load.
    pub fn load_dir(&self) -> Result<Vec<Story>, StoryError> {
        if !self.content_dir.exists() {
            return Err(StoryError::DirectoryNotFound(
                self.content_dir.display().to_string(),
            ));
        }

        let mut stories = Vec::new();

        for entry in WalkDir::new(&self.content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "html" {
                continue;
            }

            let content = match fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!("Skipping unreadable story {}: {}", path.display(), e);
                    continue;
                }
            };

            if content.trim().is_empty() {
                tracing::warn!("Skipping empty story {}", path.display());
                continue;
            }

            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("story");
            let mut story = Story::from_document(slugify(stem), content);

            if in_drafts(&self.content_dir, path) {
                story.status = StoryStatus::Draft;
            }

            stories.push(story);
        }

        stories.sort_by(|a, b| a.slug.cmp(&b.slug));

        Ok(stories)
    }
}

/// Whether a story file lives under the `drafts/` subdirectory.
fn in_drafts(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .ok()
        .and_then(|rel| rel.components().next())
        .map(|c| c.as_os_str() == "drafts")
        .unwrap_or(false)
}

/// Derive a URL slug from a file stem.
pub fn slugify(stem: &str) -> String {
    static NON_ALNUM: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

    let lowered = stem.to_lowercase();
    NON_ALNUM
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MINIMAL: &str =
        "<html><head></head><body><amp-story title=\"T\"></amp-story></body></html>";

    #[test]
    fn slugifies_file_stems() {
        assert_eq!(slugify("My Great Story"), "my-great-story");
        assert_eq!(slugify("hello__world!"), "hello-world");
        assert_eq!(slugify("-trimmed-"), "trimmed");
    }

    #[test]
    fn loads_stories_sorted_by_slug() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("zebra.html"), MINIMAL).unwrap();
        fs::write(temp.path().join("apple.html"), MINIMAL).unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let loader = StoryLoader::new(temp.path());
        let stories = loader.load_dir().unwrap();

        let slugs: Vec<&str> = stories.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["apple", "zebra"]);
    }

    #[test]
    fn drafts_directory_marks_status() {
        let temp = tempdir().unwrap();
        let drafts = temp.path().join("drafts");
        fs::create_dir_all(&drafts).unwrap();
        fs::write(temp.path().join("live.html"), MINIMAL).unwrap();
        fs::write(drafts.join("wip.html"), MINIMAL).unwrap();

        let loader = StoryLoader::new(temp.path());
        let stories = loader.load_dir().unwrap();

        let wip = stories.iter().find(|s| s.slug == "wip").unwrap();
        let live = stories.iter().find(|s| s.slug == "live").unwrap();
        assert_eq!(wip.status, StoryStatus::Draft);
        assert_eq!(live.status, StoryStatus::Published);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let loader = StoryLoader::new("/nonexistent/stories");
        assert!(matches!(
            loader.load_dir(),
            Err(StoryError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn empty_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("blank.html");
        fs::write(&path, "  \n").unwrap();

        assert!(matches!(
            StoryLoader::load_file(&path),
            Err(StoryError::EmptyDocument(_))
        ));
    }

    #[test]
    fn empty_files_are_skipped_on_directory_load() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("blank.html"), "").unwrap();
        fs::write(temp.path().join("real.html"), MINIMAL).unwrap();

        let loader = StoryLoader::new(temp.path());
        let stories = loader.load_dir().unwrap();

        let slugs: Vec<&str> = stories.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["real"]);
    }

    #[test]
    fn load_file_uses_stem_as_slug() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("A Fine Story.html");
        fs::write(&path, MINIMAL).unwrap();

        let story = StoryLoader::load_file(&path).unwrap();
        assert_eq!(story.slug, "a-fine-story");
        assert_eq!(story.title, "T");
    }
}
