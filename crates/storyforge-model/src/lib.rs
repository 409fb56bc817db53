//! Story data model and filesystem loader.
//!
//! A story is a stored HTML document whose body holds a single `<amp-story>`
//! root element. This crate extracts story metadata from that markup and
//! discovers story files on disk.

pub mod loader;
pub mod story;

pub use loader::{StoryError, StoryLoader};
pub use story::{Story, StoryStatus};
