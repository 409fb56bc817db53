//! Preview server for story documents.
//!
//! Serves the dashboard at `/` and renders stories through the full pipeline
//! per request at `/stories/{slug}`.

pub mod server;

pub use server::{ServerError, StoryServer, StoryServerConfig};
