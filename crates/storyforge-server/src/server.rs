//! Server implementation.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use storyforge_model::{Story, StoryLoader};
use storyforge_render::{HtmlRenderer, SiteConfig};
use storyforge_ui::{DashboardContext, StatusFilter, TemplateEngine};

/// Configuration for the preview server.
#[derive(Debug, Clone)]
pub struct StoryServerConfig {
    /// Directory containing story documents.
    pub content_dir: PathBuf,

    /// Host to bind to.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Site title shown on the dashboard.
    pub site_title: String,

    /// Locale written to rendered stories.
    pub locale: String,

    /// Whether rendered stories show the admin bar.
    pub admin_bar: bool,

    /// Analytics markup embedded in every rendered story, if configured.
    pub analytics: Option<String>,

    /// Open browser on start.
    pub open: bool,
}

impl Default for StoryServerConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("stories"),
            host: "127.0.0.1".to_string(),
            port: 4000,
            site_title: "StoryForge".to_string(),
            locale: "en-US".to_string(),
            admin_bar: true,
            analytics: None,
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),
}

/// Shared server state.
struct ServerState {
    config: StoryServerConfig,
    templates: TemplateEngine,
}

impl ServerState {
    fn site(&self) -> SiteConfig {
        SiteConfig {
            locale: self.config.locale.clone(),
            admin_bar: self.config.admin_bar,
            ..SiteConfig::default()
        }
    }
}

/// Preview server.
pub struct StoryServer {
    config: StoryServerConfig,
}

impl StoryServer {
    /// Create a new preview server.
    pub fn new(config: StoryServerConfig) -> Self {
        Self { config }
    }

    /// Start the server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let open_browser = self.config.open;
        let assets_dir = self.config.content_dir.join("assets");

        let state = Arc::new(ServerState {
            config: self.config,
            templates: TemplateEngine::new(),
        });

        let app = Router::new()
            .route("/", get(dashboard_handler))
            .route("/stories/{slug}", get(story_handler))
            .nest_service("/assets", ServeDir::new(assets_dir))
            .with_state(state);

        tracing::info!("Serving stories at http://{}", addr);

        if open_browser {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Handler for the dashboard index.
async fn dashboard_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let filter = params
        .get("status")
        .map(|s| StatusFilter::from_key(s))
        .unwrap_or_default();

    let stories = load_stories(&state);
    tracing::info!(stories = stories.len(), filter = filter.key(), "dashboard");

    let ctx = DashboardContext {
        site_title: state.config.site_title.clone(),
        stories: &stories,
        filter,
    };

    match state.templates.render_dashboard(&ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render dashboard: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response()
        }
    }
}

/// Handler rendering one story per request.
async fn story_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    let stories = load_stories(&state);

    let Some(story) = stories.iter().find(|s| s.slug == slug) else {
        tracing::info!(%slug, "story not found");
        let body = state
            .templates
            .render_not_found(&slug)
            .unwrap_or_else(|_| "Story not found".to_string());
        return (StatusCode::NOT_FOUND, Html(body)).into_response();
    };

    tracing::info!(%slug, "rendering story");

    let mut renderer = HtmlRenderer::new(story).with_site(state.site());
    if let Some(markup) = state.config.analytics.clone() {
        renderer = renderer.with_analytics(move || Some(markup.clone()));
    }

    Html(renderer.render()).into_response()
}

/// Load every story fresh from the content directory; per request, so edits
/// show up without a restart.
fn load_stories(state: &ServerState) -> Vec<Story> {
    match StoryLoader::new(&state.config.content_dir).load_dir() {
        Ok(stories) => stories,
        Err(e) => {
            tracing::warn!("Failed to load stories: {}", e);
            Vec::new()
        }
    }
}
