//! Preview server command.

use anyhow::Result;

use storyforge_server::{StoryServer, StoryServerConfig};

use crate::config::ConfigFile;

/// Run the serve command.
pub async fn run(config: &ConfigFile, port: Option<u16>, no_open: bool) -> Result<()> {
    let server_config = StoryServerConfig {
        content_dir: config.content.dir.clone().into(),
        host: config.server.host.clone(),
        port: port.unwrap_or(config.server.port),
        site_title: config.site.title.clone(),
        locale: config.site.locale.clone(),
        admin_bar: config.site.admin_bar,
        analytics: config.site.analytics.clone(),
        open: !no_open,
    };

    StoryServer::new(server_config).start().await?;

    Ok(())
}
