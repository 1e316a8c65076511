use anyhow::Result;
use colored::Colorize;
use logflarex::{config::Config, server};
use tracing::info;

/// Execute the start command (blocks until shutdown)
pub async fn execute(cfg: Config) -> Result<()> {
    println!("{}", "Starting LogflareX...".green());
    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        database = %cfg.database.url,
        "Starting LogflareX in foreground mode"
    );

    server::start_server(cfg).await
}
