use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use logflarex::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    if let cli::Commands::Version = command {
        println!("LogflareX v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let cfg = config::load_config(&args.config)?;
    init_tracing(&cfg.server.log_level, &cfg.server.log_format);

    match command {
        cli::Commands::Start => commands::start::execute(cfg).await?,
        cli::Commands::Test => commands::test::execute(&cfg, &args.config),
        cli::Commands::Logs(logs_args) => commands::logs::execute(&cfg, logs_args).await?,
        cli::Commands::Alerts(alerts_args) => commands::alerts::execute(&cfg, alerts_args).await?,
        cli::Commands::Version => {}
    }

    Ok(())
}
