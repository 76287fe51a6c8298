use anyhow::Context;
use clap::Parser;
use tracing::debug;

use seolnk_analytics::cli::Cli;
use seolnk_analytics::config::init_config;
use seolnk_analytics::interfaces::cli::run_cli_command;
use seolnk_analytics::system::init_logging;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match init_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    // guard 必须存活到进程结束，保证日志刷盘
    let guard = init_logging(&config.logging).context("Failed to initialize logging")?;
    debug!("Configuration: {:?}", config);

    if let Err(e) = run_cli_command(cli.command, config) {
        drop(guard);
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }

    Ok(())
}
