use anyhow::Result;
use clap::Parser;
use wp_watcher_config::AppConfig;

mod cli;
mod commands;
mod logger;
mod render;
mod watch;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before the logger so RUST_LOG can come from it
    let env_file = dotenvy::dotenv();
    logger::init();

    match env_file {
        Ok(path) => log::debug!("Loaded .env file from: {:?}", path),
        Err(_) => log::debug!(".env file not found, using environment only"),
    }

    let cli = Cli::parse();
    let mut config = AppConfig::load();
    cli.apply_to(&mut config);

    log::debug!("Starting wp-log-watcher v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Watch { files, .. } => watch::run_watch(&config, files).await,
        Command::Relay => watch::run_relay(&config).await,
        Command::Show { file, kinds, .. } => {
            println!("{}", commands::show(&config, &file, kinds).await?);
            Ok(())
        }
        Command::Clear { file } => {
            commands::clear(&file).await?;
            println!("Cleared {}", file.display());
            Ok(())
        }
        Command::Export { file, dir } => {
            let copy = commands::export(&config, &file, dir).await?;
            println!("{}", copy.display());
            Ok(())
        }
    }
}
