mod config;
mod constants;
mod core_cli;
mod core_ftpcommand;
mod core_network;
mod core_protocol;
mod core_shell;
mod error;
mod helpers;

use crate::config::Config;
use crate::core_cli::Cli;
use crate::core_protocol::machine::FtpClient;
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use env_logger::{Builder, Env, Target};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format and colors
    init_logger(&args)?;

    // Load configuration from the TOML file, or fall back to defaults
    let config = if args.config.is_empty() {
        Config::default()
    } else {
        Config::load_from_file(&args.config)?
    };

    let client = FtpClient::new(config.client);

    // A host on the command line is an implicit first `connect`
    if let Some(host) = &args.host {
        if let Err(err) = client
            .clone()
            .execute_line(&format!("connect {}", host))
            .await
        {
            eprintln!("{}", err.to_string().red());
            client.reset().await;
        }
    }

    core_shell::shell::run(client).await?;

    Ok(())
}

fn init_logger(args: &Cli) -> Result<()> {
    let default_filter = if args.verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));
    builder.format(|buf, record| {
        let timestamp = buf.timestamp().to_string();
        let level = match record.level() {
            log::Level::Error => record.level().to_string().red(),
            log::Level::Warn => record.level().to_string().yellow(),
            log::Level::Info => record.level().to_string().green(),
            log::Level::Debug => record.level().to_string().blue(),
            log::Level::Trace => record.level().to_string().white(),
        };
        writeln!(buf, "[{}] [{}] {}", timestamp, level, record.args())
    });
    if let Some(path) = &args.log {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path))?;
        builder.target(Target::Pipe(Box::new(file)));
        colored::control::set_override(false);
    }
    builder.init();
    Ok(())
}
