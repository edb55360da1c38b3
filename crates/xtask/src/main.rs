//! Development tasks for the bot workspace
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;

use anyhow::Result;
use clap::Parser;
use commands::{Clean, Sessions, TailLogs};

/// Development tasks for the bot workspace
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for the bot", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Monitor session logs in real-time
    TailLogs(TailLogs),

    /// List recorded sessions, newest first
    Sessions(Sessions),

    /// Delete session logs
    Clean(Clean),
}

fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Command::TailLogs(cmd) => cmd.execute(),
        Command::Sessions(cmd) => cmd.execute(),
        Command::Clean(cmd) => cmd.execute(),
    }
}
