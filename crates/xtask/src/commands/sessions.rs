//! List recorded sessions command

use anyhow::Result;
use clap::Parser;
use console::style;
use std::time::SystemTime;

use crate::dirs;

/// List recorded sessions, newest first
#[derive(Parser, Debug)]
pub struct Sessions {
    /// Show at most this many sessions
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl Sessions {
    pub fn execute(self) -> Result<()> {
        let log_dir = dirs::log_dir();
        let sessions = dirs::list_sessions(&log_dir)?;

        if sessions.is_empty() {
            println!("{}", style("No sessions recorded yet").dim());
            println!("  Path: {}", style(log_dir.display()).dim());
            return Ok(());
        }

        println!("{}", style("Bot sessions").green().bold());
        println!("  Path: {}", style(log_dir.display()).dim());
        println!();

        let now = SystemTime::now();
        for session in sessions.iter().take(self.limit.unwrap_or(usize::MAX)) {
            let size = std::fs::metadata(session.log_file())
                .map(|m| m.len())
                .unwrap_or_default();
            let age = now
                .duration_since(session.modified)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            println!(
                "  {} {:>10}  {}",
                style(&session.id).cyan(),
                format_size(size),
                style(format!("{} ago", format_age(age))).dim()
            );
        }

        Ok(())
    }
}

fn format_size(bytes: u64) -> String {
    match bytes {
        b if b >= 1 << 20 => format!("{:.1} MiB", b as f64 / f64::from(1 << 20)),
        b if b >= 1 << 10 => format!("{:.1} KiB", b as f64 / f64::from(1 << 10)),
        b => format!("{b} B"),
    }
}

fn format_age(secs: u64) -> String {
    match secs {
        s if s >= 86_400 => format!("{}d", s / 86_400),
        s if s >= 3_600 => format!("{}h", s / 3_600),
        s if s >= 60 => format!("{}m", s / 60),
        s => format!("{s}s"),
    }
}
