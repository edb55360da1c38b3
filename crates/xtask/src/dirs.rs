//! Platform-specific directory utilities
//!
//! Must agree with the client's log location.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Get the platform-specific log directory
///
/// Follows platform conventions:
/// - macOS: `~/Library/Caches/bot/logs`
/// - Linux: `~/.cache/bot/logs` (or `$XDG_CACHE_HOME/bot/logs`)
/// - Windows: `%LOCALAPPDATA%\bot\cache\logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "bot")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("bot").join("logs"))
}

/// One session directory under the log directory.
#[derive(Debug, Clone)]
pub struct SessionDir {
    pub id: String,
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl SessionDir {
    pub fn log_file(&self) -> PathBuf {
        self.path.join("client.log")
    }
}

/// List all session directories in the log directory, newest first
pub fn list_sessions(log_dir: &Path) -> Result<Vec<SessionDir>> {
    if !log_dir.exists() {
        return Ok(Vec::new());
    }

    let mut sessions = Vec::new();
    for entry in std::fs::read_dir(log_dir)
        .with_context(|| format!("Failed to read log directory: {}", log_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir()
            && let Some(id) = path.file_name().and_then(|n| n.to_str())
        {
            sessions.push(SessionDir {
                id: id.to_string(),
                modified: entry.metadata()?.modified()?,
                path: path.clone(),
            });
        }
    }

    sessions.sort_by(|a, b| b.modified.cmp(&a.modified));
    Ok(sessions)
}

/// Find the log file for a specific session
pub fn find_session_log(log_dir: &Path, session_id: &str) -> Result<PathBuf> {
    let log_path = log_dir.join(session_id).join("client.log");

    if !log_path.exists() {
        anyhow::bail!("Log file not found: {}", log_path.display());
    }

    Ok(log_path)
}

/// Find the most recent session's log file
pub fn find_latest_log(log_dir: &Path) -> Result<(String, PathBuf)> {
    let Some(latest) = list_sessions(log_dir)?.into_iter().next() else {
        anyhow::bail!("No sessions found in log directory");
    };

    let log_path = latest.log_file();
    if !log_path.exists() {
        anyhow::bail!(
            "Log file not found for latest session: {}",
            log_path.display()
        );
    }

    Ok((latest.id, log_path))
}
