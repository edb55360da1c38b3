//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use bot_runtime::BotConfig;

/// Everything the client needs besides the world itself.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub bot: BotConfig,
    /// Names the log directory; generated from the start time when unset.
    pub session_id: Option<String>,
    /// RON scenario for the sim backend; the bundled cellar is used when unset.
    pub scenario: Option<PathBuf>,
    /// Games to play before exiting; `None` plays until stopped.
    pub max_games: Option<u32>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BOT_SESSION_ID` - Session identifier for the log directory (default: auto-generated)
    /// - `BOT_SCENARIO` - Path of a RON scenario file (default: bundled cellar)
    /// - `BOT_MAX_GAMES` - Games to play, `0` for unlimited (default: 3)
    /// - every variable read by [`BotConfig::from_env`]
    pub fn from_env() -> Self {
        let max_games = match read_env::<u32>("BOT_MAX_GAMES") {
            Some(0) => None,
            Some(count) => Some(count),
            None => Some(3),
        };

        Self {
            bot: BotConfig::from_env(),
            session_id: env::var("BOT_SESSION_ID").ok().filter(|id| !id.is_empty()),
            scenario: env::var_os("BOT_SCENARIO").map(PathBuf::from),
            max_games,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
