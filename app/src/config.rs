use crate::error::{BotError, Result};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_PHOTOS_DIR: &str = "photos";
pub const MAX_POLL_TIMEOUT_SECS: u64 = 600;

#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub api_url: String,
    pub photos_dir: PathBuf,
    pub poll_timeout_secs: u64,
    pub protect_content: bool,
}

// The token never appears in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("photos_dir", &self.photos_dir)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("protect_content", &self.protect_content)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let bot_token = dotenvy::var("BOT_TOKEN")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| BotError::Config("BOT_TOKEN is required".to_string()))?;

        let api_url = dotenvy::var("TELEGRAM_API_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let photos_dir = dotenvy::var("PHOTOS_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_PHOTOS_DIR), PathBuf::from);

        let poll_timeout_secs = dotenvy::var("POLL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|_| BotError::Config("Invalid POLL_TIMEOUT_SECS".to_string()))?;
        if poll_timeout_secs > MAX_POLL_TIMEOUT_SECS {
            return Err(BotError::Config(format!(
                "POLL_TIMEOUT_SECS must be at most {MAX_POLL_TIMEOUT_SECS}"
            )));
        }

        let protect_content = dotenvy::var("PROTECT_CONTENT")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .map_err(|_| BotError::Config("Invalid PROTECT_CONTENT".to_string()))?;

        Ok(Config {
            bot_token,
            api_url: api_url.trim_end_matches('/').to_string(),
            photos_dir,
            poll_timeout_secs,
            protect_content,
        })
    }
}
