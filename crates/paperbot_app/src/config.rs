use std::fs;
use std::path::Path;

use bot_logging::bot_warn;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://202.88.225.92";

/// Process configuration, loaded once at startup from `bot_config.json`.
/// Missing keys fall back to defaults and the file is rewritten so new
/// keys become visible to operators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BotConfig {
    pub bot_token: String,
    pub admin_user_id: i64,
    pub base_url: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            admin_user_id: 0,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl BotConfig {
    pub fn load(path: &Path) -> Self {
        let config = match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(err) => {
                    bot_warn!("unreadable config {:?}: {}; using defaults", path, err);
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                bot_warn!("failed to read config {:?}: {}; using defaults", path, err);
                Self::default()
            }
        };
        config.save(path);
        config
    }

    pub fn save(&self, path: &Path) {
        let text = match serde_json::to_string_pretty(self) {
            Ok(text) => text,
            Err(err) => {
                bot_warn!("failed to serialize config: {}", err);
                return;
            }
        };
        if let Err(err) = fs::write(path, text) {
            bot_warn!("failed to write config {:?}: {}", path, err);
        }
    }
}
