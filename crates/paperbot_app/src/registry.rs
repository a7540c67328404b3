use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use bot_logging::bot_warn;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::store;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub joined_date: String,
}

/// Append/update registry of everyone who has talked to the bot, backed
/// by a JSON file keyed by stringified id. There is no deletion.
#[derive(Debug)]
pub struct UserRegistry {
    path: PathBuf,
    users: HashMap<String, UserRecord>,
}

impl UserRegistry {
    /// Load the registry; a missing or corrupt file starts empty.
    pub fn load(path: &Path) -> Self {
        let users = match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(users) => users,
                Err(err) => {
                    bot_warn!("failed to parse users file {:?}: {}", path, err);
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                bot_warn!("failed to read users file {:?}: {}", path, err);
                HashMap::new()
            }
        };
        Self {
            path: path.to_path_buf(),
            users,
        }
    }

    /// Insert or refresh a user's display fields. `joined_date` is only
    /// stamped the first time an id is seen.
    pub fn record(
        &mut self,
        user_id: i64,
        username: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) {
        let key = user_id.to_string();
        match self.users.get_mut(&key) {
            Some(existing) => {
                existing.username = username.map(str::to_string);
                existing.first_name = first_name.map(str::to_string);
                existing.last_name = last_name.map(str::to_string);
            }
            None => {
                self.users.insert(
                    key,
                    UserRecord {
                        user_id,
                        username: username.map(str::to_string),
                        first_name: first_name.map(str::to_string),
                        last_name: last_name.map(str::to_string),
                        joined_date: Utc::now().to_rfc3339(),
                    },
                );
            }
        }
    }

    pub fn all_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.users.values().map(|user| user.user_id).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(&self.users)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let filename = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("bot_users.json");
        store::write_atomic(dir, filename, text.as_bytes())?;
        Ok(())
    }
}
