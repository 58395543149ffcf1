#[cfg(test)]
#[path = "session_store_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::path;

use anyhow::Result;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::PanelSize;
use crate::domain::models::Session;

pub const USER_TOKEN_KEY: &str = "userToken";
pub const ADMIN_TOKEN_KEY: &str = "adminToken";
pub const PANEL_SIZE_KEY: &str = "chatbotSize";

/// Small string key/value store persisted as a JSON object. Values are opaque
/// strings, the panel size is stored JSON encoded inside its value.
pub struct SessionStore {
    pub file_path: path::PathBuf,
}

impl Default for SessionStore {
    fn default() -> SessionStore {
        return SessionStore::new(path::PathBuf::from(Config::get(ConfigKey::StoreFile)));
    }
}

impl SessionStore {
    pub fn new(file_path: path::PathBuf) -> SessionStore {
        return SessionStore { file_path };
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.file_path.exists() {
            return Ok(BTreeMap::new());
        }

        let payload = fs::read_to_string(&self.file_path).await?;
        if payload.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str::<BTreeMap<String, String>>(&payload) {
            Ok(entries) => return Ok(entries),
            Err(err) => {
                tracing::warn!(error = ?err, path = ?self.file_path, "Ignoring unreadable store");
                return Ok(BTreeMap::new());
            }
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let payload = serde_json::to_string_pretty(entries)?;
        let mut file = fs::File::create(&self.file_path).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.read_all().await?;
        return Ok(entries.get(key).cloned());
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value.to_string());
        return self.write_all(&entries).await;
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }

        return Ok(());
    }

    /// A store that can't be read counts as logged out.
    pub async fn session(&self) -> Result<Session> {
        let entries = match self.read_all().await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = ?err, path = ?self.file_path, "Unable to read store");
                BTreeMap::new()
            }
        };
        return Ok(Session::new(
            entries.get(USER_TOKEN_KEY).cloned(),
            entries.get(ADMIN_TOKEN_KEY).cloned(),
        ));
    }

    /// Missing or unreadable sizes fall back to the default size.
    pub async fn panel_size(&self) -> Result<PanelSize> {
        let stored = match self.get(PANEL_SIZE_KEY).await {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = ?err, path = ?self.file_path, "Unable to read store");
                None
            }
        };

        if let Some(payload) = stored {
            if let Some(size) = PanelSize::parse(&payload) {
                return Ok(size);
            }

            tracing::warn!(payload = payload, "Ignoring unreadable panel size");
        }

        return Ok(PanelSize::default());
    }

    pub async fn save_panel_size(&self, size: &PanelSize) -> Result<()> {
        return self.set(PANEL_SIZE_KEY, &size.to_json()).await;
    }
}
