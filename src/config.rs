//! Configuration management for nrspace using the prefer crate.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default server address (the NR Space server listens on 8080).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Default delay between the end of an upload batch and the refresh signal.
pub const DEFAULT_UPLOAD_SETTLE_MS: u64 = 2000;

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Server base URL.
    pub base_url: String,
    /// Custom user agent (None = default).
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Delay after an upload batch before hiding progress and signalling completion.
    pub upload_settle_ms: u64,
    /// Where downloaded documents are written.
    pub download_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let download_dir = dirs::download_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            request_timeout: 30,
            upload_settle_ms: DEFAULT_UPLOAD_SETTLE_MS,
            download_dir,
        }
    }
}

impl Settings {
    pub fn upload_settle_delay(&self) -> Duration {
        Duration::from_millis(self.upload_settle_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Settle delay after uploads in milliseconds.
    #[serde(default)]
    pub upload_settle_ms: Option<u64>,
    /// Download directory (`~` is expanded).
    #[serde(default)]
    pub download_dir: Option<String>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers nrspace config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("nrspace").await {
            Ok(pref_config) => {
                let base_url: Option<String> = pref_config.get("base_url").ok();
                let user_agent: Option<String> = pref_config.get("user_agent").ok();
                let request_timeout: Option<u64> = pref_config.get("request_timeout").ok();
                let upload_settle_ms: Option<u64> =
                    pref_config.get("upload_settle_ms").ok();
                let download_dir: Option<String> = pref_config.get("download_dir").ok();

                Config {
                    base_url,
                    user_agent,
                    request_timeout,
                    upload_settle_ms,
                    download_dir,
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref base_url) = self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(settle) = self.upload_settle_ms {
            settings.upload_settle_ms = settle;
        }
        if let Some(ref dir) = self.download_dir {
            let path = shellexpand::tilde(dir);
            settings.download_dir = PathBuf::from(path.as_ref());
        }
    }
}

/// Load settings from configuration.
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.upload_settle_delay(), Duration::from_secs(2));
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_apply_overrides_only_set_fields() {
        let config = Config {
            base_url: Some("http://nas.local:9000".to_string()),
            upload_settle_ms: Some(0),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);

        assert_eq!(settings.base_url, "http://nas.local:9000");
        assert_eq!(settings.upload_settle_ms, 0);
        assert_eq!(settings.request_timeout, 30);
        assert!(settings.user_agent.is_none());
    }

    #[test]
    fn test_download_dir_expands_tilde() {
        let config = Config {
            download_dir: Some("~/nr-downloads".to_string()),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);
        assert!(settings.download_dir.ends_with("nr-downloads"));
    }
}
