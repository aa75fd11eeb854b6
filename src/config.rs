//! Bridge configuration model and the file-backed manager that reads it.

use backlog_api::config::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REMOTE_HOST, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use backlog_api::BacklogConfig;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.json";

fn default_remote_host() -> String {
    DEFAULT_REMOTE_HOST.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Represents the bridge configuration persisted on disk: remote host suffix, request timeouts and user agent.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_remote_host")]
    pub remote_host: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Fixed base URL for every call, used against local test servers.
    #[serde(default)]
    pub endpoint_override: Option<String>,
}

impl Default for Config {
    /// Returns baseline config when no persisted settings are available.
    fn default() -> Self {
        Self {
            remote_host: default_remote_host(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            endpoint_override: None,
        }
    }
}

impl Config {
    /// Converts persisted settings into the API client configuration.
    pub fn to_backlog_config(&self) -> BacklogConfig {
        let config = BacklogConfig::new()
            .with_remote_host(self.remote_host.clone())
            .with_user_agent(self.user_agent.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs.max(1)))
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs.max(1)));
        match &self.endpoint_override {
            Some(url) => config.with_endpoint_override(url.clone()),
            None => config,
        }
    }
}

/// Loads bridge configuration from a JSON file in the platform-specific config directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Creates a manager bound to the platform-specific config path, or the working directory when none exists.
    pub fn new() -> Self {
        let path = directories::ProjectDirs::from("jp", "okanoworld", "backlog-bridge")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        Self { path }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads config from disk, falling back to defaults on read/parse errors.
    pub fn load(&self) -> Config {
        if self.path.exists() {
            let content = fs::read_to_string(&self.path).unwrap_or_default();
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            Config::default()
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigManager};
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    fn unique_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        env::temp_dir().join(format!("backlog-bridge-tests-{name}-{nanos}/config.json"))
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.remote_host, "backlog.jp");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.endpoint_override, None);
    }

    #[test]
    fn load_missing_file_returns_default() {
        let manager = ConfigManager::with_path(unique_path("missing"));
        assert_eq!(manager.load(), Config::default());
    }

    #[test]
    fn full_file_is_loaded() {
        let path = unique_path("full");
        let parent = path.parent().expect("parent must exist");
        fs::create_dir_all(parent).expect("create temp directory");
        fs::write(
            &path,
            r#"{
                "remote_host": "backlog.com",
                "timeout_secs": 12,
                "connect_timeout_secs": 3,
                "user_agent": "bridge-test",
                "endpoint_override": "http://127.0.0.1:9000"
            }"#,
        )
        .expect("write full config");

        let expected = Config {
            remote_host: "backlog.com".to_string(),
            timeout_secs: 12,
            connect_timeout_secs: 3,
            user_agent: "bridge-test".to_string(),
            endpoint_override: Some("http://127.0.0.1:9000".to_string()),
        };
        assert_eq!(ConfigManager::with_path(path.clone()).load(), expected);

        let _ = fs::remove_dir_all(parent);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = unique_path("partial");
        let parent = path.parent().expect("parent must exist");
        fs::create_dir_all(parent).expect("create temp directory");
        fs::write(&path, r#"{"remote_host":"backlog.com"}"#).expect("write partial config");

        let loaded = ConfigManager::with_path(path.clone()).load();
        assert_eq!(loaded.remote_host, "backlog.com");
        assert_eq!(loaded.timeout_secs, 30);

        let _ = fs::remove_dir_all(parent);
    }

    #[test]
    fn load_invalid_json_falls_back_to_default() {
        let path = unique_path("invalid");
        let parent = path.parent().expect("parent must exist");
        fs::create_dir_all(parent).expect("create temp directory");
        fs::write(&path, "not-valid-json").expect("write invalid config");

        let loaded = ConfigManager::with_path(path.clone()).load();
        assert_eq!(loaded, Config::default());

        let _ = fs::remove_dir_all(parent);
    }

    #[test]
    fn converts_to_client_config() {
        let config = Config {
            timeout_secs: 0,
            ..Config::default()
        };
        let backlog = config.to_backlog_config();
        assert_eq!(backlog.endpoint_for("demo"), "https://demo.backlog.jp/XML-RPC");
        assert_eq!(backlog.timeout, Duration::from_secs(1));
    }
}
