use std::time::Duration;

pub const DEFAULT_REMOTE_HOST: &str = "backlog.jp";
pub const DEFAULT_SCHEME: &str = "https";
pub const XML_RPC_PATH: &str = "XML-RPC";
pub const DEFAULT_USER_AGENT: &str = "backlog-bridge";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct BacklogConfig {
    pub remote_host: String,
    pub scheme: String,
    pub endpoint_override: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for BacklogConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BacklogConfig {
    pub fn new() -> Self {
        Self {
            remote_host: DEFAULT_REMOTE_HOST.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            endpoint_override: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_remote_host(mut self, host: impl Into<String>) -> Self {
        self.remote_host = host.into();
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Sends every call to a fixed base URL instead of the per-space host.
    pub fn with_endpoint_override(mut self, base_url: impl Into<String>) -> Self {
        self.endpoint_override = Some(base_url.into());
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    pub fn with_connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = duration;
        self
    }

    /// Returns the XML-RPC endpoint for a space, e.g. `https://demo.backlog.jp/XML-RPC`.
    pub fn endpoint_for(&self, space: &str) -> String {
        match &self.endpoint_override {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), XML_RPC_PATH),
            None => format!(
                "{}://{}.{}/{}",
                self.scheme,
                space,
                self.remote_host.trim_matches('.'),
                XML_RPC_PATH
            ),
        }
    }
}

/// Returns true when `space` can be used as a single DNS label in the endpoint host.
pub fn is_valid_space(space: &str) -> bool {
    !space.is_empty()
        && space.len() <= 63
        && !space.starts_with('-')
        && !space.ends_with('-')
        && space
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}

#[cfg(test)]
mod tests {
    use super::{is_valid_space, BacklogConfig};
    use std::time::Duration;

    #[test]
    fn default_endpoint_uses_space_subdomain() {
        let config = BacklogConfig::new();
        assert_eq!(config.endpoint_for("demo"), "https://demo.backlog.jp/XML-RPC");
    }

    #[test]
    fn endpoint_override_ignores_space() {
        let config = BacklogConfig::new().with_endpoint_override("http://127.0.0.1:4000/");
        assert_eq!(config.endpoint_for("demo"), "http://127.0.0.1:4000/XML-RPC");
    }

    #[test]
    fn builder_sets_host_and_timeouts() {
        let config = BacklogConfig::new()
            .with_remote_host("backlog.com")
            .with_timeout(Duration::from_secs(5))
            .with_connect_timeout(Duration::from_secs(2));
        assert_eq!(config.endpoint_for("acme"), "https://acme.backlog.com/XML-RPC");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn space_must_be_a_host_label() {
        assert!(is_valid_space("demo-team1"));
        assert!(!is_valid_space(""));
        assert!(!is_valid_space("evil.example.com/"));
        assert!(!is_valid_space("user@host"));
        assert!(!is_valid_space("-lead"));
    }
}
