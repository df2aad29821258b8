use std::path::PathBuf;

/// Outbound proxy used for every request made against the auction platform.
#[derive(Clone)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Returns the proxy endpoint as `http://host:port`, without credentials.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub counties_path: PathBuf,
    pub output_dir: PathBuf,
    /// Default auction-platform hostname when no county is selected.
    pub auction_host: String,
    pub proxy: Option<ProxyConfig>,
    pub spreadsheet_url: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub fetch_max_attempts: u32,
    pub fetch_retry_delay_ms: u64,
    pub inter_request_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("counties_path", &self.counties_path)
            .field("output_dir", &self.output_dir)
            .field("auction_host", &self.auction_host)
            .field("proxy", &self.proxy)
            .field(
                "spreadsheet_url",
                &self.spreadsheet_url.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("fetch_max_attempts", &self.fetch_max_attempts)
            .field("fetch_retry_delay_ms", &self.fetch_retry_delay_ms)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .finish()
    }
}
