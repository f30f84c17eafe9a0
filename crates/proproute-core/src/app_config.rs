use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Connection settings for the spreadsheet that backs the property catalog.
#[derive(Clone)]
pub struct SheetsSettings {
    pub base_url: String,
    pub sheet_id: String,
    pub sheet_name: String,
    pub range: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
}

impl std::fmt::Debug for SheetsSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsSettings")
            .field("base_url", &self.base_url)
            .field("sheet_id", &self.sheet_id)
            .field("sheet_name", &self.sheet_name)
            .field("range", &self.range)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub sheets: SheetsSettings,
    pub route_webhook_url: Option<String>,
    pub route_fallback: bool,
    pub utc_offset_minutes: i32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub upload_max_bytes: usize,
}

impl AppConfig {
    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self.env, Environment::Development)
    }
}
