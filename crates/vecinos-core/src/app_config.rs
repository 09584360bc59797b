use crate::geo::Coordinates;

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

#[derive(Clone)]
pub struct AppConfig {
    /// Base URL of the vecinos API, without a trailing slash.
    pub api_url: String,
    pub env: Environment,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub default_radius_km: f64,
    /// Bearer token from a previous login, if any.
    pub token: Option<String>,
    /// Fixed device position used instead of a live location fix.
    pub device_position: Option<Coordinates>,
    pub geolocation_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_url", &self.api_url)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("default_radius_km", &self.default_radius_km)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("device_position", &self.device_position)
            .field("geolocation_timeout_secs", &self.geolocation_timeout_secs)
            .finish()
    }
}
