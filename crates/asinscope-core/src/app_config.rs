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

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Catalog credential. `None` is allowed at startup and reported per
    /// request as a configuration error.
    pub catalog_api_key: Option<String>,
    pub catalog_base_url: String,
    pub catalog_domain: u8,
    pub catalog_batch_size: usize,
    pub catalog_timeout_secs: u64,
    pub catalog_user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "catalog_api_key",
                &self.catalog_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("catalog_base_url", &self.catalog_base_url)
            .field("catalog_domain", &self.catalog_domain)
            .field("catalog_batch_size", &self.catalog_batch_size)
            .field("catalog_timeout_secs", &self.catalog_timeout_secs)
            .field("catalog_user_agent", &self.catalog_user_agent)
            .finish()
    }
}
