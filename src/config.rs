//! Agent Configuration
//!
//! Environment-driven configuration for the registration agent. Credentials,
//! the target director and the endpoint to register are all required; the
//! rest has defaults.

/// Configuration for the registration agent.
#[derive(Debug, Clone)]
pub struct Config {
    /// VaaS API host, including scheme (e.g. "https://vaas.example.com")
    pub host: String,
    /// Username sent as a query parameter on every request
    pub username: String,
    /// API key sent as a query parameter on every request
    pub api_key: String,
    /// Name of the director to register under
    pub director: String,
    /// Network address of the endpoint to register
    pub address: String,
    /// Port of the endpoint to register
    pub port: u16,
    /// Symbolic code of the datacenter the endpoint lives in (e.g. "WAW")
    pub dc: String,
    /// Load-balancing weight for the registered backend
    pub weight: Option<u32>,
    /// Tags attached to the registered backend
    pub tags: Vec<String>,
    /// Whether the backend inherits the director's time profile
    pub inherit_time_profile: bool,
    /// Verbose logging
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            api_key: String::new(),
            director: String::new(),
            address: String::new(),
            port: 0,
            dc: String::new(),
            weight: None,
            tags: Vec::new(),
            inherit_time_profile: false,
            debug: false,
        }
    }
}

impl Config {
    /// Validate that every required value is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::MissingHost);
        }
        if self.username.is_empty() {
            return Err(ConfigError::MissingUsername);
        }
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.director.is_empty() {
            return Err(ConfigError::MissingDirector);
        }
        if self.address.is_empty() {
            return Err(ConfigError::MissingAddress);
        }
        if self.port == 0 {
            return Err(ConfigError::MissingPort);
        }
        if self.dc.is_empty() {
            return Err(ConfigError::MissingDc);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("VAAS_HOST is required")]
    MissingHost,
    #[error("VAAS_USERNAME is required")]
    MissingUsername,
    #[error("VAAS_API_KEY is required")]
    MissingApiKey,
    #[error("VAAS_DIRECTOR is required")]
    MissingDirector,
    #[error("VAAS_BACKEND_ADDRESS is required")]
    MissingAddress,
    #[error("VAAS_BACKEND_PORT is required")]
    MissingPort,
    #[error("VAAS_DC is required")]
    MissingDc,
}

/// Load configuration from environment variables and validate it.
pub fn load_config() -> Result<Config, ConfigError> {
    let host = std::env::var("VAAS_HOST").unwrap_or_default();
    let username = std::env::var("VAAS_USERNAME").unwrap_or_default();
    let api_key = std::env::var("VAAS_API_KEY").unwrap_or_default();
    let director = std::env::var("VAAS_DIRECTOR").unwrap_or_default();
    let address = std::env::var("VAAS_BACKEND_ADDRESS").unwrap_or_default();

    let port = std::env::var("VAAS_BACKEND_PORT")
        .unwrap_or_default()
        .parse()
        .unwrap_or(0);

    let dc = std::env::var("VAAS_DC").unwrap_or_default();

    let weight = std::env::var("VAAS_WEIGHT")
        .ok()
        .and_then(|v| v.parse().ok());

    let tags = std::env::var("VAAS_TAGS")
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let inherit_time_profile = std::env::var("VAAS_INHERIT_TIME_PROFILE")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false);

    let debug = std::env::var("DEBUG").is_ok();

    let config = Config {
        host,
        username,
        api_key,
        director,
        address,
        port,
        dc,
        weight,
        tags,
        inherit_time_profile,
        debug,
    };

    config.validate()?;
    Ok(config)
}
