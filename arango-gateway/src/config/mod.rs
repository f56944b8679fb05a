use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;

/// Gateway settings, loaded once at startup and never mutated.
///
/// Environment keys use a double-underscore path, e.g. `APP__SERVER__PORT`,
/// `APP__ARANGO__URL`, `APP__ARANGO__USERNAME`, `APP__ARANGO__PASSWORD`.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_server")]
    pub server: core_config::Config,
    pub arango: ArangoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArangoConfig {
    /// Base URL of the ArangoDB HTTP endpoint, e.g. `http://arango-db:8529`.
    pub url: String,
    pub username: String,
    pub password: Secret<String>,
    /// Upper bound for a single outbound call, connect included.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_server() -> core_config::Config {
    core_config::Config {
        port: 8080,
        log_level: "info".to_string(),
        otlp_endpoint: None,
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let config: GatewayConfig = core_config::load_settings()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.arango.url.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "arango.url must not be empty"
            )));
        }

        if self.arango.request_timeout_secs == 0 || self.arango.connect_timeout_secs == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "arango timeouts must be at least one second"
            )));
        }

        Ok(())
    }
}
