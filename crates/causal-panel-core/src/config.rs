//! Configuration management for the causal-panel system.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub mcp: McpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
}

/// MCP server transport settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct McpConfig {
    /// Transport mode: "stdio" or "tcp".
    pub transport: String,
    /// Bind address for the TCP transport.
    pub bind_address: String,
    /// Port for the TCP transport.
    pub tcp_port: u16,
    /// Maximum accepted request size in bytes.
    pub max_payload_size: usize,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".to_string(),
            bind_address: "127.0.0.1".to_string(),
            tcp_port: 3300,
            max_payload_size: 1024 * 1024,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default tracing filter, overridable via RUST_LOG.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Synthetic panel generation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// Number of users in the panel.
    pub num_users: u32,
    /// Number of observed months; month values run 1..=num_months.
    pub num_months: u32,
    /// Signup cohort used for the pre/post aggregate frame.
    pub reference_month: u32,
    /// Poisson mean of the base spend amount.
    pub base_spend: f64,
    /// Linear spend decay per month.
    pub monthly_decay: f64,
    /// Spend bump applied to treated users after their signup month.
    pub treatment_bump: f64,
    /// RNG seed. Unset draws from entropy, so each process start sees a
    /// fresh panel.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            num_users: 10_000,
            num_months: 12,
            reference_month: 3,
            base_spend: 500.0,
            monthly_decay: 10.0,
            treatment_bump: 100.0,
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Sources, later overriding earlier:
    /// 1. config/default.toml
    /// 2. config/{CAUSAL_PANEL_ENV}.toml
    /// 3. Environment variables with the CAUSAL_PANEL prefix
    pub fn load() -> CoreResult<Self> {
        let env = std::env::var("CAUSAL_PANEL_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("CAUSAL_PANEL").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| CoreError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> CoreResult<()> {
        if self.mcp.max_payload_size == 0 {
            return Err(CoreError::Config(
                "mcp.max_payload_size must be greater than 0".into(),
            ));
        }

        match self.mcp.transport.as_str() {
            "stdio" | "tcp" => {}
            other => {
                return Err(CoreError::Config(format!(
                    "mcp.transport must be \"stdio\" or \"tcp\", got \"{}\"",
                    other
                )));
            }
        }

        if self.dataset.num_users == 0 {
            return Err(CoreError::Config(
                "dataset.num_users must be greater than 0".into(),
            ));
        }

        if self.dataset.num_months < 2 {
            return Err(CoreError::Config(
                "dataset.num_months must be at least 2".into(),
            ));
        }

        let i = self.dataset.reference_month;
        if i == 0 || i >= self.dataset.num_months {
            return Err(CoreError::Config(format!(
                "dataset.reference_month must lie in 1..{}, got {}",
                self.dataset.num_months, i
            )));
        }

        if self.dataset.base_spend <= 0.0 {
            return Err(CoreError::Config(
                "dataset.base_spend must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_reference_month_bounds() {
        let mut config = Config::default();
        config.dataset.reference_month = 12;
        assert!(config.validate().is_err());

        config.dataset.reference_month = 0;
        assert!(config.validate().is_err());

        config.dataset.reference_month = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_transport() {
        let mut config = Config::default();
        config.mcp.transport = "websocket".into();
        assert!(config.validate().is_err());
    }
}
