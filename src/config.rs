//! Configuration module
//!
//! Reads a TOML file (default `~/.config/petrotap/config.toml`,
//! override with `PETROTAP_CONFIG`). Every section has sensible
//! defaults so a missing file still yields a runnable dev config.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::pricing::PricingConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Default config location: `~/.config/petrotap/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("petrotap")
        .join("config.toml")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests during shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite path or full connection URL
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "petrotap.db".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn connection_url(&self) -> String {
        if self.path.contains("://") {
            self.path.clone()
        } else {
            format!("sqlite://{}?mode=rwc", self.path)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Shared secret for verifying tokens issued by the identity service
    pub jwt_secret: String,
    pub jwt_issuer: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_issuer: "petrotap-identity".to_string(),
        }
    }
}

/// Company depot the delivery distance is measured from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyConfig {
    pub origin_lat: f64,
    pub origin_lon: f64,
    /// Reserved for a future per-jurisdiction tax table
    pub state_code: Option<String>,
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            origin_lat: 29.7604,
            origin_lon: -95.3698,
            state_code: Some("TX".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoutConfig {
    /// Minimum amount a driver may withdraw
    pub min_payout: Decimal,
    pub currency: String,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            min_payout: dec!(5),
            currency: "usd".to_string(),
        }
    }
}

/// Endpoints and timeouts for outbound collaborator calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalConfig {
    pub gateway_base_url: String,
    pub gateway_api_key: String,
    pub gateway_timeout_ms: u64,
    pub geocoder_base_url: String,
    /// Geocoding aborts after this long; failures degrade, not crash
    pub geocoder_timeout_ms: u64,
    pub push_base_url: String,
    pub push_timeout_ms: u64,
}

impl Default for ExternalConfig {
    fn default() -> Self {
        Self {
            gateway_base_url: "https://gateway.example.com".to_string(),
            gateway_api_key: String::new(),
            gateway_timeout_ms: 10_000,
            geocoder_base_url: "https://nominatim.openstreetmap.org".to_string(),
            geocoder_timeout_ms: 6_500,
            push_base_url: "https://push.example.com".to_string(),
            push_timeout_ms: 5_000,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub company: CompanyConfig,
    pub pricing: PricingConfig,
    pub payouts: PayoutConfig,
    pub external: ExternalConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.api_port, 8080);
        assert_eq!(cfg.payouts.min_payout, dec!(5));
        assert_eq!(cfg.pricing.tax_rate, dec!(0.06));
        assert_eq!(cfg.external.geocoder_timeout_ms, 6_500);
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            api_port = 9999

            [pricing]
            tax_rate = "0.07"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.api_port, 9999);
        assert_eq!(cfg.pricing.tax_rate, dec!(0.07));
        // untouched sections keep defaults
        assert_eq!(cfg.payouts.min_payout, dec!(5));
    }

    #[test]
    fn sqlite_path_becomes_url() {
        let db = DatabaseConfig {
            path: "petrotap.db".into(),
        };
        assert_eq!(db.connection_url(), "sqlite://petrotap.db?mode=rwc");

        let db = DatabaseConfig {
            path: "postgres://user:pw@localhost/petrotap".into(),
        };
        assert_eq!(db.connection_url(), "postgres://user:pw@localhost/petrotap");
    }
}
