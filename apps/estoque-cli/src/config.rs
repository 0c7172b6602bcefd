//! # Application Configuration
//!
//! Where the store, images, backups and reports live, plus display settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ESTOQUE_DATA_DIR, ESTOQUE_DB_PATH,                                 │
//! │     ESTOQUE_SALE_TOTAL_POLICY, ESTOQUE_CURRENCY_SYMBOL                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $ESTOQUE_CONFIG, or estoque.toml in the platform config dir        │
//! │     ~/.config/estoque/estoque.toml (Linux)                             │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     data dir from the platform data dir, R$, faithful sale totals      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # estoque.toml
//! data_dir = "/home/ana/estoque"
//! database_file = "stock_control.db"   # relative to data_dir
//! images_dir = "imagens"
//! backups_dir = "backups"
//! reports_dir = "reports"
//! currency_symbol = "R$"
//! sale_total_policy = "replace_with_latest_batch"   # or "accumulate"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use estoque_core::{Money, SaleTotalPolicy};

const CONFIG_FILE_NAME: &str = "estoque.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration.
///
/// Relative directory fields are resolved against `data_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root for every file the app writes.
    pub data_dir: PathBuf,

    /// SQLite store.
    /// Default: "stock_control.db"
    pub database_file: PathBuf,

    /// Copied product artwork.
    pub images_dir: PathBuf,

    /// Timestamped store copies.
    pub backups_dir: PathBuf,

    /// Exported text reports.
    pub reports_dir: PathBuf,

    /// Prefix for displayed amounts.
    /// Default: "R$"
    pub currency_symbol: String,

    /// How recorded sales update the sale total.
    pub sale_total_policy: SaleTotalPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: default_data_dir(),
            database_file: PathBuf::from("stock_control.db"),
            images_dir: PathBuf::from("imagens"),
            backups_dir: PathBuf::from("backups"),
            reports_dir: PathBuf::from("reports"),
            currency_symbol: "R$".to_string(),
            sale_total_policy: SaleTotalPolicy::default(),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("br", "EstoquePlus", "estoque")
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `$ESTOQUE_CONFIG`, else the default path)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path
            .or_else(|| std::env::var_os("ESTOQUE_CONFIG").map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Reads a TOML file, falling back to defaults when it does not exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(toml::from_str(&contents)?)
    }

    /// Applies `ESTOQUE_*` overrides looked up through `var`.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("ESTOQUE_DATA_DIR") {
            debug!(data_dir = %dir, "Overriding data dir from environment");
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(path) = var("ESTOQUE_DB_PATH") {
            debug!(database = %path, "Overriding database path from environment");
            self.database_file = PathBuf::from(path);
        }

        if let Some(policy) = var("ESTOQUE_SALE_TOTAL_POLICY") {
            match policy.parse() {
                Ok(parsed) => self.sale_total_policy = parsed,
                Err(_) => warn!(policy = %policy, "Unknown sale total policy in environment"),
            }
        }

        if let Some(symbol) = var("ESTOQUE_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database_file must not be empty".into()));
        }

        if self.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("currency_symbol must not be empty".into()));
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Full path of the SQLite store.
    pub fn database_path(&self) -> PathBuf {
        self.resolve(&self.database_file)
    }

    /// Full path of the image directory.
    pub fn images_path(&self) -> PathBuf {
        self.resolve(&self.images_dir)
    }

    /// Full path of the backup directory.
    pub fn backups_path(&self) -> PathBuf {
        self.resolve(&self.backups_dir)
    }

    /// Full path of the report directory.
    pub fn reports_path(&self) -> PathBuf {
        self.resolve(&self.reports_dir)
    }

    /// Formats an amount with the configured symbol.
    ///
    /// ```rust,ignore
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "R$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format_money(&self.currency_symbol, amount)
    }
}

/// Formats an amount as `{sign}{symbol}{major}.{minor:02}`.
pub fn format_money(symbol: &str, amount: Money) -> String {
    format!(
        "{}{}{}.{:02}",
        if amount.is_negative() { "-" } else { "" },
        symbol,
        amount.major().abs(),
        amount.minor_part().abs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_currency_positive() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "R$12.34");
        assert_eq!(config.format_currency(Money::from_cents(100)), "R$1.00");
        assert_eq!(config.format_currency(Money::from_cents(1)), "R$0.01");
        assert_eq!(config.format_currency(Money::zero()), "R$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-R$12.34");
        assert_eq!(config.format_currency(Money::from_cents(-5)), "-R$0.05");
    }

    #[test]
    fn test_paths_resolve_against_data_dir() {
        let config = AppConfig {
            data_dir: PathBuf::from("/srv/estoque"),
            ..AppConfig::default()
        };
        assert_eq!(config.database_path(), PathBuf::from("/srv/estoque/stock_control.db"));
        assert_eq!(config.images_path(), PathBuf::from("/srv/estoque/imagens"));

        let config = AppConfig {
            database_file: PathBuf::from("/tmp/other.db"),
            ..config
        };
        assert_eq!(config.database_path(), PathBuf::from("/tmp/other.db"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ESTOQUE_DATA_DIR", "/data"),
            ("ESTOQUE_SALE_TOTAL_POLICY", "accumulate"),
            ("ESTOQUE_CURRENCY_SYMBOL", "€"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.sale_total_policy, SaleTotalPolicy::Accumulate);
        assert_eq!(config.format_currency(Money::from_cents(250)), "€2.50");
    }

    #[test]
    fn test_unknown_policy_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| {
            (key == "ESTOQUE_SALE_TOTAL_POLICY").then(|| "sometimes".to_string())
        });
        assert_eq!(config.sale_total_policy, SaleTotalPolicy::ReplaceWithLatestBatch);
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.currency_symbol = " ".into();
        assert!(config.validate().is_err());

        config.currency_symbol = "R$".into();
        config.database_file = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estoque.toml");
        std::fs::write(
            &path,
            "data_dir = \"/srv/estoque\"\nsale_total_policy = \"accumulate\"\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/estoque"));
        assert_eq!(config.sale_total_policy, SaleTotalPolicy::Accumulate);
        assert_eq!(config.currency_symbol, "R$");

        let missing = AppConfig::from_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(missing, AppConfig::default());

        std::fs::write(&path, "currency_symbol = 3").unwrap();
        assert!(matches!(AppConfig::from_file(&path), Err(ConfigError::Parse(_))));
    }
}
