use crate::core::validation::{DEFAULT_MIN_PRINCIPAL, Validator};
use crate::providers::coingecko::{self, CoinGeckoProvider};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    coingecko::DEFAULT_TIMEOUT.as_secs()
}

impl Default for CoinGeckoProviderConfig {
    fn default() -> Self {
        CoinGeckoProviderConfig {
            base_url: coingecko::DEFAULT_BASE_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProvidersConfig {
    pub coingecko: Option<CoinGeckoProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coingecko: Some(CoinGeckoProviderConfig::default()),
        }
    }
}

/// Values preselected when the user does not pick a currency or asset.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FormDefaults {
    pub currency: String,
    pub asset: String,
}

impl Default for FormDefaults {
    fn default() -> Self {
        FormDefaults {
            currency: "usd".to_string(),
            asset: "bitcoin".to_string(),
        }
    }
}

fn default_min_principal() -> Decimal {
    DEFAULT_MIN_PRINCIPAL
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_min_principal")]
    pub min_principal: Decimal,
    #[serde(default)]
    pub defaults: FormDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            min_principal: default_min_principal(),
            defaults: FormDefaults::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "cryptoprofit", "cryptoprofit")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn price_provider(&self) -> CoinGeckoProvider {
        let provider = self.providers.coingecko.clone().unwrap_or_default();
        CoinGeckoProvider::new(
            &provider.base_url,
            Duration::from_secs(provider.timeout_secs),
        )
    }

    pub fn validator(&self) -> Validator {
        Validator::new(self.min_principal)
    }
}
