//! Runtime configuration
//!
//! A [`Config`] is built from, in increasing priority:
//! - The defaults.
//! - A TOML file, if given. Needs the `config_file` feature.
//! - Environment variables.
//!
//! ```toml
//! api_key = "..."
//! base_url = "https://api.spoonacular.com/"
//! timeout = "10s"
//!
//! [currency]
//! primary_symbol = "$"
//! secondary_symbol = "Rs."
//! rate = 140
//! ```
//!
//! The API key has no default, it must come from the file or
//! [`API_KEY_VAR`].

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::price::CurrencyConversion;

pub const API_KEY_VAR: &str = "SPOONACULAR_API_KEY";
pub const CONFIG_PATH_VAR: &str = "RECIPE_FINDER_CONFIG";
pub const BASE_URL_VAR: &str = "RECIPE_FINDER_BASE_URL";
pub const TIMEOUT_VAR: &str = "RECIPE_FINDER_TIMEOUT";
pub const CURRENCY_RATE_VAR: &str = "RECIPE_FINDER_CURRENCY_RATE";

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything needed to talk to the recipe API and show the results
#[derive(Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    /// Root of the API, always ends with `/`
    pub base_url: Url,
    /// Applies to each request
    pub timeout: Duration,
    pub currency: CurrencyConversion,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("currency", &self.currency)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No API key found. Set {API_KEY_VAR} or `api_key` in the config file")]
    MissingApiKey,

    #[error("Could not read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "config_file")]
    #[error("Invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config files are not supported, enable the `config_file` feature")]
    FileUnsupported,

    #[error("Invalid base URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid timeout '{value}': {source}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("Invalid currency rate '{0}', it must be a positive number")]
    InvalidRate(String),
}

/// One layer of configuration
///
/// Every field is optional, missing ones are taken from the layer below.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Human readable, like `"10s"` or `"1m 30s"`
    pub timeout: Option<String>,
    #[serde(default)]
    pub currency: CurrencyLayer,
}

/// The `[currency]` table of a [`ConfigLayer`]
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurrencyLayer {
    pub primary_symbol: Option<String>,
    pub secondary_symbol: Option<String>,
    pub rate: Option<f64>,
}

impl ConfigLayer {
    /// Reads a layer from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    #[cfg(feature = "config_file")]
    fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[cfg(not(feature = "config_file"))]
    fn from_toml(_text: &str, _path: &Path) -> Result<Self, ConfigError> {
        Err(ConfigError::FileUnsupported)
    }

    /// Reads a layer from environment variables
    ///
    /// `var` is called with the variable name. Empty values count as unset.
    pub fn from_env(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        let rate = var(CURRENCY_RATE_VAR)
            .map(|r| {
                r.trim()
                    .parse::<f64>()
                    .map_err(|_| ConfigError::InvalidRate(r.clone()))
            })
            .transpose()?;

        Ok(Self {
            api_key: var(API_KEY_VAR),
            base_url: var(BASE_URL_VAR),
            timeout: var(TIMEOUT_VAR),
            currency: CurrencyLayer {
                rate,
                ..Default::default()
            },
        })
    }

    /// Puts `other` on top of `self`
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            base_url: other.base_url.or(self.base_url),
            timeout: other.timeout.or(self.timeout),
            currency: CurrencyLayer {
                primary_symbol: other.currency.primary_symbol.or(self.currency.primary_symbol),
                secondary_symbol: other
                    .currency
                    .secondary_symbol
                    .or(self.currency.secondary_symbol),
                rate: other.currency.rate.or(self.currency.rate),
            },
        }
    }
}

impl Config {
    /// Default configuration with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default URL"),
            timeout: DEFAULT_TIMEOUT,
            currency: CurrencyConversion::default(),
        }
    }

    /// Loads the configuration from the process environment and, if given
    /// or set in [`CONFIG_PATH_VAR`], a config file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_PATH_VAR).map(PathBuf::from));

        let file = match &path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "reading config file");
                ConfigLayer::from_file(path)?
            }
            None => ConfigLayer::default(),
        };
        Self::from_layers(file.merge(ConfigLayer::from_env(env)?))
    }

    /// Builds the final configuration from a merged layer
    pub fn from_layers(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let api_key = layer
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);

        if let Some(value) = layer.base_url {
            config.base_url = parse_base_url(&value)?;
        }
        if let Some(value) = layer.timeout {
            config.timeout = humantime::parse_duration(value.trim())
                .map_err(|source| ConfigError::InvalidTimeout { value, source })?;
        }
        if let Some(symbol) = layer.currency.primary_symbol {
            config.currency.primary_symbol = symbol;
        }
        if let Some(symbol) = layer.currency.secondary_symbol {
            config.currency.secondary_symbol = symbol;
        }
        if let Some(rate) = layer.currency.rate {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(ConfigError::InvalidRate(rate.to_string()));
            }
            config.currency.rate = rate;
        }

        Ok(config)
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
