use std::{env, fs, path::Path};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ConfigError;

pub const DEFAULT_QR_CODE_BASE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const DEFAULT_QR_CODE_SIZE: u32 = 180;
const MAX_QR_CODE_SIZE: u32 = 1000;

/// Identity of the receiving merchant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MerchantConfig {
    pub pix_key: String,
    pub merchant_name: String,
    pub merchant_city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QrCodeConfig {
    pub base_url: String,
    pub size: u32,
}

impl Default for QrCodeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_QR_CODE_BASE_URL.to_string(),
            size: DEFAULT_QR_CODE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub merchant: MerchantConfig,
    #[serde(default)]
    pub qr_code: QrCodeConfig,
}

impl Config {
    /// Reads `PIX_KEY`, `PIX_MERCHANT_NAME`, `PIX_MERCHANT_CITY` (required) and
    /// `QR_CODE_BASE_URL`, `QR_CODE_SIZE` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key).filter(|v| !v.trim().is_empty()).ok_or_else(|| {
                warn!("Environment variable {key} not found");
                ConfigError::Missing(key)
            })
        };

        let merchant = MerchantConfig {
            pix_key: required("PIX_KEY")?,
            merchant_name: required("PIX_MERCHANT_NAME")?,
            merchant_city: required("PIX_MERCHANT_CITY")?,
        };

        let base_url = lookup("QR_CODE_BASE_URL").unwrap_or_else(|| {
            info!("QR_CODE_BASE_URL not set, using default: {DEFAULT_QR_CODE_BASE_URL}");
            DEFAULT_QR_CODE_BASE_URL.to_string()
        });
        let size = match lookup("QR_CODE_SIZE") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "QR_CODE_SIZE",
                reason: format!("{e}"),
            })?,
            None => DEFAULT_QR_CODE_SIZE,
        };

        let config = Self {
            merchant,
            qr_code: QrCodeConfig { base_url, size },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.qr_code.size == 0 || self.qr_code.size > MAX_QR_CODE_SIZE {
            return Err(ConfigError::InvalidValue {
                key: "qr_code.size",
                reason: format!("must be between 1 and {MAX_QR_CODE_SIZE}"),
            });
        }
        url::Url::parse(&self.qr_code.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "qr_code.base_url",
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
