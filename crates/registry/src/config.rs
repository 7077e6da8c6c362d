//! Registry configuration

use crate::errors::{RegistryError, Result};
use namereg_ownership::Address;
use namereg_pricing::{check_base_price, Amount, DEFAULT_BASE_PRICE};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_SUFFIX: &str = ".name";
pub const DEFAULT_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Settings the registry starts with. Base price and duration can later be
/// changed by the admin; the suffix is fixed for the registry's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Top-level suffix appended to bare names, including the leading dot
    pub suffix: String,
    /// Base price in atomic units
    #[serde(deserialize_with = "deserialize_amount")]
    pub base_price: Amount,
    /// Registration length for new names
    pub default_duration_secs: u64,
    /// Administrative identity
    pub admin: Address,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            base_price: DEFAULT_BASE_PRICE,
            default_duration_secs: DEFAULT_DURATION_SECS,
            admin: Address::ZERO,
        }
    }
}

impl RegistryConfig {
    pub fn with_admin(admin: Address) -> Self {
        Self {
            admin,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.suffix.is_empty() {
            return Err(RegistryError::validation("suffix must not be empty"));
        }
        check_base_price(self.base_price)?;
        if self.default_duration_secs == 0 {
            return Err(RegistryError::validation(
                "default duration must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Amounts arrive as integers from files and as strings from the environment.
fn deserialize_amount<'de, D>(deserializer: D) -> std::result::Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Int(u64),
        Text(String),
    }

    match RawAmount::deserialize(deserializer)? {
        RawAmount::Int(v) => Ok(Amount::from(v)),
        RawAmount::Text(s) => s
            .trim()
            .replace('_', "")
            .parse::<Amount>()
            .map_err(serde::de::Error::custom),
    }
}
