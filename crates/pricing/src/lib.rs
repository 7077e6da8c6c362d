//! Name Pricing
//!
//! Prices a name from its length and its digits:
//! - 3-byte names pay the short-name tier (2× base)
//! - longer names pay the standard tier (1.5× base)
//! - every ASCII digit halves the running price, scanning left to right
//!
//! Names of 2 bytes or fewer cannot be priced and so cannot be registered.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Amount in atomic units
pub type Amount = u128;

/// Atomic units per whole unit
pub const ATOMIC_PER_UNIT: Amount = 1_000_000_000_000_000_000;

/// Default base price: 0.01 units
pub const DEFAULT_BASE_PRICE: Amount = ATOMIC_PER_UNIT / 100;

/// Shortest name length (in bytes) that can be priced
pub const MIN_NAME_LEN: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("name '{name}' is {len} bytes; names must be at least {MIN_NAME_LEN} bytes")]
    NameTooShort { name: String, len: usize },

    #[error("price overflow for base {base}")]
    Overflow { base: Amount },
}

/// Length tier of a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceTier {
    /// Exactly 3 bytes: 2× base
    Short,
    /// More than 3 bytes: 1.5× base
    Standard,
}

impl PriceTier {
    pub fn for_len(len: usize) -> Option<Self> {
        match len {
            0..=2 => None,
            3 => Some(PriceTier::Short),
            _ => Some(PriceTier::Standard),
        }
    }

    /// Apply the tier multiplier to `base`
    pub fn apply(self, base: Amount) -> Option<Amount> {
        match self {
            PriceTier::Short => base.checked_mul(2),
            PriceTier::Standard => base.checked_mul(3).map(|v| v / 2),
        }
    }
}

/// Ensure every tier can be computed at `base`
pub fn check_base_price(base: Amount) -> Result<(), PricingError> {
    for tier in [PriceTier::Short, PriceTier::Standard] {
        if tier.apply(base).is_none() {
            return Err(PricingError::Overflow { base });
        }
    }
    Ok(())
}

/// Pricing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Base price in atomic units, before tier and digit adjustments
    #[serde(default = "default_base_price")]
    pub base_price: Amount,
}

fn default_base_price() -> Amount {
    DEFAULT_BASE_PRICE
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_price: DEFAULT_BASE_PRICE,
        }
    }
}

/// Breakdown of a single price computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub name: String,
    pub tier: PriceTier,
    pub base_price: Amount,
    pub tier_price: Amount,
    pub digit_count: u32,
    pub price: Amount,
}

/// Stateless price calculator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn with_base_price(base_price: Amount) -> Self {
        Self::new(PricingConfig { base_price })
    }

    pub fn base_price(&self) -> Amount {
        self.config.base_price
    }

    /// Replace the base price. Fails if any tier would overflow at this base.
    pub fn set_base_price(&mut self, base_price: Amount) -> Result<(), PricingError> {
        check_base_price(base_price)?;
        self.config.base_price = base_price;
        Ok(())
    }

    /// Full computation with its intermediate values
    pub fn quote(&self, name: &str) -> Result<PriceQuote, PricingError> {
        let len = name.len();
        let tier = PriceTier::for_len(len).ok_or_else(|| PricingError::NameTooShort {
            name: name.to_string(),
            len,
        })?;
        let tier_price = tier
            .apply(self.config.base_price)
            .ok_or(PricingError::Overflow {
                base: self.config.base_price,
            })?;

        // Halve once per digit, truncating at each step.
        let mut price = tier_price;
        let mut digit_count = 0u32;
        for byte in name.bytes() {
            if byte.is_ascii_digit() {
                price /= 2;
                digit_count += 1;
            }
        }

        Ok(PriceQuote {
            name: name.to_string(),
            tier,
            base_price: self.config.base_price,
            tier_price,
            digit_count,
            price,
        })
    }

    /// Registration price for `name`
    pub fn price(&self, name: &str) -> Result<Amount, PricingError> {
        self.quote(name).map(|q| q.price)
    }

    /// Renewal price for `name`. The number of years does not change the amount.
    pub fn extension_price(&self, name: &str, _num_years: u64) -> Result<Amount, PricingError> {
        self.price(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BASE: Amount = 10_000;

    #[test]
    fn test_tier_prices() {
        let engine = PricingEngine::with_base_price(BASE);
        assert_eq!(engine.price("abc").unwrap(), 2 * BASE);
        assert_eq!(engine.price("abcd").unwrap(), 15_000);
        assert_eq!(engine.price("alice").unwrap(), 15_000);
    }

    #[test]
    fn test_short_names_rejected() {
        let engine = PricingEngine::with_base_price(BASE);
        assert_eq!(
            engine.price("a1").unwrap_err(),
            PricingError::NameTooShort {
                name: "a1".into(),
                len: 2
            }
        );
        assert!(engine.price("").is_err());
        assert!(engine.price("x").is_err());
    }

    #[test]
    fn test_digit_discount() {
        let engine = PricingEngine::with_base_price(BASE);
        assert_eq!(engine.price("ab1").unwrap(), BASE);
        assert_eq!(engine.price("a1b2").unwrap(), 3_750);
        assert_eq!(engine.price("1234").unwrap(), 937);
    }

    #[test]
    fn test_truncation_happens_each_step() {
        // 3 * 7 / 2 = 10, then 5, 2, 1
        let engine = PricingEngine::with_base_price(7);
        let quote = engine.quote("x999").unwrap();
        assert_eq!(quote.tier_price, 10);
        assert_eq!(quote.digit_count, 3);
        assert_eq!(quote.price, 1);

        // 2 * 3 = 6 → 3 → 1
        let engine = PricingEngine::with_base_price(3);
        assert_eq!(engine.price("1a1").unwrap(), 1);
    }

    #[test]
    fn test_digit_heavy_names_can_reach_zero() {
        let engine = PricingEngine::with_base_price(BASE);
        assert_eq!(engine.price(&"9".repeat(40)).unwrap(), 0);
    }

    #[test]
    fn test_extension_price_ignores_years() {
        let engine = PricingEngine::default();
        let one = engine.extension_price("alice", 1).unwrap();
        assert_eq!(one, engine.extension_price("alice", 10).unwrap());
        assert_eq!(one, engine.price("alice").unwrap());
    }

    #[test]
    fn test_overflow_is_reported() {
        let engine = PricingEngine::with_base_price(Amount::MAX);
        assert_eq!(
            engine.price("abcd").unwrap_err(),
            PricingError::Overflow { base: Amount::MAX }
        );
    }

    #[test]
    fn test_set_base_price_rejects_overflowing_base() {
        let mut engine = PricingEngine::with_base_price(BASE);
        let too_big = Amount::MAX / 3 + 1;
        assert_eq!(
            engine.set_base_price(too_big).unwrap_err(),
            PricingError::Overflow { base: too_big }
        );
        assert_eq!(engine.base_price(), BASE);

        engine.set_base_price(Amount::MAX / 3).unwrap();
        assert!(engine.price("abc").is_ok());
        assert!(engine.price("abcd").is_ok());
    }

    #[test]
    fn test_default_config() {
        let config: PricingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.base_price, 10_000_000_000_000_000);
        assert_eq!(
            PricingEngine::default().price("abc").unwrap(),
            2 * DEFAULT_BASE_PRICE
        );
    }

    proptest! {
        #[test]
        fn price_matches_tier_then_halving(
            name in "[a-z0-9]{3,24}",
            base in 0u128..=1_000_000_000_000_000_000u128,
        ) {
            let engine = PricingEngine::with_base_price(base);
            let tier_price = if name.len() == 3 { base * 2 } else { base * 3 / 2 };
            let digits = name.bytes().filter(u8::is_ascii_digit).count() as u32;
            let expected = (0..digits).fold(tier_price, |p, _| p / 2);
            prop_assert_eq!(engine.price(&name).unwrap(), expected);
        }

        #[test]
        fn letters_only_names_pay_full_tier(name in "[a-z]{4,32}") {
            let engine = PricingEngine::with_base_price(BASE);
            prop_assert_eq!(engine.price(&name).unwrap(), BASE * 3 / 2);
        }
    }
}
