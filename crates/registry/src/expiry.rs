//! Expiry tracking and renewal
//!
//! Years are fixed at 365 days. Expiry is informational only: an expired
//! name keeps its owner, can still be extended, and is never released for
//! re-registration.

use crate::errors::*;
use crate::events::RegistryEvent;
use crate::registry::NameRegistry;
use namereg_ownership::Address;
use namereg_pricing::Amount;
use tracing::{debug, info};

/// 365 days, no calendar adjustments
pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 60 * 60;

impl NameRegistry {
    /// Extend `name` by `num_years` years and return the new expiry timestamp.
    ///
    /// `payment` must cover [`extension_price`](Self::extension_price); any
    /// surplus is credited back to the requester once the renewal is committed.
    pub fn extend(
        &self,
        name: &str,
        num_years: u64,
        payment: Amount,
        requester: Address,
    ) -> Result<u64> {
        let (expires_at, surplus) =
            match self.commit_extension(name, num_years, payment, requester) {
                Ok(outcome) => outcome,
                Err(err) => {
                    debug!(name, num_years, %requester, error = %err, "extension rejected");
                    return Err(err);
                }
            };
        self.refund(&requester, surplus);
        Ok(expires_at)
    }

    fn commit_extension(
        &self,
        name: &str,
        num_years: u64,
        payment: Amount,
        requester: Address,
    ) -> Result<(u64, Amount)> {
        let mut state = self.write_state();

        let id = *state
            .by_name
            .get(name)
            .ok_or_else(|| RegistryError::NotRegistered {
                name: name.to_string(),
            })?;
        if self.ownership().owner_of(id) != Some(requester) {
            return Err(RegistryError::Unauthorized { requester });
        }
        if num_years == 0 {
            return Err(RegistryError::validation(
                "number of years must be greater than zero",
            ));
        }
        let price = state.pricing.extension_price(name, num_years)?;
        if payment < price {
            return Err(RegistryError::InsufficientPayment {
                required: price,
                provided: payment,
            });
        }

        let added = num_years
            .checked_mul(SECONDS_PER_YEAR)
            .ok_or_else(|| RegistryError::validation("extension period overflow"))?;
        let stored = state
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotRegistered {
                name: name.to_string(),
            })?;
        let expires_at = stored
            .expires_at
            .checked_add(added)
            .ok_or_else(|| RegistryError::validation("expiry timestamp overflow"))?;
        stored.expires_at = expires_at;

        state.balance = state.balance.saturating_add(price);
        self.emit(
            &mut state,
            RegistryEvent::Renewed {
                owner: requester,
                name: name.to_string(),
                expires_at,
            },
        );

        info!(name, id, num_years, %price, expires_at, "name renewed");
        Ok((expires_at, payment - price))
    }

    /// Expiry timestamp of `name`
    pub fn expires_at(&self, name: &str) -> Result<u64> {
        self.read_state()
            .lookup(name)
            .map(|stored| stored.expires_at)
            .ok_or_else(|| RegistryError::NotRegistered {
                name: name.to_string(),
            })
    }

    /// Whether `name` is past its expiry according to the registry clock
    pub fn is_expired(&self, name: &str) -> Result<bool> {
        let expires_at = self.expires_at(name)?;
        Ok(self.now() > expires_at)
    }
}
