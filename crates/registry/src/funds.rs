//! Funds ledger used to return payment surplus and pay out withdrawals
//!
//! Settlement itself is outside the registry; it only needs somewhere to
//! credit refunds and withdrawals.

use anyhow::Result;
use namereg_ownership::Address;
use namereg_pricing::Amount;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Interface for crediting identities.
pub trait FundsLedger: Send + Sync {
    /// Credit `amount` to `to`.
    fn credit(&self, to: &Address, amount: Amount) -> Result<()>;

    /// Current balance of `who`.
    fn balance_of(&self, who: &Address) -> Amount;
}

/// In-memory funds ledger
#[derive(Debug, Default)]
pub struct InMemoryFunds {
    balances: RwLock<HashMap<Address, Amount>>,
}

impl InMemoryFunds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all balances
    pub fn total(&self) -> Amount {
        self.balances
            .read()
            .values()
            .fold(0, |acc, v| acc.saturating_add(*v))
    }
}

impl FundsLedger for InMemoryFunds {
    fn credit(&self, to: &Address, amount: Amount) -> Result<()> {
        let mut balances = self.balances.write();
        let balance = balances.entry(*to).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| anyhow::anyhow!("balance overflow for {to}"))?;
        Ok(())
    }

    fn balance_of(&self, who: &Address) -> Amount {
        self.balances.read().get(who).copied().unwrap_or(0)
    }
}
