//! Ownership ledger capability and its in-memory backing

use crate::errors::*;
use crate::types::*;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Authoritative record of who holds which identifier.
///
/// Implementations must make every call atomic: a failed call leaves the
/// ledger exactly as it was.
pub trait OwnershipLedger: Send + Sync {
    /// Create `id` and assign it to `owner`.
    fn mint(&self, id: TokenId, owner: Address) -> Result<()>;

    /// Current holder of `id`, or `None` if it was never minted or has been burned.
    fn owner_of(&self, id: TokenId) -> Option<Address>;

    /// Move `id` from `from` to `to`. Fails unless `from` currently holds it.
    fn transfer(&self, id: TokenId, from: &Address, to: Address) -> Result<()>;

    /// Destroy `id`.
    fn burn(&self, id: TokenId) -> Result<()>;

    /// Number of identifiers held by `owner`.
    fn balance_of(&self, owner: &Address) -> usize;

    /// Identifiers held by `owner`, in ascending order.
    fn tokens_of(&self, owner: &Address) -> Vec<TokenId>;
}

/// In-memory ownership ledger
#[derive(Debug, Default)]
pub struct InMemoryOwnershipLedger {
    /// Token → owner mapping
    owners: Arc<RwLock<HashMap<TokenId, Address>>>,
    /// Owner → tokens mapping (for balance lookups)
    owner_to_tokens: Arc<RwLock<HashMap<Address, BTreeSet<TokenId>>>>,
}

impl InMemoryOwnershipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live tokens
    pub fn total_supply(&self) -> usize {
        self.owners.read().len()
    }
}

impl OwnershipLedger for InMemoryOwnershipLedger {
    fn mint(&self, id: TokenId, owner: Address) -> Result<()> {
        let mut owners = self.owners.write();
        if owners.contains_key(&id) {
            return Err(OwnershipError::TokenExists { id });
        }
        owners.insert(id, owner);
        self.owner_to_tokens
            .write()
            .entry(owner)
            .or_default()
            .insert(id);
        debug!(token = id, %owner, "minted");
        Ok(())
    }

    fn owner_of(&self, id: TokenId) -> Option<Address> {
        self.owners.read().get(&id).copied()
    }

    fn transfer(&self, id: TokenId, from: &Address, to: Address) -> Result<()> {
        let mut owners = self.owners.write();
        let current = owners
            .get_mut(&id)
            .ok_or(OwnershipError::TokenNotFound { id })?;
        if *current != *from {
            return Err(OwnershipError::NotOwner {
                id,
                claimed: *from,
            });
        }
        *current = to;

        let mut map = self.owner_to_tokens.write();
        if let Some(set) = map.get_mut(from) {
            set.remove(&id);
            if set.is_empty() {
                map.remove(from);
            }
        }
        map.entry(to).or_default().insert(id);
        debug!(token = id, %from, %to, "transferred");
        Ok(())
    }

    fn burn(&self, id: TokenId) -> Result<()> {
        let mut owners = self.owners.write();
        let owner = owners
            .remove(&id)
            .ok_or(OwnershipError::TokenNotFound { id })?;

        let mut map = self.owner_to_tokens.write();
        if let Some(set) = map.get_mut(&owner) {
            set.remove(&id);
            if set.is_empty() {
                map.remove(&owner);
            }
        }
        debug!(token = id, %owner, "burned");
        Ok(())
    }

    fn balance_of(&self, owner: &Address) -> usize {
        self.owner_to_tokens
            .read()
            .get(owner)
            .map(BTreeSet::len)
            .unwrap_or(0)
    }

    fn tokens_of(&self, owner: &Address) -> Vec<TokenId> {
        self.owner_to_tokens
            .read()
            .get(owner)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}
