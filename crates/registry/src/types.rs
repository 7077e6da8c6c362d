//! Types for the name registry

use namereg_ownership::{Address, TokenId};
use namereg_pricing::Amount;
use serde::{Deserialize, Serialize};

/// A registered name as stored by the registry.
///
/// The owner is not part of the stored record; it is always read from the
/// ownership ledger (see [`NameRecord`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredName {
    /// Bare name, without the suffix
    pub name: String,
    /// Identifier assigned at registration (1-based, never reused)
    pub id: TokenId,
    /// Registration timestamp (unix seconds)
    pub created_at: u64,
    /// Expiry timestamp (unix seconds); only moves forward
    pub expires_at: u64,
    /// Opaque metadata URI
    pub metadata_uri: String,
    /// Administrative price override. Recorded but not used for pricing.
    pub custom_price: Option<Amount>,
}

/// A registered name together with its current owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name: String,
    pub id: TokenId,
    /// `None` if the ownership token no longer exists
    pub owner: Option<Address>,
    pub created_at: u64,
    pub expires_at: u64,
    pub metadata_uri: String,
    pub custom_price: Option<Amount>,
}

impl NameRecord {
    pub(crate) fn from_stored(stored: &StoredName, owner: Option<Address>) -> Self {
        Self {
            name: stored.name.clone(),
            id: stored.id,
            owner,
            created_at: stored.created_at,
            expires_at: stored.expires_at,
            metadata_uri: stored.metadata_uri.clone(),
            custom_price: stored.custom_price,
        }
    }
}

/// Public details of a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameDetails {
    pub owner: Option<Address>,
    pub created_at: u64,
    /// Current registration price of the name
    pub price: Amount,
    pub expires_at: u64,
    pub metadata_uri: String,
}
