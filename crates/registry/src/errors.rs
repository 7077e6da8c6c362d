//! Error types for the name registry

use namereg_ownership::{Address, OwnershipError};
use namereg_pricing::{Amount, PricingError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid request: {reason}")]
    Validation { reason: String },

    #[error("Name already registered: {name}")]
    AlreadyRegistered { name: String },

    #[error("Owner {owner} already holds a name")]
    DuplicateOwner { owner: Address },

    #[error("Name not registered: {name}")]
    NotRegistered { name: String },

    #[error("Insufficient payment: required {required}, provided {provided}")]
    InsufficientPayment { required: Amount, provided: Amount },

    #[error("Unauthorized: {requester} may not perform this action")]
    Unauthorized { requester: Address },

    #[error("Ownership ledger error: {0}")]
    Ownership(#[from] OwnershipError),

    #[error("Funds ledger error: {0}")]
    Funds(#[from] anyhow::Error),
}

impl RegistryError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}

impl From<PricingError> for RegistryError {
    fn from(value: PricingError) -> Self {
        Self::validation(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
