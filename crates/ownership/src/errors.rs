//! Error types for the ownership ledger

use crate::types::{Address, TokenId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OwnershipError {
    #[error("Token already minted: {id}")]
    TokenExists { id: TokenId },

    #[error("Token not found: {id}")]
    TokenNotFound { id: TokenId },

    #[error("Address {claimed} does not own token {id}")]
    NotOwner { id: TokenId, claimed: Address },
}

pub type Result<T> = std::result::Result<T, OwnershipError>;
