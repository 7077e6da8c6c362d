//! Ownership ledger for registered names
//!
//! This crate provides the ownership capability the registry is built on:
//! an authoritative answer to "who owns identifier X" and an atomic way to
//! reassign it. The registry itself never stores owners; it always asks here.

pub mod errors;
pub mod ledger;
pub mod types;

pub use errors::*;
pub use ledger::*;
pub use types::*;
