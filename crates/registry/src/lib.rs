//! Name Registry
//!
//! Binds human-readable names under a single suffix (e.g. `alice.name`) to
//! owner addresses. Registrations are paid, time-boxed and renewable; names
//! resolve forward (name → owner) and in reverse (owner → name).
//!
//! Ownership itself lives in an [`OwnershipLedger`]; this crate keeps the
//! name ↔ identifier mapping, expiry, pricing rules and the audit log.

pub mod clock;
pub mod config;
pub mod errors;
pub mod events;
pub mod expiry;
pub mod funds;
pub mod registry;
pub mod resolution;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RegistryConfig;
pub use errors::*;
pub use events::RegistryEvent;
pub use expiry::SECONDS_PER_YEAR;
pub use funds::{FundsLedger, InMemoryFunds};
pub use registry::NameRegistry;
pub use resolution::NameResolver;
pub use types::*;

pub use namereg_ownership::{Address, InMemoryOwnershipLedger, OwnershipLedger, TokenId};
pub use namereg_pricing::{Amount, PriceQuote, PricingEngine};
