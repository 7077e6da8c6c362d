//! Name registration ledger
//!
//! Holds the name ↔ identifier mapping and all administrative settings
//! behind a single lock. Owner → identifier lookups always go to the
//! ownership ledger. Every mutation runs
//! under the write lock from first check to event emission; refunds are paid
//! only after the lock is released.

use crate::clock::Clock;
use crate::config::RegistryConfig;
use crate::errors::*;
use crate::events::RegistryEvent;
use crate::funds::FundsLedger;
use crate::types::*;
use namereg_ownership::{Address, OwnershipLedger, TokenId};
use namereg_pricing::{Amount, PriceQuote, PricingEngine};
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Mutable registry state. Only ever touched through [`NameRegistry`]'s lock.
#[derive(Debug)]
pub(crate) struct RegistryState {
    /// Records in identifier order; record `i` has identifier `i + 1`
    pub(crate) records: Vec<StoredName>,
    /// Bare name → identifier
    pub(crate) by_name: HashMap<String, TokenId>,
    pub(crate) pricing: PricingEngine,
    pub(crate) default_duration: u64,
    pub(crate) admin: Address,
    /// Collected payments not yet withdrawn
    pub(crate) balance: Amount,
    pub(crate) audit_log: Vec<RegistryEvent>,
}

impl RegistryState {
    fn new(config: &RegistryConfig) -> Self {
        Self {
            records: Vec::new(),
            by_name: HashMap::new(),
            pricing: PricingEngine::with_base_price(config.base_price),
            default_duration: config.default_duration_secs,
            admin: config.admin,
            balance: 0,
            audit_log: Vec::new(),
        }
    }

    pub(crate) fn get(&self, id: TokenId) -> Option<&StoredName> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.records.get(index)
    }

    pub(crate) fn get_mut(&mut self, id: TokenId) -> Option<&mut StoredName> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.records.get_mut(index)
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<&StoredName> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    fn next_id(&self) -> TokenId {
        self.records.len() as TokenId + 1
    }
}

/// The name registry
pub struct NameRegistry {
    suffix: String,
    state: RwLock<RegistryState>,
    ownership: Arc<dyn OwnershipLedger>,
    funds: Arc<dyn FundsLedger>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<RegistryEvent>,
}

impl std::fmt::Debug for NameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameRegistry")
            .field("suffix", &self.suffix)
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

impl NameRegistry {
    /// Create a registry on top of the given ownership and funds ledgers
    pub fn new(
        config: RegistryConfig,
        ownership: Arc<dyn OwnershipLedger>,
        funds: Arc<dyn FundsLedger>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        info!(
            suffix = %config.suffix,
            base_price = %config.base_price,
            admin = %config.admin,
            "name registry initialised"
        );
        Ok(Self {
            state: RwLock::new(RegistryState::new(&config)),
            suffix: config.suffix,
            ownership,
            funds,
            clock,
            events,
        })
    }

    /// Register `name` for `requester`.
    ///
    /// `payment` must cover [`price`](Self::price); any surplus is credited back
    /// to the requester once the registration is committed.
    pub fn register(
        &self,
        name: &str,
        metadata_uri: impl Into<String>,
        payment: Amount,
        requester: Address,
    ) -> Result<NameRecord> {
        let (record, surplus) =
            match self.commit_registration(name, metadata_uri.into(), payment, requester) {
                Ok(outcome) => outcome,
                Err(err) => {
                    debug!(name, %requester, error = %err, "registration rejected");
                    return Err(err);
                }
            };
        self.refund(&requester, surplus);
        Ok(record)
    }

    fn commit_registration(
        &self,
        name: &str,
        metadata_uri: String,
        payment: Amount,
        requester: Address,
    ) -> Result<(NameRecord, Amount)> {
        let mut state = self.state.write();

        let price = state.pricing.price(name)?;
        if state.by_name.contains_key(name) {
            return Err(RegistryError::AlreadyRegistered {
                name: name.to_string(),
            });
        }
        if self.primary_id_of(&state, &requester).is_some() {
            return Err(RegistryError::DuplicateOwner { owner: requester });
        }
        if payment < price {
            return Err(RegistryError::InsufficientPayment {
                required: price,
                provided: payment,
            });
        }

        let now = self.clock.now();
        let expires_at = now
            .checked_add(state.default_duration)
            .ok_or_else(|| RegistryError::validation("expiry timestamp overflow"))?;
        let id = state.next_id();

        // Nothing has been mutated yet, so a mint failure leaves no trace.
        self.ownership.mint(id, requester)?;

        let stored = StoredName {
            name: name.to_string(),
            id,
            created_at: now,
            expires_at,
            metadata_uri,
            custom_price: None,
        };
        state.by_name.insert(stored.name.clone(), id);
        state.records.push(stored.clone());
        state.balance = state.balance.saturating_add(price);
        self.emit(
            &mut state,
            RegistryEvent::Registered {
                owner: requester,
                name: stored.name.clone(),
                expires_at,
            },
        );

        info!(name, id, owner = %requester, %price, expires_at, "name registered");
        Ok((NameRecord::from_stored(&stored, Some(requester)), payment - price))
    }

    /// Transfer identifier `id` from `requester` to `to`.
    ///
    /// The recipient may already hold other names; the one-name-per-owner rule
    /// only applies to registration.
    pub fn transfer(&self, id: TokenId, to: Address, requester: Address) -> Result<()> {
        let result = self.commit_transfer(id, to, requester);
        if let Err(err) = &result {
            debug!(id, %requester, %to, error = %err, "transfer rejected");
        }
        result
    }

    fn commit_transfer(&self, id: TokenId, to: Address, requester: Address) -> Result<()> {
        let mut state = self.state.write();

        let name = state
            .get(id)
            .map(|stored| stored.name.clone())
            .ok_or_else(|| RegistryError::NotRegistered {
                name: format!("#{id}"),
            })?;
        if self.ownership.owner_of(id) != Some(requester) {
            return Err(RegistryError::Unauthorized { requester });
        }

        self.ownership.transfer(id, &requester, to)?;

        self.emit(
            &mut state,
            RegistryEvent::Transferred {
                from: requester,
                to,
                name: name.clone(),
            },
        );

        info!(name = %name, id, from = %requester, %to, "name transferred");
        Ok(())
    }

    /// Replace the metadata URI of `id`. Admin only.
    pub fn set_metadata(&self, id: TokenId, uri: impl Into<String>, requester: Address) -> Result<()> {
        let mut state = self.state.write();
        ensure_admin(&state, &requester)?;
        let stored = state
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotRegistered {
                name: format!("#{id}"),
            })?;
        stored.metadata_uri = uri.into();
        info!(id, name = %stored.name, "metadata updated");
        Ok(())
    }

    /// Change the base price used for all future quotes. Admin only.
    pub fn set_base_price(&self, base_price: Amount, requester: Address) -> Result<()> {
        let mut state = self.state.write();
        ensure_admin(&state, &requester)?;
        state.pricing.set_base_price(base_price)?;
        info!(%base_price, "base price updated");
        Ok(())
    }

    /// Change the registration length for new names. Admin only.
    pub fn set_default_duration(&self, secs: u64, requester: Address) -> Result<()> {
        let mut state = self.state.write();
        ensure_admin(&state, &requester)?;
        if secs == 0 {
            return Err(RegistryError::validation(
                "default duration must be greater than zero",
            ));
        }
        state.default_duration = secs;
        info!(secs, "default duration updated");
        Ok(())
    }

    /// Record a per-name price override. Admin only.
    ///
    /// The override is stored on the record but pricing does not read it.
    pub fn set_custom_price(&self, name: &str, price: Amount, requester: Address) -> Result<()> {
        let mut state = self.state.write();
        ensure_admin(&state, &requester)?;
        let id = *state
            .by_name
            .get(name)
            .ok_or_else(|| RegistryError::NotRegistered {
                name: name.to_string(),
            })?;
        if let Some(stored) = state.get_mut(id) {
            stored.custom_price = Some(price);
        }
        info!(name, %price, "custom price recorded");
        Ok(())
    }

    /// Hand administrative rights to `new_admin`. Admin only.
    pub fn set_admin(&self, new_admin: Address, requester: Address) -> Result<()> {
        let mut state = self.state.write();
        ensure_admin(&state, &requester)?;
        state.admin = new_admin;
        info!(from = %requester, to = %new_admin, "admin changed");
        Ok(())
    }

    /// Pay collected funds out to the admin. `None` withdraws everything.
    pub fn withdraw(&self, amount: Option<Amount>, requester: Address) -> Result<Amount> {
        let amount = {
            let mut state = self.state.write();
            ensure_admin(&state, &requester)?;
            let amount = amount.unwrap_or(state.balance);
            if amount > state.balance {
                return Err(RegistryError::validation(format!(
                    "withdrawal of {amount} exceeds balance {}",
                    state.balance
                )));
            }
            state.balance -= amount;
            amount
        };
        if amount == 0 {
            return Ok(0);
        }

        if let Err(err) = self.funds.credit(&requester, amount) {
            let mut state = self.state.write();
            state.balance = state.balance.saturating_add(amount);
            error!(%requester, %amount, error = %err, "withdrawal payout failed");
            return Err(RegistryError::Funds(err));
        }
        info!(to = %requester, %amount, "funds withdrawn");
        Ok(amount)
    }

    /// Registration price for `name`
    pub fn price(&self, name: &str) -> Result<Amount> {
        Ok(self.state.read().pricing.price(name)?)
    }

    /// Renewal price for `name`; independent of `num_years`
    pub fn extension_price(&self, name: &str, num_years: u64) -> Result<Amount> {
        Ok(self.state.read().pricing.extension_price(name, num_years)?)
    }

    /// Price breakdown for `name`
    pub fn quote(&self, name: &str) -> Result<PriceQuote> {
        Ok(self.state.read().pricing.quote(name)?)
    }

    /// Record for a bare name
    pub fn record(&self, name: &str) -> Option<NameRecord> {
        let state = self.state.read();
        state
            .lookup(name)
            .map(|stored| NameRecord::from_stored(stored, self.ownership.owner_of(stored.id)))
    }

    /// Record for an identifier
    pub fn record_by_id(&self, id: TokenId) -> Option<NameRecord> {
        let state = self.state.read();
        state
            .get(id)
            .map(|stored| NameRecord::from_stored(stored, self.ownership.owner_of(id)))
    }

    /// Number of identifiers ever minted
    pub fn total_registered(&self) -> u64 {
        self.state.read().records.len() as u64
    }

    /// Collected, not yet withdrawn payments
    pub fn balance(&self) -> Amount {
        self.state.read().balance
    }

    pub fn admin(&self) -> Address {
        self.state.read().admin
    }

    pub fn base_price(&self) -> Amount {
        self.state.read().pricing.base_price()
    }

    pub fn default_duration(&self) -> u64 {
        self.state.read().default_duration
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Snapshot of every event emitted so far
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.state.read().audit_log.clone()
    }

    /// Subscribe to events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    pub(crate) fn read_state(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read()
    }

    pub(crate) fn write_state(&self) -> parking_lot::RwLockWriteGuard<'_, RegistryState> {
        self.state.write()
    }

    pub(crate) fn ownership(&self) -> &dyn OwnershipLedger {
        self.ownership.as_ref()
    }

    pub(crate) fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Registry identifiers the ownership ledger attributes to `owner`, ascending.
    /// Tokens minted outside the registry are ignored.
    pub(crate) fn ids_of(&self, state: &RegistryState, owner: &Address) -> Vec<TokenId> {
        self.ownership
            .tokens_of(owner)
            .into_iter()
            .filter(|id| state.get(*id).is_some())
            .collect()
    }

    /// Lowest registry identifier `owner` currently holds
    pub(crate) fn primary_id_of(&self, state: &RegistryState, owner: &Address) -> Option<TokenId> {
        self.ids_of(state, owner).into_iter().min()
    }

    pub(crate) fn emit(&self, state: &mut RegistryState, event: RegistryEvent) {
        state.audit_log.push(event.clone());
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    /// Return `surplus` to `to`. Runs after the mutation has been committed and
    /// never undoes it.
    pub(crate) fn refund(&self, to: &Address, surplus: Amount) {
        if surplus == 0 {
            return;
        }
        match self.funds.credit(to, surplus) {
            Ok(()) => debug!(%to, %surplus, "surplus refunded"),
            Err(err) => {
                error!(
                    %to,
                    %surplus,
                    error = %err,
                    "refund failed; surplus retained in registry balance"
                );
                let mut state = self.state.write();
                state.balance = state.balance.saturating_add(surplus);
            }
        }
    }
}

pub(crate) fn ensure_admin(state: &RegistryState, requester: &Address) -> Result<()> {
    if state.admin != *requester {
        return Err(RegistryError::Unauthorized {
            requester: *requester,
        });
    }
    Ok(())
}
