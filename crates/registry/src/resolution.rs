//! Name resolution: suffixed name → owner, owner → suffixed name

use crate::errors::*;
use crate::registry::NameRegistry;
use crate::types::*;
use namereg_ownership::Address;
use std::sync::Arc;

/// Read-only resolution views over a [`NameRegistry`].
///
/// Every lookup runs under a single read lock, so it never observes a
/// registration or transfer halfway through.
#[derive(Debug, Clone)]
pub struct NameResolver {
    registry: Arc<NameRegistry>,
}

impl NameResolver {
    pub fn new(registry: Arc<NameRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<NameRegistry> {
        &self.registry
    }

    pub fn suffix(&self) -> &str {
        self.registry.suffix()
    }

    /// Resolve `alice.name` → owner of `alice`.
    ///
    /// Returns `Ok(None)` for names that were never registered or whose
    /// ownership token no longer exists.
    pub fn resolve_forward(&self, name_with_suffix: &str) -> Result<Option<Address>> {
        let bare = self.strip_suffix(name_with_suffix)?;
        let state = self.registry.read_state();
        Ok(state
            .by_name
            .get(bare)
            .and_then(|id| self.registry.ownership().owner_of(*id)))
    }

    /// Resolve owner → `alice.name`.
    ///
    /// An owner holding several names (only possible through transfer)
    /// resolves to the one with the lowest identifier.
    pub fn resolve_reverse(&self, owner: &Address) -> Option<String> {
        let state = self.registry.read_state();
        let id = self.registry.primary_id_of(&state, owner)?;
        state
            .get(id)
            .map(|stored| format!("{}{}", stored.name, self.suffix()))
    }

    /// All bare names currently held by `owner`, in identifier order
    pub fn names_of(&self, owner: &Address) -> Vec<String> {
        let state = self.registry.read_state();
        self.registry
            .ids_of(&state, owner)
            .into_iter()
            .filter_map(|id| state.get(id))
            .map(|stored| stored.name.clone())
            .collect()
    }

    /// Public details of a bare name
    pub fn details(&self, name: &str) -> Result<NameDetails> {
        let state = self.registry.read_state();
        let stored = state
            .lookup(name)
            .ok_or_else(|| RegistryError::NotRegistered {
                name: name.to_string(),
            })?;
        Ok(NameDetails {
            owner: self.registry.ownership().owner_of(stored.id),
            created_at: stored.created_at,
            price: state.pricing.price(&stored.name)?,
            expires_at: stored.expires_at,
            metadata_uri: stored.metadata_uri.clone(),
        })
    }

    /// Owner of every minted identifier, in identifier order.
    /// Identifiers whose token has been destroyed are skipped.
    pub fn list_all_owners(&self) -> Vec<Address> {
        let state = self.registry.read_state();
        let ownership = self.registry.ownership();
        state
            .records
            .iter()
            .filter_map(|stored| ownership.owner_of(stored.id))
            .collect()
    }

    fn strip_suffix<'a>(&self, name_with_suffix: &'a str) -> Result<&'a str> {
        let suffix = self.suffix();
        if name_with_suffix.len() <= suffix.len() {
            return Err(RegistryError::validation(format!(
                "'{name_with_suffix}' is not longer than the suffix '{suffix}'"
            )));
        }
        name_with_suffix.strip_suffix(suffix).ok_or_else(|| {
            RegistryError::validation(format!(
                "'{name_with_suffix}' does not end with '{suffix}'"
            ))
        })
    }
}
