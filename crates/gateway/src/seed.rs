//! Startup seeding of registrations from a JSON file

use anyhow::{Context, Result};
use namereg_registry::{Address, NameRegistry};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// One registration to apply at startup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedEntry {
    pub name: String,
    pub owner: Address,
    #[serde(default)]
    pub metadata_uri: String,
}

pub fn load_seed(path: &Path) -> Result<Vec<SeedEntry>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse seed file {}", path.display()))
}

/// Register every entry on behalf of its owner, paying exactly the current
/// price. Entries the registry rejects are logged and skipped.
/// Returns the number of names registered.
pub fn apply_seed(registry: &NameRegistry, entries: &[SeedEntry]) -> usize {
    let mut applied = 0;
    for entry in entries {
        let result = registry.price(&entry.name).and_then(|price| {
            registry.register(&entry.name, entry.metadata_uri.clone(), price, entry.owner)
        });
        match result {
            Ok(record) => {
                info!(name = %record.name, id = record.id, owner = %entry.owner, "seeded name");
                applied += 1;
            }
            Err(error) => {
                warn!(name = %entry.name, owner = %entry.owner, %error, "skipping seed entry");
            }
        }
    }
    applied
}
