//! Registry notifications

use namereg_ownership::Address;
use serde::{Deserialize, Serialize};

/// Notification emitted after a committed state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegistryEvent {
    Registered {
        owner: Address,
        name: String,
        expires_at: u64,
    },
    Transferred {
        from: Address,
        to: Address,
        name: String,
    },
    Renewed {
        owner: Address,
        name: String,
        expires_at: u64,
    },
}

impl RegistryEvent {
    /// Bare name the event refers to
    pub fn name(&self) -> &str {
        match self {
            RegistryEvent::Registered { name, .. }
            | RegistryEvent::Transferred { name, .. }
            | RegistryEvent::Renewed { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_is_tagged() {
        let event = RegistryEvent::Renewed {
            owner: Address::new([2u8; 32]),
            name: "alice".into(),
            expires_at: 42,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "renewed");
        assert_eq!(json["name"], "alice");
        assert_eq!(event.name(), "alice");
    }
}
