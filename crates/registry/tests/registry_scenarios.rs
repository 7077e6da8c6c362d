use namereg_registry::{
    Address, Amount, InMemoryFunds, InMemoryOwnershipLedger, ManualClock, NameRegistry,
    NameResolver, RegistryConfig, RegistryError, RegistryEvent, SECONDS_PER_YEAR,
};
use proptest::prelude::*;
use std::sync::Arc;

const BASE: Amount = 10_000_000_000_000_000; // 0.01 units
const START: u64 = 1_700_000_000;

fn addr(b: u8) -> Address {
    Address::new([b; 32])
}

fn resolver() -> NameResolver {
    let registry = NameRegistry::new(
        RegistryConfig::with_admin(addr(0xAD)),
        Arc::new(InMemoryOwnershipLedger::new()),
        Arc::new(InMemoryFunds::new()),
        Arc::new(ManualClock::new(START)),
    )
    .expect("valid config");
    NameResolver::new(Arc::new(registry))
}

#[test]
fn pricing_scenario() {
    let resolver = resolver();
    let registry = resolver.registry();

    assert_eq!(registry.price("abc").unwrap(), 2 * BASE);
    assert_eq!(registry.price("ab1").unwrap(), BASE);
    assert_eq!(registry.price("alice").unwrap(), 3 * BASE / 2);
    assert!(matches!(
        registry.price("a1"),
        Err(RegistryError::Validation { .. })
    ));
    assert_eq!(
        registry.extension_price("alice", 5).unwrap(),
        registry.price("alice").unwrap()
    );
}

#[test]
fn same_name_twice_is_rejected_for_anyone() {
    let resolver = resolver();
    let registry = resolver.registry();
    registry.register("alice", "", BASE * 2, addr(1)).unwrap();

    for requester in [addr(1), addr(2)] {
        let err = registry
            .register("alice", "", BASE * 2, requester)
            .unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered { ref name } if name == "alice"));
    }
}

#[test]
fn owner_cannot_register_two_names_but_can_receive_one() {
    let resolver = resolver();
    let registry = resolver.registry();
    registry.register("bob", "", BASE * 2, addr(1)).unwrap();

    assert!(matches!(
        registry.register("carol", "", BASE * 2, addr(1)),
        Err(RegistryError::DuplicateOwner { .. })
    ));

    registry.register("carol", "", BASE * 2, addr(2)).unwrap();
    let carol = registry.record("carol").unwrap();
    registry.transfer(carol.id, addr(1), addr(2)).unwrap();

    assert_eq!(resolver.names_of(&addr(1)), vec!["bob", "carol"]);
    assert_eq!(resolver.resolve_forward("carol.name").unwrap(), Some(addr(1)));
}

#[test]
fn full_lifecycle_emits_events_in_order() {
    let resolver = resolver();
    let registry = resolver.registry();

    registry.register("alice", "ipfs://a", BASE * 2, addr(1)).unwrap();
    registry.transfer(1, addr(2), addr(1)).unwrap();
    let expires_at = registry.extend("alice", 2, BASE * 2, addr(2)).unwrap();
    assert_eq!(expires_at, START + 3 * SECONDS_PER_YEAR);

    let events = registry.events();
    assert_eq!(
        events,
        vec![
            RegistryEvent::Registered {
                owner: addr(1),
                name: "alice".into(),
                expires_at: START + SECONDS_PER_YEAR,
            },
            RegistryEvent::Transferred {
                from: addr(1),
                to: addr(2),
                name: "alice".into(),
            },
            RegistryEvent::Renewed {
                owner: addr(2),
                name: "alice".into(),
                expires_at,
            },
        ]
    );
}

#[test]
fn subscriber_sees_registration() {
    let resolver = resolver();
    let registry = resolver.registry();
    let mut rx = registry.subscribe();

    registry.register("alice", "", BASE * 2, addr(1)).unwrap();

    let event = tokio_test::block_on(rx.recv()).expect("event delivered");
    assert_eq!(
        event,
        RegistryEvent::Registered {
            owner: addr(1),
            name: "alice".into(),
            expires_at: START + SECONDS_PER_YEAR,
        }
    );
}

#[test]
fn rejected_operations_leave_no_trace() {
    let resolver = resolver();
    let registry = resolver.registry();
    registry.register("alice", "", BASE * 2, addr(1)).unwrap();
    let before = registry.record("alice").unwrap();
    let balance = registry.balance();

    assert!(registry.register("alice", "", BASE * 2, addr(3)).is_err());
    assert!(registry.register("zed", "", 1, addr(3)).is_err());
    assert!(registry.transfer(1, addr(3), addr(3)).is_err());
    assert!(registry.extend("alice", 1, 1, addr(1)).is_err());
    assert!(registry.set_metadata(1, "x", addr(1)).is_err());

    assert_eq!(registry.record("alice").unwrap(), before);
    assert_eq!(registry.balance(), balance);
    assert_eq!(registry.total_registered(), 1);
    assert_eq!(registry.events().len(), 1);
}

proptest! {
    #[test]
    fn reverse_then_forward_round_trips(
        names in prop::collection::btree_set("[a-z]{3,12}", 1..12),
    ) {
        let resolver = resolver();
        let registry = resolver.registry();
        let owners: Vec<Address> = (1..=names.len() as u8).map(addr).collect();

        for (name, owner) in names.iter().zip(&owners) {
            registry.register(name, "", BASE * 2, *owner).unwrap();
        }

        for owner in &owners {
            let name = resolver.resolve_reverse(owner).unwrap();
            prop_assert_eq!(resolver.resolve_forward(&name).unwrap(), Some(*owner));
        }
        prop_assert_eq!(resolver.list_all_owners(), owners);
    }

    #[test]
    fn price_halves_per_digit(letters in "[a-z]{4,10}", digits in 0usize..8) {
        let resolver = resolver();
        let registry = resolver.registry();
        let name = format!("{letters}{}", "7".repeat(digits));
        let expected = (0..digits).fold(3 * BASE / 2, |p, _| p / 2);
        prop_assert_eq!(registry.price(&name).unwrap(), expected);
    }
}
