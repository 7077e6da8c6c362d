use namereg_registry::{
    Address, InMemoryFunds, InMemoryOwnershipLedger, NameRegistry, NameResolver, OwnershipLedger,
    RegistryConfig, RegistryError, SystemClock,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn addr(b: u8) -> Address {
    Address::new([b; 32])
}

fn registry() -> (Arc<NameRegistry>, Arc<InMemoryOwnershipLedger>) {
    let ownership = Arc::new(InMemoryOwnershipLedger::new());
    let registry = NameRegistry::new(
        RegistryConfig {
            base_price: 10,
            ..Default::default()
        },
        ownership.clone(),
        Arc::new(InMemoryFunds::new()),
        Arc::new(SystemClock),
    )
    .unwrap();
    (Arc::new(registry), ownership)
}

#[test]
fn racing_registrations_of_one_name_have_a_single_winner() {
    let (registry, _) = registry();

    let handles: Vec<_> = (1..=16u8)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || registry.register("contested", "", 100, addr(i)))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|e| matches!(
        e,
        RegistryError::AlreadyRegistered { .. }
    )));
    assert_eq!(registry.total_registered(), 1);
}

#[test]
fn parallel_registrations_get_dense_unique_identifiers() {
    let (registry, ownership) = registry();

    let handles: Vec<_> = (1..=32u8)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || {
                registry
                    .register(&format!("name{i:03}"), "", 100, addr(i))
                    .unwrap()
                    .id
            })
        })
        .collect();

    let ids: HashSet<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(ids, (1..=32).collect::<HashSet<u64>>());
    for id in 1..=32 {
        assert!(ownership.owner_of(id).is_some());
    }
}

#[test]
fn readers_never_see_half_applied_transfers() {
    let (registry, _) = registry();
    registry.register("alice", "", 100, addr(1)).unwrap();
    let resolver = NameResolver::new(registry.clone());

    let writer = {
        let registry = registry.clone();
        thread::spawn(move || {
            for i in 0..200 {
                let (from, to) = if i % 2 == 0 {
                    (addr(1), addr(2))
                } else {
                    (addr(2), addr(1))
                };
                registry.transfer(1, to, from).unwrap();
            }
        })
    };

    for _ in 0..500 {
        let owner = resolver.resolve_forward("alice.name").unwrap().unwrap();
        let name = resolver.resolve_reverse(&owner);
        // The owner may have moved on since the forward lookup.
        if let Some(name) = name {
            assert_eq!(name, "alice.name");
        }
        assert_eq!(resolver.list_all_owners().len(), 1);
    }

    writer.join().unwrap();
}
