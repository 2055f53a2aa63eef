#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use marquee_discovery::{InMemoryRegistry, RegistryError};

#[test]
fn concurrent_register_heartbeat_and_lookup() {
    let registry = Arc::new(InMemoryRegistry::new());

    std::thread::scope(|s| {
        for t in 0..8 {
            let registry = &registry;
            s.spawn(move || {
                for i in 0..200 {
                    let id = format!("rating-{t}-{i}");
                    let addr = format!("10.0.{t}.{i}:8082");
                    registry.register_instance(&id, "rating", &addr).unwrap();
                    registry.heartbeat(&id, "rating").unwrap();
                    let live = registry.live_addresses("rating").unwrap();
                    assert!(!live.is_empty());
                    if i % 2 == 0 {
                        registry.deregister_instance(&id, "rating");
                    }
                }
            });
        }
    });

    assert_eq!(registry.instance_count("rating"), 8 * 100);
    assert_eq!(registry.live_addresses("rating").unwrap().len(), 8 * 100);
}

#[test]
fn deregistered_instances_never_come_back_from_heartbeats() {
    let registry = InMemoryRegistry::new();
    registry.register_instance("movie-1", "movie", "10.0.0.1:8083").unwrap();
    registry.deregister_instance("movie-1", "movie");

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..100 {
                    assert!(matches!(
                        registry.heartbeat("movie-1", "movie"),
                        Err(RegistryError::NotRegistered { .. })
                    ));
                }
            });
        }
    });
    assert_eq!(registry.instance_count("movie"), 0);
}
