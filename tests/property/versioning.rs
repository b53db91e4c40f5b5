// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Stream Versioning
//!
//! Appending batches with the correct expected version always advances the
//! stream by the batch size; any other expected version is rejected without
//! writing.

use proptest::prelude::*;
use uuid::Uuid;

use cim_kanban::{ColumnRemoved, DomainEvent, EventStore, InMemoryEventStore, StoreError};

fn batch(aggregate_id: Uuid, size: usize) -> Vec<DomainEvent> {
    (0..size)
        .map(|_| DomainEvent::new(aggregate_id, ColumnRemoved { column_id: Uuid::now_v7() }))
        .collect()
}

proptest! {
    /// Property: Version is the running sum of batch sizes
    #[test]
    fn prop_version_is_sum_of_batches(sizes in prop::collection::vec(0usize..5, 1..10)) {
        let store = InMemoryEventStore::new();
        let id = Uuid::now_v7();
        let mut expected = 0u64;

        for size in &sizes {
            let version = tokio_test::block_on(
                store.append_to_stream(id, expected, &batch(id, *size))
            ).unwrap();
            expected += *size as u64;
            prop_assert_eq!(version, expected);
        }

        let recorded = tokio_test::block_on(store.current_version(id)).unwrap();
        prop_assert_eq!(recorded, sizes.iter().sum::<usize>() as u64);
    }

    /// Property: Any wrong expected version is rejected and writes nothing
    #[test]
    fn prop_wrong_expected_version_rejected(
        committed in 1usize..6,
        guess in 0u64..12,
    ) {
        prop_assume!(guess != committed as u64);

        let store = InMemoryEventStore::new();
        let id = Uuid::now_v7();
        tokio_test::block_on(store.append_to_stream(id, 0, &batch(id, committed))).unwrap();

        let result = tokio_test::block_on(store.append_to_stream(id, guess, &batch(id, 1)));

        prop_assert_eq!(
            result,
            Err(StoreError::ConcurrentWrite {
                aggregate_id: id,
                expected: guess,
                actual: committed as u64,
            })
        );
        let recorded = tokio_test::block_on(store.current_version(id)).unwrap();
        prop_assert_eq!(recorded, committed as u64);
    }
}
