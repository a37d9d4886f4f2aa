//! Tests for the per-user availability store.

use std::sync::Arc;
use std::thread;

use availability_core::interval::TimeInterval;
use availability_core::store::AvailabilityStore;
use chrono::{TimeZone, Utc};

fn iv(day: u32, start_hour: u32, end_hour: u32) -> TimeInterval {
    TimeInterval::new(
        Utc.with_ymd_and_hms(2026, 3, day, start_hour, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, day, end_hour, 0, 0).unwrap(),
    )
    .unwrap()
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

#[test]
fn insert_twice_is_idempotent() {
    let store = AvailabilityStore::new();
    assert!(store.insert("alice", iv(16, 9, 11)));
    assert!(!store.insert("alice", iv(16, 9, 11)));
    assert_eq!(store.snapshot("alice"), vec![iv(16, 9, 11)]);
}

#[test]
fn inserts_out_of_order_are_kept_sorted() {
    let store = AvailabilityStore::new();
    store.insert("alice", iv(18, 9, 10));
    store.insert("alice", iv(16, 14, 15));
    store.insert("alice", iv(16, 9, 12));
    store.insert("alice", iv(16, 9, 10));

    assert_eq!(
        store.snapshot("alice"),
        vec![iv(16, 9, 10), iv(16, 9, 12), iv(16, 14, 15), iv(18, 9, 10)]
    );
}

#[test]
fn overlapping_distinct_intervals_are_not_merged() {
    let store = AvailabilityStore::new();
    store.insert("alice", iv(16, 9, 12));
    store.insert("alice", iv(16, 10, 13));
    assert_eq!(store.len("alice"), 2);
}

#[test]
fn users_are_isolated() {
    let store = AvailabilityStore::new();
    store.insert("alice", iv(16, 9, 10));
    assert!(store.snapshot("bob").is_empty());
    assert_eq!(store.user_ids(), vec!["alice".to_string()]);
}

#[test]
fn reads_do_not_create_users() {
    let store = AvailabilityStore::new();
    assert!(store.future_view("ghost", now()).is_empty());
    assert_eq!(store.len("ghost"), 0);
    assert!(store.user_ids().is_empty());
}

#[test]
fn remove_exact_match() {
    let store = AvailabilityStore::new();
    store.insert("alice", iv(16, 9, 10));
    store.insert("alice", iv(17, 9, 10));

    store.remove("alice", &iv(16, 9, 10)).unwrap();
    assert_eq!(store.snapshot("alice"), vec![iv(17, 9, 10)]);
}

#[test]
fn remove_requires_both_endpoints_to_match() {
    let store = AvailabilityStore::new();
    store.insert("alice", iv(16, 9, 10));
    let err = store.remove("alice", &iv(16, 9, 11)).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(store.len("alice"), 1);
}

#[test]
fn remove_for_unknown_user_is_not_found() {
    let store = AvailabilityStore::new();
    let err = store.remove("ghost", &iv(16, 9, 10)).unwrap_err();
    assert!(err.is_not_found());
    assert!(store.user_ids().is_empty());
}

#[test]
fn replace_moves_slot_and_resorts() {
    let store = AvailabilityStore::new();
    store.insert("alice", iv(16, 9, 10));
    store.insert("alice", iv(17, 9, 10));

    store.replace("alice", &iv(16, 9, 10), iv(18, 12, 14)).unwrap();
    assert_eq!(store.snapshot("alice"), vec![iv(17, 9, 10), iv(18, 12, 14)]);
}

#[test]
fn replace_with_missing_old_leaves_store_unchanged() {
    let store = AvailabilityStore::new();
    store.insert("alice", iv(16, 9, 10));
    let before = store.snapshot("alice");

    let err = store.replace("alice", &iv(20, 9, 10), iv(21, 9, 10)).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(store.snapshot("alice"), before);
}

#[test]
fn replace_onto_existing_interval_keeps_set_semantics() {
    let store = AvailabilityStore::new();
    store.insert("alice", iv(16, 9, 10));
    store.insert("alice", iv(17, 9, 10));

    store.replace("alice", &iv(16, 9, 10), iv(17, 9, 10)).unwrap();
    assert_eq!(store.snapshot("alice"), vec![iv(17, 9, 10)]);
}

#[test]
fn future_view_filters_on_start_only() {
    let store = AvailabilityStore::new();
    let past = iv(9, 9, 10);
    // Starts before now (12:00 on the 10th) but ends after it.
    let straddling = iv(10, 11, 14);
    let future = iv(16, 9, 10);
    store.insert_all("alice", &[future, past, straddling]);

    assert_eq!(store.future_view("alice", now()), vec![future]);
    // Nothing is purged.
    assert_eq!(store.len("alice"), 3);
}

#[test]
fn insert_all_counts_new_intervals() {
    let store = AvailabilityStore::new();
    store.insert("alice", iv(16, 9, 10));
    let inserted = store.insert_all("alice", &[iv(16, 9, 10), iv(17, 9, 10), iv(17, 9, 10)]);
    assert_eq!(inserted, 1);
    assert_eq!(store.len("alice"), 2);
}

#[test]
fn concurrent_inserts_for_many_users_stay_sorted() {
    let store = Arc::new(AvailabilityStore::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let user = format!("user{}", t % 2);
                // `day` counts down so inserts arrive out of order.
                for day in (1..=28).rev() {
                    store.insert(&user, iv(day, 9, 10));
                    store.insert(&user, iv(day, (t % 4) + 10, 15));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for user in ["user0", "user1"] {
        let intervals = store.snapshot(user);
        assert!(intervals.windows(2).all(|w| w[0] < w[1]), "{user} not strictly ascending");
        // Per user: 28 shared morning slots plus 2 afternoon variants per day.
        assert_eq!(intervals.len(), 28 * 3);
    }
}

#[test]
fn readers_never_see_partial_mutations_of_one_user() {
    let store = AvailabilityStore::new();
    let base: Vec<TimeInterval> = (1..=20).map(|day| iv(day, 9, 10)).collect();
    let (slot_a, slot_b) = (iv(25, 9, 10), iv(26, 9, 10));
    store.insert_all("shared", &base);
    store.insert("shared", slot_a);
    let floor = base.len() + 1;

    thread::scope(|s| {
        // Toggles between two slots; an even number of swaps ends back on `slot_a`.
        s.spawn(|| {
            for _ in 0..500 {
                store.replace("shared", &slot_a, slot_b).unwrap();
                store.replace("shared", &slot_b, slot_a).unwrap();
            }
        });
        s.spawn(|| {
            for day in (1..=28).rev() {
                store.insert("shared", iv(day, 12, 13));
            }
        });
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..500 {
                    let seen = store.snapshot("shared");
                    assert!(seen.windows(2).all(|w| w[0] < w[1]), "observed unsorted state");
                    assert!(seen.len() >= floor, "observed a replace half-done");
                    let has_a = seen.binary_search(&slot_a).is_ok();
                    let has_b = seen.binary_search(&slot_b).is_ok();
                    assert!(has_a != has_b, "expected exactly one of the swapped slots");
                }
            });
        }
    });

    assert_eq!(store.len("shared"), floor + 28);
    assert!(store.contains("shared", &slot_a));
}

#[test]
fn concurrent_removes_of_same_slot_succeed_once() {
    let store = AvailabilityStore::new();
    store.insert("shared", iv(16, 9, 10));

    let successes: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| store.remove("shared", &iv(16, 9, 10)).is_ok()))
            .collect();
        handles.into_iter().map(|h| usize::from(h.join().unwrap())).sum()
    });

    assert_eq!(successes, 1);
    assert_eq!(store.len("shared"), 0);
}
