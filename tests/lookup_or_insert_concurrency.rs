use int_multimap::{DurableIntToMultiIntMap, NonDurableNonParallelIntToMultiIntMap};
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Barrier;

const THREADS: usize = 16;

/// Many threads race to assign an id to the same unseen key: exactly one
/// creator call wins and everybody observes its value.
#[test]
fn creator_runs_once_under_contention() {
    let map = NonDurableNonParallelIntToMultiIntMap::new();
    let next_id = AtomicI32::new(1);
    let creator_calls = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);
    let (map, next_id, creator_calls, barrier) = (&map, &next_id, &creator_calls, &barrier);

    let results: Vec<i32> = crossbeam_utils::thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(move |_| {
                    barrier.wait();
                    map.lookup_or_insert(
                        42,
                        // accept whatever id is already assigned to the key
                        &mut |_| true,
                        &mut |_| {
                            creator_calls.fetch_add(1, Ordering::SeqCst);
                            next_id.fetch_add(1, Ordering::SeqCst)
                        },
                    )
                    .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(results.len(), THREADS);
    assert_eq!(creator_calls.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|&id| id == results[0]));
    assert_eq!(map.size().unwrap(), 1);
}

/// With an acceptor that never accepts, each call is its own window of
/// absence: every call creates, no two callers get the same id, and every
/// created id ends up stored.
#[test]
fn rejecting_acceptor_creates_per_call() {
    let map = NonDurableNonParallelIntToMultiIntMap::new();
    let next_id = AtomicI32::new(1);
    let per_thread = 50;
    let (map, next_id) = (&map, &next_id);

    let mut all: Vec<i32> = crossbeam_utils::thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(move |_| {
                    (0..per_thread)
                        .map(|_| {
                            map.lookup_or_insert(7, &mut |_| false, &mut |_| {
                                next_id.fetch_add(1, Ordering::SeqCst)
                            })
                            .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    })
    .unwrap();

    let total = THREADS * per_thread;
    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), total);
    assert_eq!(map.size().unwrap(), total);
    for id in all {
        assert!(map.has(7, id).unwrap());
    }
}

/// Distinct keys enumerated concurrently each get exactly one id.
#[test]
fn concurrent_enumeration_of_many_keys() {
    let map = NonDurableNonParallelIntToMultiIntMap::new();
    let next_id = AtomicI32::new(1);
    let keys: Vec<i32> = (1..=200).collect();
    let (map, next_id, keys) = (&map, &next_id, &keys);

    crossbeam_utils::thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(move |_| {
                for &k in keys {
                    map.lookup_or_insert(k, &mut |_| true, &mut |_| {
                        next_id.fetch_add(1, Ordering::SeqCst)
                    })
                    .unwrap();
                }
            });
        }
    })
    .unwrap();

    assert_eq!(map.size().unwrap(), keys.len());
    assert_eq!(next_id.load(Ordering::SeqCst) as usize, keys.len() + 1);
}
