//! int-multimap: an `i32` -> set-of-`i32` map for hash-based id
//! enumerators, plus the contract that lets in-memory and disk-backed
//! versions of it be used interchangeably.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: map a content hash to the one or more ids already assigned for
//!   it. Hash collisions are expected; the caller disambiguates them with an
//!   acceptance predicate, the map never compares contents.
//! - Layers:
//!   - `hash_utils`: keeps 0 reserved as `NO_VALUE` by remapping a zero
//!     hash to a fixed non-zero stand-in.
//!   - `Int2IntMultimap`: open-addressing table with linear probing,
//!     tombstone deletion and capacity doubling. Unsynchronized.
//!   - `DurableIntToMultiIntMap`: the operation contract (atomicity of
//!     `lookup_or_insert`, lifecycle hooks, error classes).
//!   - `NonDurableNonParallelIntToMultiIntMap`: one `Int2IntMultimap`
//!     behind one coarse lock, implementing the contract.
//!
//! Constraints
//! - Neither keys nor values may be 0 at the table level; the adapter
//!   remaps a 0 key but still rejects a 0 value.
//! - For a fixed key the values are a set: no (key, value) pair is ever
//!   alive twice, including through `replace`.
//! - Growth is triggered by alive values only (`size > capacity *
//!   load_factor`, defaults 16 and 0.4) and always rebuilds into a fresh
//!   table, dropping tombstones. Tombstones alone pushing the filled count
//!   past that threshold cause a rebuild at the same capacity.
//!
//! Concurrency
//! - Every adapter call holds the lock for its full duration, so operations
//!   on one instance are totally ordered. `lookup_or_insert` relies on this:
//!   lookup, creator call and insertion form one critical section, so the
//!   creator runs at most once per absent key.
//! - Callbacks run under the lock. Re-entering the same map from one is a
//!   bug; debug builds panic on it instead of deadlocking.
//!
//! Notes and non-goals
//! - No persistence: `flush`/`close`/`close_and_clean` are no-ops here.
//!   The `Io` error class exists for disk-backed implementations.
//! - No hashing of contents: callers hand in already-computed hashes.
//! - No per-bucket or lock-free concurrency.

pub mod durable_map;
mod error;
pub mod hash_utils;
pub mod int2int_multimap;
mod int2int_multimap_proptest;
pub mod non_durable_map;
mod reentrancy;

// Public surface
pub use durable_map::{DurableIntToMultiIntMap, KeyValueProcessor, ValueAcceptor, ValueCreator};
pub use error::{MultimapError, Result};
pub use hash_utils::{adjust_hash, NO_VALUE};
pub use int2int_multimap::Int2IntMultimap;
pub use non_durable_map::NonDurableNonParallelIntToMultiIntMap;
