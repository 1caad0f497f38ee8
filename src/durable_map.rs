//! DurableIntToMultiIntMap: the seam shared by in-memory and disk-backed
//! int -> set-of-ints maps.
//!
//! Contract
//! - Keys and values are `i32`; `NO_VALUE` (0) is never a valid value. Keys
//!   are hashes, so an implementation may remap key 0 (see `adjust_hash`).
//! - For a fixed key the stored values form a set.
//! - Every method may fail with `MultimapError::Io` in a durable
//!   implementation; in-memory implementations only ever return
//!   `InvalidArgument`. A failed call leaves the map as it was.
//! - `lookup_or_insert` is atomic per key: among concurrent callers that all
//!   find nothing acceptable, the creator runs at most once and every caller
//!   gets the same winning value.
//! - `flush` makes every prior mutation recoverable; `close` and
//!   `close_and_clean` release underlying resources. Implementations with
//!   nothing to persist may treat all three as no-ops.
//!
//! Callbacks are `&mut dyn FnMut` so the trait stays dyn-compatible, and they
//! may run while the implementation holds its lock: they must not call back
//! into the same map.

use crate::error::Result;

/// Decides whether a stored value is the one the caller is looking for.
pub type ValueAcceptor<'a> = dyn FnMut(i32) -> bool + 'a;

/// Produces a fresh value for a key that has no acceptable one; must never
/// return `NO_VALUE`.
pub type ValueCreator<'a> = dyn FnMut(i32) -> i32 + 'a;

/// Receives each (key, value) pair; returns `false` to stop the iteration.
pub type KeyValueProcessor<'a> = dyn FnMut(i32, i32) -> bool + 'a;

pub trait DurableIntToMultiIntMap: Send + Sync {
    /// Adds `(key, value)`; returns `false` if it was already present.
    fn put(&self, key: i32, value: i32) -> Result<bool>;

    fn has(&self, key: i32, value: i32) -> Result<bool>;

    /// First value of `key` accepted by `acceptor`, or `NO_VALUE`.
    fn lookup(&self, key: i32, acceptor: &mut ValueAcceptor<'_>) -> Result<i32>;

    /// First value of `key` accepted by `acceptor`; if there is none, inserts
    /// and returns `creator(key)`. Never returns `NO_VALUE`.
    fn lookup_or_insert(
        &self,
        key: i32,
        acceptor: &mut ValueAcceptor<'_>,
        creator: &mut ValueCreator<'_>,
    ) -> Result<i32>;

    /// Removes `(key, value)`; returns `false` if it was absent.
    fn remove(&self, key: i32, value: i32) -> Result<bool>;

    /// Replaces `old_value` by `new_value` among the values of `key`, keeping
    /// them a set. Returns `false` if `old_value` was absent.
    fn replace(&self, key: i32, old_value: i32, new_value: i32) -> Result<bool>;

    /// Number of alive (key, value) pairs.
    fn size(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool>;

    /// Visits every pair; returns `false` if `processor` stopped early.
    fn for_each(&self, processor: &mut KeyValueProcessor<'_>) -> Result<bool>;

    fn clear(&self) -> Result<()>;

    fn flush(&self) -> Result<()>;

    fn close(&self) -> Result<()>;

    /// Closes and removes whatever the map persisted.
    fn close_and_clean(&self) -> Result<()>;
}
