//! NonDurableNonParallelIntToMultiIntMap: the in-memory implementation of
//! the durable-map contract.
//!
//! One `Int2IntMultimap` behind one coarse lock. Every call holds the lock
//! for its whole duration, which is what makes `lookup_or_insert` atomic:
//! the lookup, the creator call and the insertion happen in one critical
//! section. Nothing is persisted, so `flush`/`close`/`close_and_clean` are
//! no-ops.

use crate::durable_map::{
    DurableIntToMultiIntMap, KeyValueProcessor, ValueAcceptor, ValueCreator,
};
use crate::error::{MultimapError, Result};
use crate::hash_utils::{adjust_hash, NO_VALUE};
use crate::int2int_multimap::Int2IntMultimap;
use crate::reentrancy::DebugReentrancy;
use parking_lot::Mutex;
use tracing::trace;

#[derive(Debug, Default)]
pub struct NonDurableNonParallelIntToMultiIntMap {
    map: Mutex<Int2IntMultimap>,
    reentrancy: DebugReentrancy,
}

impl NonDurableNonParallelIntToMultiIntMap {
    pub fn new() -> Self {
        Self::with_map(Int2IntMultimap::new())
    }

    /// Wraps a caller-configured table.
    pub fn with_map(map: Int2IntMultimap) -> Self {
        Self {
            map: Mutex::new(map),
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Current capacity of the underlying table.
    pub fn capacity(&self) -> usize {
        self.locked(|map| map.capacity())
    }

    pub fn into_inner(self) -> Int2IntMultimap {
        self.map.into_inner()
    }

    fn locked<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Int2IntMultimap) -> R,
    {
        self.reentrancy.check();
        let mut map = self.map.lock();
        let _g = self.reentrancy.enter();
        f(&mut map)
    }
}

fn first_accepted(
    map: &Int2IntMultimap,
    key: i32,
    acceptor: &mut ValueAcceptor<'_>,
) -> Result<i32> {
    let mut found = NO_VALUE;
    map.lookup(key, |value| {
        if acceptor(value) {
            found = value;
            false
        } else {
            true
        }
    })?;
    Ok(found)
}

impl DurableIntToMultiIntMap for NonDurableNonParallelIntToMultiIntMap {
    fn put(&self, key: i32, value: i32) -> Result<bool> {
        let key = adjust_hash(key);
        self.locked(|map| map.put(key, value))
    }

    fn has(&self, key: i32, value: i32) -> Result<bool> {
        let key = adjust_hash(key);
        self.locked(|map| map.has(key, value))
    }

    fn lookup(&self, key: i32, acceptor: &mut ValueAcceptor<'_>) -> Result<i32> {
        let key = adjust_hash(key);
        self.locked(|map| first_accepted(map, key, acceptor))
    }

    fn lookup_or_insert(
        &self,
        key: i32,
        acceptor: &mut ValueAcceptor<'_>,
        creator: &mut ValueCreator<'_>,
    ) -> Result<i32> {
        let adjusted = adjust_hash(key);
        self.locked(|map| {
            let found = first_accepted(map, adjusted, acceptor)?;
            if found != NO_VALUE {
                return Ok(found);
            }
            let value = creator(key);
            if value == NO_VALUE {
                return Err(MultimapError::invalid(
                    "creator",
                    "returned NO_VALUE as a new value",
                ));
            }
            let inserted = map.put(adjusted, value)?;
            trace!(key, value, inserted, "lookup_or_insert created a new value");
            Ok(value)
        })
    }

    fn remove(&self, key: i32, value: i32) -> Result<bool> {
        let key = adjust_hash(key);
        self.locked(|map| map.remove(key, value))
    }

    fn replace(&self, key: i32, old_value: i32, new_value: i32) -> Result<bool> {
        let key = adjust_hash(key);
        self.locked(|map| map.replace(key, old_value, new_value))
    }

    fn size(&self) -> Result<usize> {
        Ok(self.locked(|map| map.size()))
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.locked(|map| map.is_empty()))
    }

    fn for_each(&self, processor: &mut KeyValueProcessor<'_>) -> Result<bool> {
        Ok(self.locked(|map| map.for_each(|key, value| processor(key, value))))
    }

    fn clear(&self) -> Result<()> {
        self.locked(|map| map.clear());
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn close_and_clean(&self) -> Result<()> {
        Ok(())
    }
}
