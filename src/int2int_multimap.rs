//! Int2IntMultimap: open-addressing table mapping an `i32` key to a set of
//! `i32` values, with tombstone deletion and capacity doubling.
//!
//! Slots are an explicit tagged enum rather than two sentinel-encoded ints:
//! - `Empty`: never written since the table was last built.
//!   Terminates every probe sequence.
//! - `Tombstone`: a pair lived here and was removed. Skipped by probes, reused
//!   by insertions.
//! - `Occupied`: a live (key, value) pair; both halves are non-zero by type.
//!
//! Probing is linear from `|key| mod capacity`, wrapping, for at most
//! `capacity` steps. The same (key, value) pair is never alive twice.
//!
//! After every insertion, alive plus tombstoned slots stay within
//! `capacity * load_factor`: the table doubles when alive pairs exceed it and
//! is rebuilt at the same capacity when tombstones do. Every probe sequence
//! therefore ends at an `Empty` slot.

use crate::error::{MultimapError, Result};
use core::fmt;
use core::num::NonZeroI32;
use tracing::debug;

pub const DEFAULT_CAPACITY: usize = 16;
pub const DEFAULT_LOAD_FACTOR: f32 = 0.4;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
enum Slot {
    #[default]
    Empty,
    Tombstone,
    Occupied { key: NonZeroI32, value: NonZeroI32 },
}

/// Outcome of probing for an insertion point.
enum InsertProbe {
    /// The exact pair is already alive.
    Present,
    /// Insert at `index`; `fresh` is true when the slot was `Empty`.
    Vacant { index: usize, fresh: bool },
}

#[inline]
fn home_slot(key: NonZeroI32, capacity: usize) -> usize {
    key.get().unsigned_abs() as usize % capacity
}

#[inline]
fn probe_sequence(key: NonZeroI32, capacity: usize) -> impl Iterator<Item = usize> {
    let start = home_slot(key, capacity);
    (0..capacity).map(move |probe| (start + probe) % capacity)
}

fn probe_for_insert(table: &[Slot], key: NonZeroI32, value: NonZeroI32) -> InsertProbe {
    let mut first_tombstone = None;
    for index in probe_sequence(key, table.len()) {
        match table[index] {
            Slot::Occupied { key: k, value: v } if k == key && v == value => {
                return InsertProbe::Present;
            }
            Slot::Occupied { .. } => {}
            Slot::Tombstone => {
                if first_tombstone.is_none() {
                    first_tombstone = Some(index);
                }
            }
            Slot::Empty => {
                return match first_tombstone {
                    Some(index) => InsertProbe::Vacant { index, fresh: false },
                    None => InsertProbe::Vacant { index, fresh: true },
                };
            }
        }
    }
    unreachable!("int2int multimap has no empty slot left")
}

#[inline]
fn check_not_no_value(param: &'static str, value: i32) -> Result<NonZeroI32> {
    NonZeroI32::new(value).ok_or_else(|| MultimapError::no_value(param))
}

/// Open-addressing int -> set-of-ints map.
///
/// Not synchronized; wrap it (see `NonDurableNonParallelIntToMultiIntMap`)
/// for shared use.
pub struct Int2IntMultimap {
    table: Box<[Slot]>,
    load_factor: f32,
    alive_values: usize,
    // alive + tombstones
    filled_slots: usize,
}

impl Int2IntMultimap {
    /// Creates a map with `DEFAULT_CAPACITY` and `DEFAULT_LOAD_FACTOR`.
    pub fn new() -> Self {
        Self::allocate(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_load_factor(capacity, DEFAULT_LOAD_FACTOR)
    }

    /// Creates a map with room for `capacity` slots (rounded up to a power of
    /// two) that doubles once `size() > capacity() * load_factor`.
    ///
    /// Fails with `InvalidArgument` if `capacity` is zero or `load_factor` is
    /// not in `(0, 1)`.
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Result<Self> {
        if capacity == 0 {
            return Err(MultimapError::invalid("capacity", "must be at least 1"));
        }
        let capacity = capacity.checked_next_power_of_two().ok_or_else(|| {
            MultimapError::invalid("capacity", format!("{} is too large", capacity))
        })?;
        if !(load_factor > 0.0 && load_factor < 1.0) {
            return Err(MultimapError::invalid(
                "load_factor",
                format!("{} is not in (0, 1)", load_factor),
            ));
        }
        Ok(Self::allocate(capacity, load_factor))
    }

    fn allocate(capacity: usize, load_factor: f32) -> Self {
        Self {
            table: vec![Slot::Empty; capacity].into_boxed_slice(),
            load_factor,
            alive_values: 0,
            filled_slots: 0,
        }
    }

    /// Number of alive (key, value) pairs.
    pub fn size(&self) -> usize {
        self.alive_values
    }

    pub fn is_empty(&self) -> bool {
        self.alive_values == 0
    }

    /// Number of slots in the table.
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    /// Bytes held by the slot storage.
    pub fn size_in_bytes(&self) -> usize {
        self.table.len() * core::mem::size_of::<Slot>()
    }

    /// Alive plus tombstoned slots.
    pub fn filled_slots(&self) -> usize {
        self.filled_slots
    }

    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Inserts `(key, value)` unless already present.
    ///
    /// Returns `true` iff the pair was actually added. Grows the table when
    /// the alive count exceeds the load factor, and drops tombstones when they
    /// push the filled count past it.
    pub fn put(&mut self, key: i32, value: i32) -> Result<bool> {
        let key = check_not_no_value("key", key)?;
        let value = check_not_no_value("value", value)?;

        match probe_for_insert(&self.table, key, value) {
            InsertProbe::Present => return Ok(false),
            InsertProbe::Vacant { index, fresh } => self.occupy(index, fresh, key, value),
        }

        if self.over_threshold(self.alive_values) {
            self.grow();
        } else if self.over_threshold(self.filled_slots) {
            self.compact();
        }
        Ok(true)
    }

    /// Whether `(key, value)` is alive.
    pub fn has(&self, key: i32, value: i32) -> Result<bool> {
        let key = check_not_no_value("key", key)?;
        let value = check_not_no_value("value", value)?;
        Ok(self.find_slot(key, value).is_some())
    }

    /// Feeds every value stored under `key` to `predicate`, in probe order.
    ///
    /// Returns `false` as soon as `predicate` returns `false`, `true` once the
    /// probe chain is exhausted.
    pub fn lookup<F>(&self, key: i32, mut predicate: F) -> Result<bool>
    where
        F: FnMut(i32) -> bool,
    {
        let key = check_not_no_value("key", key)?;
        for index in probe_sequence(key, self.capacity()) {
            match self.table[index] {
                Slot::Occupied { key: k, value } if k == key => {
                    if !predicate(value.get()) {
                        return Ok(false);
                    }
                }
                Slot::Empty => break,
                _ => {}
            }
        }
        Ok(true)
    }

    /// Tombstones `(key, value)`. Returns `false` if the pair was absent.
    pub fn remove(&mut self, key: i32, value: i32) -> Result<bool> {
        let key = check_not_no_value("key", key)?;
        let value = check_not_no_value("value", value)?;
        match self.find_slot(key, value) {
            Some(index) => {
                self.bury(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replaces `old_value` with `new_value` among the values of `key`.
    ///
    /// If `new_value` is already stored for `key`, the `old_value` slot is
    /// removed instead, so the values stay a set. Returns `false` (and
    /// changes nothing) if `old_value` is not stored for `key`.
    pub fn replace(&mut self, key: i32, old_value: i32, new_value: i32) -> Result<bool> {
        let key = check_not_no_value("key", key)?;
        let old_value = check_not_no_value("old_value", old_value)?;
        let new_value = check_not_no_value("new_value", new_value)?;

        // Both slots must be known before deciding how to mutate.
        let mut old_index = None;
        let mut new_index = None;
        for index in probe_sequence(key, self.capacity()) {
            match self.table[index] {
                Slot::Occupied { key: k, value } if k == key => {
                    if value == old_value {
                        old_index = Some(index);
                    } else if value == new_value {
                        new_index = Some(index);
                    }
                }
                Slot::Empty => break,
                _ => {}
            }
        }

        let Some(old_index) = old_index else {
            return Ok(false);
        };
        if new_index.is_some() {
            self.bury(old_index);
        } else {
            self.table[old_index] = Slot::Occupied {
                key,
                value: new_value,
            };
        }
        Ok(true)
    }

    /// Calls `processor(key, value)` for every alive pair in storage order.
    ///
    /// Returns `false` if the processor stopped the iteration early.
    pub fn for_each<F>(&self, mut processor: F) -> bool
    where
        F: FnMut(i32, i32) -> bool,
    {
        self.iter().all(|(key, value)| processor(key, value))
    }

    /// Iterator over alive pairs in storage order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: self.table.iter(),
            remaining: self.alive_values,
        }
    }

    /// Drops every pair and tombstone; keeps the current capacity.
    pub fn clear(&mut self) {
        self.table.fill(Slot::Empty);
        self.alive_values = 0;
        self.filled_slots = 0;
    }

    fn find_slot(&self, key: NonZeroI32, value: NonZeroI32) -> Option<usize> {
        for index in probe_sequence(key, self.capacity()) {
            match self.table[index] {
                Slot::Occupied { key: k, value: v } if k == key && v == value => {
                    return Some(index);
                }
                Slot::Empty => return None,
                _ => {}
            }
        }
        None
    }

    fn occupy(&mut self, index: usize, fresh: bool, key: NonZeroI32, value: NonZeroI32) {
        debug_assert!(!matches!(self.table[index], Slot::Occupied { .. }));
        self.table[index] = Slot::Occupied { key, value };
        self.alive_values += 1;
        if fresh {
            self.filled_slots += 1;
        }
        debug_assert!(self.alive_values <= self.filled_slots);
        debug_assert!(self.filled_slots <= self.capacity());
    }

    fn bury(&mut self, index: usize) {
        debug_assert!(matches!(self.table[index], Slot::Occupied { .. }));
        self.table[index] = Slot::Tombstone;
        self.alive_values -= 1;
    }

    fn over_threshold(&self, slots: usize) -> bool {
        (slots as f64) > (self.capacity() as f64) * f64::from(self.load_factor)
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity() * 2;
        debug!(
            old_capacity = self.capacity(),
            new_capacity,
            alive = self.alive_values,
            "growing int2int multimap"
        );
        self.rebuild(new_capacity);
    }

    fn compact(&mut self) {
        debug!(
            capacity = self.capacity(),
            alive = self.alive_values,
            tombstones = self.filled_slots - self.alive_values,
            "dropping tombstones from int2int multimap"
        );
        self.rebuild(self.capacity());
    }

    // Builds a tombstone-free table from the alive pairs, then swaps it in.
    fn rebuild(&mut self, capacity: usize) {
        let mut table = vec![Slot::Empty; capacity].into_boxed_slice();
        for slot in self.table.iter() {
            if let Slot::Occupied { key, value } = *slot {
                let InsertProbe::Vacant { index, .. } = probe_for_insert(&table, key, value) else {
                    unreachable!("alive pairs are distinct");
                };
                table[index] = Slot::Occupied { key, value };
            }
        }
        self.table = table;
        self.filled_slots = self.alive_values;
    }
}

impl Default for Int2IntMultimap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Int2IntMultimap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Int2IntMultimap")
            .field("size", &self.alive_values)
            .field("filled_slots", &self.filled_slots)
            .field("capacity", &self.capacity())
            .field("load_factor", &self.load_factor)
            .finish()
    }
}

/// Iterator over alive `(key, value)` pairs of an `Int2IntMultimap`.
pub struct Iter<'a> {
    slots: core::slice::Iter<'a, Slot>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (i32, i32);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied { key, value } = *slot {
                self.remaining -= 1;
                return Some((key.get(), value.get()));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Int2IntMultimap {
    type Item = (i32, i32);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
