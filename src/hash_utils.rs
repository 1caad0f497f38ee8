//! Keeps `0` reserved as "no value" for hash-keyed maps.
//!
//! A hash identifies a bucket, not a unique value: callers already resolve
//! collisions with their own acceptance test. Substituting a fixed non-zero
//! stand-in for a zero hash therefore only adds one more collision.

/// Reserved sentinel: never a valid key or value, returned by lookups that
/// accepted nothing.
pub const NO_VALUE: i32 = 0;

/// What a hash of `0` is remapped to.
pub const ZERO_HASH_SUBSTITUTE: i32 = -1;

/// Returns `hash` unchanged unless it equals `NO_VALUE`.
#[inline]
pub fn adjust_hash(hash: i32) -> i32 {
    if hash == NO_VALUE {
        ZERO_HASH_SUBSTITUTE
    } else {
        hash
    }
}
