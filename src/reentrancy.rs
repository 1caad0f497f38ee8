//! Debug-only reentrancy guard for lock-holding maps.
//!
//! Callbacks (acceptors, creators, processors) run while a map's lock is
//! held. A callback that calls back into the same map would block forever on
//! the non-reentrant lock. In debug builds the tracker remembers which thread
//! holds the lock and panics on a nested entry from that thread instead. In
//! release builds this compiles to a zero-cost no-op.

#[cfg(debug_assertions)]
use core::sync::atomic::{AtomicU64, Ordering};
#[cfg(not(debug_assertions))]
use core::marker::PhantomData;

#[cfg(debug_assertions)]
const NOBODY: u64 = 0;

#[cfg(debug_assertions)]
fn current_thread_token() -> u64 {
    static NEXT_TOKEN: AtomicU64 = AtomicU64::new(NOBODY + 1);
    std::thread_local! {
        static TOKEN: u64 = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
    }
    TOKEN.with(|t| *t)
}

/// Per-instance tracker. Call `check()` before taking the lock and hold the
/// guard returned by `enter()` while the lock is held.
#[derive(Debug)]
pub struct DebugReentrancy {
    #[cfg(debug_assertions)]
    holder: AtomicU64,
}

impl DebugReentrancy {
    /// Const so it can be a field default.
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            holder: AtomicU64::new(NOBODY),
        }
    }

    /// Panics in debug builds if the calling thread already holds the lock.
    #[inline]
    pub fn check(&self) {
        #[cfg(debug_assertions)]
        {
            // Only this thread ever stores its own token, so a relaxed load
            // observes it reliably.
            let me = current_thread_token();
            assert!(
                self.holder.load(Ordering::Relaxed) != me,
                "reentrancy detected: a callback re-entered the map while its lock was held"
            );
        }
    }

    /// Marks the calling thread as the lock holder until the guard drops.
    /// Must be called with the lock held.
    #[inline]
    pub fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            self.holder.store(current_thread_token(), Ordering::Relaxed);
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ReentrancyGuard { _z: PhantomData };
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `DebugReentrancy::enter`; drop it before unlocking.
pub struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl<'a> Drop for ReentrancyGuard<'a> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            self.owner.holder.store(NOBODY, Ordering::Relaxed);
        }
    }
}
