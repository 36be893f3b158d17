use std::sync::{Mutex, MutexGuard, PoisonError};

/// Extension trait for `Mutex` that recovers from lock poisoning.
///
/// Shared state in this workspace (call histories in test doubles) stays
/// usable after a panicking thread, so the poison flag is simply discarded.
pub trait IgnoreLock<T> {
    /// Locks the mutex, returning the guard even if the lock is poisoned.
    fn lock_ignore_poison(&self) -> MutexGuard<'_, T>;
}

impl<T> IgnoreLock<T> for Mutex<T> {
    fn lock_ignore_poison(&self) -> MutexGuard<'_, T> {
        self.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
