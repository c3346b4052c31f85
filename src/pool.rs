//! Free-list pool for per-request state.
//!
//! Contexts carry several maps and buffers, so allocating one per request
//! is wasteful. The pool hands out recycled values through a scoped
//! [`Pooled`] guard; the guard's `Drop` impl resets the value and returns
//! it to the free list on every exit path, including panics unwinding
//! through the caller. Resetting before reuse is the single most
//! safety-critical invariant in the engine: any per-request field that
//! survives a recycle leaks into an unrelated future request.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

/// Clears every per-request field of a poolable value back to its empty
/// state. Implementations should retain allocated capacity where possible;
/// that is the point of pooling.
pub trait Recycle {
    fn recycle(&mut self);
}

/// A bounded free-list of reusable values.
///
/// `acquire` pops an idle value or builds a fresh one via `Default`.
/// Values are returned by dropping the [`Pooled`] guard; returns beyond
/// `capacity` idle entries are dropped instead of retained.
pub struct Pool<T> {
    items: Mutex<Vec<T>>,
    capacity: usize,
}

impl<T: Recycle + Default> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Take a value from the free list, or construct one if it is empty.
    pub fn acquire(self: &Arc<Self>) -> Pooled<T> {
        let value = self
            .items
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop()
            .unwrap_or_default();
        Pooled {
            value: Some(value),
            pool: Arc::clone(self),
        }
    }

    /// Number of idle values currently on the free list.
    pub fn idle(&self) -> usize {
        self.items.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Scoped guard over a pooled value.
///
/// Dereferences to `T` while in flight; on drop the value is recycled and
/// pushed back onto the free list.
pub struct Pooled<T: Recycle + Default> {
    value: Option<T>,
    pool: Arc<Pool<T>>,
}

impl<T: Recycle + Default> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        // value is Some from construction until Drop
        self.value.as_ref().unwrap()
    }
}

impl<T: Recycle + Default> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_mut().unwrap()
    }
}

impl<T: Recycle + Default> Drop for Pooled<T> {
    fn drop(&mut self) {
        if let Some(mut value) = self.value.take() {
            value.recycle();
            let mut items = self.pool.items.lock().unwrap_or_else(|e| e.into_inner());
            if items.len() < self.pool.capacity {
                items.push(value);
            }
        }
    }
}
