use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a value guarded by a single readers-writer lock.
///
/// Cloning the handle shares the value. Readers may run concurrently,
/// a writer excludes everybody else.
pub struct WrappedRwLock<T: ?Sized> {
    inner: Arc<RwLock<T>>,
}

impl<T> WrappedRwLock<T> {
    /// Create a new wrapped instance. This is not called `new` so that you may implement
    /// your own function `new`.
    #[inline]
    pub fn wrap(t: T) -> Self {
        WrappedRwLock {
            inner: Arc::new(RwLock::new(t)),
        }
    }
}

impl<T: ?Sized> WrappedRwLock<T> {
    /// Acquire the lock for reading.
    #[inline]
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read()
    }

    /// Acquire the lock for writing.
    #[inline]
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write()
    }
}

impl<T: ?Sized> Clone for WrappedRwLock<T> {
    #[inline]
    fn clone(&self) -> WrappedRwLock<T> {
        WrappedRwLock {
            inner: self.inner.clone(),
        }
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for WrappedRwLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.read().fmt(f)
    }
}
