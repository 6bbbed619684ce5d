//! Reference-counted handles to stored objects.

use crate::stats::HandleStats;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A handle to an object read from a store.
///
/// Acquiring a handle is counted in the owning store's [`HandleStats`];
/// dropping it counts the release. Release therefore happens exactly once on
/// every path out of the scope that holds it, early returns included.
/// [`CachedObject::release`] makes the point of release explicit.
pub struct CachedObject<T> {
    object: Arc<T>,
    stats: Arc<HandleStats>,
}

impl<T> CachedObject<T> {
    pub(crate) fn acquire(object: Arc<T>, stats: Arc<HandleStats>) -> Self {
        stats.record_acquire();
        Self { object, stats }
    }

    /// Returns the object.
    #[must_use]
    pub fn get(&self) -> &T {
        &self.object
    }

    /// Releases the handle.
    pub fn release(self) {
        drop(self);
    }
}

impl<T> Clone for CachedObject<T> {
    fn clone(&self) -> Self {
        Self::acquire(Arc::clone(&self.object), Arc::clone(&self.stats))
    }
}

impl<T> Deref for CachedObject<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.object
    }
}

impl<T> Drop for CachedObject<T> {
    fn drop(&mut self) {
        self.stats.record_release();
    }
}

impl<T: fmt::Debug> fmt::Debug for CachedObject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CachedObject").field(&self.object).finish()
    }
}
