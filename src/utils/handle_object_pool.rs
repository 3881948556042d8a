use std::borrow::Borrow;

use super::handle::{Handle, HandleIndex};

/// A named object collection. Every time you create a handle, an attached
/// instance `T` is stored at its index. Objects live until the whole pool is
/// drained; individual frees are not supported.
pub struct HandleObjectPool<T: Sized> {
    versions: Vec<HandleIndex>,
    entries: Vec<Option<T>>,
}

impl<T: Sized> HandleObjectPool<T> {
    /// Constructs a new, empty `HandleObjectPool`.
    pub fn new() -> Self {
        HandleObjectPool {
            versions: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Creates a `T` and named it with `Handle`.
    pub fn create(&mut self, value: T) -> Handle {
        self.versions.push(1);
        self.entries.push(Some(value));
        Handle::new(self.entries.len() as HandleIndex - 1, 1)
    }

    /// Returns immutable reference to internal value with name `Handle`.
    #[inline]
    pub fn get<H>(&self, handle: H) -> Option<&T>
    where
        H: Borrow<Handle>,
    {
        let handle = handle.borrow();
        if self.is_alive(handle) {
            self.entries[handle.index() as usize].as_ref()
        } else {
            None
        }
    }

    /// Returns true if this `Handle` was created by this pool, and has not been
    /// drained yet.
    #[inline]
    pub fn is_alive<H>(&self, handle: H) -> bool
    where
        H: Borrow<Handle>,
    {
        let handle = handle.borrow();
        let index = handle.index() as usize;
        index < self.versions.len()
            && self.versions[index] == handle.version()
            && self.entries[index].is_some()
    }

    /// Returns the total number of alive objects in this pool.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|v| v.is_some()).count()
    }

    /// Returns true if the pool holds no alive objects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every object from the pool and returns them. Handles issued
    /// before draining are never accepted again.
    pub fn drain(&mut self) -> Vec<T> {
        for v in &mut self.versions {
            *v += 1;
        }

        self.entries.iter_mut().filter_map(|v| v.take()).collect()
    }
}

impl<T: Sized> Default for HandleObjectPool<T> {
    fn default() -> Self {
        HandleObjectPool::new()
    }
}
