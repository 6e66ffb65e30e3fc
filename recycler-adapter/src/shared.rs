use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use recycler::{DataSource, ItemKey, ListError, ListListener};

/// A shared handle to a [`DataSource`].
///
/// Cloning a `SharedSource` creates a new handle to the **same** collection. Mutations made
/// through any handle while a change notification is being delivered (from a listener, or from
/// a render callback that still reads the collection) fail with
/// [`ListError::ReentrantMutation`] instead of recursing.
pub struct SharedSource<T, K = ItemKey> {
    inner: Rc<RefCell<DataSource<T, K>>>,
}

impl<T, K> Clone for SharedSource<T, K> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, K> From<DataSource<T, K>> for SharedSource<T, K> {
    fn from(source: DataSource<T, K>) -> Self {
        Self::new(source)
    }
}

impl<T, K> SharedSource<T, K> {
    pub fn new(source: DataSource<T, K>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(source)),
        }
    }

    /// `true` when both handles point to the same collection.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Reads the collection.
    ///
    /// # Panics
    ///
    /// Panics if the collection is being mutated. Use [`SharedSource::try_with`] from code that
    /// may run inside a change notification.
    pub fn with<R>(&self, f: impl FnOnce(&DataSource<T, K>) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// Reads the collection, failing if it is being mutated.
    pub fn try_with<R>(&self, f: impl FnOnce(&DataSource<T, K>) -> R) -> Result<R, ListError> {
        let source = self.inner.try_borrow().map_err(|_| {
            awarn!(
                handles = Rc::strong_count(&self.inner),
                "SharedSource: read while mutating"
            );
            ListError::ReentrantMutation
        })?;
        Ok(f(&source))
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut DataSource<T, K>) -> R) -> Result<R, ListError> {
        let mut source = self.inner.try_borrow_mut().map_err(|_| {
            awarn!(
                handles = Rc::strong_count(&self.inner),
                "SharedSource: re-entrant mutation rejected"
            );
            ListError::ReentrantMutation
        })?;
        Ok(f(&mut source))
    }

    pub fn len(&self) -> usize {
        self.with(DataSource::len)
    }

    pub fn is_empty(&self) -> bool {
        self.with(DataSource::is_empty)
    }

    pub fn get_cloned(&self, index: usize) -> Result<T, ListError>
    where
        T: Clone,
    {
        self.try_with(|s| s.get(index).cloned())?
    }

    pub fn key_of(&self, index: usize) -> Result<K, ListError> {
        self.try_with(|s| s.key_of(index))?
    }

    pub fn append(&self, item: T) -> Result<(), ListError> {
        self.mutate(|s| s.append(item))
    }

    pub fn prepend(&self, item: T) -> Result<(), ListError> {
        self.mutate(|s| s.prepend(item))
    }

    pub fn splice(
        &self,
        start: usize,
        delete_count: usize,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Vec<T>, ListError> {
        self.mutate(|s| s.splice(start, delete_count, items))?
    }

    pub fn replace(&self, index: usize, item: T) -> Result<T, ListError> {
        self.mutate(|s| s.replace(index, item))?
    }

    pub fn swap_up(&self, index: usize) -> Result<bool, ListError> {
        self.mutate(|s| s.swap_up(index))?
    }

    pub fn swap_down(&self, index: usize) -> Result<bool, ListError> {
        self.mutate(|s| s.swap_down(index))?
    }

    pub fn mark_all_dirty(&self) -> Result<(), ListError> {
        self.mutate(DataSource::mark_all_dirty)
    }

    pub fn reset(&self, items: Vec<T>) -> Result<Vec<T>, ListError> {
        self.mutate(|s| s.reset(items))
    }

    pub fn subscribe(&self, listener: Rc<dyn ListListener<T, K>>) -> Result<(), ListError> {
        self.mutate(|s| s.subscribe(listener))
    }

    pub fn unsubscribe<L: ?Sized>(&self, listener: &Rc<L>) -> Result<bool, ListError> {
        self.mutate(|s| s.unsubscribe(listener))
    }

    pub fn listener_count(&self) -> usize {
        self.with(DataSource::listener_count)
    }
}

impl<T, K> core::fmt::Debug for SharedSource<T, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.inner.try_borrow() {
            Ok(s) => f
                .debug_struct("SharedSource")
                .field("len", &s.len())
                .field("listeners", &s.listener_count())
                .finish(),
            Err(_) => f.write_str("SharedSource(<mutating>)"),
        }
    }
}
