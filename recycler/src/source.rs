use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::key::{KeyIndexMap, ListKey};
use crate::{Diagnostic, DiagnosticSink, ItemKey, ListChange, ListError};

/// Maps an item (and its current index) to its key.
pub type KeyExtractor<T, K> = Arc<dyn Fn(&T, usize) -> K + Send + Sync>;

/// Receives every change of a [`DataSource`] it is subscribed to.
///
/// `source` is the collection in its post-mutation state. Listeners cannot mutate the collection
/// through it; see `recycler-adapter`'s `SharedSource` for a handle that reports re-entrant
/// mutation as [`ListError::ReentrantMutation`].
pub trait ListListener<T, K> {
    fn on_change(&self, change: &ListChange<'_, T>, source: &DataSource<T, K>);
}

/// An observable, ordered collection of items with a per-item key.
///
/// Every mutating call updates the sequence first and then delivers exactly one
/// [`ListChange`] to each subscribed [`ListListener`], synchronously and in subscription order.
/// Index-accepting operations validate their arguments before touching anything, so a failed
/// call has no effect at all.
///
/// The collection has no internal locking; callers serialize access.
pub struct DataSource<T, K = ItemKey> {
    items: Vec<T>,
    key_extractor: KeyExtractor<T, K>,
    positional_keys: bool,
    listeners: Vec<Rc<dyn ListListener<T, K>>>,
    diagnostics: Option<DiagnosticSink<K>>,
}

impl<T, K> DataSource<T, K> {
    /// Creates a collection keyed by `key_extractor(item, index)`.
    ///
    /// Keys must be unique within each snapshot. Extractors that ignore `index` keep keys stable
    /// across moves, which is what lets renderers skip untouched items.
    pub fn new(
        items: Vec<T>,
        key_extractor: impl Fn(&T, usize) -> K + Send + Sync + 'static,
    ) -> Self {
        vdebug!(len = items.len(), "DataSource::new");
        Self {
            items,
            key_extractor: Arc::new(key_extractor),
            positional_keys: false,
            listeners: Vec::new(),
            diagnostics: None,
        }
    }

    /// Attaches a sink for advisory [`Diagnostic`]s.
    ///
    /// When the collection uses positional keys, the sink immediately receives
    /// [`Diagnostic::MissingKeyExtractor`].
    pub fn with_diagnostics(
        mut self,
        sink: impl Fn(&Diagnostic<K>) + Send + Sync + 'static,
    ) -> Self {
        let sink: DiagnosticSink<K> = Arc::new(sink);
        if self.positional_keys {
            sink(&Diagnostic::MissingKeyExtractor);
        }
        self.diagnostics = Some(sink);
        self
    }

    pub fn set_diagnostics(&mut self, sink: Option<DiagnosticSink<K>>) {
        self.diagnostics = sink;
    }

    pub(crate) fn report(&self, diagnostic: Diagnostic<K>) {
        vwarn!(diagnostic = %diagnostic, "DataSource: key diagnostic");
        if let Some(sink) = &self.diagnostics {
            sink(&diagnostic);
        }
    }

    /// `true` when keys were derived positionally (no key extractor was supplied).
    pub fn has_positional_keys(&self) -> bool {
        self.positional_keys
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Result<&T, ListError> {
        self.items.get(index).ok_or(ListError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn key_of(&self, index: usize) -> Result<K, ListError> {
        let item = self.get(index)?;
        Ok((self.key_extractor)(item, index))
    }

    /// Computes the key `item` would have at `index`, without looking at the collection.
    pub fn key_for(&self, item: &T, index: usize) -> K {
        (self.key_extractor)(item, index)
    }

    /// Adds `item` at the end.
    pub fn append(&mut self, item: T) {
        self.items.push(item);
        let index = self.items.len() - 1;
        self.notify(&ListChange::Appended {
            index,
            item: &self.items[index],
        });
    }

    /// Adds `item` at the start.
    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
        self.notify(&ListChange::Prepended {
            item: &self.items[0],
        });
    }

    /// Removes `delete_count` items at `start`, then inserts `items` at `start`.
    ///
    /// Returns the removed items. Fails with [`ListError::InvalidSplice`] when `start > len` or
    /// fewer than `delete_count` items follow `start`.
    pub fn splice(
        &mut self,
        start: usize,
        delete_count: usize,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Vec<T>, ListError> {
        let len = self.items.len();
        if start > len || delete_count > len - start {
            return Err(ListError::InvalidSplice {
                start,
                delete_count,
                len,
            });
        }

        let kept = len - delete_count;
        let removed: Vec<T> = self
            .items
            .splice(start..start + delete_count, items)
            .collect();
        let inserted = self.items.len() - kept;
        self.notify(&ListChange::Spliced {
            start,
            delete_count,
            inserted: &self.items[start..start + inserted],
        });
        Ok(removed)
    }

    /// Overwrites the item at `index`, returning the previous one.
    pub fn replace(&mut self, index: usize, item: T) -> Result<T, ListError> {
        let len = self.items.len();
        let Some(slot) = self.items.get_mut(index) else {
            return Err(ListError::IndexOutOfRange { index, len });
        };
        let prev = core::mem::replace(slot, item);
        self.notify(&ListChange::Replaced {
            index,
            item: &self.items[index],
        });
        Ok(prev)
    }

    /// Exchanges the item at `index` with the one above it (`index - 1`).
    ///
    /// Returns `false` (and notifies nobody) when `index` is already the first item.
    pub fn swap_up(&mut self, index: usize) -> Result<bool, ListError> {
        self.check_index(index)?;
        if index == 0 {
            return Ok(false);
        }
        self.items.swap(index, index - 1);
        self.notify(&ListChange::MovedUp { index });
        Ok(true)
    }

    /// Exchanges the item at `index` with the one below it (`index + 1`).
    ///
    /// Returns `false` (and notifies nobody) when `index` is already the last item.
    pub fn swap_down(&mut self, index: usize) -> Result<bool, ListError> {
        self.check_index(index)?;
        if index + 1 >= self.items.len() {
            return Ok(false);
        }
        self.items.swap(index, index + 1);
        self.notify(&ListChange::MovedDown { index });
        Ok(true)
    }

    /// Requests a full visual refresh without any structural change.
    pub fn mark_all_dirty(&mut self) {
        self.notify(&ListChange::MarkedDirty);
    }

    /// Replaces the whole content, returning the previous items.
    pub fn reset(&mut self, items: Vec<T>) -> Vec<T> {
        let prev = core::mem::replace(&mut self.items, items);
        self.notify(&ListChange::Reset {
            len: self.items.len(),
        });
        prev
    }

    /// Registers `listener`.
    ///
    /// Registering the same listener twice is allowed and delivers every change to it twice;
    /// avoiding that is the caller's responsibility.
    pub fn subscribe(&mut self, listener: Rc<dyn ListListener<T, K>>) {
        self.listeners.push(listener);
        vtrace!(listeners = self.listeners.len(), "DataSource::subscribe");
    }

    /// Removes one registration of `listener`. Returns `false` if it was not registered.
    pub fn unsubscribe<L: ?Sized>(&mut self, listener: &Rc<L>) -> bool {
        let target = Rc::as_ptr(listener).cast::<()>();
        let Some(pos) = self
            .listeners
            .iter()
            .position(|l| core::ptr::eq(Rc::as_ptr(l).cast::<()>(), target))
        else {
            return false;
        };
        self.listeners.remove(pos);
        vtrace!(listeners = self.listeners.len(), "DataSource::unsubscribe");
        true
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn check_index(&self, index: usize) -> Result<(), ListError> {
        let len = self.items.len();
        if index >= len {
            return Err(ListError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn notify(&self, change: &ListChange<'_, T>) {
        vtrace!(
            change = change.kind(),
            len = self.items.len(),
            listeners = self.listeners.len(),
            "DataSource::notify"
        );
        for listener in &self.listeners {
            listener.on_change(change, self);
        }
    }
}

impl<T, K: ListKey> DataSource<T, K> {
    /// Scans the whole collection for items sharing a key.
    ///
    /// Each collision is reported once per repeated item, against the first index holding the
    /// key. The result is also delivered to the diagnostic sink.
    pub fn duplicate_keys(&self) -> Vec<Diagnostic<K>> {
        let mut seen = KeyIndexMap::<K>::new();
        let mut out = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            let key = (self.key_extractor)(item, i);
            if let Some(&first_index) = seen.get(&key) {
                out.push(Diagnostic::DuplicateKey {
                    key,
                    first_index,
                    second_index: i,
                });
            } else {
                seen.insert(key, i);
            }
        }
        for d in &out {
            self.report(d.clone());
        }
        out
    }
}

impl<T: fmt::Debug + 'static> DataSource<T, String> {
    /// Creates a collection without a key extractor.
    ///
    /// Keys are derived from the item's `Debug` output plus its index. They are unique per
    /// snapshot but change meaning whenever items move, so key-based re-render skipping degrades
    /// to positional behavior. Prefer [`DataSource::new`].
    pub fn unkeyed(items: Vec<T>) -> Self {
        vwarn!("DataSource: missing key extractor, falling back to positional keys");
        Self {
            items,
            key_extractor: Arc::new(positional_key::<T>),
            positional_keys: true,
            listeners: Vec::new(),
            diagnostics: None,
        }
    }
}

fn positional_key<T: fmt::Debug>(item: &T, index: usize) -> String {
    format!("{item:?}_{index}")
}

impl<T: fmt::Debug, K> fmt::Debug for DataSource<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("items", &self.items)
            .field("positional_keys", &self.positional_keys)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
