/// A structural or visual change to a [`crate::DataSource`], delivered to every listener after
/// the underlying sequence has been updated.
///
/// Borrowed payloads point into the collection's post-mutation storage.
#[derive(Debug)]
pub enum ListChange<'a, T> {
    /// `item` was added at the end; it now lives at `index` (`len - 1`).
    Appended { index: usize, item: &'a T },
    /// `item` was added at the start (index 0).
    Prepended { item: &'a T },
    /// `delete_count` items were removed at `start` and `inserted` now occupies
    /// `start..start + inserted.len()`.
    Spliced {
        start: usize,
        delete_count: usize,
        inserted: &'a [T],
    },
    /// The item at `index` was overwritten in place.
    Replaced { index: usize, item: &'a T },
    /// The items at `index` and `index - 1` were exchanged.
    MovedUp { index: usize },
    /// The items at `index` and `index + 1` were exchanged.
    MovedDown { index: usize },
    /// No structural change; every item must be treated as dirty.
    MarkedDirty,
    /// The whole content was replaced; the collection now holds `len` items.
    Reset { len: usize },
}

impl<T> Clone for ListChange<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListChange<'_, T> {}

impl<T> ListChange<'_, T> {
    /// The `(position, count)` of items this change removed, if any.
    pub fn removed(&self) -> Option<(usize, usize)> {
        match *self {
            Self::Spliced {
                start,
                delete_count,
                ..
            } if delete_count > 0 => Some((start, delete_count)),
            _ => None,
        }
    }

    /// The `(position, count)` of items this change inserted, if any.
    pub fn inserted(&self) -> Option<(usize, usize)> {
        match *self {
            Self::Appended { index, .. } => Some((index, 1)),
            Self::Prepended { .. } => Some((0, 1)),
            Self::Spliced {
                start, inserted, ..
            } if !inserted.is_empty() => Some((start, inserted.len())),
            _ => None,
        }
    }

    /// A short, stable name for the change, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Appended { .. } => "appended",
            Self::Prepended { .. } => "prepended",
            Self::Spliced { .. } => "spliced",
            Self::Replaced { .. } => "replaced",
            Self::MovedUp { .. } => "moved_up",
            Self::MovedDown { .. } => "moved_down",
            Self::MarkedDirty => "marked_dirty",
            Self::Reset { .. } => "reset",
        }
    }

    pub fn is_structural(&self) -> bool {
        self.removed().is_some() || self.inserted().is_some() || matches!(self, Self::Reset { .. })
    }
}
