use crate::IndexRange;

/// A lightweight, serializable snapshot of a window controller.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
///
/// Dirty state is not part of the snapshot: a restored controller re-renders everything once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowState {
    pub first_visible: usize,
    pub last_visible: usize,
    pub item_count: usize,
}

impl WindowState {
    pub fn visible_range(&self) -> IndexRange {
        IndexRange::new(self.first_visible, self.last_visible)
    }
}
