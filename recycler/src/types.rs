use alloc::vec::Vec;

pub type ItemKey = u64;

/// A half-open index range `start..end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexRange {
    pub start: usize,
    pub end: usize, // exclusive
}

impl IndexRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }
}

/// A request to bring an item into view, forwarded to the scroll surface.
///
/// `view_position` is the fraction of the viewport (0 = top, 1 = bottom) the item should be
/// aligned to, and `view_offset` an additional offset in the surface's units. Both, like
/// `velocity`, are forwarded untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollToIndex {
    pub index: usize,
    pub animated: bool,
    pub velocity: Option<f32>,
    pub view_position: Option<f32>,
    pub view_offset: Option<f32>,
}

impl ScrollToIndex {
    /// An animated scroll to `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            animated: true,
            velocity: None,
            view_position: None,
            view_offset: None,
        }
    }

    pub fn with_animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    pub fn with_velocity(mut self, velocity: Option<f32>) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_view_position(mut self, view_position: Option<f32>) -> Self {
        self.view_position = view_position;
        self
    }

    pub fn with_view_offset(mut self, view_offset: Option<f32>) -> Self {
        self.view_offset = view_offset;
        self
    }
}

/// An imperative command for the native scroll surface.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    ItemRangeInserted { position: usize, count: usize },
    ItemRangeRemoved { position: usize, count: usize },
    /// Everything changed; the surface now holds `count` items.
    DataSetChanged { count: usize },
    ScrollToIndex(ScrollToIndex),
}

/// The key of a rendered entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntryKey<K> {
    Item(K),
    /// The fixed key of the empty-state placeholder.
    Empty,
}

impl<K> EntryKey<K> {
    pub fn as_item(&self) -> Option<&K> {
        match self {
            Self::Item(k) => Some(k),
            Self::Empty => None,
        }
    }
}

/// The content of a rendered entry.
#[derive(Clone, Debug, PartialEq)]
pub enum EntryItem<'a, T> {
    Item(&'a T),
    /// Produced by the empty-state provider while the collection is empty.
    Placeholder(T),
}

impl<T> EntryItem<'_, T> {
    pub fn get(&self) -> &T {
        match self {
            Self::Item(item) => item,
            Self::Placeholder(item) => item,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// One materialized entry of a render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderEntry<'a, T, K> {
    pub index: usize,
    pub key: EntryKey<K>,
    pub item: EntryItem<'a, T>,
    /// `true` when the entry must be re-rendered even if its key is unchanged.
    pub dirty: bool,
    /// The entry is the first item of the collection (carries the list header).
    pub is_first: bool,
    /// The entry is the last item of the collection (carries the list footer, no separator).
    pub is_last: bool,
}

/// The outcome of a render pass, without the entries themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderSummary {
    /// The materialization range the pass covered.
    pub range: IndexRange,
    /// The item count to report to the rendering layer (1 while the placeholder is shown).
    pub item_count: usize,
}

/// A full render pass: every materialized entry in ascending index order.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPass<'a, T, K> {
    pub range: IndexRange,
    pub item_count: usize,
    pub entries: Vec<RenderEntry<'a, T, K>>,
}

impl<T, K> RenderPass<'_, T, K> {
    pub fn dirty_count(&self) -> usize {
        self.entries.iter().filter(|e| e.dirty).count()
    }
}
