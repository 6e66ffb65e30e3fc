use alloc::vec::Vec;
use core::cell::RefCell;

use crate::key::{KeyIndexMap, KeySet, ListKey};
use crate::{
    Command, DataSource, Diagnostic, EntryItem, EntryKey, IndexRange, ItemKey, ListChange,
    ListListener, RenderEntry, RenderPass, RenderSummary, ScrollToIndex, WindowOptions,
    WindowState,
};

/// Keeps the visible window, the materialization range and per-item dirtiness of a list view
/// consistent with an observable [`DataSource`].
///
/// This type holds no UI objects. It is driven by:
/// - change notifications from the collection (subscribe it as a [`ListListener`], wrapped in a
///   `RefCell`, or call [`WindowController::handle_change`] yourself)
/// - viewport feedback from the rendering layer ([`WindowController::report_visible_range`])
///
/// and queried through [`WindowController::render_pass`] / [`WindowController::for_each_entry`].
/// Dirtiness is single-shot: each render pass consumes it.
#[derive(Clone, Debug)]
pub struct WindowController<T, K = ItemKey> {
    options: WindowOptions<T>,
    first_visible: usize,
    last_visible: usize,
    item_count: usize,
    force_all: bool,
    dirty_keys: KeySet<K>,
    needs_render: bool,

    batch_depth: usize,
    render_pending: bool,
}

impl<T, K: ListKey> WindowController<T, K> {
    /// Creates a controller for `source`.
    ///
    /// The window starts at `[initial_scroll_index, +initial_window_size)` (or at 0), and the
    /// first render pass treats every item as dirty.
    pub fn new(options: WindowOptions<T>, source: &DataSource<T, K>) -> Self {
        let window = options.initial_window();
        vdebug!(
            len = source.len(),
            first_visible = window.start,
            last_visible = window.end,
            margin = options.margin,
            "WindowController::new"
        );
        Self {
            options,
            first_visible: window.start,
            last_visible: window.end,
            item_count: source.len(),
            force_all: true,
            dirty_keys: KeySet::<K>::new(),
            needs_render: true,
            batch_depth: 0,
            render_pending: false,
        }
    }

    pub fn options(&self) -> &WindowOptions<T> {
        &self.options
    }

    pub fn set_options(&mut self, options: WindowOptions<T>) {
        self.options = options;
        vtrace!(
            margin = self.options.margin,
            initial_window_size = self.options.initial_window_size,
            "WindowController::set_options"
        );
        self.request_render();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut WindowOptions<T>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn margin(&self) -> usize {
        self.options.margin
    }

    pub fn set_margin(&mut self, margin: usize) {
        if self.options.margin == margin {
            return;
        }
        self.options.margin = margin;
        self.request_render();
    }

    /// The visible window `[first, last)` as last reported (or repaired).
    pub fn visible_range(&self) -> IndexRange {
        IndexRange::new(self.first_visible, self.last_visible)
    }

    /// The number of items the rendering layer was last told exist.
    pub fn materialized_item_count(&self) -> usize {
        self.item_count
    }

    /// `true` when the next render pass treats every item as dirty.
    pub fn is_force_all(&self) -> bool {
        self.force_all
    }

    pub fn is_key_dirty(&self, key: &K) -> bool {
        self.force_all || self.dirty_keys.contains(key)
    }

    pub fn dirty_key_count(&self) -> usize {
        self.dirty_keys.len()
    }

    /// `true` when state changed since the last render pass.
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// The range to materialize for a collection of `len` items: the visible window expanded by
    /// `margin` on both sides, clamped to `0..len`.
    pub fn materialization_range(&self, len: usize) -> IndexRange {
        let margin = self.options.margin;
        IndexRange::new(
            self.first_visible.saturating_sub(margin).min(len),
            self.last_visible.saturating_add(margin).min(len),
        )
    }

    /// Batches multiple updates into a single render request.
    ///
    /// Every change applied inside `f` is still processed immediately; only the
    /// `on_render_request` callback is deferred until `f` returns.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        self.batch_depth = self.batch_depth.saturating_add(1);

        f(self);

        debug_assert!(self.batch_depth > 0, "batch_depth underflow");
        self.batch_depth = self.batch_depth.saturating_sub(1);

        if self.batch_depth == 0 && core::mem::take(&mut self.render_pending) {
            self.request_render_now();
        }
    }

    fn request_render_now(&self) {
        if let Some(cb) = &self.options.on_render_request {
            cb();
        }
    }

    fn request_render(&mut self) {
        self.needs_render = true;
        if self.batch_depth > 0 {
            self.render_pending = true;
            return;
        }
        self.request_render_now();
    }

    fn dispatch(&self, command: Command) {
        vtrace!(command = ?command, "WindowController::dispatch");
        if let Some(sink) = &self.options.on_command {
            sink(&command);
        }
    }

    /// Repairs the window after a collection change and schedules a render.
    ///
    /// `source` must already reflect the change.
    pub fn handle_change(&mut self, change: &ListChange<'_, T>, source: &DataSource<T, K>) {
        vtrace!(
            change = change.kind(),
            len = source.len(),
            first_visible = self.first_visible,
            last_visible = self.last_visible,
            "WindowController::handle_change"
        );
        match *change {
            ListChange::Appended { .. }
            | ListChange::Prepended { .. }
            | ListChange::Spliced { .. } => {
                // Bootstrap only applies when the list was empty before this change, not
                // when the removal half of a splice emptied it.
                let was_empty = self.item_count == 0;
                if let Some((position, count)) = change.removed() {
                    self.on_removed(position, count);
                }
                if let Some((position, count)) = change.inserted() {
                    self.on_inserted(position, count, was_empty, source);
                }
            }
            ListChange::Replaced { index, .. } => {
                self.mark_index_dirty(source, index);
            }
            ListChange::MovedUp { index } => {
                self.mark_index_dirty(source, index.saturating_sub(1));
                self.mark_index_dirty(source, index);
            }
            ListChange::MovedDown { index } => {
                self.mark_index_dirty(source, index);
                self.mark_index_dirty(source, index.saturating_add(1));
            }
            ListChange::MarkedDirty => {
                self.force_all = true;
            }
            ListChange::Reset { len } => {
                self.apply_data_set_changed(len);
            }
        }
        self.request_render();
    }

    fn on_inserted(
        &mut self,
        position: usize,
        count: usize,
        was_empty: bool,
        source: &DataSource<T, K>,
    ) {
        self.dispatch(Command::ItemRangeInserted { position, count });
        let len = source.len();

        if was_empty {
            let size = self.options.initial_window_size;
            vdebug!(len, initial_window_size = size, "WindowController: bootstrap window");
            self.first_visible = 0;
            self.last_visible = size;
            self.item_count = len;
            self.force_all = true;
            return;
        }

        self.item_count = self.item_count.saturating_add(count);

        // The previous first or last item lost its header or footer.
        if position == 0 {
            self.mark_index_dirty(source, count);
        }
        if position > 0 && position + count == len {
            self.mark_index_dirty(source, position - 1);
        }

        if position <= self.first_visible {
            self.first_visible = self.first_visible.saturating_add(count);
            self.last_visible = self.last_visible.saturating_add(count);
        } else {
            self.force_all = true;
        }
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        self.dispatch(Command::ItemRangeRemoved { position, count });
        self.item_count = self.item_count.saturating_sub(count);
        self.force_all = true;
    }

    fn apply_data_set_changed(&mut self, len: usize) {
        vdebug!(len, "WindowController: data set changed");
        self.dispatch(Command::DataSetChanged { count: len });
        self.item_count = len;
        self.force_all = true;
    }

    fn mark_index_dirty(&mut self, source: &DataSource<T, K>, index: usize) {
        if let Ok(key) = source.key_of(index) {
            self.dirty_keys.insert(key);
        }
    }

    /// Tells the controller it is now bound to a different collection of `len` items.
    ///
    /// Forwards [`Command::DataSetChanged`] and re-renders everything.
    pub fn source_replaced(&mut self, len: usize) {
        self.apply_data_set_changed(len);
        self.request_render();
    }

    /// Applies viewport feedback from the rendering layer.
    ///
    /// The reported range is trusted verbatim, except that an inverted range collapses to
    /// `[first, first)`. Nothing is marked dirty.
    pub fn report_visible_range(&mut self, first: usize, last: usize) {
        let last = if last < first {
            vwarn!(first, last, "report_visible_range: inverted range");
            first
        } else {
            last
        };
        vtrace!(first, last, "WindowController::report_visible_range");
        self.first_visible = first;
        self.last_visible = last;
        if let Some(cb) = &self.options.on_visible_range_change {
            cb(self.visible_range());
        }
        self.request_render();
    }

    /// Clamps `request.index` to `0..len` and forwards the request to the command sink.
    ///
    /// A non-animated request also moves the visible window to start at the target index,
    /// keeping its span. Returns the forwarded request, or `None` when `len == 0`.
    pub fn scroll_to_index(&mut self, request: ScrollToIndex, len: usize) -> Option<ScrollToIndex> {
        if len == 0 {
            vtrace!(index = request.index, "scroll_to_index: empty list");
            return None;
        }
        let request = ScrollToIndex {
            index: request.index.min(len - 1),
            ..request
        };

        if !request.animated {
            let span = self.last_visible.saturating_sub(self.first_visible);
            self.first_visible = request.index;
            self.last_visible = request.index.saturating_add(span);
            self.request_render();
        }

        self.dispatch(Command::ScrollToIndex(request));
        Some(request)
    }

    /// Scrolls to the last item.
    pub fn scroll_to_end(
        &mut self,
        animated: bool,
        velocity: Option<f32>,
        len: usize,
    ) -> Option<ScrollToIndex> {
        let request = ScrollToIndex::new(len.saturating_sub(1))
            .with_animated(animated)
            .with_velocity(velocity);
        self.scroll_to_index(request, len)
    }

    /// Issues the configured initial scroll, if any.
    ///
    /// Call this once, after the rendering layer has mounted the list.
    pub fn mount(&mut self, len: usize) -> Option<ScrollToIndex> {
        let index = self.options.initial_scroll_index?;
        let request = ScrollToIndex::new(index)
            .with_animated(false)
            .with_view_position(Some(0.0))
            .with_view_offset(self.options.initial_scroll_offset);
        self.scroll_to_index(request, len)
    }

    /// Returns a lightweight snapshot of the window.
    pub fn window_state(&self) -> WindowState {
        WindowState {
            first_visible: self.first_visible,
            last_visible: self.last_visible,
            item_count: self.item_count,
        }
    }

    /// Restores a previously captured snapshot. The next render pass re-renders everything.
    pub fn restore_window_state(&mut self, state: WindowState) {
        self.first_visible = state.first_visible;
        self.last_visible = state.last_visible.max(state.first_visible);
        self.item_count = state.item_count;
        self.force_all = true;
        self.request_render();
    }

    /// Visits every materialized entry in ascending index order, then consumes dirtiness.
    ///
    /// While `source` is empty and an empty-state provider is configured, a single placeholder
    /// entry (index 0, [`EntryKey::Empty`], always dirty) is emitted instead and the reported
    /// item count is 1.
    pub fn for_each_entry<'a>(
        &mut self,
        source: &'a DataSource<T, K>,
        mut f: impl FnMut(RenderEntry<'a, T, K>),
    ) -> RenderSummary {
        let len = source.len();
        let range = self.materialization_range(len);

        let item_count = if len == 0 {
            match &self.options.empty_state {
                Some(empty_state) => {
                    f(RenderEntry {
                        index: 0,
                        key: EntryKey::Empty,
                        item: EntryItem::Placeholder(empty_state()),
                        dirty: true,
                        is_first: true,
                        is_last: true,
                    });
                    1
                }
                None => 0,
            }
        } else {
            let mut seen = KeyIndexMap::<K>::new();
            for (offset, item) in source.items()[range.start..range.end].iter().enumerate() {
                let index = range.start + offset;
                let key = source.key_for(item, index);
                if let Some(&first_index) = seen.get(&key) {
                    source.report(Diagnostic::DuplicateKey {
                        key: key.clone(),
                        first_index,
                        second_index: index,
                    });
                } else {
                    seen.insert(key.clone(), index);
                }

                let dirty = self.is_key_dirty(&key);
                f(RenderEntry {
                    index,
                    key: EntryKey::Item(key),
                    item: EntryItem::Item(item),
                    dirty,
                    is_first: index == 0,
                    is_last: index + 1 == len,
                });
            }
            len
        };

        vtrace!(
            start = range.start,
            end = range.end,
            item_count,
            force_all = self.force_all,
            dirty_keys = self.dirty_keys.len(),
            "WindowController::render_pass"
        );
        self.force_all = false;
        self.dirty_keys.clear();
        self.needs_render = false;

        RenderSummary { range, item_count }
    }

    /// Produces the render pass for the current state, then consumes dirtiness.
    pub fn render_pass<'a>(&mut self, source: &'a DataSource<T, K>) -> RenderPass<'a, T, K> {
        let mut entries = Vec::new();
        let summary = self.for_each_entry(source, |e| entries.push(e));
        RenderPass {
            range: summary.range,
            item_count: summary.item_count,
            entries,
        }
    }
}

/// Lets a shared controller subscribe to a [`DataSource`] directly.
///
/// # Panics
///
/// Panics if the controller is already borrowed when the change arrives, i.e. the collection was
/// mutated from code holding a borrow of this controller.
impl<T, K: ListKey> ListListener<T, K> for RefCell<WindowController<T, K>> {
    fn on_change(&self, change: &ListChange<'_, T>, source: &DataSource<T, K>) {
        self.borrow_mut().handle_change(change, source);
    }
}
