use alloc::sync::Arc;

use crate::{Command, IndexRange};

/// Receives the imperative commands meant for the native scroll surface.
pub type CommandSink = Arc<dyn Fn(&Command) + Send + Sync>;

/// Called whenever the controller's state changed in a way that needs a new render pass.
pub type RenderRequestCallback = Arc<dyn Fn() + Send + Sync>;

/// Called with the visible range the rendering layer just reported.
pub type VisibleRangeCallback = Arc<dyn Fn(IndexRange) + Send + Sync>;

/// Produces the placeholder shown while the collection is empty.
pub type EmptyStateProvider<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Configuration for [`crate::WindowController`].
///
/// This type is cheap to clone: callbacks are stored in `Arc`s so adapters can update a few
/// fields and call `WindowController::set_options` without reallocating closures.
pub struct WindowOptions<T> {
    /// Size of the visible window assumed before the rendering layer reports one, and after the
    /// collection goes from empty to non-empty.
    pub initial_window_size: usize,
    /// Extra items materialized on each side of the visible window.
    pub margin: usize,
    /// When set, the initial window starts at this index and mounting scrolls to it.
    pub initial_scroll_index: Option<usize>,
    /// Forwarded as `view_offset` of the initial scroll.
    pub initial_scroll_offset: Option<f32>,
    pub empty_state: Option<EmptyStateProvider<T>>,
    pub on_command: Option<CommandSink>,
    pub on_render_request: Option<RenderRequestCallback>,
    pub on_visible_range_change: Option<VisibleRangeCallback>,
}

impl<T> Default for WindowOptions<T> {
    fn default() -> Self {
        Self {
            initial_window_size: 10,
            margin: 30,
            initial_scroll_index: None,
            initial_scroll_offset: None,
            empty_state: None,
            on_command: None,
            on_render_request: None,
            on_visible_range_change: None,
        }
    }
}

impl<T> Clone for WindowOptions<T> {
    fn clone(&self) -> Self {
        Self {
            initial_window_size: self.initial_window_size,
            margin: self.margin,
            initial_scroll_index: self.initial_scroll_index,
            initial_scroll_offset: self.initial_scroll_offset,
            empty_state: self.empty_state.clone(),
            on_command: self.on_command.clone(),
            on_render_request: self.on_render_request.clone(),
            on_visible_range_change: self.on_visible_range_change.clone(),
        }
    }
}

impl<T> WindowOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_window_size(mut self, initial_window_size: usize) -> Self {
        self.initial_window_size = initial_window_size;
        self
    }

    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_initial_scroll_index(mut self, initial_scroll_index: Option<usize>) -> Self {
        self.initial_scroll_index = initial_scroll_index;
        self
    }

    pub fn with_initial_scroll_offset(mut self, initial_scroll_offset: Option<f32>) -> Self {
        self.initial_scroll_offset = initial_scroll_offset;
        self
    }

    pub fn with_empty_state(
        mut self,
        empty_state: Option<impl Fn() -> T + Send + Sync + 'static>,
    ) -> Self {
        self.empty_state = empty_state.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_command(
        mut self,
        on_command: Option<impl Fn(&Command) + Send + Sync + 'static>,
    ) -> Self {
        self.on_command = on_command.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_render_request(
        mut self,
        on_render_request: Option<impl Fn() + Send + Sync + 'static>,
    ) -> Self {
        self.on_render_request = on_render_request.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_visible_range_change(
        mut self,
        on_visible_range_change: Option<impl Fn(IndexRange) + Send + Sync + 'static>,
    ) -> Self {
        self.on_visible_range_change = on_visible_range_change.map(|f| Arc::new(f) as _);
        self
    }

    /// The window a fresh controller starts with.
    pub(crate) fn initial_window(&self) -> IndexRange {
        let start = self.initial_scroll_index.unwrap_or(0);
        IndexRange::new(start, start.saturating_add(self.initial_window_size))
    }
}

impl<T> core::fmt::Debug for WindowOptions<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowOptions")
            .field("initial_window_size", &self.initial_window_size)
            .field("margin", &self.margin)
            .field("initial_scroll_index", &self.initial_scroll_index)
            .field("initial_scroll_offset", &self.initial_scroll_offset)
            .field("empty_state", &self.empty_state.is_some())
            .finish_non_exhaustive()
    }
}
