use alloc::rc::Rc;
use core::cell::{Ref, RefCell};

use recycler::{
    DataSource, ItemKey, ListError, ListKey, ListListener, RenderEntry, RenderPass, RenderSummary,
    ScrollToIndex, WindowController, WindowOptions, WindowState,
};

use crate::SharedSource;

/// A framework-neutral list driver that binds a [`WindowController`] to a [`SharedSource`].
///
/// This type does not hold any UI objects. It owns the subscription lifecycle:
/// - subscribes the controller on construction
/// - moves the subscription when the list is pointed at another collection ([`RecyclerList::set_source`])
/// - unsubscribes on drop
///
/// Adapters drive it by calling:
/// - `mount` once the native list exists
/// - `render`/`for_each_entry` whenever a render was requested (see
///   [`WindowOptions::on_render_request`] and [`RecyclerList::needs_render`])
/// - `on_visible_items_change` with the viewport feedback of the native list
///
/// The controller is borrowed while these methods run, so they must not be called from inside
/// the controller's own callbacks.
pub struct RecyclerList<T: 'static, K: ListKey + 'static = ItemKey> {
    source: SharedSource<T, K>,
    window: Rc<RefCell<WindowController<T, K>>>,
    mounted: bool,
}

impl<T: 'static, K: ListKey + 'static> RecyclerList<T, K> {
    pub fn new(source: SharedSource<T, K>, options: WindowOptions<T>) -> Result<Self, ListError> {
        let window = source.try_with(|s| WindowController::new(options, s))?;
        let window = Rc::new(RefCell::new(window));
        source.subscribe(as_listener(&window))?;
        atrace!(len = source.len(), "RecyclerList::new");
        Ok(Self {
            source,
            window,
            mounted: false,
        })
    }

    pub fn source(&self) -> &SharedSource<T, K> {
        &self.source
    }

    /// Read access to the controller.
    pub fn window(&self) -> Ref<'_, WindowController<T, K>> {
        self.window.borrow()
    }

    pub fn window_state(&self) -> WindowState {
        self.window.borrow().window_state()
    }

    pub fn restore_window_state(&self, state: WindowState) {
        self.window.borrow_mut().restore_window_state(state);
    }

    pub fn needs_render(&self) -> bool {
        self.window.borrow().needs_render()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Marks the list as mounted and issues the configured initial scroll.
    ///
    /// Only the first call has an effect.
    pub fn mount(&mut self) -> Option<ScrollToIndex> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        let len = self.source.len();
        self.window.borrow_mut().mount(len)
    }

    /// Runs a render pass and hands it to `f`.
    ///
    /// The collection stays borrowed while `f` runs: mutating it from `f` fails with
    /// [`ListError::ReentrantMutation`].
    pub fn render<R>(&self, f: impl FnOnce(RenderPass<'_, T, K>) -> R) -> R {
        self.source.with(|s| {
            let pass = self.window.borrow_mut().render_pass(s);
            f(pass)
        })
    }

    /// Zero-allocation variant of [`RecyclerList::render`].
    pub fn for_each_entry(&self, f: impl FnMut(RenderEntry<'_, T, K>)) -> RenderSummary {
        self.source
            .with(|s| self.window.borrow_mut().for_each_entry(s, f))
    }

    /// Viewport feedback from the native list.
    pub fn on_visible_items_change(&self, first: usize, last: usize) {
        self.window.borrow_mut().report_visible_range(first, last);
    }

    pub fn scroll_to_index(&self, request: ScrollToIndex) -> Option<ScrollToIndex> {
        let len = self.source.len();
        self.window.borrow_mut().scroll_to_index(request, len)
    }

    pub fn scroll_to_end(&self, animated: bool, velocity: Option<f32>) -> Option<ScrollToIndex> {
        let len = self.source.len();
        self.window.borrow_mut().scroll_to_end(animated, velocity, len)
    }

    /// Points the list at another collection.
    ///
    /// The subscription moves to `source` and the native list receives a full reset. Setting
    /// the collection the list already uses is a no-op.
    pub fn set_source(&mut self, source: SharedSource<T, K>) -> Result<(), ListError> {
        if self.source.ptr_eq(&source) {
            return Ok(());
        }
        let len = source.try_with(DataSource::len)?;
        source.subscribe(as_listener(&self.window))?;
        if let Err(err) = self.source.unsubscribe(&self.window) {
            let _ = source.unsubscribe(&self.window);
            return Err(err);
        }
        self.source = source;
        atrace!(len, "RecyclerList::set_source");
        self.window.borrow_mut().source_replaced(len);
        Ok(())
    }
}

impl<T: 'static, K: ListKey + 'static> Drop for RecyclerList<T, K> {
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn drop(&mut self) {
        if let Err(err) = self.source.unsubscribe(&self.window) {
            awarn!(
                mounted = self.mounted,
                error = %err,
                "RecyclerList::drop: source is mutating, listener left subscribed"
            );
        }
    }
}

impl<T: 'static, K: ListKey + core::fmt::Debug + 'static> core::fmt::Debug for RecyclerList<T, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecyclerList")
            .field("source", &self.source)
            .field("window", &self.window.try_borrow().map(|w| w.window_state()).ok())
            .field("mounted", &self.mounted)
            .finish()
    }
}

fn as_listener<T: 'static, K: ListKey + 'static>(
    window: &Rc<RefCell<WindowController<T, K>>>,
) -> Rc<dyn ListListener<T, K>> {
    window.clone()
}
