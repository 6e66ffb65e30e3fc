use crate::*;

use core::cell::RefCell;
use recycler::{
    Command, DataSource, EntryKey, ListChange, ListError, ListListener, ScrollToIndex,
    WindowOptions, WindowState,
};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::vec;
use std::vec::Vec;

fn numbers(n: u64) -> SharedSource<u64, u64> {
    SharedSource::new(DataSource::new((0..n).collect(), |item, _| *item))
}

#[derive(Clone, Default)]
struct Commands(Arc<Mutex<Vec<Command>>>);

impl Commands {
    fn sink(&self) -> impl Fn(&Command) + Send + Sync + 'static {
        let log = Arc::clone(&self.0);
        move |c: &Command| log.lock().unwrap().push(*c)
    }

    fn take(&self) -> Vec<Command> {
        core::mem::take(&mut *self.0.lock().unwrap())
    }
}

fn options(commands: &Commands) -> WindowOptions<u64> {
    WindowOptions::new().with_on_command(Some(commands.sink()))
}

#[test]
fn list_tracks_mutations_through_the_shared_handle() {
    let commands = Commands::default();
    let source = numbers(5);
    let list = RecyclerList::new(source.clone(), options(&commands)).unwrap();
    assert_eq!(source.listener_count(), 1);

    source.append(5).unwrap();
    source.splice(0, 2, []).unwrap();
    assert_eq!(
        commands.take(),
        vec![
            Command::ItemRangeInserted { position: 5, count: 1 },
            Command::ItemRangeRemoved { position: 0, count: 2 },
        ]
    );
    assert_eq!(list.window().materialized_item_count(), 4);
    assert!(list.needs_render());

    let keys = list.render(|pass| {
        pass.entries
            .iter()
            .filter_map(|e| e.key.as_item().copied())
            .collect::<Vec<_>>()
    });
    assert_eq!(keys, vec![2, 3, 4, 5]);
    assert!(!list.needs_render());
}

struct Echo {
    source: SharedSource<u64, u64>,
    result: RefCell<Option<Result<(), ListError>>>,
}

impl ListListener<u64, u64> for Echo {
    fn on_change(&self, change: &ListChange<'_, u64>, _: &DataSource<u64, u64>) {
        if let ListChange::Appended { item, .. } = change {
            let echoed = self.source.append(*item + 100);
            *self.result.borrow_mut() = Some(echoed);
        }
    }
}

#[test]
fn mutating_from_a_listener_is_rejected() {
    let source = numbers(3);
    let echo = Rc::new(Echo {
        source: source.clone(),
        result: RefCell::new(None),
    });
    source.subscribe(echo.clone()).unwrap();

    assert_eq!(source.append(3), Ok(()));
    assert_eq!(
        *echo.result.borrow(),
        Some(Err(ListError::ReentrantMutation))
    );
    assert_eq!(source.len(), 4);
    assert_eq!(source.get_cloned(3), Ok(3));
}

#[test]
fn mutating_inside_a_render_pass_is_rejected() {
    let source = numbers(3);
    let list = RecyclerList::new(source.clone(), WindowOptions::new()).unwrap();

    let attempt = list.render(|pass| {
        assert_eq!(pass.entries.len(), 3);
        source.append(99)
    });
    assert_eq!(attempt, Err(ListError::ReentrantMutation));
    assert_eq!(source.len(), 3);
    assert_eq!(source.try_with(|s| s.len()), Ok(3));
}

#[test]
fn read_while_mutating_reports_reentrancy() {
    struct Reader {
        source: SharedSource<u64, u64>,
        seen: RefCell<Option<Result<usize, ListError>>>,
    }

    impl ListListener<u64, u64> for Reader {
        fn on_change(&self, _: &ListChange<'_, u64>, _: &DataSource<u64, u64>) {
            *self.seen.borrow_mut() = Some(self.source.try_with(DataSource::len));
        }
    }

    let source = numbers(2);
    let reader = Rc::new(Reader {
        source: source.clone(),
        seen: RefCell::new(None),
    });
    source.subscribe(reader.clone()).unwrap();
    source.mark_all_dirty().unwrap();
    assert_eq!(
        *reader.seen.borrow(),
        Some(Err(ListError::ReentrantMutation))
    );
}

#[test]
fn set_source_moves_the_subscription() {
    let commands = Commands::default();
    let first = numbers(5);
    let second = numbers(8);
    let mut list = RecyclerList::new(first.clone(), options(&commands)).unwrap();

    list.set_source(first.clone()).unwrap();
    assert!(commands.take().is_empty());
    assert_eq!(first.listener_count(), 1);

    list.set_source(second.clone()).unwrap();
    assert_eq!(first.listener_count(), 0);
    assert_eq!(second.listener_count(), 1);
    assert!(list.source().ptr_eq(&second));
    assert_eq!(commands.take(), vec![Command::DataSetChanged { count: 8 }]);
    assert!(list.window().is_force_all());

    first.append(5).unwrap();
    assert!(commands.take().is_empty());
    second.append(8).unwrap();
    assert_eq!(
        commands.take(),
        vec![Command::ItemRangeInserted { position: 8, count: 1 }]
    );
}

#[test]
fn dropping_the_list_unsubscribes() {
    let source = numbers(3);
    let list = RecyclerList::new(source.clone(), WindowOptions::new()).unwrap();
    assert_eq!(source.listener_count(), 1);
    drop(list);
    assert_eq!(source.listener_count(), 0);
    source.append(3).unwrap();
}

#[test]
fn dropping_the_list_during_a_notification_keeps_the_subscription() {
    struct Owner(RefCell<Option<RecyclerList<u64, u64>>>);

    impl ListListener<u64, u64> for Owner {
        fn on_change(&self, _: &ListChange<'_, u64>, _: &DataSource<u64, u64>) {
            drop(self.0.borrow_mut().take());
        }
    }

    let source = numbers(3);
    let list = RecyclerList::new(source.clone(), WindowOptions::new()).unwrap();
    let owner = Rc::new(Owner(RefCell::new(Some(list))));
    source.subscribe(owner.clone()).unwrap();
    assert_eq!(source.listener_count(), 2);

    source.append(3).unwrap();
    assert!(owner.0.borrow().is_none());
    assert_eq!(source.listener_count(), 2);
}

#[test]
fn mount_scrolls_once() {
    let commands = Commands::default();
    let source = numbers(50);
    let mut list = RecyclerList::new(
        source,
        options(&commands)
            .with_initial_scroll_index(Some(20))
            .with_initial_scroll_offset(Some(4.0)),
    )
    .unwrap();
    assert_eq!(list.window().visible_range().start, 20);

    let first = list.mount();
    let expected = ScrollToIndex::new(20)
        .with_animated(false)
        .with_view_position(Some(0.0))
        .with_view_offset(Some(4.0));
    assert_eq!(first, Some(expected));
    assert!(list.is_mounted());
    assert_eq!(list.mount(), None);
    assert_eq!(commands.take(), vec![Command::ScrollToIndex(expected)]);
}

#[test]
fn scroll_requests_are_clamped_to_the_current_length() {
    let commands = Commands::default();
    let source = numbers(10);
    let list = RecyclerList::new(source.clone(), options(&commands)).unwrap();

    let end = list.scroll_to_end(true, Some(2.0)).unwrap();
    assert_eq!(end.index, 9);
    assert_eq!(end.velocity, Some(2.0));

    let clamped = list
        .scroll_to_index(ScrollToIndex::new(40).with_animated(false))
        .unwrap();
    assert_eq!(clamped.index, 9);
    assert_eq!(commands.take().len(), 2);

    source.reset(Vec::new()).unwrap();
    commands.take();
    assert_eq!(list.scroll_to_end(false, None), None);
    assert!(commands.take().is_empty());
}

#[test]
fn empty_list_renders_the_placeholder() {
    let source = numbers(0);
    let list = RecyclerList::new(
        source.clone(),
        WindowOptions::new().with_empty_state(Some(|| 0u64)),
    )
    .unwrap();

    let summary = list.for_each_entry(|e| {
        assert_eq!(e.key, EntryKey::Empty);
        assert!(e.item.is_placeholder());
        assert!(e.dirty);
    });
    assert_eq!(summary.item_count, 1);

    source.append(7).unwrap();
    let mut seen = Vec::new();
    let summary = list.for_each_entry(|e| seen.push((e.index, *e.item.get(), e.dirty)));
    assert_eq!(summary.item_count, 1);
    assert_eq!(seen, vec![(0, 7, true)]);
}

#[test]
fn visible_range_feedback_reaches_the_callback() {
    let reported = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&reported);
    let source = numbers(100);
    let list = RecyclerList::new(
        source,
        WindowOptions::new()
            .with_margin(5)
            .with_on_visible_range_change(Some(move |range: recycler::IndexRange| {
                counter.store(range.start * 1000 + range.end, Ordering::SeqCst);
            })),
    )
    .unwrap();

    list.on_visible_items_change(40, 50);
    assert_eq!(reported.load(Ordering::SeqCst), 40_050);
    let summary = list.for_each_entry(|_| {});
    assert_eq!(summary.range, recycler::IndexRange::new(35, 55));

    let state = list.window_state();
    assert_eq!(
        state,
        WindowState {
            first_visible: 40,
            last_visible: 50,
            item_count: 100,
        }
    );
    list.on_visible_items_change(0, 10);
    list.restore_window_state(state);
    assert_eq!(list.window().visible_range(), recycler::IndexRange::new(40, 50));
}

#[test]
fn render_request_fires_for_each_mutation() {
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&requests);
    let source = numbers(4);
    let _list = RecyclerList::new(
        source.clone(),
        WindowOptions::new().with_on_render_request(Some(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })),
    )
    .unwrap();

    source.replace(1, 11).unwrap();
    source.swap_down(0).unwrap();
    source.prepend(99).unwrap();
    assert_eq!(requests.load(Ordering::SeqCst), 3);
}
