// Example: a controller subscribed to a collection, reacting to mutations.
use std::cell::RefCell;
use std::rc::Rc;

use recycler::{DataSource, ListListener, WindowController, WindowOptions};

fn main() {
    let mut source = DataSource::new((0..1_000u64).collect(), |item, _| *item);
    let options = WindowOptions::new()
        .with_margin(5)
        .with_on_command(Some(|c: &recycler::Command| println!("command: {c:?}")));

    let controller = Rc::new(RefCell::new(WindowController::new(options, &source)));
    let listener: Rc<dyn ListListener<u64, u64>> = controller.clone();
    source.subscribe(listener);

    // The native list reports what is on screen.
    controller.borrow_mut().report_visible_range(100, 110);

    // Items prepended above the window shift it instead of re-rendering everything.
    source.prepend(9_999);
    println!("visible_range={:?}", controller.borrow().visible_range());

    let pass = controller.borrow_mut().render_pass(&source);
    println!(
        "materialized={:?} entries={} dirty={}",
        pass.range,
        pass.entries.len(),
        pass.dirty_count()
    );

    // Replacing one item only re-renders that item.
    source
        .replace(105, 12_345)
        .expect("index 105 exists in a list of 1001 items");
    let pass = controller.borrow_mut().render_pass(&source);
    let dirty: Vec<_> = pass
        .entries
        .iter()
        .filter(|e| e.dirty)
        .map(|e| e.index)
        .collect();
    println!("dirty after replace: {dirty:?}");
}
