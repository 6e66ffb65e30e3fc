// Example: moving an item marks only the two swapped keys dirty.
use std::cell::RefCell;
use std::rc::Rc;

use recycler::{DataSource, WindowController, WindowOptions};

#[derive(Debug)]
struct Task {
    id: u32,
    title: &'static str,
}

fn main() {
    let tasks = vec![
        Task { id: 1, title: "write docs" },
        Task { id: 2, title: "review" },
        Task { id: 3, title: "ship" },
    ];
    let mut source = DataSource::new(tasks, |task: &Task, _| task.id);
    let controller = Rc::new(RefCell::new(WindowController::new(
        WindowOptions::new(),
        &source,
    )));
    source.subscribe(controller.clone());

    // The first pass renders everything.
    let first = controller.borrow_mut().render_pass(&source);
    println!("initial dirty={}", first.dirty_count());

    source.swap_down(0).expect("index 0 exists");
    for entry in controller.borrow_mut().render_pass(&source).entries {
        println!(
            "{} {:?} {} dirty={}",
            entry.index,
            entry.key,
            entry.item.get().title,
            entry.dirty
        );
    }

    // Positional keys are available, but they do not follow moved items.
    let unkeyed = DataSource::unkeyed(vec!["a", "b"]);
    println!("positional key of 1: {:?}", unkeyed.key_of(1));
}
