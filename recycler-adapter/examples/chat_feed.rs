use std::cell::Cell;
use std::rc::Rc;

use recycler::{DataSource, WindowOptions};
use recycler_adapter::{RecyclerList, SharedSource};

fn main() {
    // Example: a chat feed that starts at the newest message and keeps the window stable while
    // older history is loaded above it.
    let messages: Vec<String> = (100..150).map(|i| format!("message {i}")).collect();
    let source = SharedSource::new(DataSource::new(messages, |m: &String, _| m.clone()));

    let mut list = RecyclerList::new(
        source.clone(),
        WindowOptions::new()
            .with_initial_scroll_index(Some(49))
            .with_on_command(Some(|c: &recycler::Command| println!("native list <- {c:?}")))
            .with_empty_state(Some(|| String::from("no messages yet"))),
    )
    .expect("source is not being mutated");

    list.mount();
    list.on_visible_items_change(40, 50);

    // Load older history: each prepend shifts the window by one.
    for i in (90..100).rev() {
        source
            .prepend(format!("message {i}"))
            .expect("no notification in flight");
    }
    println!("window after history load: {:?}", list.window().visible_range());

    let rendered = Rc::new(Cell::new(0usize));
    let summary = list.for_each_entry(|e| {
        if e.dirty {
            rendered.set(rendered.get() + 1);
        }
    });
    println!(
        "materialized {:?} of {} items, {} re-rendered",
        summary.range,
        summary.item_count,
        rendered.get()
    );

    // A fresh conversation.
    list.set_source(SharedSource::new(DataSource::new(Vec::new(), |m: &String, _| m.clone())))
        .expect("no notification in flight");
    list.render(|pass| {
        for e in pass.entries {
            println!("{} placeholder={}", e.item.get(), e.item.is_placeholder());
        }
    });
}
