use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    str::FromStr,
};
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        tracing_subscriber::fmt().with_max_level(Level::from_str(&level).unwrap()).with_test_writer().init();
    } else {
        tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init();
    }
}

/// Returns an accumulator to hand to callbacks, and a function that drains what it collected
#[allow(unused)]
pub fn watcher<T: 'static>() -> (impl Fn(T) + Clone, impl Fn() -> Vec<T>) {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let accumulate = {
        let changes = changes.clone();
        move |value: T| changes.borrow_mut().push(value)
    };
    let check = move || changes.borrow_mut().drain(..).collect::<Vec<T>>();
    (accumulate, check)
}

/// Counts how many times it was dropped. Moved into callbacks to detect leaks and double frees.
#[allow(unused)]
pub struct Sentinel(Rc<Cell<usize>>);

impl Drop for Sentinel {
    fn drop(&mut self) { self.0.set(self.0.get() + 1); }
}

#[allow(unused)]
pub fn sentinel() -> (Sentinel, Rc<Cell<usize>>) {
    let drops = Rc::new(Cell::new(0));
    (Sentinel(drops.clone()), drops)
}
