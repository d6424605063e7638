/*!
Owner/subject notifications for ankurah

A [`Subject`] publishes typed notifications to the callbacks connected to it. Every connection is
made through an [`Owner`], which holds the connection record by value and is responsible for
freeing it. Either side may be dropped first, in any order:
- dropping an `Owner` removes each of its connections from its subject, then frees them
- dropping a `Subject` asks each owner still holding one of its connections to free it

# Design requirements:
- No connection is ever invoked after it was released, and none is freed twice
- Notification order is connection order. No priorities, no filtering, no buffering.
- Single threaded. `Owner`, `Subject` and `Blocker` are `!Send`; callbacks run synchronously
  on the thread that calls `notify`.
- Each registry has a single strong reference, held by the `Owner` or `Subject` value. All
  back-references are weak and only route teardown.

# Basic usage

```rust
use ankurah_observer::*;
use std::{cell::RefCell, rc::Rc};

let log = Rc::new(RefCell::new(Vec::new()));
let owner = Owner::new();
let subject = Subject::<(i32,)>::new();

let h1 = {
    let log = log.clone();
    owner.connect(&subject, move |x: i32| log.borrow_mut().push(x))
};
subject.notify((42,));
assert_eq!(*log.borrow(), [42]);

owner.disconnect(h1).unwrap();
subject.notify((7,));
assert_eq!(*log.borrow(), [42]);
```

# Fewer parameters

A callback may accept any leading prefix of the published values; the trailing ones are dropped.

```rust
use ankurah_observer::*;
use std::{cell::Cell, rc::Rc};

let owner = Owner::new();
let subject = Subject::<(i32, String, bool)>::new();
let last = Rc::new(Cell::new(0));
{
    let last = last.clone();
    owner.connect(&subject, move |n: i32| last.set(n));
}
subject.notify((3, "three".to_string(), true));
assert_eq!(last.get(), 3);
```

Asking for more values than the subject publishes does not compile:

```rust,compile_fail
use ankurah_observer::*;

let owner = Owner::new();
let subject = Subject::<(i32, String, bool)>::new();
owner.connect(&subject, |_: i32, _: String, _: bool, _: f64| ());
```

# Relays and blocking

```rust
use ankurah_observer::*;
use std::{cell::RefCell, rc::Rc};

let owner = Owner::new();
let (a, b) = (Subject::<(i32, &str)>::new(), Subject::<(i32, &str)>::new());
let seen = Rc::new(RefCell::new(Vec::new()));
{
    let seen = seen.clone();
    owner.connect(&b, move |n: i32, s: &'static str| seen.borrow_mut().push((n, s)));
}
owner.connect_relay(&a, &b);

a.notify((1, "x"));
{
    let _blocker = a.block();
    a.notify((2, "y")); // suppressed
}
assert_eq!(*seen.borrow(), [(1, "x")]);
```
*/

mod adapter;
mod args;
mod blocker;
mod error;
mod handle;
mod owner;
mod subject;

pub use adapter::{Callback, Method};
pub use args::{Arguments, Leading};
pub use blocker::Blocker;
pub use error::ObserverError;
pub use handle::{HandleId, OwnerId};
pub use owner::Owner;
pub use subject::Subject;
