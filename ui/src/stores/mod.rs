//! Observable state containers shared between the dashboard components.
//!
//! A [`Store`] holds one value, hands out clones of it, and notifies
//! subscribers after every `set`/`update`. It is single-threaded on purpose:
//! the dashboard runs on the UI thread and the only async work (the notebook
//! refresh) completes back on that thread.

mod notebook;
mod user;

pub use notebook::{NotebookState, NotebookStore};
pub use user::{Discipline, Organization, UserState, UserStore, USER_STORAGE_KEY};

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use dioxus::prelude::*;

type Callback<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<(u64, Callback<T>)>>,
    next_id: Cell<u64>,
}

pub struct Store<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Two handles are equal when they point at the same store.
impl<T> PartialEq for Store<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("value", &self.inner.value.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = {
            let mut value = self.inner.value.borrow_mut();
            f(&mut value)
        };
        self.notify();
        result
    }

    /// Call `f` with the current value now and after every change.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        f(&self.get());
        self.watch(f)
    }

    /// Call `f` after every future change.
    pub fn watch(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.subscribers.borrow_mut().push((id, Rc::new(f)));

        let weak: Weak<Inner<T>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn notify(&self) {
        // Snapshot both the value and the list so callbacks may set the store
        // or unsubscribe without tripping the RefCell borrows.
        let snapshot = self.get();
        let callbacks: Vec<Callback<T>> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(&snapshot);
        }
    }
}

/// Unsubscribes when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Keep the callback registered for the store's whole lifetime.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Mirror a store into a component-local signal. The subscription is
/// released when the component unmounts.
pub fn use_store<T: Clone + 'static>(store: &Store<T>) -> Signal<T> {
    let signal = use_signal(|| store.get());

    let subscription = use_hook(|| {
        let subscription = store.watch(move |value: &T| {
            let mut signal = signal;
            signal.set(value.clone());
        });
        Rc::new(RefCell::new(Some(subscription)))
    });

    use_drop(move || {
        subscription.borrow_mut().take();
    });

    signal
}
