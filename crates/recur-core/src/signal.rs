use std::cell::RefCell;
use std::rc::Rc;

use crate::{current_invalidator, remember};

pub type SubId = usize;

pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

struct Inner<T> {
    value: T,
    subs: Vec<Rc<dyn Fn(&T)>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: Vec::new(),
        })))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }

    pub fn set(&self, v: T) {
        self.0.borrow_mut().value = v;
        self.notify();
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        f(&mut self.0.borrow_mut().value);
        self.notify();
    }

    // Subscribers may read the signal, so only a shared borrow is held while they run.
    fn notify(&self) {
        let subs = self.0.borrow().subs.clone();
        let inner = self.0.borrow();
        for s in &subs {
            s(&inner.value);
        }
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        let mut inner = self.0.borrow_mut();
        inner.subs.push(Rc::new(f));
        inner.subs.len() - 1
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}

/// A remembered signal whose writes schedule another render of the
/// composition that created it.
pub fn use_signal<T: 'static>(init: impl FnOnce() -> T) -> Signal<T> {
    let invalidator = current_invalidator();
    let slot = remember(move || {
        let s = signal(init());
        s.subscribe(move |_| invalidator.invalidate());
        s
    });
    (*slot).clone()
}
