//! Observer registry for the selector bridge.
//!
//! Instead of searching the document for a tagged element when a decode
//! completes, observers register a callback under an identifier when they
//! mount and drop their [`ObserverGuard`] when they unmount.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

/// Local notification carrying a decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSelected {
    /// Notification name, e.g. `imageSelected`.
    pub event: String,
    pub image: String,
}

impl ImageSelected {
    /// The `detail` object of the dispatched event: `{ "image": .. }`.
    pub fn detail(&self) -> Value {
        serde_json::json!({ "image": self.image })
    }
}

pub type ObserverCallback = Rc<dyn Fn(&ImageSelected)>;

struct Entry {
    serial: u64,
    callback: ObserverCallback,
}

#[derive(Default)]
struct Inner {
    observers: RefCell<HashMap<String, Entry>>,
    next_serial: Cell<u64>,
}

/// Shared map from observer identifier to callback.
///
/// Cloning is cheap; clones share the same map.
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    inner: Rc<Inner>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` under `id`, replacing any earlier observer.
    ///
    /// The observer stays registered until the returned guard is dropped.
    /// Dropping the guard of a replaced registration leaves the newer one
    /// in place.
    #[must_use = "the observer is unregistered as soon as the guard is dropped"]
    pub fn register(&self, id: impl Into<String>, callback: ObserverCallback) -> ObserverGuard {
        let id = id.into();
        let serial = self.inner.next_serial.get() + 1;
        self.inner.next_serial.set(serial);

        let replaced = self
            .inner
            .observers
            .borrow_mut()
            .insert(id.clone(), Entry { serial, callback })
            .is_some();
        log::debug!(
            target: "imgdrop_input::registry",
            "register observer={id} replaced={replaced}"
        );

        ObserverGuard {
            registry: Rc::downgrade(&self.inner),
            id,
            serial,
        }
    }

    fn lookup(&self, id: &str) -> Option<ObserverCallback> {
        self.inner
            .observers
            .borrow()
            .get(id)
            .map(|entry| Rc::clone(&entry.callback))
    }

    /// Delivers `notification` to the observer registered under `id`.
    ///
    /// Returns `false` when no such observer exists.
    pub fn notify(&self, id: &str, notification: &ImageSelected) -> bool {
        // Clone the callback out first so it may re-enter the registry.
        match self.lookup(id) {
            Some(callback) => {
                callback(notification);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.observers.borrow().contains_key(id)
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let observers = self.inner.observers.borrow();
        f.debug_struct("ObserverRegistry")
            .field("observers", &observers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Keeps an observer registered. Unregisters it on drop.
#[derive(Debug)]
pub struct ObserverGuard {
    registry: Weak<Inner>,
    id: String,
    serial: u64,
}

impl ObserverGuard {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        let mut observers = inner.observers.borrow_mut();
        if observers.get(&self.id).is_some_and(|entry| entry.serial == self.serial) {
            observers.remove(&self.id);
            log::debug!(target: "imgdrop_input::registry", "unregister observer={}", self.id);
        }
    }
}
