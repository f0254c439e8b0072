//! Host DOM abstractions.
//!
//! The intake components never talk to `web-sys` directly. They see elements,
//! a document and events through the traits below, which `imgdrop-web`
//! implements over the real DOM and tests implement with in-memory fakes.
//!
//! # Listener lifetime
//!
//! [`Element::listen`] returns a [`Subscription`]. The listener stays
//! attached exactly as long as the subscription lives: dropping it (or
//! calling [`Subscription::cancel`]) detaches the listener. Components keep
//! their subscriptions as private fields, so tearing a component down removes
//! precisely what mounting it added.

use std::fmt;
use std::rc::Rc;

use crate::file::RawFile;

/// DOM events the intake components react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DragEnter,
    DragOver,
    DragLeave,
    Drop,
    Change,
}

impl EventKind {
    /// The four drag lifecycle events observed on a drop zone.
    pub const DRAG: [Self; 4] = [Self::DragEnter, Self::DragOver, Self::DragLeave, Self::Drop];

    /// DOM event name, as passed to `addEventListener`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DragEnter => "dragenter",
            Self::DragOver => "dragover",
            Self::DragLeave => "dragleave",
            Self::Drop => "drop",
            Self::Change => "change",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event delivered to a listener.
pub trait DomEvent {
    fn kind(&self) -> EventKind;

    /// Suppresses the platform default, e.g. navigating to a dropped file.
    fn prevent_default(&self);

    fn stop_propagation(&self);

    /// Files carried by the event: the drop payload for `drop`,
    /// the input's selection for `change`, empty otherwise.
    fn files(&self) -> Vec<Rc<dyn RawFile>>;
}

pub type EventHandler = Rc<dyn Fn(&dyn DomEvent)>;

/// A DOM element as seen by the intake components.
pub trait Element {
    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    fn has_class(&self, class: &str) -> bool;

    /// Sets the `src` of an image element.
    fn set_source(&self, source: &str);

    /// First descendant matching a CSS selector.
    fn query_selector(&self, selector: &str) -> Option<Rc<dyn Element>>;

    /// Files currently selected in a file input. Empty for other elements.
    fn selected_files(&self) -> Vec<Rc<dyn RawFile>>;

    fn listen(&self, kind: EventKind, handler: EventHandler) -> Subscription;
}

/// Document-level lookups.
pub trait Document {
    fn element_by_id(&self, id: &str) -> Option<Rc<dyn Element>>;
}

/// Keeps one listener attached; detaches it when dropped.
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct Subscription {
    kind: EventKind,
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wraps the host-specific removal of a listener.
    pub fn new(kind: EventKind, detach: impl FnOnce() + 'static) -> Self {
        Self {
            kind,
            detach: Some(Box::new(detach)),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn cancel(mut self) {
        self.run_detach();
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn event_names_match_dom() {
        let names: Vec<_> = EventKind::DRAG.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ["dragenter", "dragover", "dragleave", "drop"]);
        assert_eq!(EventKind::Change.to_string(), "change");
    }

    #[test]
    fn subscription_detaches_once_on_drop() {
        let detached = Rc::new(Cell::new(0));
        let counter = Rc::clone(&detached);
        let subscription = Subscription::new(EventKind::Drop, move || counter.set(counter.get() + 1));

        assert_eq!(subscription.kind(), EventKind::Drop);
        drop(subscription);
        assert_eq!(detached.get(), 1);
    }

    #[test]
    fn cancel_does_not_detach_twice() {
        let detached = Rc::new(Cell::new(0));
        let counter = Rc::clone(&detached);
        let subscription = Subscription::new(EventKind::Change, move || counter.set(counter.get() + 1));

        subscription.cancel();
        assert_eq!(detached.get(), 1);
    }
}
