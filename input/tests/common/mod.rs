//! In-memory DOM used by the integration tests.
//!
//! Elements keep a class set, a `src`, a listener table and a map of
//! selector → child, which is all the intake components look at.

#![allow(unused)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::rc::Rc;

use imgdrop_input::{
    Document, DomEvent, Element, EventHandler, EventKind, LocalSpawner, LocalTask, MemoryFile,
    RawFile, RemoteChannel, RemoteEvent, Subscription,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

type ListenerTable = Rc<RefCell<Vec<(u64, EventKind, EventHandler)>>>;

#[derive(Default)]
pub struct FakeElement {
    classes: RefCell<BTreeSet<String>>,
    source: RefCell<Option<String>>,
    children: RefCell<HashMap<String, Rc<FakeElement>>>,
    files: RefCell<Vec<Rc<dyn RawFile>>>,
    listeners: ListenerTable,
    next_listener: Cell<u64>,
}

impl FakeElement {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn with_classes(classes: &[&str]) -> Rc<Self> {
        let element = Self::new();
        for class in classes {
            element.classes.borrow_mut().insert((*class).to_owned());
        }
        element
    }

    pub fn add_child(&self, selector: &str, child: Rc<FakeElement>) {
        self.children.borrow_mut().insert(selector.to_owned(), child);
    }

    pub fn select(&self, files: Vec<Rc<dyn RawFile>>) {
        *self.files.borrow_mut() = files;
    }

    pub fn source(&self) -> Option<String> {
        self.source.borrow().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .count()
    }

    /// Delivers `event` to every listener registered for its kind.
    pub fn fire(&self, event: &FakeEvent) {
        let handlers: Vec<EventHandler> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler(event as &dyn DomEvent);
        }
    }
}

impl Element for FakeElement {
    fn add_class(&self, class: &str) {
        self.classes.borrow_mut().insert(class.to_owned());
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    fn set_source(&self, source: &str) {
        *self.source.borrow_mut() = Some(source.to_owned());
    }

    fn query_selector(&self, selector: &str) -> Option<Rc<dyn Element>> {
        self.children
            .borrow()
            .get(selector)
            .map(|child| Rc::clone(child) as Rc<dyn Element>)
    }

    fn selected_files(&self) -> Vec<Rc<dyn RawFile>> {
        self.files.borrow().clone()
    }

    fn listen(&self, kind: EventKind, handler: EventHandler) -> Subscription {
        let id = self.next_listener.get() + 1;
        self.next_listener.set(id);
        self.listeners.borrow_mut().push((id, kind, handler));

        let table = Rc::clone(&self.listeners);
        Subscription::new(kind, move || {
            table.borrow_mut().retain(|(listener, _, _)| *listener != id);
        })
    }
}

pub struct FakeEvent {
    pub kind: EventKind,
    pub files: Vec<Rc<dyn RawFile>>,
    pub default_prevented: Cell<bool>,
    pub propagation_stopped: Cell<bool>,
}

impl FakeEvent {
    pub fn new(kind: EventKind) -> Self {
        Self::with_files(kind, Vec::new())
    }

    pub fn with_files(kind: EventKind, files: Vec<Rc<dyn RawFile>>) -> Self {
        Self {
            kind,
            files,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }
}

impl DomEvent for FakeEvent {
    fn kind(&self) -> EventKind {
        self.kind
    }

    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    fn files(&self) -> Vec<Rc<dyn RawFile>> {
        self.files.clone()
    }
}

#[derive(Default)]
pub struct FakeDocument {
    by_id: RefCell<HashMap<String, Rc<FakeElement>>>,
}

impl FakeDocument {
    pub fn insert(&self, id: &str, element: Rc<FakeElement>) {
        self.by_id.borrow_mut().insert(id.to_owned(), element);
    }
}

impl Document for FakeDocument {
    fn element_by_id(&self, id: &str) -> Option<Rc<dyn Element>> {
        self.by_id
            .borrow()
            .get(id)
            .map(|element| Rc::clone(element) as Rc<dyn Element>)
    }
}

#[derive(Default)]
pub struct RecordingChannel {
    events: RefCell<Vec<RemoteEvent>>,
}

impl RecordingChannel {
    pub fn events(&self) -> Vec<RemoteEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.name() == name)
            .count()
    }

    pub fn images(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                RemoteEvent::ProcessImage { image, .. } => Some(image.clone()),
                RemoteEvent::ShowError { .. } => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                RemoteEvent::ShowError { message, .. } => Some(message.clone()),
                RemoteEvent::ProcessImage { .. } => None,
            })
            .collect()
    }
}

impl RemoteChannel for RecordingChannel {
    fn push(&self, event: RemoteEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// Spawner that queues tasks until a test runs them, in any order.
#[derive(Default)]
pub struct TaskQueue {
    tasks: RefCell<VecDeque<LocalTask>>,
}

impl TaskQueue {
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn take(&self, index: usize) -> LocalTask {
        self.tasks
            .borrow_mut()
            .remove(index)
            .expect("no task queued at index")
    }

    pub async fn run_all(&self) {
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => task.await,
                None => break,
            }
        }
    }
}

impl LocalSpawner for TaskQueue {
    fn spawn_local(&self, task: LocalTask) {
        self.tasks.borrow_mut().push_back(task);
    }
}

pub fn image_file(name: &str, bytes: Vec<u8>) -> Rc<dyn RawFile> {
    Rc::new(MemoryFile::new(name, "image/png", bytes))
}

pub fn file(name: &str, mime: &str, size: u64) -> Rc<dyn RawFile> {
    Rc::new(MemoryFile::new(name, mime, vec![0; 4]).with_reported_size(size))
}
