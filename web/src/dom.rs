//! Host trait implementations over `web-sys`.

use std::rc::Rc;

use imgdrop_input::{
    DecodeError, Document, DomEvent, Element, EventHandler, EventKind, LocalSpawner, LocalTask,
    RawFile, ReadFuture, RemoteChannel, RemoteEvent, Subscription,
};
use js_sys::{Function, Uint8Array};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::JsFuture;
use web_sys::{DragEvent, File, FileList, HtmlInputElement};

const LOG_TARGET: &str = "imgdrop_web::dom";

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn collect_files(list: &FileList) -> Vec<Rc<dyn RawFile>> {
    (0..list.length())
        .filter_map(|index| list.get(index))
        .map(|file| Rc::new(WebFile::new(file)) as Rc<dyn RawFile>)
        .collect()
}

#[derive(Debug, Clone)]
pub struct WebElement {
    element: web_sys::Element,
}

impl WebElement {
    pub fn new(element: web_sys::Element) -> Self {
        Self { element }
    }
}

impl Element for WebElement {
    fn add_class(&self, class: &str) {
        if let Err(err) = self.element.class_list().add_1(class) {
            log::warn!(target: LOG_TARGET, "add class {class}: {}", describe(&err));
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(err) = self.element.class_list().remove_1(class) {
            log::warn!(target: LOG_TARGET, "remove class {class}: {}", describe(&err));
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.element.class_list().contains(class)
    }

    fn set_source(&self, source: &str) {
        if let Err(err) = self.element.set_attribute("src", source) {
            log::warn!(target: LOG_TARGET, "set src: {}", describe(&err));
        }
    }

    fn query_selector(&self, selector: &str) -> Option<Rc<dyn Element>> {
        match self.element.query_selector(selector) {
            Ok(found) => found.map(|element| Rc::new(Self::new(element)) as Rc<dyn Element>),
            Err(err) => {
                log::warn!(target: LOG_TARGET, "bad selector {selector}: {}", describe(&err));
                None
            }
        }
    }

    fn selected_files(&self) -> Vec<Rc<dyn RawFile>> {
        self.element
            .dyn_ref::<HtmlInputElement>()
            .and_then(HtmlInputElement::files)
            .map(|list| collect_files(&list))
            .unwrap_or_default()
    }

    fn listen(&self, kind: EventKind, handler: EventHandler) -> Subscription {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            handler(&WebEvent { kind, event } as &dyn DomEvent);
        });
        let target = self.element.clone();
        if let Err(err) =
            target.add_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref())
        {
            log::error!(target: LOG_TARGET, "listen {kind}: {}", describe(&err));
        }

        Subscription::new(kind, move || {
            let removed = target
                .remove_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref());
            if let Err(err) = removed {
                log::warn!(target: LOG_TARGET, "unlisten {kind}: {}", describe(&err));
            }
        })
    }
}

#[derive(Debug, Clone)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    /// The document of the current window, if there is one.
    pub fn current() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }
}

impl Document for WebDocument {
    fn element_by_id(&self, id: &str) -> Option<Rc<dyn Element>> {
        self.document
            .get_element_by_id(id)
            .map(|element| Rc::new(WebElement::new(element)) as Rc<dyn Element>)
    }
}

struct WebEvent {
    kind: EventKind,
    event: web_sys::Event,
}

impl DomEvent for WebEvent {
    fn kind(&self) -> EventKind {
        self.kind
    }

    fn prevent_default(&self) {
        self.event.prevent_default();
    }

    fn stop_propagation(&self) {
        self.event.stop_propagation();
    }

    fn files(&self) -> Vec<Rc<dyn RawFile>> {
        let list = match self.kind {
            EventKind::Drop => self
                .event
                .dyn_ref::<DragEvent>()
                .and_then(DragEvent::data_transfer)
                .and_then(|transfer| transfer.files()),
            EventKind::Change => self
                .event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .and_then(|input| input.files()),
            EventKind::DragEnter | EventKind::DragOver | EventKind::DragLeave => None,
        };
        list.map(|list| collect_files(&list)).unwrap_or_default()
    }
}

/// A browser `File`, read through `Blob.arrayBuffer()`.
#[derive(Debug, Clone)]
pub struct WebFile {
    file: File,
}

impl WebFile {
    pub fn new(file: File) -> Self {
        Self { file }
    }
}

impl RawFile for WebFile {
    fn mime_type(&self) -> String {
        self.file.type_()
    }

    fn size(&self) -> u64 {
        self.file.size() as u64
    }

    fn name(&self) -> String {
        self.file.name()
    }

    fn read_bytes(&self) -> ReadFuture {
        let pending = JsFuture::from(self.file.array_buffer());
        Box::pin(async move {
            let buffer = pending
                .await
                .map_err(|err| DecodeError::Read(describe(&err)))?;
            Ok(Uint8Array::new(&buffer).to_vec())
        })
    }
}

/// Runs decode tasks on the browser's microtask queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct WasmSpawner;

impl LocalSpawner for WasmSpawner {
    fn spawn_local(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// Remote channel backed by a JS `pushEvent(name, payload)` function.
#[derive(Debug, Clone)]
pub struct JsPushEvent {
    push: Function,
}

impl JsPushEvent {
    pub fn new(push: Function) -> Self {
        Self { push }
    }
}

impl RemoteChannel for JsPushEvent {
    fn push(&self, event: RemoteEvent) {
        let payload = match js_sys::JSON::parse(&event.payload().to_string()) {
            Ok(payload) => payload,
            Err(err) => {
                log::error!(target: LOG_TARGET, "encode {}: {}", event.name(), describe(&err));
                return;
            }
        };
        let name = JsValue::from_str(event.name());
        if let Err(err) = self.push.call2(&JsValue::NULL, &name, &payload) {
            log::error!(target: LOG_TARGET, "push {}: {}", event.name(), describe(&err));
        }
    }
}
