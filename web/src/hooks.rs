//! JS-facing hooks.
//!
//! A page script creates one hook per mounted element and calls `mounted()`
//! / `destroyed()` as the element enters and leaves the page:
//!
//! ```js
//! const hook = new DropIntakeHook(el, (name, payload) => live.pushEvent(name, payload));
//! hook.mounted();
//! // later
//! hook.destroyed();
//! ```
//!
//! Observers and the selector bridge are per page, so they live in
//! thread-local state shared by every hook.

use std::cell::OnceCell;
use std::rc::Rc;

use imgdrop_input::registry::ObserverCallback;
use imgdrop_input::{
    DropIntake, ImageSelected, IntakeConfig, ObserverGuard, ObserverRegistry, SelectionStatus,
    SelectorBridge, SelectorConfig,
};
use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, HtmlInputElement};

use crate::dom::{JsPushEvent, WasmSpawner, WebDocument, WebElement, describe};

const LOG_TARGET: &str = "imgdrop_web::hooks";

/// Attribute holding an [`IntakeConfig`] as JSON.
pub const CONFIG_ATTRIBUTE: &str = "data-intake-config";

thread_local! {
    static REGISTRY: ObserverRegistry = ObserverRegistry::new();
    static BRIDGE: OnceCell<SelectorBridge> = const { OnceCell::new() };
}

fn with_bridge<R>(f: impl FnOnce(&SelectorBridge) -> R) -> Option<R> {
    BRIDGE.with(|cell| {
        let bridge = match cell.get() {
            Some(bridge) => bridge,
            None => {
                let document = WebDocument::current()?;
                let registry = REGISTRY.with(ObserverRegistry::clone);
                cell.get_or_init(|| {
                    SelectorBridge::new(
                        Rc::new(document),
                        registry,
                        Rc::new(WasmSpawner),
                        SelectorConfig::default(),
                    )
                })
            }
        };
        Some(f(bridge))
    })
}

/// Drop zone + file picker that pushes decoded images to the server.
#[wasm_bindgen]
pub struct DropIntakeHook {
    element: WebElement,
    config: IntakeConfig,
    intake: DropIntake,
}

#[wasm_bindgen]
impl DropIntakeHook {
    /// `push_event(name, payload)` receives `process-image` and `show-error`.
    ///
    /// Configuration comes from `config_json`, else from the element's
    /// `data-intake-config` attribute, else the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        el: web_sys::Element,
        push_event: Function,
        config_json: Option<String>,
    ) -> Result<Self, JsError> {
        let config = match config_json.or_else(|| el.get_attribute(CONFIG_ATTRIBUTE)) {
            Some(json) => IntakeConfig::from_json(&json)?,
            None => IntakeConfig::default(),
        };
        let intake = DropIntake::new(Rc::new(JsPushEvent::new(push_event)), Rc::new(WasmSpawner));
        Ok(Self {
            element: WebElement::new(el),
            config,
            intake,
        })
    }

    pub fn mounted(&self) {
        self.intake.attach(&self.element, self.config.clone());
    }

    pub fn destroyed(&self) {
        self.intake.detach();
    }
}

/// Receives `imageSelected` for selections made through [`handle_image_select`].
#[wasm_bindgen]
pub struct ImageObserverHook {
    element: web_sys::Element,
    observer_id: String,
    guard: Option<ObserverGuard>,
}

#[wasm_bindgen]
impl ImageObserverHook {
    #[wasm_bindgen(constructor)]
    pub fn new(el: web_sys::Element, observer_id: Option<String>) -> Self {
        Self {
            element: el,
            observer_id: observer_id.unwrap_or_else(|| SelectorConfig::default().observer_id),
            guard: None,
        }
    }

    /// Registers this element as the observer for its id.
    pub fn mounted(&mut self) {
        let element = self.element.clone();
        let callback: ObserverCallback =
            Rc::new(move |selected: &ImageSelected| dispatch_selected(&element, selected));
        let guard = REGISTRY.with(|registry| registry.register(self.observer_id.clone(), callback));
        log::debug!(target: LOG_TARGET, "observer {} mounted", self.observer_id);
        self.guard = Some(guard);
    }

    pub fn destroyed(&mut self) {
        if self.guard.take().is_some() {
            log::debug!(target: LOG_TARGET, "observer {} destroyed", self.observer_id);
        }
    }
}

fn dispatch_selected(element: &web_sys::Element, selected: &ImageSelected) {
    let detail = match js_sys::JSON::parse(&selected.detail().to_string()) {
        Ok(detail) => detail,
        Err(err) => {
            log::error!(target: LOG_TARGET, "encode {}: {}", selected.event, describe(&err));
            return;
        }
    };
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let dispatched = CustomEvent::new_with_event_init_dict(&selected.event, &init)
        .and_then(|event| element.dispatch_event(&event));
    if let Err(err) = dispatched {
        log::error!(target: LOG_TARGET, "dispatch {}: {}", selected.event, describe(&err));
    }
}

/// Decodes the first file selected in `input` and notifies the page's
/// designated observer. `hook_id` only tags the log lines.
#[wasm_bindgen(js_name = handleImageSelect)]
pub fn handle_image_select(input: &HtmlInputElement, hook_id: &str) -> Result<(), JsError> {
    let input = WebElement::new(web_sys::Element::from(input.clone()));
    let status = with_bridge(|bridge| bridge.handle_selection(&input, hook_id))
        .ok_or_else(|| JsError::new("no document available"))?;
    if status == SelectionStatus::NoFile {
        log::debug!(target: LOG_TARGET, "hook={hook_id} nothing selected");
    }
    Ok(())
}
