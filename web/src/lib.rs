//! Browser bindings for imgdrop image intake.
//!
//! Implements the `imgdrop-input` host traits over `web-sys` and exports
//! the hooks a page script mounts:
//!
//! - [`DropIntakeHook`]: drop zone + file picker, pushes `process-image` / `show-error`
//! - [`ImageObserverHook`]: receives `imageSelected` as a DOM `CustomEvent`
//! - [`handle_image_select`]: selection entry point for file inputs
//!
//! Everything here only exists on `wasm32`; native builds see an empty crate.

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod hooks;

#[cfg(target_arch = "wasm32")]
pub use dom::{JsPushEvent, WasmSpawner, WebDocument, WebElement, WebFile};
#[cfg(target_arch = "wasm32")]
pub use hooks::{DropIntakeHook, ImageObserverHook, handle_image_select};

/// Routes `log` records to `console.*`. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging(level: log::Level) {
    if console_log::init_with_level(level).is_err() {
        log::trace!(target: "imgdrop_web::hooks", "console logger already installed");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    init_logging(log::Level::Debug);
    log::debug!(target: "imgdrop_web::hooks", "imgdrop-web {} loaded", env!("CARGO_PKG_VERSION"));
}
