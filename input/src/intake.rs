//! Drop intake: drop zone and file picker → remote `process-image`.
//!
//! A [`DropIntake`] is mounted on a host element containing a drop zone and
//! a file input. Both sources are normalized into one file, which is
//! validated, decoded and pushed to the remote process. Validation failures
//! are pushed as `show-error` instead.
//!
//! # Lifecycle
//!
//! ```text
//! attach(host) ── query drop zone / file input / preview
//!      │          subscribe dragenter, dragover, dragleave, drop, change
//!      ▼
//! events ──▶ intake(files) ── validate ──▶ spawn decode ──▶ deliver (if ticket current)
//!      │
//! detach() ── drop subscriptions, invalidate tickets, reset hover class
//! ```
//!
//! Listener closures only hold a weak reference to the component, so a
//! dropped `DropIntake` releases everything even if the host keeps firing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::config::IntakeConfig;
use crate::decode::{DecodedImage, decode_file};
use crate::dom::{DomEvent, Element, EventHandler, EventKind, Subscription};
use crate::drag::{DragFeedback, DragState};
use crate::error::{DecodeError, IntakeError};
use crate::file::{RawFile, first_file};
use crate::generation::{Generation, Ticket};
use crate::remote::{RemoteChannel, RemoteEvent};
use crate::spawn::LocalSpawner;
use crate::validate::validate;

/// Message pushed when a validated file cannot be read.
pub const READ_FAILURE_MESSAGE: &str = "Could not read the selected file";

/// Immediate result of handing files to the intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeStatus {
    /// The source carried no file. Nothing was sent.
    Empty,
    /// The file failed validation. A `show-error` was sent.
    Rejected(IntakeError),
    /// The file passed validation and is being decoded.
    Decoding(Ticket),
}

/// What happened when a decode completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// A newer request or a teardown superseded this one. Nothing was sent.
    Stale,
    Failed,
}

struct Mount {
    drop_zone: Option<Rc<dyn Element>>,
    preview: Option<Rc<dyn Element>>,
    drag: DragFeedback,
    subscriptions: Vec<Subscription>,
}

struct Inner {
    channel: Rc<dyn RemoteChannel>,
    spawner: Rc<dyn LocalSpawner>,
    generation: Generation,
    config: RefCell<IntakeConfig>,
    mount: RefCell<Option<Mount>>,
}

/// Drag-and-drop and file-picker intake bound to one host element.
pub struct DropIntake {
    inner: Rc<Inner>,
}

impl DropIntake {
    pub fn new(channel: Rc<dyn RemoteChannel>, spawner: Rc<dyn LocalSpawner>) -> Self {
        Self {
            inner: Rc::new(Inner {
                channel,
                spawner,
                generation: Generation::default(),
                config: RefCell::new(IntakeConfig::default()),
                mount: RefCell::new(None),
            }),
        }
    }

    /// Wires the drop zone and file input found under `host`.
    ///
    /// Either may be missing; whichever exists is wired. Attaching an
    /// already attached intake detaches it first.
    pub fn attach(&self, host: &dyn Element, config: IntakeConfig) {
        if self.is_attached() {
            log::debug!(target: "imgdrop_input::intake", "re-attach, detaching previous mount");
            self.detach();
        }

        let drop_zone = host.query_selector(&config.drop_zone_selector);
        let file_input = host.query_selector(&config.file_input_selector);
        let preview = host.query_selector(&config.preview_selector);

        let mut subscriptions = Vec::with_capacity(EventKind::DRAG.len() + 1);
        match &drop_zone {
            Some(zone) => {
                for kind in EventKind::DRAG {
                    subscriptions.push(zone.listen(kind, self.handler(Inner::on_drag_event)));
                }
            }
            None => log::debug!(
                target: "imgdrop_input::intake",
                "no drop zone matches {:?}",
                config.drop_zone_selector
            ),
        }
        match &file_input {
            Some(input) => {
                subscriptions.push(input.listen(EventKind::Change, self.handler(Inner::on_change)));
            }
            None => log::debug!(
                target: "imgdrop_input::intake",
                "no file input matches {:?}",
                config.file_input_selector
            ),
        }

        log::debug!(
            target: "imgdrop_input::intake",
            "attached listeners={} preview={}",
            subscriptions.len(),
            preview.is_some()
        );

        let drag = DragFeedback::new(config.hover_class.clone());
        *self.inner.config.borrow_mut() = config;
        *self.inner.mount.borrow_mut() = Some(Mount {
            drop_zone,
            preview,
            drag,
            subscriptions,
        });
    }

    /// Removes every listener added by [`attach`](Self::attach).
    ///
    /// Decodes still in flight complete without delivering anything.
    pub fn detach(&self) {
        let Some(mount) = self.inner.mount.borrow_mut().take() else {
            return;
        };
        self.inner.generation.invalidate();
        if let Some(zone) = &mount.drop_zone {
            mount.drag.reset(zone.as_ref());
        }
        log::debug!(
            target: "imgdrop_input::intake",
            "detached listeners={}",
            mount.subscriptions.len()
        );
    }

    pub fn is_attached(&self) -> bool {
        self.inner.mount.borrow().is_some()
    }

    /// Current hover state of the drop zone. `Idle` when detached.
    pub fn drag_state(&self) -> DragState {
        self.inner
            .mount
            .borrow()
            .as_ref()
            .map_or(DragState::Idle, |mount| mount.drag.state())
    }

    /// Validates the first of `files` and starts decoding it.
    pub fn intake(&self, files: &[Rc<dyn RawFile>]) -> IntakeStatus {
        Inner::intake(&self.inner, files)
    }

    fn handler(&self, on_event: fn(&Rc<Inner>, &dyn DomEvent)) -> EventHandler {
        let weak = Rc::downgrade(&self.inner);
        Rc::new(move |event: &dyn DomEvent| {
            if let Some(inner) = weak.upgrade() {
                on_event(&inner, event);
            }
        })
    }
}

impl fmt::Debug for DropIntake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropIntake")
            .field("attached", &self.is_attached())
            .field("drag_state", &self.drag_state())
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn on_drag_event(this: &Rc<Self>, event: &dyn DomEvent) {
        event.prevent_default();
        event.stop_propagation();

        let kind = event.kind();
        if let Some(mount) = this.mount.borrow().as_ref()
            && let Some(zone) = &mount.drop_zone
        {
            mount.drag.apply(kind, zone.as_ref());
        }

        if kind == EventKind::Drop {
            Self::intake(this, &event.files());
        }
    }

    fn on_change(this: &Rc<Self>, event: &dyn DomEvent) {
        event.prevent_default();
        Self::intake(this, &event.files());
    }

    fn intake(this: &Rc<Self>, files: &[Rc<dyn RawFile>]) -> IntakeStatus {
        let Some(file) = first_file(files) else {
            log::trace!(target: "imgdrop_input::intake", "source carried no file");
            return IntakeStatus::Empty;
        };

        if let Err(err) = validate(file.as_ref(), &this.config.borrow()) {
            log::warn!(
                target: "imgdrop_input::intake",
                "rejected name={} mime={:?} size={}: {err}",
                file.name(),
                file.mime_type(),
                file.size()
            );
            this.push_error(err.to_string());
            return IntakeStatus::Rejected(err);
        }

        let ticket = this.generation.issue();
        log::debug!(
            target: "imgdrop_input::intake",
            "decoding name={} size={} ticket={}",
            file.name(),
            file.size(),
            ticket.value()
        );

        let weak = Rc::downgrade(this);
        this.spawner.spawn_local(Box::pin(async move {
            let result = decode_file(file.as_ref()).await;
            match weak.upgrade() {
                Some(inner) => {
                    let delivery = inner.complete(ticket, result);
                    log::debug!(
                        target: "imgdrop_input::intake",
                        "ticket={} delivery={delivery:?}",
                        ticket.value()
                    );
                }
                None => log::debug!(
                    target: "imgdrop_input::intake",
                    "intake dropped before ticket={} completed",
                    ticket.value()
                ),
            }
        }));

        IntakeStatus::Decoding(ticket)
    }

    fn complete(&self, ticket: Ticket, result: Result<DecodedImage, DecodeError>) -> Delivery {
        if !self.generation.is_current(ticket) {
            log::warn!(
                target: "imgdrop_input::intake",
                "discarding stale decode ticket={}",
                ticket.value()
            );
            return Delivery::Stale;
        }

        match result {
            Ok(image) => {
                self.show_preview(&image);
                let event = self.config.borrow().process_event.clone();
                log::info!(
                    target: "imgdrop_input::intake",
                    "push {event} payload_len={}",
                    image.payload().len()
                );
                self.channel.push(RemoteEvent::ProcessImage {
                    event,
                    image: image.into_payload(),
                });
                Delivery::Delivered
            }
            Err(err) => {
                log::warn!(target: "imgdrop_input::intake", "decode failed: {err}");
                self.push_error(READ_FAILURE_MESSAGE.to_owned());
                Delivery::Failed
            }
        }
    }

    fn show_preview(&self, image: &DecodedImage) {
        let mount = self.mount.borrow();
        let Some(preview) = mount.as_ref().and_then(|mount| mount.preview.as_ref()) else {
            return;
        };
        preview.set_source(image.payload());
        preview.remove_class(&self.config.borrow().hidden_class);
    }

    fn push_error(&self, message: String) {
        let event = self.config.borrow().error_event.clone();
        self.channel.push(RemoteEvent::ShowError { event, message });
    }
}
