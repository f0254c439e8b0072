//! Selector bridge: file input → local `imageSelected` notification.
//!
//! The bridge connects a file input to the designated observer
//! ([`SelectorConfig::observer_id`]) mounted somewhere else on the page. When
//! a selection finishes decoding, the bridge checks that the observer is
//! registered in the [`ObserverRegistry`], fills the page's preview slot if
//! there is one, and notifies the observer exactly once.
//!
//! A missing observer is logged and dropped: nothing is retried and the
//! preview is left untouched.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::config::SelectorConfig;
use crate::decode::{DecodedImage, decode_file};
use crate::dom::{Document, DomEvent, Element, EventHandler, EventKind, Subscription};
use crate::error::{BridgeError, DecodeError};
use crate::file::first_file;
use crate::generation::{Generation, Ticket};
use crate::intake::Delivery;
use crate::registry::{ImageSelected, ObserverRegistry};
use crate::spawn::LocalSpawner;

/// Immediate result of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    /// The input had no selected file. Nothing happens.
    NoFile,
    Decoding(Ticket),
}

struct Inner {
    document: Rc<dyn Document>,
    registry: ObserverRegistry,
    spawner: Rc<dyn LocalSpawner>,
    generation: Generation,
    config: SelectorConfig,
    subscription: RefCell<Option<Subscription>>,
}

/// Bridges a file input to a separately mounted observer.
pub struct SelectorBridge {
    inner: Rc<Inner>,
}

impl SelectorBridge {
    pub fn new(
        document: Rc<dyn Document>,
        registry: ObserverRegistry,
        spawner: Rc<dyn LocalSpawner>,
        config: SelectorConfig,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                document,
                registry,
                spawner,
                generation: Generation::default(),
                config,
                subscription: RefCell::new(None),
            }),
        }
    }

    /// Starts decoding the input's first selected file.
    ///
    /// `hook_id` identifies the caller in log lines only. The notification
    /// always goes to the configured observer.
    pub fn handle_selection(&self, input: &dyn Element, hook_id: &str) -> SelectionStatus {
        Inner::handle_selection(&self.inner, input, hook_id)
    }

    /// Listens for `change` on `input`, notifying the configured observer.
    pub fn attach(&self, input: &Rc<dyn Element>) {
        let weak = Rc::downgrade(&self.inner);
        let source = Rc::downgrade(input);
        let handler: EventHandler = Rc::new(move |_event: &dyn DomEvent| {
            if let (Some(inner), Some(input)) = (weak.upgrade(), source.upgrade()) {
                let hook_id = inner.config.observer_id.clone();
                Inner::handle_selection(&inner, input.as_ref(), &hook_id);
            }
        });

        let subscription = input.listen(EventKind::Change, handler);
        if self.inner.subscription.borrow_mut().replace(subscription).is_some() {
            log::debug!(target: "imgdrop_input::bridge", "re-attach replaced previous input");
        }
    }

    /// Stops listening and suppresses decodes still in flight.
    pub fn detach(&self) {
        self.inner.generation.invalidate();
        let had_listener = self.inner.subscription.borrow_mut().take().is_some();
        log::debug!(target: "imgdrop_input::bridge", "detached listener={had_listener}");
    }

    pub fn is_attached(&self) -> bool {
        self.inner.subscription.borrow().is_some()
    }

    pub fn registry(&self) -> &ObserverRegistry {
        &self.inner.registry
    }
}

impl fmt::Debug for SelectorBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorBridge")
            .field("config", &self.inner.config)
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn handle_selection(this: &Rc<Self>, input: &dyn Element, hook_id: &str) -> SelectionStatus {
        let Some(file) = first_file(&input.selected_files()) else {
            log::trace!(target: "imgdrop_input::bridge", "hook={hook_id} no file selected");
            return SelectionStatus::NoFile;
        };

        let ticket = this.generation.issue();
        log::debug!(
            target: "imgdrop_input::bridge",
            "hook={hook_id} decoding name={} ticket={}",
            file.name(),
            ticket.value()
        );

        let weak = Rc::downgrade(this);
        let hook_id = hook_id.to_owned();
        this.spawner.spawn_local(Box::pin(async move {
            let result = decode_file(file.as_ref()).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            match inner.complete(ticket, &hook_id, result) {
                Ok(delivery) => log::debug!(
                    target: "imgdrop_input::bridge",
                    "hook={hook_id} ticket={} delivery={delivery:?}",
                    ticket.value()
                ),
                Err(err @ BridgeError::MissingObserver { .. }) => {
                    log::error!(target: "imgdrop_input::bridge", "{err}");
                }
                Err(err) => log::warn!(
                    target: "imgdrop_input::bridge",
                    "hook={hook_id} selection dropped: {err}"
                ),
            }
        }));

        SelectionStatus::Decoding(ticket)
    }

    fn complete(
        &self,
        ticket: Ticket,
        hook_id: &str,
        result: Result<DecodedImage, DecodeError>,
    ) -> Result<Delivery, BridgeError> {
        if !self.generation.is_current(ticket) {
            log::warn!(
                target: "imgdrop_input::bridge",
                "hook={hook_id} discarding stale decode ticket={}",
                ticket.value()
            );
            return Ok(Delivery::Stale);
        }
        let image = result?;

        let observer_id = &self.config.observer_id;
        let missing = || BridgeError::MissingObserver {
            observer_id: observer_id.clone(),
        };
        if !self.registry.contains(observer_id) {
            return Err(missing());
        }

        self.show_preview(&image);

        let notification = ImageSelected {
            event: self.config.selected_event.clone(),
            image: image.into_payload(),
        };
        log::info!(
            target: "imgdrop_input::bridge",
            "dispatch {} observer={observer_id} hook={hook_id}",
            notification.event
        );
        if self.registry.notify(observer_id, &notification) {
            Ok(Delivery::Delivered)
        } else {
            Err(missing())
        }
    }

    fn show_preview(&self, image: &DecodedImage) {
        let image_slot = self.document.element_by_id(&self.config.preview_image_id);
        let container = self.document.element_by_id(&self.config.preview_container_id);
        if let (Some(image_slot), Some(container)) = (image_slot, container) {
            image_slot.set_source(image.payload());
            container.remove_class(&self.config.hidden_class);
        }
    }
}
