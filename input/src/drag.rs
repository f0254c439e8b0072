//! Hover feedback for drop zones.
//!
//! Two states, driven only by drag lifecycle events:
//!
//! ```text
//! idle ──dragenter/dragover──▶ hovering ──┐ dragenter/dragover
//!  ▲                              │  ◀───┘
//!  └──────dragleave/drop──────────┘
//! ```
//!
//! `change` events never touch the state.

use std::cell::Cell;

use crate::dom::{Element, EventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Hovering,
}

impl DragState {
    /// Next state after `kind`. Non-drag events leave the state unchanged.
    pub fn next(self, kind: EventKind) -> Self {
        match kind {
            EventKind::DragEnter | EventKind::DragOver => Self::Hovering,
            EventKind::DragLeave | EventKind::Drop => Self::Idle,
            EventKind::Change => self,
        }
    }
}

/// Drag state of one drop zone, mirrored onto its hover class.
#[derive(Debug)]
pub struct DragFeedback {
    state: Cell<DragState>,
    hover_class: String,
}

impl DragFeedback {
    pub fn new(hover_class: impl Into<String>) -> Self {
        Self {
            state: Cell::new(DragState::Idle),
            hover_class: hover_class.into(),
        }
    }

    pub fn state(&self) -> DragState {
        self.state.get()
    }

    /// Applies `kind` and syncs the hover class on `zone`.
    ///
    /// The class is written on every drag event, not only on transitions, so
    /// a class removed by someone else is restored by the next `dragover`.
    pub fn apply(&self, kind: EventKind, zone: &dyn Element) -> DragState {
        let previous = self.state.get();
        let next = previous.next(kind);
        self.state.set(next);

        match (kind, next) {
            (EventKind::Change, _) => {}
            (_, DragState::Hovering) => zone.add_class(&self.hover_class),
            (_, DragState::Idle) => zone.remove_class(&self.hover_class),
        }

        if previous != next {
            log::trace!(
                target: "imgdrop_input::drag",
                "{kind} {previous:?} -> {next:?}"
            );
        }
        next
    }

    /// Forces `idle` and removes the hover class, e.g. on teardown.
    pub fn reset(&self, zone: &dyn Element) {
        self.state.set(DragState::Idle);
        zone.remove_class(&self.hover_class);
    }
}
