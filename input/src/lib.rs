//! Image intake for imgdrop: file picker and drag-and-drop ingestion.
//!
//! This crate holds the platform-independent half of the intake pipeline:
//! a file picked or dropped by the user is validated, decoded into a
//! data URI and delivered to exactly one downstream consumer.
//!
//! # Modules
//!
//! - [`file`]: Files as handed over by the platform ([`RawFile`], [`MemoryFile`])
//! - [`validate`]: Type and size policy for incoming files
//! - [`decode`]: Data-URI codec ([`DecodedImage`])
//! - [`drag`]: Hover feedback state machine for drop zones
//! - [`generation`]: Tickets that let late decode completions be discarded
//! - [`dom`]: Host element, document and event abstractions
//! - [`remote`]: Messages pushed to the remote process
//! - [`registry`]: Explicit observer registry used by the selector bridge
//! - [`bridge`]: [`SelectorBridge`], file input → local `imageSelected` notification
//! - [`intake`]: [`DropIntake`], drop zone + file input → remote `process-image`
//!
//! # Design Philosophy
//!
//! Everything that touches the browser goes through a trait:
//! - Production implementations live in `imgdrop-web` and wrap `web-sys`
//! - Test implementations fake the DOM so every behavior runs natively

pub mod bridge;
pub mod config;
pub mod decode;
pub mod dom;
pub mod drag;
pub mod error;
pub mod file;
pub mod generation;
pub mod intake;
pub mod registry;
pub mod remote;
pub mod spawn;
pub mod validate;

pub use bridge::{SelectionStatus, SelectorBridge};
pub use config::{IntakeConfig, SelectorConfig};
pub use decode::DecodedImage;
pub use dom::{Document, DomEvent, Element, EventHandler, EventKind, Subscription};
pub use drag::{DragFeedback, DragState};
pub use error::{BridgeError, ConfigError, DecodeError, IntakeError};
pub use file::{MemoryFile, RawFile, ReadFuture};
pub use generation::{Generation, Ticket};
pub use intake::{Delivery, DropIntake, IntakeStatus};
pub use registry::{ImageSelected, ObserverGuard, ObserverRegistry};
pub use remote::{RemoteChannel, RemoteEvent};
pub use spawn::{LocalSpawner, LocalTask};
pub use validate::validate;
