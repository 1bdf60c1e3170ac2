//! Configured actions: construction, registration, capture variants.
//!
//! Actions are what configuration wires to events: an identifier plus a
//! raw argument string becomes a ready [`Action`] through the startup
//! [`Registry`], then sits on the bus wrapped in an [`ActionHandler`].
//!
//! ## Architecture
//! ```text
//!  config "snap_url:http://cam/still"
//!      │
//!      ▼
//!  Registry::construct(id, args) ──► Factory ──► probe + parse ──► ActionRef
//!                                                                    │
//!  Bus::subscribe(event, ActionHandler::arc(action)) ◄───────────────┘
//! ```
//!
//! ## Contents
//! - [`Action`], [`ActionRef`], [`ActionHandler`] — the trait and its
//!   bus adapter
//! - [`Registry`], [`RegistryBuilder`], [`Factory`] — startup-time
//!   construction
//! - [`UrlSnapshotAction`], [`DeviceSnapshotAction`], [`CaptureDevice`],
//!   [`Resolution`] — the shipped capture actions

mod action;
mod registry;
mod snapshot;

pub use action::{Action, ActionHandler, ActionRef};
pub use registry::{Factory, Registry, RegistryBuilder};
pub use snapshot::{CaptureDevice, DeviceSnapshotAction, Resolution, UrlSnapshotAction};
