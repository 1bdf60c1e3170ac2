//! Named events: data model, dispatch, shadow bridging.
//!
//! This module groups the event **data model**, the **bus** that maps
//! names to subscribed handlers, and the **bridge** that pairs every base
//! firing with a synchronous shadow firing for thread-sensitive
//! integrations.
//!
//! ## Contents
//! - [`Event`] — named notification with payload metadata
//! - [`Handler`], [`FnHandler`] — subscribed consumers
//! - [`Bus`] — async (`fire`) and sync (`fire_sync`) dispatch
//! - [`Bridge`], [`SHADOW_SUFFIX`] — dual-fire with `_S` shadow events
//!
//! ## Quick reference
//! - **Firing sources**: device integrations (via [`Bridge`]), the web
//!   layer, demos and tests (via [`Bus`] directly).
//! - **Consumers**: configured actions wrapped in
//!   [`ActionHandler`](crate::actions::ActionHandler), plus any custom
//!   [`Handler`] the embedder subscribes.

mod bridge;
mod bus;
mod event;
mod handler;

pub use bridge::{shadow_name, Bridge, SHADOW_SUFFIX};
pub use bus::Bus;
pub use event::Event;
pub use handler::{FnHandler, Handler, HandlerRef};

pub(crate) use bus::panic_message;
