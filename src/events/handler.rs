//! # Handler trait for subscribed event consumers.
//!
//! A [`Handler`] receives events for the names it was subscribed under.
//! Failures are returned, never thrown across the dispatch boundary: the
//! bus catches both `Err` results and panics, logs them with the event
//! name, source and handler identity, and shields sibling handlers and
//! the firing caller.
//!
//! [`FnHandler`] adapts an async closure for the common case where a full
//! type is not worth writing.
//!
//! ## Implementing custom handlers
//! ```rust
//! use async_trait::async_trait;
//! use gatehouse::{Event, Handler, HandlerError};
//!
//! struct RelayPulse;
//!
//! #[async_trait]
//! impl Handler for RelayPulse {
//!     async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
//!         let _ = event;
//!         // drive the relay...
//!         Ok(())
//!     }
//! }
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::events::Event;

/// Shared handle to a subscribed handler.
pub type HandlerRef = Arc<dyn Handler>;

/// An event consumer subscribed to one or more event names.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handles one delivered event.
    async fn handle(&self, event: &Event) -> Result<(), HandlerError>;

    /// Identity used in dispatch logs.
    ///
    /// Defaults to the implementing type's name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Function-backed handler.
///
/// Wraps a closure that receives the delivered event by value and returns
/// a fresh future per delivery, so there is no shared mutable state unless
/// the closure captures some explicitly.
pub struct FnHandler<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> FnHandler<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`FnHandler::arc`] when you immediately need a [`HandlerRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the handler and returns it as a shared handle.
    ///
    /// ## Example
    /// ```rust
    /// use gatehouse::{Event, FnHandler, HandlerError, HandlerRef};
    ///
    /// let h: HandlerRef = FnHandler::arc("greeter", |ev: Event| async move {
    ///     let _ = ev.seq;
    ///     Ok::<_, HandlerError>(())
    /// });
    /// assert_eq!(h.name(), "greeter");
    /// ```
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Event) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        (self.f)(event.clone()).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
