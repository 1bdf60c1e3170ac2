//! # Action abstraction: configured reactions to events.
//!
//! This module defines the [`Action`] trait and the [`ActionHandler`]
//! adapter that lets a configured action sit on the bus like any other
//! handler. The common handle type is [`ActionRef`], an `Arc<dyn Action>`
//! shared between the registry and the subscriptions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ActionError, HandlerError};
use crate::events::{Event, Handler};

/// Shared handle to a configured action.
pub type ActionRef = Arc<dyn Action>;

/// # A configured reaction to an event firing.
///
/// Actions are constructed once at startup from an identifier and an
/// argument string, then invoked arbitrarily often. Both identity methods
/// feed logs: [`describe`](Action::describe) reads as a sentence,
/// [`identify`](Action::identify) is the canonical `<id>:<args>` form.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use gatehouse::{Action, ActionError, Event};
///
/// struct RingChime;
///
/// #[async_trait]
/// impl Action for RingChime {
///     async fn execute(&self, event: &Event) -> Result<(), ActionError> {
///         let _ = event.seq;
///         // pulse the chime output...
///         Ok(())
///     }
///
///     fn describe(&self) -> String {
///         "ring the hallway chime".to_string()
///     }
///
///     fn identify(&self) -> String {
///         "chime:hallway".to_string()
///     }
/// }
/// ```
#[async_trait]
pub trait Action: Send + Sync {
    /// Executes the action for one event firing.
    async fn execute(&self, event: &Event) -> Result<(), ActionError>;

    /// Human-readable description, e.g. `save a snapshot fetched from <url>`.
    fn describe(&self) -> String;

    /// Canonical identity, e.g. `snap_url:<url>`.
    fn identify(&self) -> String;
}

impl std::fmt::Debug for dyn Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("identity", &self.identify())
            .finish()
    }
}

/// Adapts an [`Action`] to the [`Handler`] trait.
///
/// Execution failures are wrapped with the action's identity and
/// description, so the dispatch-boundary log names exactly which
/// configured action failed.
pub struct ActionHandler {
    action: ActionRef,
    identity: String,
}

impl ActionHandler {
    /// Wraps `action` for subscription.
    pub fn new(action: ActionRef) -> Self {
        let identity = action.identify();
        Self { action, identity }
    }

    /// Wraps `action` and returns it as a shared handler handle.
    pub fn arc(action: ActionRef) -> Arc<Self> {
        Arc::new(Self::new(action))
    }

    /// The wrapped action.
    #[inline]
    pub fn action(&self) -> &ActionRef {
        &self.action
    }
}

#[async_trait]
impl Handler for ActionHandler {
    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        self.action
            .execute(event)
            .await
            .map_err(|source| HandlerError::Action {
                identity: self.action.identify(),
                description: self.action.describe(),
                source,
            })
    }

    fn name(&self) -> &str {
        &self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::ConfigError;

    struct Refusing;

    #[async_trait]
    impl Action for Refusing {
        async fn execute(&self, _event: &Event) -> Result<(), ActionError> {
            Err(ActionError::Config(ConfigError::EmptyPath))
        }

        fn describe(&self) -> String {
            "refuse every firing".to_string()
        }

        fn identify(&self) -> String {
            "refuse:".to_string()
        }
    }

    #[tokio::test]
    async fn test_handler_failure_carries_both_identity_strings() {
        let handler = ActionHandler::new(Arc::new(Refusing));
        let err = handler
            .handle(&Event::new("OnDoorbell", "test"))
            .await
            .expect_err("refusing action must surface a handler error");

        let shown = err.to_string();
        assert!(shown.contains("refuse:"), "display must name the action: {shown}");
        assert!(
            shown.contains("refuse every firing"),
            "display must describe the action: {shown}"
        );
    }

    #[tokio::test]
    async fn test_handler_name_is_the_action_identity() {
        let handler = ActionHandler::new(Arc::new(Refusing));
        assert_eq!(handler.name(), "refuse:");
    }
}
