//! # Startup-time registry of action factories.
//!
//! Configuration names actions by identifier (`snap_url`, `snap_device`)
//! with a raw argument string. [`Registry`] maps identifiers to
//! [`Factory`] closures that parse the arguments, probe whatever
//! capability the action depends on, and hand back a ready [`ActionRef`].
//!
//! ## Rules
//! - Registration happens only through the consuming [`RegistryBuilder`]
//!   before startup completes; a built registry is immutable, so
//!   construction never races with registration.
//! - Factories fail fast: a bad argument or an unavailable capability is
//!   a [`ConfigError`] at construction time, not on the first firing.
//! - Constructing an unregistered identifier fails without creating
//!   anything.
//!
//! ## Example
//! ```
//! use gatehouse::{ConfigError, Registry};
//!
//! fn noop_factory() -> gatehouse::Factory {
//!     Box::new(|_args: &str| Err(ConfigError::InvalidArgs {
//!         id: "noop".to_string(),
//!         reason: "always refused".to_string(),
//!     }))
//! }
//!
//! let registry = Registry::builder()
//!     .register("noop", noop_factory())
//!     .build();
//! assert!(registry.contains("noop"));
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::error::ConfigError;

use super::action::ActionRef;

/// Constructor for one action type: raw argument string in, ready action
/// out.
pub type Factory = Box<dyn Fn(&str) -> Result<ActionRef, ConfigError> + Send + Sync>;

/// Immutable identifier-to-factory table.
pub struct Registry {
    factories: HashMap<String, Factory>,
}

impl Registry {
    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            factories: HashMap::new(),
        }
    }

    /// Constructs an action from its identifier and raw argument string.
    ///
    /// Fails with [`ConfigError::UnknownAction`] for unregistered
    /// identifiers and with whatever the factory reports for bad
    /// arguments; no action instance exists on failure.
    pub fn construct(&self, id: &str, args: &str) -> Result<ActionRef, ConfigError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| ConfigError::UnknownAction(id.to_string()))?;
        let action = factory(args)?;
        debug!(action = %action.identify(), "constructed action");
        Ok(action)
    }

    /// True when a factory is registered under `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// All registered identifiers, ascending.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// Builder for a [`Registry`].
///
/// Consuming methods keep registration confined to startup: once
/// [`build`](RegistryBuilder::build) runs, the table cannot change.
pub struct RegistryBuilder {
    factories: HashMap<String, Factory>,
}

impl RegistryBuilder {
    /// Registers `factory` under `id`.
    ///
    /// A later registration under the same identifier replaces the
    /// earlier one.
    #[must_use]
    pub fn register(mut self, id: impl Into<String>, factory: Factory) -> Self {
        self.factories.insert(id.into(), factory);
        self
    }

    /// Finalizes the table.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            factories: self.factories,
        }
    }
}
