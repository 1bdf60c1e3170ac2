//! # Events fired through the notification core.
//!
//! An [`Event`] is a named, immutable record of something that happened:
//! a doorbell press, a call state change, a sensor edge. Names are plain
//! strings chosen by the firing subsystem (`OnDoorbell`, `OnCallConnect`);
//! handlers subscribe to exact names.
//!
//! ## Ordering guarantees
//! Every firing draws a process-wide monotonically increasing sequence
//! number (`seq`). Asynchronous delivery is unordered across handlers;
//! use `seq` to reconstruct firing order where it matters.
//!
//! ## Example
//! ```rust
//! use gatehouse::Event;
//!
//! let ev = Event::new("OnCallIncoming", "sipphone")
//!     .with_remote_uri("sip:visitor@10.0.0.21");
//!
//! assert_eq!(ev.name.as_ref(), "OnCallIncoming");
//! assert_eq!(ev.remote_uri(), Some("sip:visitor@10.0.0.21"));
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for firing order.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Payload key carrying the remote contact URI on call-related events.
const REMOTE_URI_KEY: &str = "remote_uri";

/// A named notification with an optional string payload.
///
/// - `seq`: monotonic firing id, unique within the process
/// - `at`: wall-clock timestamp (for logs)
/// - `name`: the name handlers subscribe to
/// - `source`: originating subsystem, attribution only
/// - `extra`: string payload, empty by default, never absent
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing firing id.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event name, e.g. `OnDoorbell`.
    pub name: Arc<str>,
    /// Subsystem that fired the event, e.g. `sipphone`.
    pub source: Arc<str>,
    /// String payload entries.
    pub extra: BTreeMap<String, String>,
}

impl Event {
    /// Creates a new event with the current timestamp and the next
    /// sequence number.
    pub fn new(name: impl Into<Arc<str>>, source: impl Into<Arc<str>>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            name: name.into(),
            source: source.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Attaches one payload entry.
    #[inline]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Attaches the remote contact URI payload entry.
    #[inline]
    pub fn with_remote_uri(self, uri: impl Into<String>) -> Self {
        self.with_extra(REMOTE_URI_KEY, uri)
    }

    /// Returns the remote contact URI, if the firing attached one.
    #[inline]
    pub fn remote_uri(&self) -> Option<&str> {
        self.extra.get(REMOTE_URI_KEY).map(String::as_str)
    }

    /// Rebuilds this event under another name, keeping source and payload
    /// but drawing a fresh sequence number and timestamp.
    ///
    /// Used by the bridge to derive a shadow firing from its base firing.
    pub(crate) fn renamed(&self, name: impl Into<Arc<str>>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            name: name.into(),
            source: self.source.clone(),
            extra: self.extra.clone(),
        }
    }
}
