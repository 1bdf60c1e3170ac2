//! # Bridge: dual-fire with synchronous shadow events.
//!
//! Some integrations are thread-sensitive: a session library that
//! permanently registers every OS thread that touches it must never be
//! driven from the unbounded task-per-handler `fire` path. The [`Bridge`]
//! gives such integrations a bounded delivery channel.
//!
//! Every [`Bridge::dual_fire`] produces two firings:
//!
//! ```text
//!  dual_fire("OnDoorbell")
//!      │
//!      ├── fire("OnDoorbell")          one task per handler, unbounded
//!      │
//!      └── fire_sync("OnDoorbell_S")   awaited in the caller's context
//! ```
//!
//! Handlers that must stay on a known thread subscribe to the `_S` shadow
//! name and are reached only through the synchronous path. Fired through
//! [`Bridge::dual_fire_blocking`] from a dedicated thread, every shadow
//! handler executes on that one thread, so the integration meets exactly
//! one thread no matter how many events flow.
//!
//! ## Rules
//! - A shadow name is always the base name plus [`SHADOW_SUFFIX`]; the
//!   pair is never renamed independently.
//! - Both firings carry the same payload; each draws its own `seq`.
//! - No ordering is guaranteed between the async handlers and the shadow
//!   handlers of one `dual_fire`.

use super::bus::Bus;
use super::event::Event;

/// Suffix appended to a base event name to form its shadow name.
pub const SHADOW_SUFFIX: &str = "_S";

/// Returns the shadow name for `base`.
///
/// # Example
/// ```
/// use gatehouse::shadow_name;
///
/// assert_eq!(shadow_name("OnDoorbell"), "OnDoorbell_S");
/// ```
#[must_use]
pub fn shadow_name(base: &str) -> String {
    format!("{base}{SHADOW_SUFFIX}")
}

/// Fires base events together with their synchronous shadow events.
///
/// Cheap to clone; clones share the underlying [`Bus`].
#[derive(Clone)]
pub struct Bridge {
    bus: Bus,
}

impl Bridge {
    /// Creates a bridge over `bus`.
    pub fn new(bus: Bus) -> Self {
        Self { bus }
    }

    /// The underlying bus.
    #[inline]
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Fires `ev` asynchronously, then fires its shadow synchronously and
    /// awaits every shadow handler to completion.
    ///
    /// Returns once the shadow delivery is done; the async deliveries may
    /// still be running.
    pub async fn dual_fire(&self, ev: Event) {
        let shadow = ev.renamed(shadow_name(&ev.name));
        self.bus.fire(ev);
        self.bus.fire_sync(shadow).await;
    }

    /// Fires only the asynchronous half; no shadow firing is produced.
    ///
    /// For purely informational events with no thread-sensitive
    /// subscriber, e.g. per-digit keypad input.
    pub fn fire_async_only(&self, ev: Event) {
        self.bus.fire(ev);
    }

    /// Runs [`Bridge::dual_fire`] to completion on the calling thread.
    ///
    /// Entry point for dedicated integration threads that live outside
    /// the runtime: the shadow handlers execute on the calling thread
    /// itself.
    ///
    /// # Panics
    /// Panics when called from inside the runtime; runtime callers use
    /// [`Bridge::dual_fire`] directly.
    pub fn dual_fire_blocking(&self, ev: Event) {
        self.bus.runtime().block_on(self.dual_fire(ev));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use parking_lot::Mutex;
    use tokio::sync::mpsc;

    use crate::error::HandlerError;
    use crate::events::{FnHandler, HandlerRef};

    fn reporting(
        tag: &'static str,
        tx: mpsc::UnboundedSender<&'static str>,
    ) -> HandlerRef {
        FnHandler::arc(tag, move |_ev: Event| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(tag);
                Ok::<_, HandlerError>(())
            }
        })
    }

    #[tokio::test]
    async fn test_dual_fire_reaches_base_and_shadow() {
        let bus = Bus::new();
        let bridge = Bridge::new(bus.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let shadow_seen = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe("OnDoorbell", reporting("base", tx));
        let seen = shadow_seen.clone();
        bus.subscribe(
            shadow_name("OnDoorbell"),
            FnHandler::arc("shadow-recorder", move |ev: Event| {
                let seen = seen.clone();
                async move {
                    seen.lock().push(ev.remote_uri().map(str::to_owned));
                    Ok::<_, HandlerError>(())
                }
            }),
        );

        bridge
            .dual_fire(Event::new("OnDoorbell", "test").with_remote_uri("sip:v@door"))
            .await;

        assert_eq!(
            *shadow_seen.lock(),
            vec![Some("sip:v@door".to_string())],
            "shadow delivery must be complete when dual_fire returns, with the same payload"
        );
        let base = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("base delivery must arrive")
            .expect("channel open");
        assert_eq!(base, "base");
    }

    #[tokio::test]
    async fn test_fire_async_only_skips_the_shadow() {
        let bus = Bus::new();
        let bridge = Bridge::new(bus.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let shadow_seen = Arc::new(Mutex::new(Vec::<Option<String>>::new()));

        bus.subscribe("OnKeyPressed", reporting("base", tx));
        let seen = shadow_seen.clone();
        bus.subscribe(
            shadow_name("OnKeyPressed"),
            FnHandler::arc("shadow-recorder", move |ev: Event| {
                let seen = seen.clone();
                async move {
                    seen.lock().push(ev.remote_uri().map(str::to_owned));
                    Ok::<_, HandlerError>(())
                }
            }),
        );

        bridge.fire_async_only(Event::new("OnKeyPressed", "test"));

        let base = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("base delivery must arrive")
            .expect("channel open");
        assert_eq!(base, "base");
        assert!(
            shadow_seen.lock().is_empty(),
            "async-only firing must never produce a shadow delivery"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dual_fire_blocking_runs_shadow_on_the_calling_thread() {
        let bus = Bus::new();
        let bridge = Bridge::new(bus.clone());
        let observed = Arc::new(Mutex::new(None));

        let slot = observed.clone();
        bus.subscribe(
            shadow_name("OnRegistered"),
            FnHandler::arc("thread-recorder", move |_ev: Event| {
                let slot = slot.clone();
                async move {
                    *slot.lock() = Some(thread::current().id());
                    Ok::<_, HandlerError>(())
                }
            }),
        );

        let firing_thread = thread::spawn(move || {
            bridge.dual_fire_blocking(Event::new("OnRegistered", "session"));
            thread::current().id()
        });
        let firing_id = firing_thread.join().expect("firing thread must not panic");

        assert_eq!(
            *observed.lock(),
            Some(firing_id),
            "shadow handlers must execute on the thread that fired"
        );
    }

    #[test]
    fn test_shadow_name_appends_the_fixed_suffix() {
        assert_eq!(shadow_name("OnCallConnect"), "OnCallConnect_S");
        assert_eq!(SHADOW_SUFFIX, "_S");
    }
}
