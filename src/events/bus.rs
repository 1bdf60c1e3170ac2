//! # Event bus: named events, two delivery modes.
//!
//! [`Bus`] maps event names to subscribed handlers and offers two ways to
//! fire: [`Bus::fire`] spawns one runtime task per handler and returns
//! immediately; [`Bus::fire_sync`] awaits every handler sequentially in
//! the caller's own execution context.
//!
//! ## Architecture
//! ```text
//! Firing sources (many):
//!   sipphone ──┐
//!   gpio ──────┼──► Bus { name → [handler, handler, ..] }
//!   webserver ─┘         │
//!                        ├── fire(ev) ──► spawn ──► handler A ─┐
//!                        │            └─► spawn ──► handler B ─┼─ concurrent,
//!                        │                                     │  unordered
//!                        └── fire_sync(ev) ─► await A, then B  ── caller's context
//! ```
//!
//! ## Rules
//! - **Isolation**: a handler `Err` or panic is caught at the dispatch
//!   boundary and logged with the event name, source and handler identity.
//!   It never reaches sibling handlers or the firing caller.
//! - **Order**: `fire_sync` runs handlers in subscription order. `fire`
//!   guarantees no ordering between handlers.
//! - **Snapshot**: each firing dispatches to the handlers subscribed at
//!   fire time; a concurrent `subscribe` affects later firings only.
//! - **No delivery guarantees**: an event with zero subscribers is
//!   dropped, and nothing is persisted or replayed.
//! - **No cancellation**: neither mode applies a timeout; a hung
//!   synchronous handler blocks its caller indefinitely.

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tracing::{debug, trace, warn};

use super::event::Event;
use super::handler::{Handler, HandlerRef};

/// Registry of named events and their subscribed handlers.
///
/// Cheap to clone; all clones share the same subscription table. Holds a
/// runtime handle captured at construction, so events can be fired from
/// threads outside the runtime (a dedicated device thread, a signal
/// handler thread) and still dispatch onto the runtime.
#[derive(Clone)]
pub struct Bus {
    inner: Arc<BusInner>,
}

struct BusInner {
    topics: RwLock<HashMap<String, Vec<HandlerRef>>>,
    runtime: Handle,
}

impl Bus {
    /// Creates a bus bound to the ambient tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime. Use
    /// [`Bus::with_runtime`] to wire a handle explicitly.
    pub fn new() -> Self {
        Self::with_runtime(Handle::current())
    }

    /// Creates a bus that dispatches onto the given runtime.
    pub fn with_runtime(runtime: Handle) -> Self {
        Self {
            inner: Arc::new(BusInner {
                topics: RwLock::new(HashMap::new()),
                runtime,
            }),
        }
    }

    /// Subscribes `handler` to the event `name`.
    ///
    /// Appends to the event's handler list: subscription order is
    /// preserved and defines `fire_sync` execution order. The same
    /// handler may be subscribed to any number of names.
    pub fn subscribe(&self, name: impl Into<String>, handler: HandlerRef) {
        let name = name.into();
        trace!(event = %name, handler = handler.name(), "subscribing handler");
        self.inner
            .topics
            .write()
            .entry(name)
            .or_default()
            .push(handler);
    }

    /// Fires `ev` asynchronously: one runtime task per subscribed handler.
    ///
    /// Returns immediately. Handlers run concurrently with no ordering
    /// between them and no bound on how many are in flight; failures and
    /// panics are logged and contained per handler.
    pub fn fire(&self, ev: Event) {
        let handlers = self.snapshot(&ev.name);
        if handlers.is_empty() {
            trace!(event = %ev.name, source = %ev.source, "fired event with no subscribers");
            return;
        }
        debug!(
            event = %ev.name,
            source = %ev.source,
            seq = ev.seq,
            handlers = handlers.len(),
            "dispatching async"
        );
        for handler in handlers {
            let ev = ev.clone();
            self.inner.runtime.spawn(async move {
                deliver(handler.as_ref(), &ev).await;
            });
        }
    }

    /// Fires `ev` synchronously: every subscribed handler is awaited in
    /// subscription order, within the caller's execution context.
    ///
    /// Introduces no new concurrency unit. Never returns an error on
    /// behalf of a handler; failures and panics are logged and contained
    /// exactly as in the async mode.
    pub async fn fire_sync(&self, ev: Event) {
        let handlers = self.snapshot(&ev.name);
        if handlers.is_empty() {
            trace!(event = %ev.name, source = %ev.source, "fired event with no subscribers");
            return;
        }
        debug!(
            event = %ev.name,
            source = %ev.source,
            seq = ev.seq,
            handlers = handlers.len(),
            "dispatching sync"
        );
        for handler in handlers {
            deliver(handler.as_ref(), &ev).await;
        }
    }

    /// Number of handlers currently subscribed to `name`.
    #[must_use]
    pub fn handler_count(&self, name: &str) -> usize {
        self.inner
            .topics
            .read()
            .get(name)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// All subscribed event names with their handler counts, ascending
    /// by name.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<(String, usize)> {
        let mut out: Vec<(String, usize)> = self
            .inner
            .topics
            .read()
            .iter()
            .map(|(name, handlers)| (name.clone(), handlers.len()))
            .collect();
        out.sort();
        out
    }

    /// The runtime handle this bus dispatches onto.
    pub(crate) fn runtime(&self) -> &Handle {
        &self.inner.runtime
    }

    /// Clones the handler list for `name` without holding the lock across
    /// dispatch.
    fn snapshot(&self, name: &str) -> Vec<HandlerRef> {
        self.inner
            .topics
            .read()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }
}

/// Runs one handler against one event, absorbing failure and panic at
/// the boundary.
async fn deliver(handler: &dyn Handler, ev: &Event) {
    let fut = handler.handle(ev);
    match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            warn!(
                event = %ev.name,
                source = %ev.source,
                handler = handler.name(),
                error = %err,
                "handler failed"
            );
        }
        Err(panic) => {
            warn!(
                event = %ev.name,
                source = %ev.source,
                handler = handler.name(),
                panic = panic_message(panic.as_ref()),
                "handler panicked"
            );
        }
    }
}

/// Best-effort extraction of a panic payload message.
pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use crate::error::HandlerError;
    use crate::events::FnHandler;

    /// Counts deliveries and reports each one on a channel.
    struct Counting {
        hits: AtomicUsize,
        tx: mpsc::UnboundedSender<&'static str>,
        tag: &'static str,
    }

    impl Counting {
        fn arc(tag: &'static str, tx: mpsc::UnboundedSender<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                hits: AtomicUsize::new(0),
                tx,
                tag,
            })
        }
    }

    #[async_trait]
    impl Handler for Counting {
        async fn handle(&self, _event: &Event) -> Result<(), HandlerError> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            let _ = self.tx.send(self.tag);
            Ok(())
        }

        fn name(&self) -> &str {
            self.tag
        }
    }

    /// Fails every delivery, reporting it first.
    struct Failing {
        tx: mpsc::UnboundedSender<&'static str>,
    }

    #[async_trait]
    impl Handler for Failing {
        async fn handle(&self, _event: &Event) -> Result<(), HandlerError> {
            let _ = self.tx.send("failing");
            Err(HandlerError::other("deliberate failure"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Panics on every delivery, reporting it first.
    struct Panicking {
        tx: mpsc::UnboundedSender<&'static str>,
    }

    #[async_trait]
    impl Handler for Panicking {
        async fn handle(&self, _event: &Event) -> Result<(), HandlerError> {
            let _ = self.tx.send("panicking");
            panic!("deliberate panic");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    async fn recv_n(rx: &mut mpsc::UnboundedReceiver<&'static str>, n: usize) -> Vec<&'static str> {
        let mut seen = Vec::with_capacity(n);
        for _ in 0..n {
            let tag = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("delivery must arrive within the timeout")
                .expect("channel must stay open");
            seen.push(tag);
        }
        seen
    }

    #[tokio::test]
    async fn test_fire_reaches_every_subscriber() {
        let bus = Bus::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let a = Counting::arc("a", tx.clone());
        let b = Counting::arc("b", tx.clone());
        bus.subscribe("OnDoorbell", a.clone());
        bus.subscribe("OnDoorbell", b.clone());

        bus.fire(Event::new("OnDoorbell", "test"));

        let mut seen = recv_n(&mut rx, 2).await;
        seen.sort();
        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(a.hits.load(Ordering::SeqCst), 1);
        assert_eq!(b.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fire_isolates_failures_and_panics() {
        let bus = Bus::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe("OnDoorbell", Arc::new(Failing { tx: tx.clone() }));
        bus.subscribe("OnDoorbell", Arc::new(Panicking { tx: tx.clone() }));
        bus.subscribe("OnDoorbell", Counting::arc("survivor", tx.clone()));

        bus.fire(Event::new("OnDoorbell", "test"));

        let mut seen = recv_n(&mut rx, 3).await;
        seen.sort();
        assert_eq!(
            seen,
            vec!["failing", "panicking", "survivor"],
            "every handler must be invoked despite sibling failures"
        );
    }

    #[tokio::test]
    async fn test_fire_sync_runs_in_subscription_order() {
        let bus = Bus::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = order.clone();
            bus.subscribe(
                "OnDoorbell_S",
                FnHandler::arc(tag, move |_ev: Event| {
                    let order = order.clone();
                    async move {
                        order.lock().push(tag);
                        Ok::<_, HandlerError>(())
                    }
                }),
            );
        }

        bus.fire_sync(Event::new("OnDoorbell_S", "test")).await;

        assert_eq!(
            *order.lock(),
            vec!["first", "second", "third"],
            "sync delivery must follow subscription order"
        );
    }

    #[tokio::test]
    async fn test_fire_sync_blocks_until_a_slow_handler_returns() {
        let bus = Bus::new();
        let delay = Duration::from_millis(200);
        bus.subscribe(
            "OnSlow_S",
            FnHandler::arc("sleeper", move |_ev: Event| async move {
                tokio::time::sleep(delay).await;
                Ok::<_, HandlerError>(())
            }),
        );

        let started = std::time::Instant::now();
        bus.fire_sync(Event::new("OnSlow_S", "test")).await;
        assert!(
            started.elapsed() >= delay,
            "fire_sync must not return before its handlers do"
        );
    }

    #[tokio::test]
    async fn test_fire_sync_completes_despite_failures() {
        let bus = Bus::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe("OnCallConnect_S", Arc::new(Panicking { tx: tx.clone() }));
        bus.subscribe("OnCallConnect_S", Arc::new(Failing { tx: tx.clone() }));
        bus.subscribe("OnCallConnect_S", Counting::arc("tail", tx.clone()));

        // Must return normally; the panic and the error stay inside.
        bus.fire_sync(Event::new("OnCallConnect_S", "test")).await;

        let seen = recv_n(&mut rx, 3).await;
        assert_eq!(seen, vec!["panicking", "failing", "tail"]);
    }

    #[tokio::test]
    async fn test_firing_without_subscribers_is_a_noop() {
        let bus = Bus::new();
        bus.fire(Event::new("OnNothing", "test"));
        bus.fire_sync(Event::new("OnNothing", "test")).await;
        assert_eq!(bus.handler_count("OnNothing"), 0);
    }

    #[tokio::test]
    async fn test_subscriptions_reports_counts_sorted_by_name() {
        let bus = Bus::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        bus.subscribe("OnDoorbell", Counting::arc("a", tx.clone()));
        bus.subscribe("OnDoorbell", Counting::arc("b", tx.clone()));
        bus.subscribe("OnCallConnect", Counting::arc("c", tx.clone()));

        assert_eq!(bus.handler_count("OnDoorbell"), 2);
        assert_eq!(
            bus.subscriptions(),
            vec![
                ("OnCallConnect".to_string(), 1),
                ("OnDoorbell".to_string(), 2)
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_fire_works_from_a_non_runtime_thread() {
        let bus = Bus::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe("OnDeviceEdge", Counting::arc("edge", tx));

        let fire_bus = bus.clone();
        std::thread::spawn(move || {
            // No runtime on this thread; the captured handle carries it.
            fire_bus.fire(Event::new("OnDeviceEdge", "device-thread"));
        })
        .join()
        .expect("firing thread must not panic");

        let seen = recv_n(&mut rx, 1).await;
        assert_eq!(seen, vec!["edge"]);
    }
}
