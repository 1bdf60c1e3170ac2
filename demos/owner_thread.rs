//! # Demo: owner_thread
//!
//! Bounded-thread delivery for a thread-sensitive integration: a session
//! stand-in that must only ever be touched from one OS thread lives on an
//! [`OwnerThread`], fires events with [`Bridge::dual_fire_blocking`], and
//! handles its own shadow events in place on that same thread.
//!
//! Shows how to:
//! - Pin a `!Send` session state to one long-lived [`OwnerThread`].
//! - Fire events from inside jobs via [`Bridge::dual_fire_blocking`].
//! - Verify that shadow handlers run on the owner thread while async
//!   handlers run on runtime workers.
//!
//! ## Flow
//! ```text
//! main ── submit(job) ──► owner thread "sip-owner"
//!                             │ touch session (thread-bound state)
//!                             └─► dual_fire_blocking("OnCallIncoming")
//!                                     ├─► fire(..) ──► async handler (runtime worker)
//!                                     └─► fire_sync(.._S) ──► shadow handler
//!                                           (runs right here, on "sip-owner")
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example owner_thread
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::thread;

use gatehouse::{shadow_name, Bridge, Bus, Event, FnHandler, HandlerError, OwnerThread};

/// Stand-in for a session library that binds to its first thread.
///
/// `Rc` keeps it `!Send`: the compiler itself guarantees the session never
/// leaves the owner thread.
struct Session {
    bridge: Bridge,
    calls: Rc<Cell<u32>>,
}

impl Session {
    /// Simulates an incoming call arriving on the session's own thread.
    fn on_incoming(&self, from: &str) {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        println!(
            "[{}] call #{n} from {from}",
            thread::current().name().unwrap_or("?")
        );
        self.bridge
            .dual_fire_blocking(Event::new("OnCallIncoming", "sipphone").with_remote_uri(from));
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatehouse=debug".into()),
        )
        .init();

    let bus = Bus::new();
    bus.subscribe(
        "OnCallIncoming",
        FnHandler::arc("async-observer", |ev: Event| async move {
            println!(
                "async handler on {:?}: {} from {}",
                thread::current().id(),
                ev.name,
                ev.remote_uri().unwrap_or("<unknown>")
            );
            Ok::<_, HandlerError>(())
        }),
    );
    bus.subscribe(
        shadow_name("OnCallIncoming"),
        FnHandler::arc("shadow-observer", |ev: Event| async move {
            // Delivered through fire_sync, so this prints the owner
            // thread's name, never a runtime worker's.
            println!(
                "shadow handler on {:?} ({}): {}",
                thread::current().id(),
                thread::current().name().unwrap_or("?"),
                ev.name
            );
            Ok::<_, HandlerError>(())
        }),
    );

    let bridge = Bridge::new(bus);
    let owner = OwnerThread::spawn("sip-owner", move || Session {
        bridge,
        calls: Rc::new(Cell::new(0)),
    })?;

    for caller in ["sip:visitor@10.0.0.21", "sip:courier@10.0.0.33"] {
        owner
            .submit(move |session| session.on_incoming(caller))
            .expect("owner thread accepts jobs until joined");
    }

    // Drains both queued calls, then stops the one thread the session
    // ever saw.
    owner.join();
    Ok(())
}
