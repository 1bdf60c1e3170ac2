//! # Owner thread for thread-sensitive integrations.
//!
//! Some session libraries permanently bind to whichever OS thread touches
//! them, and register every additional thread forever. Driving such an
//! integration from runtime worker threads would register threads without
//! bound. [`OwnerThread`] pins the integration to exactly one dedicated
//! thread for its whole lifetime.
//!
//! ## Architecture
//! ```text
//!  any thread ── submit(job) ──► [ FIFO queue ] ──► owner thread
//!                                                      │
//!                                            init() → S (never leaves)
//!                                            job(&mut S), one at a time
//!                                                      │
//!                                    Bridge::dual_fire_blocking(ev)
//!                                    (shadow handlers run right here)
//! ```
//!
//! ## Rules
//! - The state `S` is built by `init` on the owner thread and never
//!   crosses a thread boundary, so `S` need not be `Send`.
//! - Jobs run strictly in submission order; there is exactly one at a
//!   time and nothing overlaps.
//! - A panicking job is caught and logged; the worker and the state
//!   survive, with the state left however the job left it.
//! - Events are fired from inside jobs via
//!   [`Bridge::dual_fire_blocking`](crate::Bridge::dual_fire_blocking),
//!   which keeps every shadow handler on this one thread.

use std::io;
use std::panic::AssertUnwindSafe;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::SubmitError;
use crate::events::panic_message;

type Job<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Handle to one long-lived worker thread owning a state `S`.
///
/// The handle itself is `Send` regardless of `S`: only boxed jobs cross
/// into the worker.
pub struct OwnerThread<S> {
    tx: mpsc::UnboundedSender<Job<S>>,
    handle: thread::JoinHandle<()>,
    name: String,
}

impl<S: 'static> OwnerThread<S> {
    /// Spawns the worker thread and builds the state on it.
    ///
    /// `init` runs as the first thing on the new thread; the integration
    /// session it returns is owned by that thread until [`join`] or until
    /// the handle is dropped.
    ///
    /// Errs only when the OS refuses to spawn the thread.
    ///
    /// [`join`]: OwnerThread::join
    pub fn spawn<F>(name: impl Into<String>, init: F) -> io::Result<Self>
    where
        F: FnOnce() -> S + Send + 'static,
    {
        let name = name.into();
        let worker_name = name.clone();
        let (tx, mut rx) = mpsc::unbounded_channel::<Job<S>>();

        let handle = thread::Builder::new().name(name.clone()).spawn(move || {
            let mut state = init();
            while let Some(job) = rx.blocking_recv() {
                let run = AssertUnwindSafe(|| job(&mut state));
                if let Err(panic) = std::panic::catch_unwind(run) {
                    warn!(
                        worker = %worker_name,
                        panic = panic_message(panic.as_ref()),
                        "job panicked on owner thread"
                    );
                }
            }
            debug!(worker = %worker_name, "owner thread drained and exiting");
        })?;

        Ok(Self { tx, handle, name })
    }

    /// Enqueues `job` for the owner thread.
    ///
    /// Never blocks; the queue is unbounded. Fails with
    /// [`SubmitError::Closed`] once the worker has exited.
    pub fn submit<F>(&self, job: F) -> Result<(), SubmitError>
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.tx
            .send(Box::new(job))
            .map_err(|_| SubmitError::Closed)
    }

    /// Closes the queue, lets already queued jobs drain, and joins the
    /// thread.
    pub fn join(self) {
        drop(self.tx);
        if self.handle.join().is_err() {
            warn!(worker = %self.name, "owner thread terminated by panic");
        }
    }

    /// Name the worker thread was spawned under.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::mpsc as std_mpsc;
    use std::time::{Duration, Instant};

    #[test]
    fn test_jobs_run_fifo_on_the_one_owner_thread() {
        let (tx, rx) = std_mpsc::channel();

        let init_tx = tx.clone();
        let worker = OwnerThread::spawn("test-owner", move || {
            init_tx
                .send((u32::MAX, thread::current().id()))
                .expect("report init thread");
            Vec::<u32>::new()
        })
        .expect("spawn must succeed");

        for i in 0..50u32 {
            let tx = tx.clone();
            worker
                .submit(move |seen: &mut Vec<u32>| {
                    seen.push(i);
                    tx.send((i, thread::current().id())).expect("report job");
                })
                .expect("queue must be open");
        }
        worker.join();

        let reports: Vec<(u32, thread::ThreadId)> = rx.try_iter().collect();
        assert_eq!(reports.len(), 51, "init plus every queued job must run");

        let owner = reports[0].1;
        assert_eq!(reports[0].0, u32::MAX, "init must report first");
        for (pos, (value, thread_id)) in reports[1..].iter().enumerate() {
            assert_eq!(*value, pos as u32, "jobs must run in submission order");
            assert_eq!(*thread_id, owner, "every job must run on the init thread");
        }
    }

    #[test]
    fn test_state_does_not_need_to_be_send() {
        let (tx, rx) = std_mpsc::channel();

        // Rc is !Send; it compiles here only because the state never
        // leaves the owner thread.
        let worker = OwnerThread::spawn("rc-owner", || Rc::new(Cell::new(0u32)))
            .expect("spawn must succeed");

        for _ in 0..3 {
            let tx = tx.clone();
            worker
                .submit(move |state: &mut Rc<Cell<u32>>| {
                    state.set(state.get() + 1);
                    tx.send(state.get()).expect("report value");
                })
                .expect("queue must be open");
        }
        worker.join();

        assert_eq!(rx.try_iter().collect::<Vec<u32>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_panicking_job_does_not_kill_the_worker() {
        let (tx, rx) = std_mpsc::channel();

        let worker =
            OwnerThread::spawn("panic-owner", || 0u32).expect("spawn must succeed");

        worker
            .submit(|_state| panic!("deliberate job panic"))
            .expect("queue must be open");
        let tx2 = tx.clone();
        worker
            .submit(move |state| {
                *state += 1;
                tx2.send(*state).expect("report value");
            })
            .expect("queue must be open");
        worker.join();

        assert_eq!(
            rx.try_iter().collect::<Vec<u32>>(),
            vec![1],
            "the job after the panic must still run against the same state"
        );
    }

    #[test]
    fn test_submit_fails_closed_after_the_worker_dies() {
        let worker =
            OwnerThread::<()>::spawn("dying-owner", || panic!("deliberate init panic"))
                .expect("spawn itself must succeed");

        // The thread dies during init; the queue closes shortly after.
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match worker.submit(|_state| {}) {
                Err(SubmitError::Closed) => break,
                Ok(()) => {
                    assert!(
                        Instant::now() < deadline,
                        "queue must observe the dead worker within the deadline"
                    );
                    thread::sleep(Duration::from_millis(10));
                }
            }
        }
    }
}
