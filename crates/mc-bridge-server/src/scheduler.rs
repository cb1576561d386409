//! Serialized update thread
//!
//! All game-state access happens on one dedicated thread that owns the world.
//! Other code posts closures onto a bounded queue; the thread runs them one at
//! a time in submission order.

use mc_bridge_core::{BridgeError, GameState, Result};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

type Task<W> = Box<dyn FnOnce(&mut W) + Send + 'static>;

enum Job<W> {
    Run(Task<W>),
    Stop,
}

/// Producer side of the update-thread queue
pub struct UpdateScheduler<W: GameState> {
    tx: mpsc::Sender<Job<W>>,
}

impl<W: GameState> Clone for UpdateScheduler<W> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

/// Join handle for the update thread
pub struct UpdateThread {
    handle: thread::JoinHandle<()>,
}

impl<W: GameState> UpdateScheduler<W> {
    /// Spawn the update thread, moving `world` onto it
    pub fn start(world: W, capacity: usize) -> Result<(Self, UpdateThread)> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = thread::Builder::new()
            .name("mc-bridge-update".into())
            .spawn(move || run_update_loop(world, rx))
            .map_err(|e| BridgeError::Scheduler(format!("Failed to spawn update thread: {}", e)))?;

        Ok((Self { tx }, UpdateThread { handle }))
    }

    /// Queue a task, waiting for capacity if the queue is full
    pub async fn submit<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce(&mut W) + Send + 'static,
    {
        self.tx
            .send(Job::Run(Box::new(task)))
            .await
            .map_err(|_| BridgeError::Scheduler("Update thread not running".into()))
    }

    /// Queue a task without waiting
    pub fn try_submit<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce(&mut W) + Send + 'static,
    {
        self.tx.try_send(Job::Run(Box::new(task))).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => BridgeError::Scheduler("Task queue full".into()),
            mpsc::error::TrySendError::Closed(_) => {
                BridgeError::Scheduler("Update thread not running".into())
            }
        })
    }

    /// Run a closure on the update thread and wait for its result
    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut W) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();
        self.submit(move |world| {
            let _ = result_tx.send(f(world));
        })
        .await?;

        result_rx
            .await
            .map_err(|_| BridgeError::Scheduler("Task dropped before completing".into()))
    }

    /// Ask the update thread to exit after draining tasks queued so far
    pub async fn stop(&self) -> Result<()> {
        self.tx
            .send(Job::Stop)
            .await
            .map_err(|_| BridgeError::Scheduler("Update thread not running".into()))
    }

    /// True once the update thread has exited
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl UpdateThread {
    /// Block until the update thread exits
    pub fn join(self) -> Result<()> {
        self.handle
            .join()
            .map_err(|panic| BridgeError::Panicked(panic_message(panic.as_ref())))
    }
}

fn run_update_loop<W: GameState>(mut world: W, mut rx: mpsc::Receiver<Job<W>>) {
    info!("Update thread started");
    while let Some(job) = rx.blocking_recv() {
        match job {
            Job::Run(task) => {
                if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| task(&mut world))) {
                    error!("Update task panicked: {}", panic_message(panic.as_ref()));
                }
            }
            Job::Stop => {
                debug!("Stop requested");
                break;
            }
        }
    }
    info!("Update thread stopped");
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".into()
    }
}
