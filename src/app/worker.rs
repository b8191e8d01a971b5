//! Background execution for blocking pipeline calls.
//!
//! The pipeline itself is synchronous. Front-ends that must stay responsive
//! (the TUI) submit the blocking call here and poll the returned `Pending`
//! between redraws.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{AppError, exit_codes};

pub struct Worker {
    pool: ThreadPool,
}

impl Worker {
    pub fn new(threads: usize) -> Result<Self, AppError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("wbi-worker-{i}"))
            .build()
            .map_err(|e| AppError::new(exit_codes::RUNTIME, format!("Failed to start worker pool: {e}")))?;
        Ok(Self { pool })
    }

    /// Run `job` on the pool; its result is delivered through the returned handle.
    pub fn submit<T, F>(&self, job: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        self.pool.spawn(move || {
            // A panicking job drops `tx` unsent, which the handle reports as `Lost`.
            if let Ok(value) = panic::catch_unwind(AssertUnwindSafe(job)) {
                // The receiver may be gone if the UI quit first.
                let _ = tx.send(value);
            }
        });
        Pending { rx }
    }
}

/// Result of a submitted job, not yet collected.
pub struct Pending<T> {
    rx: Receiver<T>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Poll<T> {
    Ready(T),
    Waiting,
    /// The job panicked before producing a result.
    Lost,
}

impl<T> Pending<T> {
    pub fn poll(&self) -> Poll<T> {
        match self.rx.try_recv() {
            Ok(v) => Poll::Ready(v),
            Err(TryRecvError::Empty) => Poll::Waiting,
            Err(TryRecvError::Disconnected) => Poll::Lost,
        }
    }

    /// Block until the job finishes.
    pub fn wait(self) -> Option<T> {
        self.rx.recv().ok()
    }
}
