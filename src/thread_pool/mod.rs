use crate::Result;

/// Runs connection handlers concurrently.
///
/// The server hands each accepted connection to [`ThreadPool::spawn`]. A
/// connection blocks its worker until the peer disconnects, so the pool
/// decides how many clients are served at the same time.
pub trait ThreadPool {
    /// Creates a pool sized for `threads` concurrent jobs.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker threads cannot be started.
    fn new(threads: u32) -> Result<Self>
    where
        Self: Sized;

    /// Queues `job` for execution.
    ///
    /// # Errors
    ///
    /// Returns an error if the job cannot be handed to a worker.
    fn spawn<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static;
}

mod naive;
mod shared_queue;

pub use self::naive::NaiveThreadPool;
pub use self::shared_queue::SharedQueueThreadPool;
