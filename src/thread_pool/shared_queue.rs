use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, error};

use super::ThreadPool;
use crate::{Result, SockError};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed set of workers pulling jobs from one shared queue.
///
/// At most `threads` jobs run at once; the rest wait in the queue. A job
/// that panics is caught and its worker moves on to the next job.
pub struct SharedQueueThreadPool {
    tx: Sender<Job>,
}

impl ThreadPool for SharedQueueThreadPool {
    fn new(threads: u32) -> Result<Self> {
        if threads == 0 {
            return Err(SockError::StringError(
                "shared queue pool needs at least one thread".to_owned(),
            ));
        }

        let (tx, rx) = channel::unbounded::<Job>();
        for id in 0..threads {
            start_worker(id, rx.clone())?;
        }
        Ok(Self { tx })
    }

    fn spawn<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx
            .send(Box::new(job))
            .map_err(|_| SockError::PoolClosed)
    }
}

fn start_worker(id: u32, rx: Receiver<Job>) -> Result<()> {
    thread::Builder::new()
        .name(format!("worker-{id}"))
        .spawn(move || {
            // The loop ends once every sender is dropped.
            for job in rx.iter() {
                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    error!("Job on worker {id} panicked");
                }
            }
            debug!("Worker {id} shutting down");
        })?;
    Ok(())
}
