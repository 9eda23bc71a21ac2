use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use super::ThreadPool;
use crate::Result;

/// Starts a dedicated thread for every job.
///
/// This gives each connection its own execution unit with no upper bound,
/// and is the server's default.
#[derive(Default)]
pub struct NaiveThreadPool {
    spawned: AtomicU64,
}

impl ThreadPool for NaiveThreadPool {
    fn new(_threads: u32) -> Result<Self> {
        Ok(Self::default())
    }

    fn spawn<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.spawned.fetch_add(1, Ordering::Relaxed);
        thread::Builder::new()
            .name(format!("conn-{id}"))
            .spawn(job)?;
        Ok(())
    }
}
