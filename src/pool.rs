//! Bounded pool of resize children.
//!
//! Thumbnails are queued up front and launched in queue order, never more
//! than `capacity` at a time. The pipeline then waits for them one by one in
//! album order; every wait frees a slot that is refilled immediately, so
//! conversion keeps running in the background while the user is busy
//! captioning earlier images.
//!
//! Dropping the pool terminates (SIGTERM) and reaps every child that is still
//! running. An early return anywhere in the pipeline therefore never leaves
//! orphaned `convert` processes behind.

use crate::tools::{Invocation, Job, ToolError};
use std::collections::{BTreeMap, VecDeque};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("no job queued for item {0}")]
    UnknownItem(usize),
}

pub struct ThumbnailPool {
    capacity: usize,
    pending: VecDeque<(usize, Invocation)>,
    running: BTreeMap<usize, Job>,
}

impl ThumbnailPool {
    /// Create a pool. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            pending: VecDeque::new(),
            running: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn running(&self) -> usize {
        self.running.len()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue the job for item `index`. Nothing is launched until [`fill`](Self::fill).
    pub fn queue(&mut self, index: usize, invocation: Invocation) {
        self.pending.push_back((index, invocation));
    }

    /// Launch queued jobs while there are free slots.
    pub fn fill(&mut self) -> Result<(), ToolError> {
        while self.running.len() < self.capacity {
            let Some((index, invocation)) = self.pending.pop_front() else {
                break;
            };
            let job = invocation.spawn(format!("thumbnail #{index}"))?;
            self.running.insert(index, job);
        }
        Ok(())
    }

    /// Wait for item `index` to finish, launching it first if it is still
    /// queued, then refill the freed slot.
    ///
    /// If the item is queued behind a full pool, the oldest running jobs are
    /// waited on to make room; their failures are reported first.
    pub fn wait_for(&mut self, index: usize) -> Result<(), PoolError> {
        loop {
            if let Some(job) = self.running.remove(&index) {
                let result = job.wait();
                self.fill()?;
                return result.map_err(PoolError::from);
            }
            if !self.pending.iter().any(|(i, _)| *i == index) {
                return Err(PoolError::UnknownItem(index));
            }
            if self.running.len() >= self.capacity {
                if let Some((_, oldest)) = self.running.pop_first() {
                    oldest.wait()?;
                }
            }
            self.fill()?;
        }
    }

    /// Terminate everything still running and drop queued work.
    pub fn shutdown(&mut self) {
        self.pending.clear();
        while let Some((index, job)) = self.running.pop_first() {
            match job.terminate() {
                Ok(status) => log::debug!("thumbnail #{index} stopped: {status}"),
                Err(e) => log::warn!("thumbnail #{index} could not be stopped: {e}"),
            }
        }
    }
}

impl Drop for ThumbnailPool {
    fn drop(&mut self) {
        if !self.running.is_empty() {
            log::warn!(
                "terminating {} unfinished thumbnail job(s)",
                self.running.len()
            );
        }
        self.shutdown();
    }
}
