//! Progress reporting for batch runs
//!
//! The scheduler never owns a progress bar. It is handed a
//! [`ProgressReporter`] and calls it after every group settles.

use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

/// Advisory progress counters; never used for resuming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Shards whose group has settled
    pub processed_shards: usize,

    /// Shards in the run
    pub total_shards: usize,
}

impl Progress {
    /// Completed fraction in `[0.0, 1.0]`
    pub fn fraction(&self) -> f64 {
        if self.total_shards == 0 {
            1.0
        } else {
            self.processed_shards as f64 / self.total_shards as f64
        }
    }
}

/// Receives progress updates from a batch run
pub trait ProgressReporter: Send + Sync {
    /// Called once before the first group
    fn start(&self, total_shards: usize);

    /// Called after each group settles
    fn advance(&self, progress: Progress);

    /// Called once after the last group
    fn finish(&self, progress: Progress);
}

/// Discards all updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn start(&self, _total_shards: usize) {}

    fn advance(&self, _progress: Progress) {}

    fn finish(&self, _progress: Progress) {}
}

/// Emits one log line per update
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn start(&self, total_shards: usize) {
        info!("Processing {} shards", total_shards);
    }

    fn advance(&self, progress: Progress) {
        info!(
            "Progress: {}/{} shards ({:.0}%)",
            progress.processed_shards,
            progress.total_shards,
            progress.fraction() * 100.0
        );
    }

    fn finish(&self, progress: Progress) {
        info!("Finished {}/{} shards", progress.processed_shards, progress.total_shards);
    }
}

/// Forwards every update into a channel
///
/// Useful when the consumer lives on another task. Updates sent after the
/// receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: UnboundedSender<Progress>,
}

impl ChannelProgress {
    /// Wrap a channel sender
    pub fn new(sender: UnboundedSender<Progress>) -> Self {
        Self { sender }
    }
}

impl ProgressReporter for ChannelProgress {
    fn start(&self, total_shards: usize) {
        let _ = self.sender.send(Progress {
            processed_shards: 0,
            total_shards,
        });
    }

    fn advance(&self, progress: Progress) {
        let _ = self.sender.send(progress);
    }

    fn finish(&self, _progress: Progress) {}
}
