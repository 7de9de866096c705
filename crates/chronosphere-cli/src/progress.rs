//! Terminal progress bar for batch runs.

use chronosphere_extractor::{Progress, ProgressReporter};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.cyan} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} shards ({eta})";

/// Progress bar drawn on stderr, advanced once per settled group.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    /// Create an empty bar; it is sized when the run starts.
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarProgress {
    fn start(&self, total_shards: usize) {
        self.bar.set_length(total_shards as u64);
        self.bar.set_position(0);
    }

    fn advance(&self, progress: Progress) {
        self.bar.set_position(progress.processed_shards as u64);
    }

    fn finish(&self, progress: Progress) {
        self.bar.set_position(progress.processed_shards as u64);
        self.bar.finish();
    }
}
