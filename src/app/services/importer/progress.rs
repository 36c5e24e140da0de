//! Console progress reporting for import runs

use crate::app::services::import_stats::ImportStats;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) | {msg}";

/// Progress bar over the attempted rows of a run
pub struct ImportProgress {
    progress_bar: Option<ProgressBar>,
}

impl ImportProgress {
    /// Reporter that draws nothing
    pub fn disabled() -> Self {
        Self { progress_bar: None }
    }

    /// Reporter drawing a bar over `total_rows`
    pub fn new(total_rows: usize) -> Self {
        let pb = ProgressBar::new(total_rows as u64);
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ");
        pb.set_style(style);
        pb.set_message("Importing flights");

        debug!("Progress bar initialized for {} rows", total_rows);
        Self {
            progress_bar: Some(pb),
        }
    }

    /// Move the bar to the attempted row count and refresh the counters
    pub fn update(&self, stats: &ImportStats) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_position(stats.attempted_rows as u64);
            pb.set_message(format!(
                "{} skipped, {} cancelled, {} diverted",
                stats.skipped_rows, stats.cancelled_flights, stats.diverted_flights
            ));
        }
    }

    pub fn finish(&self, stats: &ImportStats) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_position(stats.attempted_rows as u64);
            pb.finish_with_message(format!(
                "Completed: {} processed, {} skipped",
                stats.processed_rows, stats.skipped_rows
            ));
        }
    }

    pub fn finish_with_error(&self, error_message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.abandon_with_message(format!("Failed: {}", error_message));
        }
    }
}

impl Drop for ImportProgress {
    fn drop(&mut self) {
        if let Some(ref pb) = self.progress_bar {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}
