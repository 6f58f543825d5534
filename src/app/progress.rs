//! Terminal progress bars for listings and downloads
//!
//! Two kinds of bars are drawn with indicatif: one per batch, counting
//! resources, and one per file, counting written chunks. Both live in a shared
//! `MultiProgress` so the file bar renders under the batch bar. A disabled
//! reporter hands out hidden bars, which keeps call sites free of branches.

use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Creates progress bars for the download pipeline
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    multi: MultiProgress,
    enabled: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ProgressReporter {
    /// Create a reporter drawing to stderr, or drawing nothing when disabled
    pub fn new(enabled: bool) -> Self {
        let multi = if enabled {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };
        Self { multi, enabled }
    }

    /// A reporter that never draws
    pub fn hidden() -> Self {
        Self::new(false)
    }

    /// Whether bars are drawn
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Bar counting resources of a batch
    pub fn batch_bar(&self, total: usize) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        let bar = self.multi.add(ProgressBar::new(total as u64));
        bar.set_style(
            ProgressStyle::with_template(
                "{msg} {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}<{eta_precise}]",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
        );
        bar.set_message("Download datasets");
        bar
    }

    /// Bar counting written chunks of one file
    ///
    /// `total_chunks` of zero means the size is unknown and draws a spinner.
    pub fn file_bar(&self, file_name: &str, total_chunks: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        let bar = if total_chunks == 0 {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner:.green} {msg} {pos} chunks [{elapsed}]")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.enable_steady_tick(Duration::from_millis(120));
            spinner
        } else {
            let bar = ProgressBar::new(total_chunks);
            bar.set_style(
                ProgressStyle::with_template("  {msg} {bar:30.green/white} {pos}/{len} [{elapsed}]")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            bar
        };
        let bar = self.multi.add(bar);
        bar.set_message(file_name.to_string());
        bar
    }

    /// Spinner shown while waiting on a single request
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        let spinner = self.multi.add(ProgressBar::new_spinner());
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["◐", "◓", "◑", "◒", "◐"]),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }
}
