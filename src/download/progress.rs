//! Progress events emitted by transfers, and the indicatif renderer.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use super::format::{format_size, format_throughput};

/// Position of a file within its folder listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePosition {
    pub index: usize,
    pub count: usize,
    /// Recursive size of the enclosing folder.
    pub folder_total: u64,
}

/// Bar prefix such as `(2/4 of 1.50 MB) `.
fn bar_prefix(pos: &FilePosition) -> String {
    format!(
        "({}/{} of {}) ",
        pos.index,
        pos.count,
        format_size(pos.folder_total)
    )
}

/// Receives transfer progress. One [`FileProgress`] handle per transfer
/// attempt.
pub trait ProgressReporter: Send + Sync {
    fn start_file(
        &self,
        name: &str,
        total: u64,
        completed: u64,
        position: Option<FilePosition>,
    ) -> Box<dyn FileProgress>;
}

pub trait FileProgress: Send {
    /// Called after every chunk. `throughput` (bytes/sec) is `Some` only
    /// when a sampling window just closed.
    fn update(&self, completed: u64, total: u64, throughput: Option<f64>);

    /// The transfer completed.
    fn finish(&self);

    /// The attempt failed or was cancelled.
    fn abandon(&self);
}

/// Sampling-window throughput: bytes since the last sample divided by the
/// time since the last sample, emitted at most once per window.
#[derive(Debug)]
pub struct ThroughputSampler {
    window: Duration,
    window_start: Instant,
    window_bytes: u64,
}

impl ThroughputSampler {
    pub fn new(now: Instant) -> Self {
        Self {
            window: Duration::from_secs(1),
            window_start: now,
            window_bytes: 0,
        }
    }

    /// Record `bytes` written at `now`. Returns the window's rate and starts
    /// a new window once at least one window length has elapsed.
    pub fn record(&mut self, bytes: u64, now: Instant) -> Option<f64> {
        self.window_bytes += bytes;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }
        let rate = self.window_bytes as f64 / elapsed.as_secs_f64();
        self.window_bytes = 0;
        self.window_start = now;
        Some(rate)
    }
}

/// Draws one terminal bar per file.
///
/// Bars are hidden when the user passed `--no-progress-bar` or stdout is not
/// a TTY, so piped output and cron logs stay clean.
pub struct IndicatifReporter {
    enabled: bool,
}

impl IndicatifReporter {
    pub fn new(no_progress_bar: bool) -> Self {
        Self {
            enabled: !no_progress_bar && std::io::stdout().is_terminal(),
        }
    }
}

impl ProgressReporter for IndicatifReporter {
    fn start_file(
        &self,
        name: &str,
        total: u64,
        completed: u64,
        position: Option<FilePosition>,
    ) -> Box<dyn FileProgress> {
        if !self.enabled {
            return Box::new(ProgressBar::hidden());
        }
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::with_template(
                "{prefix}[{bar:40.cyan/blue}] {bytes}/{total_bytes} {percent:>3}% {msg} ({eta})",
            )
            .expect("valid template")
            .progress_chars("=> "),
        );
        if let Some(pos) = position {
            pb.set_prefix(bar_prefix(&pos));
        }
        pb.set_position(completed);
        pb.set_message(format!("{} {}", name, format_throughput(0.0)));
        Box::new(NamedBar {
            bar: pb,
            name: name.to_string(),
        })
    }
}

struct NamedBar {
    bar: ProgressBar,
    name: String,
}

impl FileProgress for NamedBar {
    fn update(&self, completed: u64, _total: u64, throughput: Option<f64>) {
        self.bar.set_position(completed);
        if let Some(rate) = throughput {
            self.bar
                .set_message(format!("{} {}", self.name, format_throughput(rate)));
        }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn abandon(&self) {
        self.bar.abandon();
    }
}

impl FileProgress for ProgressBar {
    fn update(&self, completed: u64, _total: u64, _throughput: Option<f64>) {
        self.set_position(completed);
    }

    fn finish(&self) {
        self.finish_and_clear();
    }

    fn abandon(&self) {
        ProgressBar::abandon(self);
    }
}
