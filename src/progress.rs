//! Progress display for release runs
//!
//! One bar for the whole run on stderr. The version being packaged is shown
//! next to the bar, and each finished version leaves a line above it with
//! its own packaging time.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

const BAR_TEMPLATE: &str =
    "{spinner:.cyan} Packaging {prefix:.bold} [{bar:30.cyan/blue}] {pos}/{len} versions ({elapsed})";

/// Progress reporter for the packaging loop
pub struct Progress {
    /// Disabled in quiet and JSON modes, and when stderr is not a terminal
    enabled: bool,
    bar: Option<ProgressBar>,
    /// When the version currently being packaged was started
    version_started: Option<Instant>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            bar: None,
            version_started: None,
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Show the bar for a run over `total` versions
    pub fn start(&mut self, total: usize) {
        if !self.enabled {
            return;
        }

        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                .progress_chars("█▓▒░"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    /// Mark `version` as the one being packaged
    pub fn begin_version(&mut self, version: &str) {
        self.version_started = Some(Instant::now());
        if let Some(ref bar) = self.bar {
            bar.set_prefix(version.to_string());
        }
    }

    /// Record the outcome of the current version and advance the bar
    ///
    /// Returns how long the version took to package.
    pub fn finish_version(&mut self, version: &str, success: bool) -> Duration {
        let took = self
            .version_started
            .take()
            .map(|started| started.elapsed())
            .unwrap_or_default();

        if let Some(ref bar) = self.bar {
            bar.println(version_line(version, success, took));
            bar.inc(1);
        }
        took
    }

    pub fn finish_and_clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        self.version_started = None;
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.finish_and_clear();
    }
}

/// Line left above the bar once a version is done, e.g. `  ok     4.26 (1m 03s)`
fn version_line(version: &str, success: bool, took: Duration) -> String {
    let label = if success { "ok" } else { "FAILED" };
    format!("  {:<6} {} ({})", label, version, format_duration(took))
}

/// Format a packaging time: `850ms`, `12.3s` or `4m 05s`
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1_000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_disabled() {
        let mut progress = Progress::disabled();
        progress.start(2);
        assert!(progress.bar.is_none());

        progress.begin_version("4.26");
        assert!(progress.version_started.is_some());
        progress.finish_version("4.26", true);
        assert!(progress.version_started.is_none());
        progress.finish_and_clear();
    }

    #[test]
    fn test_progress_enabled() {
        let mut progress = Progress::new(true);
        progress.start(2);
        assert!(progress.bar.is_some());

        progress.begin_version("5.0ea");
        progress.finish_version("5.0ea", true);
        progress.begin_version("4.26");
        progress.finish_version("4.26", false);
        assert_eq!(progress.bar.as_ref().map(|b| b.position()), Some(2));

        progress.finish_and_clear();
        assert!(progress.bar.is_none());
    }

    #[test]
    fn test_finish_without_begin() {
        let mut progress = Progress::disabled();
        assert_eq!(progress.finish_version("4.26", true), Duration::ZERO);
    }

    #[test]
    fn test_version_line() {
        assert_eq!(
            version_line("4.26", false, Duration::from_millis(12_300)),
            "  FAILED 4.26 (12.3s)"
        );
        assert_eq!(
            version_line("5.0ea", true, Duration::from_millis(500)),
            "  ok     5.0ea (500ms)"
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(850)), "850ms");
        assert_eq!(format_duration(Duration::from_millis(1_240)), "1.2s");
        assert_eq!(format_duration(Duration::from_secs(245)), "4m 05s");
        assert_eq!(format_duration(Duration::ZERO), "0ms");
    }
}
