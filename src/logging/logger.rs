//! Console logger with simulate awareness and summary collection.
use std::sync::Mutex;

use super::types::{Log, PackageEntry, PackageStatus};

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
///
/// `record_package` is **not** included because its signature differs
/// from the `fn(&self, &str)` pattern shared by the display methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger that emits [`tracing`] events and collects per-package results.
///
/// Console rendering is configured by
/// [`init_subscriber`](super::subscriber::init_subscriber); without a
/// subscriber the events are discarded but results are still recorded.
#[derive(Debug, Default)]
pub struct Logger {
    packages: Mutex<Vec<PackageEntry>>,
}

impl Logger {
    /// Create a new logger with an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a clone of all recorded package entries.
    #[must_use]
    pub fn package_entries(&self) -> Vec<PackageEntry> {
        self.packages.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "sym::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a change that simulate mode suppressed.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "sym::dry_run", "{msg}");
    }

    /// Record a package result for the summary.
    pub fn record_package(&self, name: &str, status: PackageStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.packages.lock() {
            guard.push(PackageEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return `true` if any recorded package has failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Count the number of failed packages.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.packages.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|p| p.status == PackageStatus::Failed)
                .count()
        })
    }

    /// Render the summary lines for all recorded packages.
    ///
    /// Returns an empty list when nothing was recorded.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let packages = self.package_entries();
        if packages.is_empty() {
            return Vec::new();
        }

        let mut ok = 0u32;
        let mut simulated = 0u32;
        let mut failed = 0u32;
        let mut lines = Vec::with_capacity(packages.len() + 1);

        for package in &packages {
            let (icon, color) = match package.status {
                PackageStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                PackageStatus::Simulated => {
                    simulated += 1;
                    ("~", "\x1b[37m")
                }
                PackageStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = package
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            lines.push(format!("{color}{icon} {}{suffix}\x1b[0m", package.name));
        }

        let total = ok + simulated + failed;
        lines.push(format!(
            "{total} packages: \x1b[32m{ok} ok\x1b[0m, \x1b[37m{simulated} simulated\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));
        lines
    }

    /// Print the summary of all recorded packages.
    pub fn print_summary(&self) {
        let lines = self.summary_lines();
        if lines.is_empty() {
            return;
        }
        self.stage("Summary");
        for line in &lines {
            self.info(line);
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_package(&self, name: &str, status: PackageStatus, message: Option<&str>) {
        self.record_package(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn logger_new() {
        let log = Logger::new();
        assert!(log.package_entries().is_empty(), "expected empty package list");
        assert!(log.summary_lines().is_empty());
    }

    #[test]
    fn record_package_ok() {
        let log = Logger::new();
        log.record_package("vim", PackageStatus::Ok, None);
        let packages = log.package_entries();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "vim");
        assert_eq!(packages[0].status, PackageStatus::Ok);
    }

    #[test]
    fn record_package_with_message() {
        let log = Logger::new();
        log.record_package("zsh", PackageStatus::Simulated, Some("3 would link"));
        assert_eq!(
            log.package_entries()[0].message,
            Some("3 would link".to_string())
        );
    }

    #[test]
    fn has_failures_detects_failed_package() {
        let log = Logger::new();
        assert!(!log.has_failures());
        log.record_package("a", PackageStatus::Ok, None);
        assert!(!log.has_failures());
        log.record_package("b", PackageStatus::Failed, Some("conflict"));
        assert!(log.has_failures());
        assert_eq!(log.failure_count(), 1);
    }

    #[test]
    fn summary_lines_count_each_status() {
        let log = Logger::new();
        log.record_package("a", PackageStatus::Ok, None);
        log.record_package("b", PackageStatus::Simulated, None);
        log.record_package("c", PackageStatus::Failed, Some("boom"));
        let lines = log.summary_lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("c (boom)"));
        let totals = &lines[3];
        assert!(totals.starts_with("3 packages"));
        assert!(totals.contains("1 ok"));
        assert!(totals.contains("1 simulated"));
        assert!(totals.contains("1 failed"));
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let log = Logger::new();
        let log_ref: &dyn Log = &log;
        log_ref.record_package("via-trait", PackageStatus::Ok, None);
        log_ref.info("no subscriber installed; event is dropped");
        assert_eq!(log.package_entries().len(), 1);
    }
}
