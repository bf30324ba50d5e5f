//! Core logging types: package entries, status, and the [`Log`] trait.

/// Package result for summary reporting.
#[derive(Debug, Clone)]
pub struct PackageEntry {
    /// Package name as given on the command line.
    pub name: String,
    /// Final status of the package.
    pub status: PackageStatus,
    /// Optional detail message (e.g. link counts or the error).
    pub message: Option<String>,
}

/// Status of a processed package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStatus {
    /// Package processed and the target tree updated.
    Ok,
    /// Package processed in simulate mode; nothing was changed.
    Simulated,
    /// Package processing stopped on an error.
    Failed,
}

/// Abstraction over logging backends.
///
/// The linker only talks to this trait, so tests can capture messages in
/// memory while the binary routes them through [`tracing`].
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (shown on the console only when verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a change that simulate mode suppressed.
    fn dry_run(&self, msg: &str);
    /// Record a package result for the summary.
    fn record_package(&self, name: &str, status: PackageStatus, message: Option<&str>);
}
