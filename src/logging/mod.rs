//! Logging infrastructure for structured console output.

mod logger;
mod subscriber;
mod types;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, PackageEntry, PackageStatus};

/// A single captured log message.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// A stage header entry.
    Stage(String),
    /// An informational entry.
    Info(String),
    /// A debug entry.
    Debug(String),
    /// A warning entry.
    Warn(String),
    /// An error entry.
    Error(String),
    /// A simulated-change entry.
    DryRun(String),
}

/// Implement the display methods of [`Log`] by capturing each message into
/// `self.entries` as the corresponding [`LogEntry`] variant.
#[cfg(test)]
macro_rules! capture_log_methods {
    ($($method:ident => $variant:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                if let Ok(mut guard) = self.entries.lock() {
                    guard.push(LogEntry::$variant(msg.to_string()));
                }
            }
        )+
    };
}

/// In-memory [`Log`] for unit tests: keeps every message in order.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: std::sync::Mutex<Vec<LogEntry>>,
    packages: std::sync::Mutex<Vec<PackageEntry>>,
}

#[cfg(test)]
impl MemoryLog {
    /// All captured messages, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Only the simulated-change messages.
    pub fn dry_runs(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                LogEntry::DryRun(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    /// Only the debug messages.
    pub fn debugs(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                LogEntry::Debug(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    /// All recorded package results.
    pub fn packages(&self) -> Vec<PackageEntry> {
        self.packages.lock().map_or_else(|_| vec![], |g| g.clone())
    }
}

#[cfg(test)]
impl Log for MemoryLog {
    capture_log_methods!(
        stage => Stage,
        info => Info,
        debug => Debug,
        warn => Warn,
        error => Error,
        dry_run => DryRun,
    );

    fn record_package(&self, name: &str, status: PackageStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.packages.lock() {
            guard.push(PackageEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}
