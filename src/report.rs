//! Operator-facing event sink.
//!
//! Exporters never log through global state. They receive a [`Reporter`] and
//! send it severity-tagged events plus plain console echoes. The CLI wires in
//! [`TracingReporter`]; tests use [`MemoryReporter`], which records everything
//! and prints nothing.

use std::cell::RefCell;
use std::fmt;

/// Severity of a reported event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        })
    }
}

/// Destination for exporter events.
pub trait Reporter {
    /// Record a severity-tagged event.
    fn event(&self, severity: Severity, message: &str);

    /// Print a line straight to the operator console.
    fn echo(&self, line: &str);

    fn info(&self, message: &str) {
        self.event(Severity::Info, message);
    }

    fn warn(&self, message: &str) {
        self.event(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.event(Severity::Error, message);
    }
}

/// Forwards events to `tracing` and echoes to stdout.
///
/// Severity coloring comes from the subscriber's ANSI formatter.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn event(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!(severity = %severity, "{message}"),
            Severity::Warning => tracing::warn!(severity = %severity, "{message}"),
            Severity::Error => tracing::error!(severity = %severity, "{message}"),
        }
    }

    fn echo(&self, line: &str) {
        println!("{line}");
    }
}

/// Silent reporter that keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: RefCell<Vec<(Severity, String)>>,
    echoes: RefCell<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> Vec<(Severity, String)> {
        self.events.borrow().clone()
    }

    /// Messages recorded at `severity`.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Console echoes, oldest first.
    pub fn echoes(&self) -> Vec<String> {
        self.echoes.borrow().clone()
    }
}

impl Reporter for MemoryReporter {
    fn event(&self, severity: Severity, message: &str) {
        self.events
            .borrow_mut()
            .push((severity, message.to_string()));
    }

    fn echo(&self, line: &str) {
        self.echoes.borrow_mut().push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_filters_by_severity() {
        let r = MemoryReporter::new();
        r.info("one");
        r.warn("two");
        r.error("three");
        r.warn("four");
        r.echo("console");
        assert_eq!(r.events().len(), 4);
        assert_eq!(r.messages(Severity::Warning), vec!["two", "four"]);
        assert_eq!(r.echoes(), vec!["console"]);
    }

    #[test]
    fn test_severity_tags() {
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Info.to_string(), "INFO");
    }
}
