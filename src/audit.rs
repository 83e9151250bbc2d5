//! Audit trail for list processing.
//!
//! The pipeline reports every decision through an [`AuditSink`]: file-level
//! milestones and one record snapshot per expired or invalid entry. Where the
//! events end up is the sink's business; [`TracingAudit`] forwards them to
//! `tracing`, [`MemoryAudit`] keeps them for inspection.

use std::fmt;
use std::sync::Mutex;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::entry::Entry;

/// Severity of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        })
    }
}

/// Snapshot of an entry at the moment it was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSnapshot {
    /// Position of the record among the parsed entries of its file.
    pub index: usize,
    pub address: String,
    pub comment: String,
    pub date: Option<NaiveDate>,
}

impl RecordSnapshot {
    pub fn new(index: usize, entry: &Entry) -> Self {
        Self {
            index,
            address: entry.address().to_string(),
            comment: entry.comment().to_string(),
            date: entry.date(),
        }
    }
}

/// Body of an audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditDetail {
    Milestone(String),
    Record(RecordSnapshot),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub severity: Severity,
    pub file: String,
    pub detail: AuditDetail,
}

impl AuditEvent {
    pub fn milestone(severity: Severity, file: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            file: file.to_string(),
            detail: AuditDetail::Milestone(message.into()),
        }
    }

    pub fn record(severity: Severity, file: &str, index: usize, entry: &Entry) -> Self {
        Self {
            severity,
            file: file.to_string(),
            detail: AuditDetail::Record(RecordSnapshot::new(index, entry)),
        }
    }

    /// Milestone text, if this is a milestone event.
    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            AuditDetail::Milestone(msg) => Some(msg),
            AuditDetail::Record(_) => None,
        }
    }
}

/// Receiver of audit events.
///
/// The pipeline reports every milestone and every removed record through
/// this trait. Production runs forward to `tracing`, so the events land in
/// the console and in the audit log file; tests collect them in memory.
///
/// # Example (production)
/// ```
/// use edlman::audit::{AuditEvent, AuditSink, Severity, TracingAudit};
///
/// TracingAudit.emit(AuditEvent::milestone(Severity::Info, "edl-block.txt", "start EDL processing"));
/// ```
///
/// # Example (testing)
/// ```
/// use edlman::audit::{AuditEvent, AuditSink, MemoryAudit, Severity};
/// use edlman::entry::Entry;
///
/// let audit = MemoryAudit::new();
/// let entry = Entry::parse_line("192.168.1.5 # test host # 2000-01-01");
/// audit.emit(AuditEvent::record(Severity::Warning, "edl-block.txt", 0, &entry));
///
/// assert_eq!(audit.records(Severity::Warning)[0].address, "192.168.1.5");
/// ```
pub trait AuditSink {
    /// Deliver one event. Sinks must not fail the run.
    fn emit(&self, event: AuditEvent);
}

impl<T: AuditSink + ?Sized> AuditSink for &T {
    fn emit(&self, event: AuditEvent) {
        (**self).emit(event)
    }
}

/// Forwards audit events to `tracing` at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAudit;

impl AuditSink for TracingAudit {
    fn emit(&self, event: AuditEvent) {
        let file = event.file.as_str();
        match (&event.detail, event.severity) {
            (AuditDetail::Milestone(msg), Severity::Info) => info!(file, "{}", msg),
            (AuditDetail::Milestone(msg), Severity::Warning) => warn!(file, "{}", msg),
            (AuditDetail::Milestone(msg), Severity::Error) => error!(file, "{}", msg),
            (AuditDetail::Record(rec), severity) => {
                let date = rec
                    .date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "none".to_string());
                match severity {
                    Severity::Info => info!(
                        file,
                        row = rec.index,
                        address = %rec.address,
                        comment = %rec.comment,
                        date = %date,
                        "record kept"
                    ),
                    Severity::Warning => warn!(
                        file,
                        row = rec.index,
                        address = %rec.address,
                        comment = %rec.comment,
                        date = %date,
                        "expired record removed"
                    ),
                    Severity::Error => error!(
                        file,
                        row = rec.index,
                        address = %rec.address,
                        comment = %rec.comment,
                        date = %date,
                        "invalid record removed"
                    ),
                }
            }
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemoryAudit {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAudit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.lock().clone()
    }

    /// Milestone messages in emission order.
    pub fn milestones(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| e.message().map(str::to_string))
            .collect()
    }

    /// Record snapshots logged at `severity`.
    pub fn records(&self, severity: Severity) -> Vec<RecordSnapshot> {
        self.lock()
            .iter()
            .filter(|e| e.severity == severity)
            .filter_map(|e| match &e.detail {
                AuditDetail::Record(rec) => Some(rec.clone()),
                AuditDetail::Milestone(_) => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AuditEvent>> {
        // A poisoned log is still a usable log
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AuditSink for MemoryAudit {
    fn emit(&self, event: AuditEvent) {
        self.lock().push(event);
    }
}
