//! Per-list decision engine.
//!
//! One list goes through: read, parse, expiry split, address validation of
//! the surviving candidates, audit, then the write decision. Nothing is shared
//! between lists; a list that cannot be read or written is reported and the
//! run moves on to the next one.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::audit::{AuditEvent, AuditSink, Severity};
use crate::config::{Config, WritePolicy};
use crate::entry::{decode_entries, Entry};
use crate::error::EdlError;
use crate::expiry::{classify_against, cutoff_date, Expiry};
use crate::fs_abstraction::FileSystem;
use crate::validation::is_valid_address;
use crate::writer::{output_path, write_active, OutputLine};

pub const MSG_START: &str = "start EDL processing";
pub const MSG_EMPTY: &str = "file is empty";
pub const MSG_NO_EXPIRED: &str = "no expired records processed";
pub const MSG_NO_INVALID: &str = "no invalid records processed";
pub const MSG_NO_CHANGES: &str = "no changes were made";
pub const MSG_UPDATED: &str = "end of run, file updated";
pub const MSG_DRY_RUN: &str = "dry run, file not written";
pub const MSG_LOSSY_PREFIX: &str = "invalid UTF-8 replaced in record";

/// The slice of configuration the pipeline acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub source: String,
    pub retention_days: u32,
    pub policy: WritePolicy,
    /// Classify and audit, but never write.
    pub dry_run: bool,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source: config.source.clone(),
            retention_days: config.expires,
            policy: config.write_policy(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Final classification of a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Expired,
    ActiveValid,
    ActiveInvalid,
}

/// Classify one entry end to end. `None` for entries dated exactly on the
/// cutoff, which belong to no bucket.
pub fn classify_entry(entry: &Entry, cutoff: NaiveDate) -> Option<Classification> {
    match classify_against(entry, cutoff) {
        Expiry::Expired => Some(Classification::Expired),
        Expiry::OnCutoff => None,
        Expiry::ActiveCandidate if is_valid_address(entry.address()) => {
            Some(Classification::ActiveValid)
        }
        Expiry::ActiveCandidate => Some(Classification::ActiveInvalid),
    }
}

/// Outcome of processing one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedFileResult {
    pub expired: Vec<Entry>,
    pub invalid: Vec<Entry>,
    pub active: Vec<Entry>,
    /// Entries dated exactly on the cutoff, dropped without audit.
    pub on_cutoff: usize,
    pub was_empty: bool,
    pub wrote_output: bool,
    pub output_path: Option<PathBuf>,
}

impl ClassifiedFileResult {
    fn empty() -> Self {
        Self {
            was_empty: true,
            ..Default::default()
        }
    }

    /// Active entries padded for output.
    pub fn output_lines(&self) -> Vec<OutputLine> {
        self.active.iter().map(OutputLine::from_entry).collect()
    }

    /// Whether anything was removed from the list.
    pub fn has_changes(&self) -> bool {
        !self.expired.is_empty() || !self.invalid.is_empty()
    }
}

/// Entries bucketed by [`classify_entry`], with their original positions.
#[derive(Default)]
struct Buckets {
    expired: Vec<(usize, Entry)>,
    invalid: Vec<(usize, Entry)>,
    active: Vec<(usize, Entry)>,
    on_cutoff: usize,
}

fn bucket_entries(entries: Vec<Entry>, cutoff: NaiveDate) -> Buckets {
    let mut buckets = Buckets::default();
    for (index, entry) in entries.into_iter().enumerate() {
        match classify_entry(&entry, cutoff) {
            Some(Classification::Expired) => buckets.expired.push((index, entry)),
            Some(Classification::ActiveValid) => buckets.active.push((index, entry)),
            Some(Classification::ActiveInvalid) => buckets.invalid.push((index, entry)),
            None => {
                debug!(row = index, address = entry.address(), "entry dated on cutoff, skipped");
                buckets.on_cutoff += 1;
            }
        }
    }
    buckets
}

fn audit_bucket<A: AuditSink + ?Sized>(
    audit: &A,
    file: &str,
    severity: Severity,
    bucket: &[(usize, Entry)],
    none_message: &str,
) {
    if bucket.is_empty() {
        audit.emit(AuditEvent::milestone(Severity::Info, file, none_message));
        return;
    }
    for (index, entry) in bucket {
        audit.emit(AuditEvent::record(severity, file, *index, entry));
    }
}

fn strip_index(bucket: Vec<(usize, Entry)>) -> Vec<Entry> {
    bucket.into_iter().map(|(_, entry)| entry).collect()
}

/// Process a single list file.
///
/// Returns the classified buckets. Read and write failures come back as
/// [`EdlError::Read`] / [`EdlError::Write`]; every per-record anomaly is
/// absorbed into the buckets instead.
pub fn process_list<F, A>(
    fs: &F,
    audit: &A,
    settings: &PipelineSettings,
    today: NaiveDate,
    list_name: &str,
) -> Result<ClassifiedFileResult, EdlError>
where
    F: FileSystem + ?Sized,
    A: AuditSink + ?Sized,
{
    audit.emit(AuditEvent::milestone(Severity::Info, list_name, MSG_START));

    let input = Path::new(list_name);
    let content = fs.read(input).map_err(|source| EdlError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let decoded = decode_entries(&content);
    for row in &decoded.lossy_rows {
        audit.emit(AuditEvent::milestone(
            Severity::Warning,
            list_name,
            format!("{} {}", MSG_LOSSY_PREFIX, row),
        ));
    }

    let entries = decoded.entries;
    if entries.is_empty() {
        audit.emit(AuditEvent::milestone(Severity::Info, list_name, MSG_EMPTY));
        return Ok(ClassifiedFileResult::empty());
    }
    debug!(file = list_name, records = entries.len(), "parsed list");

    let cutoff = cutoff_date(today, settings.retention_days);
    let buckets = bucket_entries(entries, cutoff);

    audit_bucket(audit, list_name, Severity::Warning, &buckets.expired, MSG_NO_EXPIRED);
    audit_bucket(audit, list_name, Severity::Error, &buckets.invalid, MSG_NO_INVALID);

    let mut result = ClassifiedFileResult {
        expired: strip_index(buckets.expired),
        invalid: strip_index(buckets.invalid),
        active: strip_index(buckets.active),
        on_cutoff: buckets.on_cutoff,
        ..Default::default()
    };

    match settings.policy {
        WritePolicy::Skip => {
            if !result.has_changes() {
                audit.emit(AuditEvent::milestone(Severity::Info, list_name, MSG_NO_CHANGES));
            }
        }
        WritePolicy::Write(target) => {
            let path = output_path(&settings.source, list_name, target);
            if settings.dry_run {
                audit.emit(AuditEvent::milestone(Severity::Info, list_name, MSG_DRY_RUN));
            } else {
                write_active(fs, &path, &result.output_lines())?;
                result.wrote_output = true;
                audit.emit(AuditEvent::milestone(Severity::Info, list_name, MSG_UPDATED));
            }
            result.output_path = Some(path);
        }
    }

    Ok(result)
}

/// What happened to one configured list.
#[derive(Debug)]
pub enum ListOutcome {
    Processed {
        name: String,
        result: ClassifiedFileResult,
    },
    Failed {
        name: String,
        error: EdlError,
    },
}

impl ListOutcome {
    pub fn name(&self) -> &str {
        match self {
            ListOutcome::Processed { name, .. } | ListOutcome::Failed { name, .. } => name,
        }
    }
}

/// Totals across a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunTotals {
    pub processed: usize,
    pub empty: usize,
    pub failed: usize,
    pub written: usize,
    pub active: usize,
    pub expired: usize,
    pub invalid: usize,
}

/// Process every list in order. A failing list is audited at error level
/// and does not stop the others.
pub fn run_lists<F, A>(
    fs: &F,
    audit: &A,
    settings: &PipelineSettings,
    today: NaiveDate,
    list_names: &[String],
) -> Vec<ListOutcome>
where
    F: FileSystem + ?Sized,
    A: AuditSink + ?Sized,
{
    list_names
        .iter()
        .map(|name| match process_list(fs, audit, settings, today, name) {
            Ok(result) => ListOutcome::Processed {
                name: name.clone(),
                result,
            },
            Err(error) => {
                audit.emit(AuditEvent::milestone(Severity::Error, name, error.to_string()));
                ListOutcome::Failed {
                    name: name.clone(),
                    error,
                }
            }
        })
        .collect()
}

/// Sum up a run.
pub fn totals(outcomes: &[ListOutcome]) -> RunTotals {
    outcomes.iter().fold(RunTotals::default(), |mut t, outcome| {
        match outcome {
            ListOutcome::Processed { result, .. } => {
                t.processed += 1;
                t.empty += usize::from(result.was_empty);
                t.written += usize::from(result.wrote_output);
                t.active += result.active.len();
                t.expired += result.expired.len();
                t.invalid += result.invalid.len();
            }
            ListOutcome::Failed { .. } => t.failed += 1,
        }
        t
    })
}
