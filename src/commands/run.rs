//! Run command implementation.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::audit::TracingAudit;
use crate::config::Config;
use crate::fs_abstraction::real_fs;
use crate::pipeline::{run_lists, totals, ListOutcome, PipelineSettings};
use crate::writer::render_active;

/// Run the list pipeline over every configured list
pub fn run(config: &Config, dry_run: bool, today: Option<NaiveDate>) -> Result<()> {
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    if config.edl_list_names.is_empty() {
        warn!("No EDL lists configured. Check your configuration.");
        return Ok(());
    }

    info!(
        lists = config.edl_list_names.len(),
        retention_days = config.expires,
        %today,
        dry_run,
        "Processing EDL lists..."
    );

    let settings = PipelineSettings::from_config(config).with_dry_run(dry_run);
    let outcomes = run_lists(
        real_fs(),
        &TracingAudit,
        &settings,
        today,
        &config.edl_list_names,
    );

    let t = totals(&outcomes);
    if t.failed > 0 {
        warn!("{} of {} lists could not be processed", t.failed, outcomes.len());
    }

    print!("{}", render_report(&outcomes));

    Ok(())
}

/// Human-readable summary: the active set of each list, then totals.
pub fn render_report(outcomes: &[ListOutcome]) -> String {
    let mut out = String::new();

    for outcome in outcomes {
        match outcome {
            ListOutcome::Processed { name, result } if result.was_empty => {
                out.push_str(&format!("== {}: file is empty\n", name));
            }
            ListOutcome::Processed { name, result } => {
                let destination = match (&result.output_path, result.wrote_output) {
                    (Some(path), true) => format!("written to {}", path.display()),
                    (Some(path), false) => format!("dry run, would write {}", path.display()),
                    (None, _) => "not written".to_string(),
                };
                out.push_str(&format!(
                    "== {}: {} active, {} expired, {} invalid ({})\n",
                    name,
                    result.active.len(),
                    result.expired.len(),
                    result.invalid.len(),
                    destination
                ));
                out.push_str(&render_active(&result.output_lines()));
            }
            ListOutcome::Failed { name, error } => {
                out.push_str(&format!("== {}: FAILED: {}\n", name, error));
            }
        }
    }

    let t = totals(outcomes);
    out.push_str(&format!(
        "\n[OK] {} lists processed ({} empty, {} failed): {} kept, {} expired, {} invalid, {} written\n",
        t.processed, t.empty, t.failed, t.active, t.expired, t.invalid, t.written
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use crate::error::EdlError;
    use crate::pipeline::ClassifiedFileResult;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_render_report() {
        let outcomes = vec![
            ListOutcome::Processed {
                name: "block.txt".to_string(),
                result: ClassifiedFileResult {
                    active: vec![Entry::new("10.0.0.1", "ok", None)],
                    expired: vec![Entry::new("10.0.0.2", "", None)],
                    wrote_output: true,
                    output_path: Some(PathBuf::from("/srv/block.txt")),
                    ..Default::default()
                },
            },
            ListOutcome::Processed {
                name: "empty.txt".to_string(),
                result: ClassifiedFileResult {
                    was_empty: true,
                    ..Default::default()
                },
            },
            ListOutcome::Failed {
                name: "gone.txt".to_string(),
                error: EdlError::Read {
                    path: PathBuf::from("gone.txt"),
                    source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
                },
            },
        ];

        let report = render_report(&outcomes);

        assert!(report.contains("== block.txt: 1 active, 1 expired, 0 invalid (written to /srv/block.txt)"));
        assert!(report.contains("10.0.0.1 # ok # \n"));
        assert!(report.contains("== empty.txt: file is empty"));
        assert!(report.contains("== gone.txt: FAILED"));
        assert!(report.contains("2 lists processed (1 empty, 1 failed): 1 kept, 1 expired, 0 invalid, 1 written"));
    }

    #[test]
    fn test_render_report_not_written() {
        let outcomes = vec![ListOutcome::Processed {
            name: "a".to_string(),
            result: ClassifiedFileResult::default(),
        }];
        assert!(render_report(&outcomes).contains("(not written)"));
    }
}
