use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use epscope_types::{AggregateCounts, DiagnosticRecord, RunOutcome, Severity};

use crate::classify::{Classifier, LineClass};

/// Diagnostic log file name within a run's output directory.
pub const ERR_FILE_NAME: &str = "eplusout.err";

/// Per-run log state: the raw stdout-style view, the classified diagnostic
/// sequence, aggregate counts, and the run outcome.
///
/// Both sequences are append-only; they are reset only by [`RunLog::clear`].
pub struct RunLog {
    pub raw_lines: Vec<String>,
    pub records: Vec<DiagnosticRecord>,
    pub counts: AggregateCounts,
    pub outcome: RunOutcome,
    /// Set when a success marker has been seen; gates the stale re-run guard.
    pub has_completed_run: bool,

    classifier: Classifier,
}

impl RunLog {
    pub fn new() -> Self {
        Self {
            raw_lines: Vec::new(),
            records: Vec::new(),
            counts: AggregateCounts::default(),
            outcome: RunOutcome::Pending,
            has_completed_run: false,
            classifier: Classifier::new(),
        }
    }

    /// Append a line to the raw stdout-style view, verbatim.
    pub fn push_raw(&mut self, line: impl Into<String>) {
        self.raw_lines.push(line.into());
    }

    /// Append a classified record, updating the aggregate counts.
    pub fn push_record(&mut self, record: DiagnosticRecord) {
        self.counts.record(record.level);
        self.records.push(record);
    }

    /// Ingest one line of `eplusout.err` content.
    ///
    /// Outcome markers set the run outcome and land verbatim in the raw view
    /// instead of the record sequence; every other line becomes a record.
    pub fn ingest_err_line(&mut self, line: &str) {
        match self.classifier.classify(line) {
            LineClass::Completed => {
                self.outcome.update(RunOutcome::Success);
                self.has_completed_run = true;
                self.push_raw(line);
            }
            LineClass::Terminated => {
                self.outcome.update(RunOutcome::Failed);
                self.push_raw(line);
            }
            LineClass::Record(record) => {
                self.push_record(record);
            }
        }
    }

    /// File-based ingestion: read a completed run's diagnostic file eagerly
    /// and present the state as if the run had just finished.
    ///
    /// A missing or unreadable file leaves the state cleared and empty and
    /// returns `false`; "no prior results" is a valid state, not an error.
    pub fn reload(&mut self, path: &Path) -> bool {
        self.clear();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "no prior results to reload");
                return false;
            }
        };

        self.push_raw("=========================================");
        self.push_raw("   Results have been reloaded from disk");
        self.push_raw("=========================================");
        self.push_raw("");

        for line in BufReader::new(file).lines() {
            match line {
                Ok(line) => self.ingest_err_line(&line),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "stopped reading diagnostic file");
                    break;
                }
            }
        }

        true
    }

    /// Reset every per-run sequence, the counts, and the outcome.
    pub fn clear(&mut self) {
        self.raw_lines.clear();
        self.records.clear();
        self.counts = AggregateCounts::default();
        self.outcome = RunOutcome::Pending;
        self.has_completed_run = false;
    }
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn severe_then_continuation_round_trip() {
        let mut log = RunLog::new();
        log.ingest_err_line("   **   Severe  ** Something bad happened");
        log.ingest_err_line("   **   ~~~   **   continuation text");

        assert_eq!(
            log.records,
            vec![
                DiagnosticRecord::new(Severity::Severe, "Something bad happened"),
                DiagnosticRecord::new(Severity::Continue, "continuation text"),
            ]
        );
        assert_eq!(log.counts.severes, 1);
        assert_eq!(log.counts.warnings, 0);
    }

    #[test]
    fn reload_of_single_completion_marker() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(ERR_FILE_NAME);
        let mut file = File::create(&path).expect("create err file");
        writeln!(file, "* EnergyPlus Completed Successfully extra").expect("write");
        drop(file);

        let mut log = RunLog::new();
        assert!(log.reload(&path));

        assert_eq!(log.outcome, RunOutcome::Success);
        assert!(log.has_completed_run);
        assert!(
            log.raw_lines
                .iter()
                .any(|l| l == "* EnergyPlus Completed Successfully extra")
        );
        assert!(log.records.is_empty());
        assert_eq!(log.counts, AggregateCounts::default());
    }

    #[test]
    fn reload_missing_file_is_a_silent_no_op() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut log = RunLog::new();
        log.push_raw("leftover");

        assert!(!log.reload(&dir.path().join("does-not-exist.err")));
        assert!(log.raw_lines.is_empty());
        assert!(log.records.is_empty());
        assert_eq!(log.outcome, RunOutcome::Pending);
    }

    #[test]
    fn reload_classifies_mixed_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(ERR_FILE_NAME);
        let mut file = File::create(&path).expect("create err file");
        writeln!(file, "Program Version,EnergyPlus, Version 22.2.0").expect("write");
        writeln!(file, "   ** Warning ** Weather file location mismatch").expect("write");
        writeln!(file, "   **   ~~~   ** ..continued in eplusout.err").expect("write");
        writeln!(file, "   ** Severe  ** Out of range value").expect("write");
        writeln!(file, "   ************* EnergyPlus Terminated.").expect("write");
        drop(file);

        let mut log = RunLog::new();
        assert!(log.reload(&path));

        assert_eq!(log.counts.warnings, 1);
        assert_eq!(log.counts.severes, 1);
        assert_eq!(log.outcome, RunOutcome::Failed);
        // banner + terminal marker in the raw view, four records classified
        assert_eq!(log.records.len(), 4);
        assert_eq!(log.records[0].level, Severity::Info);
        assert_eq!(log.records[2].level, Severity::Continue);
    }

    #[test]
    fn clear_resets_everything() {
        let mut log = RunLog::new();
        log.ingest_err_line("   ** Warning ** something");
        log.ingest_err_line("* EnergyPlus Completed Successfully");
        log.clear();

        assert!(log.raw_lines.is_empty());
        assert!(log.records.is_empty());
        assert_eq!(log.counts, AggregateCounts::default());
        assert_eq!(log.outcome, RunOutcome::Pending);
        assert!(!log.has_completed_run);
    }
}
