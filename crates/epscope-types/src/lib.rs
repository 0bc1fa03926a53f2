//! Shared types for epscope
//!
//! This crate contains data structures used across multiple epscope crates.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Severity
// ============================================================================

/// Diagnostic severity level, ordered by severity for display grouping.
///
/// `Continue` marks a line that extends the previous record's message rather
/// than starting a new one; it is never registered as a filterable level and
/// never opens a new visual group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Severity {
    Continue,
    #[default]
    Info,
    Warning,
    Severe,
    Fatal,
}

impl Severity {
    /// Map an extracted level-tag word to a severity.
    ///
    /// Matching is case-sensitive on the trimmed word; unrecognized words
    /// fall back to `Info` so an odd tag never breaks ingestion.
    pub fn from_tag(word: &str) -> Self {
        match word.trim() {
            "Fatal" => Self::Fatal,
            "Severe" => Self::Severe,
            "Warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    /// Canonical display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Continue => "Continue",
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Severe => "Severe",
            Self::Fatal => "Fatal",
        }
    }

    /// Style for the level column in the diagnostics view
    pub fn level_style(&self) -> Style {
        match self {
            Self::Continue => Style::default(),
            Self::Info => Style::default().fg(Color::Blue),
            Self::Warning => Style::default().fg(Color::Yellow),
            Self::Severe => Style::default().fg(Color::LightRed),
            Self::Fatal => Style::default().fg(Color::Red),
        }
    }

    /// Style applied to the whole line
    pub fn line_style(&self) -> Style {
        match self {
            Self::Continue => Style::default().add_modifier(Modifier::DIM),
            Self::Info => Style::default().add_modifier(Modifier::DIM),
            Self::Warning => Style::default(),
            Self::Severe => Style::default().add_modifier(Modifier::BOLD),
            Self::Fatal => Style::default().add_modifier(Modifier::BOLD),
        }
    }
}

// ============================================================================
// Diagnostic records
// ============================================================================

/// A single classified diagnostic line. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub level: Severity,
    pub message: String,
}

impl DiagnosticRecord {
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Running totals over the appended diagnostic records.
///
/// Monotonically non-decreasing within a run; reset only by an explicit
/// clear.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AggregateCounts {
    pub warnings: u32,
    pub severes: u32,
}

impl AggregateCounts {
    /// Account for a newly appended record.
    pub fn record(&mut self, level: Severity) {
        match level {
            Severity::Warning => self.warnings += 1,
            Severity::Severe => self.severes += 1,
            _ => {}
        }
    }
}

// ============================================================================
// Run outcome
// ============================================================================

/// Completion status of one simulation invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunOutcome {
    #[default]
    Pending,
    Success,
    Failed,
}

impl RunOutcome {
    /// Derive an outcome from the shared progress cell: 100 means success,
    /// any negative value means failure, everything else is still pending.
    pub fn from_progress(progress: i32) -> Self {
        if progress >= 100 {
            Self::Success
        } else if progress < 0 {
            Self::Failed
        } else {
            Self::Pending
        }
    }

    /// Fold in a newly derived outcome. Once terminal, the outcome sticks
    /// until an explicit state clear.
    pub fn update(&mut self, observed: Self) {
        if !self.is_terminal() {
            *self = observed;
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_mapping_is_case_sensitive_with_info_fallback() {
        assert_eq!(Severity::from_tag("Fatal"), Severity::Fatal);
        assert_eq!(Severity::from_tag("  Severe  "), Severity::Severe);
        assert_eq!(Severity::from_tag("Warning"), Severity::Warning);
        assert_eq!(Severity::from_tag("WARNING"), Severity::Info);
        assert_eq!(Severity::from_tag("Notice"), Severity::Info);
    }

    #[test]
    fn counts_follow_record_level() {
        let mut counts = AggregateCounts::default();
        counts.record(Severity::Warning);
        counts.record(Severity::Severe);
        counts.record(Severity::Severe);
        counts.record(Severity::Info);
        counts.record(Severity::Continue);
        assert_eq!(counts.warnings, 1);
        assert_eq!(counts.severes, 2);
    }

    #[test]
    fn outcome_sticks_once_terminal() {
        let mut outcome = RunOutcome::Pending;
        outcome.update(RunOutcome::from_progress(42));
        assert_eq!(outcome, RunOutcome::Pending);
        outcome.update(RunOutcome::from_progress(100));
        assert_eq!(outcome, RunOutcome::Success);
        outcome.update(RunOutcome::from_progress(-1));
        assert_eq!(outcome, RunOutcome::Success);
    }
}
