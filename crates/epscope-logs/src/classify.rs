use regex::Regex;

use epscope_types::{DiagnosticRecord, Severity};

/// Result of classifying one raw diagnostic line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineClass {
    /// A "run completed successfully" marker (including the auxiliary
    /// ground-temperature calculation marker). Not appended as a record.
    Completed,
    /// A "run terminated" marker. Not appended as a record.
    Terminated,
    /// An ordinary diagnostic record.
    Record(DiagnosticRecord),
}

/// Pattern-based classifier for `eplusout.err`-format lines.
///
/// Outcome markers are checked before the level-tag pattern, unconditionally;
/// a line that could match both is treated as an outcome marker.
pub struct Classifier {
    completed: Regex,
    ground_temp_completed: Regex,
    terminated: Regex,
    level_tag: Regex,
    continuation: Regex,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            completed: Regex::new(r"^\s*\*+ EnergyPlus Completed Successfully").unwrap(),
            ground_temp_completed: Regex::new(r"^\s*\*+ GroundTempCalc\S* Completed Successfully")
                .unwrap(),
            terminated: Regex::new(r"^\s*\*+ EnergyPlus Terminated").unwrap(),
            level_tag: Regex::new(r"^\s*\**\s+\*\*\s*([[:alpha:]]+)\s*\*\*(.*)$").unwrap(),
            continuation: Regex::new(r"^\s*\**\s+\*\*\s*~~~\s*\*\*(.*)$").unwrap(),
        }
    }

    /// Classify a single raw line. Pure: counting and outcome bookkeeping
    /// happen where the result is appended.
    pub fn classify(&self, line: &str) -> LineClass {
        if self.completed.is_match(line) || self.ground_temp_completed.is_match(line) {
            return LineClass::Completed;
        }
        if self.terminated.is_match(line) {
            return LineClass::Terminated;
        }

        if let Some(caps) = self.level_tag.captures(line) {
            let level = Severity::from_tag(&caps[1]);
            return LineClass::Record(DiagnosticRecord::new(level, caps[2].trim()));
        }
        if let Some(caps) = self.continuation.captures(line) {
            return LineClass::Record(DiagnosticRecord::new(Severity::Continue, caps[1].trim()));
        }

        LineClass::Record(DiagnosticRecord::new(Severity::Info, line.trim()))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(classifier: &Classifier, line: &str) -> DiagnosticRecord {
        match classifier.classify(line) {
            LineClass::Record(rec) => rec,
            other => panic!("expected a record for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn level_tag_lines_classify_by_word() {
        let classifier = Classifier::new();

        let rec = record(&classifier, "   **   Severe  ** Something bad happened");
        assert_eq!(rec.level, Severity::Severe);
        assert_eq!(rec.message, "Something bad happened");

        let rec = record(&classifier, "** Warning ** Zone volume suspicious");
        assert_eq!(rec.level, Severity::Warning);
        assert_eq!(rec.message, "Zone volume suspicious");

        let rec = record(&classifier, " **  Fatal  ** Errors preceding, terminating");
        assert_eq!(rec.level, Severity::Fatal);
        assert_eq!(rec.message, "Errors preceding, terminating");
    }

    #[test]
    fn level_tag_tolerates_leading_asterisks_and_whitespace() {
        let classifier = Classifier::new();
        for prefix in ["", " ", "   ", "****   ", "  ** ", "************* "] {
            let line = format!("{prefix} ** Warning ** message text ");
            let rec = record(&classifier, &line);
            assert_eq!(rec.level, Severity::Warning, "prefix {prefix:?}");
            assert_eq!(rec.message, "message text", "prefix {prefix:?}");
        }
    }

    #[test]
    fn unrecognized_tag_falls_back_to_info() {
        let classifier = Classifier::new();
        let rec = record(&classifier, "   ** Notice ** Just letting you know");
        assert_eq!(rec.level, Severity::Info);
        assert_eq!(rec.message, "Just letting you know");
    }

    #[test]
    fn continuation_lines_extract_the_rest() {
        let classifier = Classifier::new();
        let rec = record(&classifier, "   **   ~~~   **   continuation text");
        assert_eq!(rec.level, Severity::Continue);
        assert_eq!(rec.message, "continuation text");
    }

    #[test]
    fn completion_markers_win_over_everything() {
        let classifier = Classifier::new();
        assert_eq!(
            classifier.classify("* EnergyPlus Completed Successfully extra"),
            LineClass::Completed
        );
        assert_eq!(
            classifier.classify("   ***** GroundTempCalc:Slab Completed Successfully"),
            LineClass::Completed
        );
        assert_eq!(
            classifier.classify("** EnergyPlus Terminated--Fatal Error Detected"),
            LineClass::Terminated
        );
    }

    #[test]
    fn plain_lines_become_trimmed_info() {
        let classifier = Classifier::new();
        let rec = record(&classifier, "  Testing the weather file  ");
        assert_eq!(rec.level, Severity::Info);
        assert_eq!(rec.message, "Testing the weather file");
    }
}
