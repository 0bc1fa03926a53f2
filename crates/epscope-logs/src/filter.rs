use std::collections::HashSet;

use epscope_types::{DiagnosticRecord, Severity};

/// Dynamic set of diagnostic levels seen so far, each independently
/// toggle-able, in first-seen order.
///
/// `Continue` is never registered; continuation lines inherit visibility
/// from the record they extend (see [`LevelFilterRegistry::filtered_indices`]).
#[derive(Clone, Debug, Default)]
pub struct LevelFilterRegistry {
    entries: Vec<(Severity, bool)>,
}

impl LevelFilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a level has been observed. Idempotent; new levels default
    /// to visible.
    pub fn register(&mut self, level: Severity) {
        if level == Severity::Continue {
            return;
        }
        if self.entries.iter().any(|(seen, _)| *seen == level) {
            return;
        }
        self.entries.push((level, true));
    }

    /// Flip the visibility of a registered level.
    pub fn toggle(&mut self, level: Severity) {
        if let Some((_, visible)) = self.entries.iter_mut().find(|(seen, _)| *seen == level) {
            *visible = !*visible;
        }
    }

    /// Flip the visibility of the checkbox at `index` (first-seen order).
    /// Returns false when the index is out of range.
    pub fn toggle_at(&mut self, index: usize) -> bool {
        match self.entries.get_mut(index) {
            Some((_, visible)) => {
                *visible = !*visible;
                true
            }
            None => false,
        }
    }

    pub fn is_visible(&self, level: Severity) -> bool {
        self.entries
            .iter()
            .find(|(seen, _)| *seen == level)
            .is_some_and(|(_, visible)| *visible)
    }

    /// Registered levels and their visibility, in first-seen order.
    pub fn entries(&self) -> &[(Severity, bool)] {
        &self.entries
    }

    /// The currently visible levels.
    pub fn allowed_set(&self) -> HashSet<Severity> {
        self.entries
            .iter()
            .filter(|(_, visible)| *visible)
            .map(|(level, _)| *level)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Forget every registered level. Called together with the record
    /// sequences on "clear results" so stale checkboxes never outlive the
    /// records that introduced them.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Indices of the records visible under the current toggles.
    ///
    /// One forward scan tracking whether the immediately preceding record was
    /// included: a record is included iff its level is visible, or it is a
    /// continuation and its predecessor was included. Continuation chains
    /// inherit transitively through that single boolean.
    pub fn filtered_indices(&self, records: &[DiagnosticRecord]) -> Vec<usize> {
        let mut indices = Vec::with_capacity(records.len());
        let mut prev_included = false;

        for (idx, record) in records.iter().enumerate() {
            let included = if record.level == Severity::Continue {
                prev_included
            } else {
                self.is_visible(record.level)
            };
            if included {
                indices.push(idx);
            }
            prev_included = included;
        }

        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(level: Severity, message: &str) -> DiagnosticRecord {
        DiagnosticRecord::new(level, message)
    }

    fn registry_for(records: &[DiagnosticRecord]) -> LevelFilterRegistry {
        let mut registry = LevelFilterRegistry::new();
        for record in records {
            registry.register(record.level);
        }
        registry
    }

    #[test]
    fn register_is_idempotent_and_ignores_continue() {
        let mut registry = LevelFilterRegistry::new();
        registry.register(Severity::Warning);
        registry.register(Severity::Warning);
        registry.register(Severity::Continue);
        registry.register(Severity::Severe);

        assert_eq!(
            registry.entries(),
            &[(Severity::Warning, true), (Severity::Severe, true)]
        );
    }

    #[test]
    fn continuations_inherit_from_the_immediately_preceding_record() {
        let records = vec![
            rec(Severity::Warning, "w1"),
            rec(Severity::Continue, "w1 cont"),
            rec(Severity::Continue, "w1 cont cont"),
            rec(Severity::Severe, "s1"),
            rec(Severity::Continue, "s1 cont"),
            rec(Severity::Info, "i1"),
        ];
        let mut registry = registry_for(&records);

        assert_eq!(registry.filtered_indices(&records), vec![0, 1, 2, 3, 4, 5]);

        registry.toggle(Severity::Severe);
        // the severe record and its trailing continuation both disappear
        assert_eq!(registry.filtered_indices(&records), vec![0, 1, 2, 5]);
        assert_eq!(
            registry.allowed_set(),
            HashSet::from([Severity::Warning, Severity::Info])
        );

        registry.toggle(Severity::Warning);
        // the warning's whole continuation chain disappears with it
        assert_eq!(registry.filtered_indices(&records), vec![5]);
    }

    #[test]
    fn leading_continuation_has_no_parent_and_is_dropped() {
        let records = vec![
            rec(Severity::Continue, "orphan"),
            rec(Severity::Info, "i1"),
        ];
        let registry = registry_for(&records);
        assert_eq!(registry.filtered_indices(&records), vec![1]);
    }

    #[test]
    fn toggle_round_trip_restores_the_original_view() {
        let records = vec![
            rec(Severity::Info, "i1"),
            rec(Severity::Warning, "w1"),
            rec(Severity::Continue, "w1 cont"),
            rec(Severity::Warning, "w2"),
            rec(Severity::Info, "i2"),
            rec(Severity::Continue, "i2 cont"),
        ];
        let mut registry = registry_for(&records);
        let original = registry.filtered_indices(&records);

        registry.toggle(Severity::Warning);
        let without_warnings = registry.filtered_indices(&records);
        assert_eq!(without_warnings, vec![0, 4, 5]);

        registry.toggle(Severity::Warning);
        assert_eq!(registry.filtered_indices(&records), original);
    }

    #[test]
    fn inclusion_matches_induction_over_synthetic_sequences() {
        // alternating visible/hidden parents, each followed by a run of
        // continuations; inclusion of each continuation must equal the
        // inclusion of its predecessor
        let mut records = Vec::new();
        for i in 0..8 {
            let level = if i % 2 == 0 {
                Severity::Info
            } else {
                Severity::Severe
            };
            records.push(rec(level, "parent"));
            for _ in 0..(i % 3) {
                records.push(rec(Severity::Continue, "cont"));
            }
        }
        let mut registry = registry_for(&records);
        registry.toggle(Severity::Severe);

        let included = registry.filtered_indices(&records);
        let mut prev_included = false;
        for (idx, record) in records.iter().enumerate() {
            let expect = if record.level == Severity::Continue {
                prev_included
            } else {
                record.level == Severity::Info
            };
            assert_eq!(included.contains(&idx), expect, "index {idx}");
            prev_included = expect;
        }
    }

    #[test]
    fn clear_forgets_registered_levels() {
        let mut registry = LevelFilterRegistry::new();
        registry.register(Severity::Warning);
        registry.toggle(Severity::Warning);
        registry.clear();

        assert!(registry.is_empty());
        assert!(!registry.is_visible(Severity::Warning));
    }
}
