use std::collections::HashSet;

use tracing::debug;

use crate::domain::HeadlineRecord;

/// Result of one novelty pass, both lists ordered newest-first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub new_records: Vec<HeadlineRecord>,
    pub all_records: Vec<HeadlineRecord>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.all_records.is_empty()
    }
}

/// Decides which records of a refresh are new.
///
/// Records are expected newest-first. Scanning stops reporting novelty at the
/// first record whose identity is already known: anything below a known
/// record is treated as old even when its identity was never seen, so
/// entries churning at the tail of a feed are not reported again.
pub struct NoveltyDetector;

impl NoveltyDetector {
    pub fn classify(
        records: Vec<HeadlineRecord>,
        known: &HashSet<String>,
        cold_start: bool,
    ) -> Classification {
        if records.is_empty() {
            return Classification::default();
        }

        let mut boundary_crossed = false;
        let mut reported: HashSet<&str> = HashSet::new();
        let mut new_records = Vec::new();

        for record in &records {
            let is_known = known.contains(record.identity());

            if !is_known && !boundary_crossed && !cold_start {
                // A repeated identity within one pass is only reported once
                if reported.insert(record.identity()) {
                    new_records.push(record.clone());
                }
            }

            if is_known {
                boundary_crossed = true;
            }
        }

        debug!(
            total = records.len(),
            new = new_records.len(),
            cold_start,
            "Classified records"
        );

        Classification {
            new_records,
            all_records: records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatchConfig;
    use crate::domain::RecordFields;

    fn record(id: &str) -> HeadlineRecord {
        HeadlineRecord::construct(
            RecordFields {
                title: Some(format!("Headline {}", id)),
                link: Some(format!("https://example.com/{}", id)),
                ..RecordFields::default()
            },
            &WatchConfig::default(),
        )
        .unwrap()
    }

    fn known(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| record(id).identity().to_string()).collect()
    }

    fn headlines(records: &[HeadlineRecord]) -> Vec<&str> {
        records.iter().map(|r| r.headline()).collect()
    }

    #[test]
    fn test_cold_start_reports_nothing() {
        let records = vec![record("a"), record("b")];
        let result = NoveltyDetector::classify(records, &HashSet::new(), true);

        assert!(result.new_records.is_empty());
        assert_eq!(result.all_records.len(), 2);
    }

    #[test]
    fn test_new_records_above_boundary() {
        let records = vec![record("x"), record("y"), record("a"), record("b")];
        let result = NoveltyDetector::classify(records, &known(&["a", "b"]), false);

        assert_eq!(headlines(&result.new_records), vec!["Headline x", "Headline y"]);
        assert_eq!(result.all_records.len(), 4);
    }

    #[test]
    fn test_unknown_below_known_is_suppressed() {
        let records = vec![record("x"), record("a"), record("y"), record("b")];
        let result = NoveltyDetector::classify(records, &known(&["a", "b", "c"]), false);

        assert_eq!(headlines(&result.new_records), vec!["Headline x"]);
    }

    #[test]
    fn test_known_at_head_suppresses_everything() {
        let records = vec![record("a"), record("x"), record("y")];
        let result = NoveltyDetector::classify(records, &known(&["a"]), false);

        assert!(result.new_records.is_empty());
    }

    #[test]
    fn test_all_unknown_after_warm_start() {
        let records = vec![record("x"), record("y")];
        let result = NoveltyDetector::classify(records, &known(&["a"]), false);

        assert_eq!(result.new_records.len(), 2);
    }

    #[test]
    fn test_empty_records() {
        let result = NoveltyDetector::classify(Vec::new(), &known(&["a"]), false);

        assert!(result.is_empty());
        assert!(result.new_records.is_empty());
    }

    #[test]
    fn test_duplicate_identity_reported_once() {
        let records = vec![record("x"), record("x"), record("a")];
        let result = NoveltyDetector::classify(records, &known(&["a"]), false);

        assert_eq!(result.new_records.len(), 1);
        assert_eq!(result.all_records.len(), 3);
    }
}
