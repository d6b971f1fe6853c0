use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::config::WatchConfig;
use crate::domain::HeadlineRecord;
use crate::errors::{HeadlineError, HeadlineResult};
use crate::services::novelty::NoveltyDetector;
use crate::sources::FeedParser;

/// Dedup memory of a single watched feed.
///
/// `refresh` takes `&mut self`, so one instance is never refreshed
/// concurrently. Separate feeds each own their own state.
pub struct FeedState {
    config: WatchConfig,
    parser: Box<dyn FeedParser>,
    known_identities: HashSet<String>,
    cold_start: bool,
    latest_records: Vec<HeadlineRecord>,
    raw_payload: Option<String>,
}

impl FeedState {
    pub fn new(config: WatchConfig, parser: Box<dyn FeedParser>) -> Self {
        Self {
            config,
            parser,
            known_identities: HashSet::new(),
            cold_start: true,
            latest_records: Vec::new(),
            raw_payload: None,
        }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    pub fn known_identities(&self) -> &HashSet<String> {
        &self.known_identities
    }

    pub fn is_cold_start(&self) -> bool {
        self.cold_start
    }

    pub fn latest_records(&self) -> &[HeadlineRecord] {
        &self.latest_records
    }

    pub fn raw_payload(&self) -> Option<&str> {
        self.raw_payload.as_deref()
    }

    /// Build records from parsed entries, skipping the ones that cannot be built
    pub fn build_records(&self, payload: &str) -> HeadlineResult<Vec<HeadlineRecord>> {
        let entries = self.parser.parse(payload)?;
        let mut records = Vec::with_capacity(entries.len());

        for (index, entry) in entries.into_iter().enumerate() {
            match HeadlineRecord::from_entry(entry, &self.config) {
                Ok(record) => records.push(record),
                Err(e) if e.is_record_level() => {
                    warn!(index, error = %e, "Skipping feed entry");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(records)
    }

    /// Parse `payload` and return the records that are new since the last
    /// successful refresh.
    ///
    /// Nothing is changed when parsing fails or no record could be built.
    pub fn refresh(&mut self, payload: &str) -> HeadlineResult<Vec<HeadlineRecord>> {
        let records = self.build_records(payload)?;

        let classification =
            NoveltyDetector::classify(records, &self.known_identities, self.cold_start);
        if classification.is_empty() {
            return Err(HeadlineError::NoEntries);
        }

        if self.cold_start {
            info!(
                records = classification.all_records.len(),
                "Established baseline"
            );
        }

        self.known_identities.extend(
            classification
                .all_records
                .iter()
                .map(|r| r.identity().to_string()),
        );
        self.cold_start = false;
        self.latest_records = classification.all_records;
        self.raw_payload = Some(payload.to_string());

        debug!(
            known = self.known_identities.len(),
            new = classification.new_records.len(),
            "Refresh committed"
        );

        Ok(classification.new_records)
    }
}
