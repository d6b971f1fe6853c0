use feed_rs::parser;

use crate::domain::RawEntry;
use crate::errors::{HeadlineError, HeadlineResult};
use crate::sources::traits::FeedParser;

/// RSS 0.9x/1.0/2.0, Atom and JSON Feed parser backed by feed-rs
#[derive(Debug, Clone, Default)]
pub struct RssAtomParser;

impl RssAtomParser {
    pub fn new() -> Self {
        Self
    }

    fn entry_from_model(entry: feed_rs::model::Entry) -> RawEntry {
        let mut raw = RawEntry::new().with_extension("id", entry.id);

        raw.title = entry.title.map(|t| t.content);

        // Prefer the summary; fall back to the full content body
        raw.description = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body));

        let mut links = entry.links.into_iter().map(|l| l.href);
        raw.link = links.next();
        for (i, href) in links.enumerate() {
            raw.extensions.insert(format!("link.{}", i + 1), href);
        }

        if let Some(published) = entry.published {
            raw.extensions
                .insert("published".to_string(), published.to_rfc3339());
        }
        if let Some(updated) = entry.updated {
            raw.extensions
                .insert("updated".to_string(), updated.to_rfc3339());
        }
        if let Some(author) = entry.authors.into_iter().next() {
            raw.extensions.insert("author".to_string(), author.name);
        }
        if !entry.categories.is_empty() {
            let terms: Vec<String> = entry.categories.into_iter().map(|c| c.term).collect();
            raw.extensions.insert("categories".to_string(), terms.join(","));
        }

        raw
    }
}

impl FeedParser for RssAtomParser {
    fn parse(&self, payload: &str) -> HeadlineResult<Vec<RawEntry>> {
        let feed = parser::parse(payload.as_bytes())
            .map_err(|e| HeadlineError::ParseFailure(e.to_string()))?;

        Ok(feed
            .entries
            .into_iter()
            .map(Self::entry_from_model)
            .collect())
    }
}
