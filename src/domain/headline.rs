use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::WatchConfig;
use crate::domain::entry::{HeadlineExtractor, RawEntry};
use crate::domain::identity::{canonicalize_link, IdentityResolver};
use crate::domain::text::{decode_entities, synthesize_headline};
use crate::errors::{HeadlineError, HeadlineResult};

/// Inputs for building a [`HeadlineRecord`].
///
/// `headline` and `url` are explicit overrides; when set they win over
/// `title` and `link`.
#[derive(Debug, Clone, Default)]
pub struct RecordFields {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub headline: Option<String>,
    pub url: Option<String>,
    pub first_seen: Option<DateTime<Utc>>,
    pub extensions: BTreeMap<String, String>,
}

impl RecordFields {
    pub fn from_entry(entry: RawEntry, extractor: &HeadlineExtractor) -> Self {
        let title = extractor.extract(&entry);

        Self {
            title,
            link: entry.link,
            description: entry.description,
            extensions: entry.extensions,
            ..Self::default()
        }
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// One feed entry as seen during a single refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineRecord {
    identity: String,
    headline: String,
    link: Option<String>,
    description: Option<String>,
    first_seen: DateTime<Utc>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    extensions: BTreeMap<String, String>,
}

impl HeadlineRecord {
    pub fn construct(fields: RecordFields, config: &WatchConfig) -> HeadlineResult<Self> {
        let has_title = present(&fields.title);
        let has_link = present(&fields.link);
        let has_description = present(&fields.description);
        let has_headline = present(&fields.headline);
        let has_url = present(&fields.url);

        let complete = ((has_title || has_description) && has_link)
            || (has_headline && has_url)
            || (has_url && has_description);
        if !complete {
            return Err(HeadlineError::MissingRequiredField(
                "need a title or description together with a link".to_string(),
            ));
        }

        let decoded = |text: Option<String>| {
            text.map(|t| decode_entities(&t).trim().to_string())
                .filter(|t| !t.is_empty())
        };
        let headline = decoded(fields.headline)
            .or_else(|| decoded(fields.title))
            .or_else(|| fields.description.as_deref().and_then(synthesize_headline))
            .ok_or(HeadlineError::EmptyHeadline)?;

        let link = fields
            .url
            .filter(|u| !u.trim().is_empty())
            .or(fields.link)
            .map(|l| canonicalize_link(&l))
            .filter(|l| !l.is_empty());

        let resolver = IdentityResolver::new(config.use_headline_as_id);
        let identity = resolver.resolve(&headline, link.as_deref())?;

        let description = fields.description.map(|d| decode_entities(&d));

        let first_seen = fields
            .first_seen
            .or(config.first_seen)
            .unwrap_or_else(Utc::now);

        Ok(Self {
            identity,
            headline,
            link,
            description,
            first_seen,
            extensions: fields.extensions,
        })
    }

    /// Build a record straight from a parsed entry
    pub fn from_entry(entry: RawEntry, config: &WatchConfig) -> HeadlineResult<Self> {
        let fields = RecordFields::from_entry(entry, &config.headline_extractor);
        Self::construct(fields, config)
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn first_seen(&self) -> DateTime<Utc> {
        self.first_seen
    }

    pub fn extensions(&self) -> &BTreeMap<String, String> {
        &self.extensions
    }

    /// Format: "{headline} {link (if any)}"
    pub fn format(&self) -> String {
        match &self.link {
            Some(link) => format!("{} {}", self.headline, link),
            None => self.headline.clone(),
        }
    }
}
