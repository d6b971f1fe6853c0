use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One entry as handed over by a feed parser, before any normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    /// Parser-specific fields the core never looks at
    pub extensions: BTreeMap<String, String>,
}

impl RawEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    pub fn extension(&self, key: &str) -> Option<&str> {
        self.extensions.get(key).map(String::as_str)
    }
}

type ExtractFn = dyn Fn(&RawEntry) -> Option<String> + Send + Sync;

/// Strategy deciding which text of an entry counts as its headline.
///
/// The default takes the entry title. Sources that put the real headline in
/// an extension field can supply their own function instead.
#[derive(Clone)]
pub struct HeadlineExtractor(Arc<ExtractFn>);

impl HeadlineExtractor {
    pub fn new<F>(extract: F) -> Self
    where
        F: Fn(&RawEntry) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(extract))
    }

    pub fn title() -> Self {
        Self::new(|entry| entry.title.clone())
    }

    /// Use an extension field, falling back to the title when it is missing
    pub fn from_extension(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(move |entry| {
            entry
                .extension(&key)
                .map(str::to_string)
                .or_else(|| entry.title.clone())
        })
    }

    pub fn extract(&self, entry: &RawEntry) -> Option<String> {
        (self.0)(entry)
    }
}

impl Default for HeadlineExtractor {
    fn default() -> Self {
        Self::title()
    }
}

impl fmt::Debug for HeadlineExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HeadlineExtractor(..)")
    }
}
