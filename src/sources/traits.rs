use crate::domain::RawEntry;
use crate::errors::HeadlineResult;

/// Turns a raw feed payload into entries, newest-first as published.
#[cfg_attr(test, mockall::automock)]
pub trait FeedParser: Send + Sync {
    /// Parse the whole payload; a payload that is not a feed is a `ParseFailure`
    fn parse(&self, payload: &str) -> HeadlineResult<Vec<RawEntry>>;
}

#[cfg_attr(test, mockall::automock)]
pub trait FeedFetcher: Send + Sync {
    /// Download the raw feed payload at `url`
    fn fetch(&self, url: &str) -> HeadlineResult<String>;
}
