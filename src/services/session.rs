use std::panic::{self, AssertUnwindSafe};

use tracing::{info, warn};

use crate::config::WatchConfig;
use crate::domain::HeadlineRecord;
use crate::errors::HeadlineResult;
use crate::services::feed_state::FeedState;
use crate::sources::FeedParser;
use crate::storage::PayloadCache;

/// A watched feed together with the cache that carries its payload across
/// restarts.
pub struct FeedSession {
    key: String,
    state: FeedState,
    cache: Box<dyn PayloadCache>,
}

impl FeedSession {
    /// Create the feed state and replay the cached payload, if any, as its
    /// baseline.
    pub fn open(
        key: impl Into<String>,
        config: WatchConfig,
        parser: Box<dyn FeedParser>,
        cache: Box<dyn PayloadCache>,
    ) -> Self {
        let key = key.into();
        let mut state = FeedState::new(config, parser);

        if let Some(payload) = cache.load(&key) {
            match state.refresh(&payload) {
                Ok(_) => info!(
                    feed_key = %key,
                    known = state.known_identities().len(),
                    "Restored baseline from cached payload"
                ),
                Err(e) => warn!(feed_key = %key, error = %e, "Could not replay cached payload"),
            }
        }

        Self { key, state, cache }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn refresh(&mut self, payload: &str) -> HeadlineResult<Vec<HeadlineRecord>> {
        self.state.refresh(payload)
    }

    /// Save the latest payload now. Returns whether anything was written.
    pub fn checkpoint(&self) -> bool {
        let Some(payload) = self.state.raw_payload() else {
            return false;
        };

        match self.cache.save(&self.key, payload) {
            Ok(()) => true,
            Err(e) => {
                warn!(feed_key = %self.key, error = %e, "Could not persist payload");
                false
            }
        }
    }

    /// Persist the latest payload and end the session
    pub fn close(self) -> bool {
        self.checkpoint()
    }

    /// Run `f` against the session, then close it.
    ///
    /// The session is closed whether `f` returns normally, returns an error
    /// or panics; a panic is resumed after closing.
    pub fn scoped<R, F>(mut self, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(&mut self)));
        self.close();

        match outcome {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}
