use tracing::warn;

use crate::errors::HeadlineResult;

/// Keeps the last raw payload of each feed between process runs.
#[cfg_attr(test, mockall::automock)]
pub trait PayloadCache: Send + Sync {
    /// Read the cached payload; `Ok(None)` when nothing was cached yet
    fn read(&self, feed_key: &str) -> HeadlineResult<Option<String>>;

    fn save(&self, feed_key: &str, payload: &str) -> HeadlineResult<()>;

    /// Like `read`, but an unreadable cache counts as empty
    fn load(&self, feed_key: &str) -> Option<String> {
        match self.read(feed_key) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(feed_key, error = %e, "Ignoring cached payload");
                None
            }
        }
    }
}
