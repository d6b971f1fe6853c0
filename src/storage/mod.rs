pub mod traits;
pub mod file_cache;
pub mod sqlite;

pub use traits::PayloadCache;
pub use file_cache::FilePayloadCache;
pub use sqlite::{SqlitePayloadCache, SqliteStorage};
