pub mod entry;
pub mod headline;
pub mod identity;
pub mod text;

pub use entry::{HeadlineExtractor, RawEntry};
pub use headline::{HeadlineRecord, RecordFields};
pub use identity::{canonicalize_link, headline_digest, IdentityResolver};
