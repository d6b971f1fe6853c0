pub mod traits;
pub mod rss_atom;
pub mod http;

pub use traits::{FeedFetcher, FeedParser};
pub use rss_atom::RssAtomParser;
pub use http::HttpFetcher;
