pub mod novelty;
pub mod feed_state;
pub mod session;

pub use novelty::{Classification, NoveltyDetector};
pub use feed_state::FeedState;
pub use session::FeedSession;
