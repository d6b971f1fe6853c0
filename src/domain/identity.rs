use sha2::{Digest, Sha256};
use url::Url;

use crate::errors::{HeadlineError, HeadlineResult};

/// Number of digest bytes kept for headline identities (128 bits)
const HEADLINE_DIGEST_BYTES: usize = 16;

/// Normalize a link so equivalent spellings compare equal.
///
/// Scheme and host are lower-cased, the scheme's default port is dropped and
/// `.`/`..` path segments are resolved. Links that are not absolute URLs are
/// only trimmed.
pub fn canonicalize_link(link: &str) -> String {
    let trimmed = link.trim();
    match Url::parse(trimmed) {
        Ok(url) => url.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// Fixed-length hex digest of headline text that is already decoded.
///
/// Only surrounding whitespace is ignored; entity-like text such as `&lt;`
/// is hashed literally.
pub fn headline_digest(headline: &str) -> String {
    let digest = Sha256::digest(headline.trim().as_bytes());
    hex::encode(&digest[..HEADLINE_DIGEST_BYTES])
}

/// Derives the identity used to recognize an entry across refreshes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityResolver {
    use_headline_as_id: bool,
}

impl IdentityResolver {
    pub fn new(use_headline_as_id: bool) -> Self {
        Self { use_headline_as_id }
    }

    /// `headline` must already be decoded
    pub fn resolve(&self, headline: &str, link: Option<&str>) -> HeadlineResult<String> {
        if self.use_headline_as_id {
            return Ok(headline_digest(headline));
        }

        link.map(canonicalize_link)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| HeadlineError::MissingRequiredField("link".to_string()))
    }
}
