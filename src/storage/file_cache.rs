use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::errors::{HeadlineError, HeadlineResult};
use crate::storage::traits::PayloadCache;

const PAYLOAD_EXTENSION: &str = "xml";

fn unsafe_chars_regex() -> &'static Regex {
    static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();
    UNSAFE_CHARS.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").unwrap())
}

/// One payload file per feed key inside a cache directory
#[derive(Debug, Clone)]
pub struct FilePayloadCache {
    dir: PathBuf,
}

impl FilePayloadCache {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// File holding the payload for `feed_key`.
    ///
    /// Characters outside `[A-Za-z0-9._-]` are percent-encoded byte by byte
    /// (`%` included), so distinct keys never share a file.
    pub fn path_for(&self, feed_key: &str) -> PathBuf {
        let stem = unsafe_chars_regex().replace_all(feed_key, |caps: &Captures| {
            caps[0]
                .bytes()
                .map(|b| format!("%{:02X}", b))
                .collect::<String>()
        });
        self.dir.join(format!("{}.{}", stem, PAYLOAD_EXTENSION))
    }
}

impl PayloadCache for FilePayloadCache {
    fn read(&self, feed_key: &str) -> HeadlineResult<Option<String>> {
        let path = self.path_for(feed_key);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(HeadlineError::PersistenceReadFailure(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let payload = String::from_utf8(bytes).map_err(|_| {
            HeadlineError::PersistenceReadFailure(format!("{}: not valid UTF-8", path.display()))
        })?;

        if payload.contains('\0') {
            return Err(HeadlineError::PersistenceReadFailure(format!(
                "{}: binary content",
                path.display()
            )));
        }

        debug!(path = %path.display(), bytes = payload.len(), "Loaded cached payload");
        Ok(Some(payload))
    }

    fn save(&self, feed_key: &str, payload: &str) -> HeadlineResult<()> {
        let path = self.path_for(feed_key);
        let write_failure =
            |e: std::io::Error| HeadlineError::PersistenceWriteFailure(format!("{}: {}", path.display(), e));

        fs::create_dir_all(&self.dir).map_err(write_failure)?;

        // Write then rename so an interrupted save never leaves a truncated file
        let tmp_path = path.with_extension(format!("{}.tmp", PAYLOAD_EXTENSION));
        fs::write(&tmp_path, payload).map_err(write_failure)?;
        fs::rename(&tmp_path, &path).map_err(write_failure)?;

        debug!(path = %path.display(), bytes = payload.len(), "Saved payload");
        Ok(())
    }
}
