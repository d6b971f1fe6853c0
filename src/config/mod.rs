use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::HeadlineExtractor;
use crate::errors::{HeadlineError, HeadlineResult};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where cached payloads are kept between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    File,
    Sqlite,
}

impl CacheBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBackend::File => "file",
            CacheBackend::Sqlite => "sqlite",
        }
    }
}

impl std::str::FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "files" => Ok(CacheBackend::File),
            "sqlite" | "db" => Ok(CacheBackend::Sqlite),
            _ => Err(format!("Unknown cache backend: {}", s)),
        }
    }
}

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Process-level settings read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub cache_backend: CacheBackend,
    pub cache_dir: PathBuf,
    pub db_path: PathBuf,
    pub request_timeout: Duration,
    pub use_headline_as_id: bool,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    fn load_dotenv() -> Option<PathBuf> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        exe_dir
    }

    /// Only the identity mode, for commands that never touch the cache or network
    pub fn headline_as_id_from_env() -> bool {
        Self::load_dotenv();
        read_headline_as_id()
    }

    pub fn from_env() -> HeadlineResult<Self> {
        let base_dir = Self::load_dotenv().unwrap_or_else(|| PathBuf::from("."));

        let cache_backend = match std::env::var("HEADLINES_CACHE_BACKEND") {
            Ok(value) => value.parse().map_err(HeadlineError::Config)?,
            Err(_) => CacheBackend::File,
        };

        let cache_dir = std::env::var("HEADLINES_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| base_dir.join("cache"));

        let db_path = std::env::var("HEADLINES_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| base_dir.join("headlines.db"));

        let request_timeout = match std::env::var("HEADLINES_TIMEOUT_SECS") {
            Ok(value) => Duration::from_secs(parse_timeout(&value)?),
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let use_headline_as_id = read_headline_as_id();

        Ok(Self {
            cache_backend,
            cache_dir,
            db_path,
            request_timeout,
            use_headline_as_id,
        })
    }
}

fn parse_timeout(value: &str) -> HeadlineResult<u64> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(HeadlineError::Config(format!(
            "HEADLINES_TIMEOUT_SECS must be a positive integer, got '{}'",
            value
        ))),
    }
}

fn read_headline_as_id() -> bool {
    std::env::var("HEADLINES_USE_HEADLINE_AS_ID")
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Options recognized by the novelty core for one watched feed
#[derive(Debug, Clone, Default)]
pub struct WatchConfig {
    /// Identify entries by a digest of their headline instead of their link
    pub use_headline_as_id: bool,
    /// Fixed first-seen timestamp for every record built under this config
    pub first_seen: Option<DateTime<Utc>>,
    pub headline_extractor: HeadlineExtractor,
}

impl WatchConfig {
    pub fn with_headline_as_id(mut self, enabled: bool) -> Self {
        self.use_headline_as_id = enabled;
        self
    }

    pub fn with_first_seen(mut self, first_seen: DateTime<Utc>) -> Self {
        self.first_seen = Some(first_seen);
        self
    }

    pub fn with_headline_extractor(mut self, extractor: HeadlineExtractor) -> Self {
        self.headline_extractor = extractor;
        self
    }
}
