use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeadlineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Record errors (contained per record, never abort a refresh)
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("No usable headline text")]
    EmptyHeadline,

    // Payload errors
    #[error("Feed parsing failed: {0}")]
    ParseFailure(String),

    #[error("No entries found in feed")]
    NoEntries,

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Persistence errors
    #[error("Could not read cached payload: {0}")]
    PersistenceReadFailure(String),

    #[error("Could not write cached payload: {0}")]
    PersistenceWriteFailure(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HeadlineError {
    /// Errors that only affect a single record and are skipped during a refresh
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            HeadlineError::MissingRequiredField(_) | HeadlineError::EmptyHeadline
        )
    }
}

pub type HeadlineResult<T> = Result<T, HeadlineError>;
