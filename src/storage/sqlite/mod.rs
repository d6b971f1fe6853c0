mod connection;
mod payload_repository;

pub use connection::SqliteStorage;
pub use payload_repository::SqlitePayloadCache;
