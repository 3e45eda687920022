//! Error type for `larder-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] larder_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column value failed to decode (malformed date, unknown
  /// status string).
  #[error("column decode error: {0}")]
  Decode(String),

  #[error("inventory item not found: {0}")]
  ItemNotFound(uuid::Uuid),

  /// Attempted to log consumption against an item that already left the
  /// `active` state.
  #[error("inventory item {0} is already retired")]
  ItemRetired(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
