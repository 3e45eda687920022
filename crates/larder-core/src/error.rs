//! Error types for `larder-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("inventory item not found: {0}")]
  ItemNotFound(Uuid),

  #[error("inventory item {0} is already retired")]
  ItemRetired(Uuid),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
