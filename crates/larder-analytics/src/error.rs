//! Error type for report generation.

use thiserror::Error;

/// A failure to produce a report. Only the upstream data fetches can fail;
/// the fold itself cannot, and metadata-resolution failures degrade to
/// placeholder names instead of surfacing here.
#[derive(Debug, Error)]
pub enum Error {
  #[error("inventory fetch failed: {0}")]
  Inventory(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("consumption history fetch failed: {0}")]
  History(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
