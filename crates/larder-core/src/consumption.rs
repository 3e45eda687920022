//! Consumption log entries — the immutable historical record.
//!
//! A log entry is written once, when an inventory item is used up, and is
//! never updated or deleted afterwards. The analytics layer derives all
//! consumption averages and restock predictions from these rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

// ─── Survey payload ──────────────────────────────────────────────────────────

/// Optional user feedback captured alongside a consumption event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponse {
  /// How long the user says the product lasted, in days.
  pub user_reported_days: f64,
  pub family_size:        u32,
  /// Set when the reported duration disagrees badly with the observed one.
  pub flagged:            bool,
  pub notes:              String,
}

impl SurveyResponse {
  /// Serialise for the `survey_json` database column.
  pub fn to_json(&self) -> Result<String> {
    Ok(serde_json::to_string(self)?)
  }

  /// Deserialise from the `survey_json` database column.
  pub fn from_json(s: &str) -> Result<Self> {
    Ok(serde_json::from_str(s)?)
  }
}

// ─── Log entry ───────────────────────────────────────────────────────────────

/// An immutable record of one consumption event: this product, fully used
/// up on this date, after lasting this many days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionLogEntry {
  pub log_id:        Uuid,
  pub user_id:       String,
  pub product_id:    String,
  /// The inventory item this event retired.
  pub item_id:       Uuid,
  pub consumed_date: DateTime<Utc>,
  /// Observed purchase-to-consumption interval, in days.
  pub duration_days: f64,
  pub survey:        Option<SurveyResponse>,
}

// ─── New log input ───────────────────────────────────────────────────────────

/// Input to [`crate::store::ConsumptionLogStore::log_consumption`].
///
/// `user_id` and `product_id` are read from the referenced inventory item;
/// `consumed_date` is always set by the store. The survey payload is
/// accepted here or not at all — log entries are never mutated.
#[derive(Debug, Clone)]
pub struct NewConsumptionLog {
  pub item_id:       Uuid,
  /// Defaults to the whole-day span from the item's purchase date to the
  /// consumption instant.
  pub duration_days: Option<f64>,
  pub survey:        Option<SurveyResponse>,
}

impl NewConsumptionLog {
  pub fn new(item_id: Uuid) -> Self {
    Self { item_id, duration_days: None, survey: None }
  }
}
