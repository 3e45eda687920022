//! Derived per-product views — never stored, always computed.
//!
//! The analytics layer folds a user's inventory and consumption history
//! into one [`ProductView`] per distinct product id. Predictions are an
//! explicit `Option` so consumers pattern-match instead of probing for
//! conditionally-present fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Stock status ────────────────────────────────────────────────────────────

/// Whether any active inventory exists for a product. Declaration order is
/// the report sort order: in-stock products list first.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
  InStock,
  OutOfStock,
}

impl StockStatus {
  pub fn is_in_stock(&self) -> bool { matches!(self, Self::InStock) }
}

// ─── Consumption summary ─────────────────────────────────────────────────────

/// Accumulated history for one product. Each log entry counts as one
/// discrete consumption event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsumptionSummary {
  /// Total units consumed; increments by exactly one per log entry.
  pub total_consumed:        u32,
  pub times_consumed:        u32,
  /// Arithmetic mean of observed durations, rounded to the nearest whole
  /// day. Zero until at least one event is recorded.
  pub average_duration_days: i64,
  pub last_consumed:         Option<DateTime<Utc>>,
}

// ─── Prediction ──────────────────────────────────────────────────────────────

/// A forward projection of when current stock runs out, derived from the
/// historical average duration. Computed only for in-stock products with a
/// positive average.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
  /// Units per day, rounded to two decimal places.
  pub consumption_rate: f64,
  /// Rounded to one decimal place.
  pub days_until_empty: f64,
  pub restock_date:     DateTime<Utc>,
  /// Set when fewer than seven days of stock remain.
  pub needs_restock:    bool,
}

// ─── Product view ────────────────────────────────────────────────────────────

/// The computed read model for one product, scoped to one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
  pub product_id:    String,
  pub name:          String,
  pub brand:         String,
  pub category:      String,
  pub image_url:     Option<String>,
  pub status:        StockStatus,
  /// Quantity of the stocked item; zero when out of stock.
  pub current_stock: f64,
  pub unit:          String,
  /// Purchase date of the stocked item; absent when out of stock.
  pub purchase_date: Option<DateTime<Utc>>,
  pub history:       ConsumptionSummary,
  pub prediction:    Option<Prediction>,
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// Aggregate counts over one report's views. `need_restock` counts set
/// prediction flags, so it never exceeds `in_stock`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportStats {
  pub total_products: usize,
  pub in_stock:       usize,
  pub out_of_stock:   usize,
  pub need_restock:   usize,
}

/// The full analytics result for one user: views sorted in-stock-first,
/// then by name, plus summary counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductReport {
  /// The instant the report was anchored to; prediction dates are offsets
  /// from this.
  pub generated_at: DateTime<Utc>,
  pub products:     Vec<ProductView>,
  pub stats:        ReportStats,
}
