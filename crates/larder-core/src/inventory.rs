//! Inventory items — units of stock currently held by a user.
//!
//! An item exists from the moment a scan or identification adds it until it
//! is consumed or discarded. The only permitted field mutation after
//! creation is a quantity adjustment; everything else is a one-way status
//! retirement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Lifecycle status ────────────────────────────────────────────────────────

/// Where an inventory item is in its lifecycle. Only `Active` items count as
/// current stock; the other three states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
  Active,
  Consumed,
  Wasted,
  Expired,
}

impl ItemStatus {
  pub fn is_active(&self) -> bool { matches!(self, Self::Active) }
}

// ─── Inventory item ──────────────────────────────────────────────────────────

/// A unit of stock held by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
  pub item_id:       Uuid,
  pub user_id:       String,
  /// Barcode or AI-assigned token; resolves to display metadata via the
  /// product catalog.
  pub product_id:    String,
  pub quantity:      f64,
  pub unit:          String,
  pub purchase_date: DateTime<Utc>,
  pub expiry_date:   Option<DateTime<Utc>>,
  pub status:        ItemStatus,
}

// ─── New item input ──────────────────────────────────────────────────────────

/// Input to [`crate::store::InventoryStore::add_item`].
/// The store assigns `item_id` and starts the item `Active`.
#[derive(Debug, Clone)]
pub struct NewInventoryItem {
  pub user_id:       String,
  pub product_id:    String,
  pub quantity:      f64,
  pub unit:          String,
  /// Defaults to the insertion instant; supply a past date when recording
  /// a purchase after the fact.
  pub purchase_date: Option<DateTime<Utc>>,
  pub expiry_date:   Option<DateTime<Utc>>,
}

impl NewInventoryItem {
  /// Convenience constructor: one unit, purchased now.
  pub fn new(user_id: impl Into<String>, product_id: impl Into<String>) -> Self {
    Self {
      user_id: user_id.into(),
      product_id: product_id.into(),
      quantity: 1.0,
      unit: "units".into(),
      purchase_date: None,
      expiry_date: None,
    }
  }
}
