//! Store traits and supporting input types.
//!
//! The traits are implemented by storage backends (e.g.
//! `larder-store-sqlite`). The analytics layer depends on these
//! abstractions, not on any concrete backend. They are split along the
//! system's three collaborator seams: current stock, historical
//! consumption, and product metadata resolution.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes.

use std::future::Future;

use uuid::Uuid;

use crate::{
  consumption::{ConsumptionLogEntry, NewConsumptionLog},
  inventory::{InventoryItem, NewInventoryItem},
  product::{CatalogEntry, ProductMetadata, ProductUpsert},
};

// ─── Inventory ───────────────────────────────────────────────────────────────

/// Abstraction over a user's current stock.
pub trait InventoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create and persist a new inventory item. The store assigns `item_id`
  /// and, unless supplied, the purchase date; the item starts `Active`.
  fn add_item(
    &self,
    input: NewInventoryItem,
  ) -> impl Future<Output = Result<InventoryItem, Self::Error>> + Send + '_;

  /// Retrieve an item by id. Returns `None` if not found.
  fn get_item(
    &self,
    item_id: Uuid,
  ) -> impl Future<Output = Result<Option<InventoryItem>, Self::Error>> + Send + '_;

  /// All `Active` items for a user, newest purchase first. This is the
  /// analytics layer's inventory input.
  fn list_active<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<InventoryItem>, Self::Error>> + Send + 'a;

  /// Set an item's quantity — the only permitted field mutation.
  /// Returns an error if the item does not exist.
  fn adjust_quantity(
    &self,
    item_id: Uuid,
    quantity: f64,
  ) -> impl Future<Output = Result<InventoryItem, Self::Error>> + Send + '_;

  /// Hard-delete an item (user discards a scan). Returns an error if the
  /// item does not exist.
  fn remove_item(
    &self,
    item_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Consumption log ─────────────────────────────────────────────────────────

/// Abstraction over the append-only consumption history.
pub trait ConsumptionLogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append a log entry for the referenced inventory item and retire that
  /// item to `Consumed` — one atomic operation.
  ///
  /// When `duration_days` is not supplied it is derived from the item's
  /// purchase date. Returns an error if the item is unknown or already
  /// retired; the log gains no row in either case.
  fn log_consumption(
    &self,
    input: NewConsumptionLog,
  ) -> impl Future<Output = Result<ConsumptionLogEntry, Self::Error>> + Send + '_;

  /// A user's full consumption history, oldest first. This is the
  /// analytics layer's second input.
  fn history<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<ConsumptionLogEntry>, Self::Error>> + Send + 'a;

  /// The most recent `limit` entries, newest first.
  fn recent_history<'a>(
    &'a self,
    user_id: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ConsumptionLogEntry>, Self::Error>> + Send + 'a;
}

// ─── Product catalog ─────────────────────────────────────────────────────────

/// Abstraction over product metadata resolution.
pub trait ProductCatalog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Display metadata for a product id, or `None` when the catalog has
  /// never seen it.
  fn resolve<'a>(
    &'a self,
    product_id: &'a str,
  ) -> impl Future<Output = Result<Option<ProductMetadata>, Self::Error>> + Send + 'a;

  /// Create-or-update the catalog row for `input.product_id`, refreshing
  /// display fields and provenance. `created_at` survives updates.
  fn upsert_product(
    &self,
    input: ProductUpsert,
  ) -> impl Future<Output = Result<CatalogEntry, Self::Error>> + Send + '_;
}
