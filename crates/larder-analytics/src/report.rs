//! Report construction — the fold from raw store rows to sorted views.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use larder_core::{
  consumption::ConsumptionLogEntry,
  inventory::InventoryItem,
  product::ProductMetadata,
  store::{ConsumptionLogStore, InventoryStore, ProductCatalog},
  view::{
    ConsumptionSummary, Prediction, ProductReport, ProductView, ReportStats,
    StockStatus,
  },
};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Days of remaining stock below which a product is flagged for restock.
const RESTOCK_THRESHOLD_DAYS: f64 = 7.0;

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Produce the full analytics report for one user.
///
/// Fetches the user's active inventory and complete consumption history,
/// then folds them with [`build_report`]. `as_of` anchors the prediction
/// dates and defaults to now; fixing it makes the report a pure function of
/// the two input sets.
///
/// A fetch failure on either store aborts the whole report — no partial
/// results. Metadata-resolution failures do not abort; the affected product
/// falls back to a placeholder name.
pub async fn report_for_user<I, C, P>(
  inventory: &I,
  logs: &C,
  catalog: &P,
  user_id: &str,
  as_of: Option<DateTime<Utc>>,
) -> Result<ProductReport>
where
  I: InventoryStore,
  C: ConsumptionLogStore,
  P: ProductCatalog,
{
  let stock = inventory
    .list_active(user_id)
    .await
    .map_err(|e| Error::Inventory(Box::new(e)))?;
  let history = logs
    .history(user_id)
    .await
    .map_err(|e| Error::History(Box::new(e)))?;

  debug!(
    user_id,
    stock = stock.len(),
    history = history.len(),
    "building product report"
  );

  let as_of = as_of.unwrap_or_else(Utc::now);
  Ok(build_report(&stock, &history, catalog, as_of).await)
}

// ─── Fold ────────────────────────────────────────────────────────────────────

/// Fold the two input sets into the sorted report.
///
/// Infallible on well-formed input: catalog errors degrade to placeholder
/// metadata, and everything past metadata resolution is pure computation.
/// The catalog is consulted at most once per distinct product id.
pub async fn build_report<P>(
  stock: &[InventoryItem],
  history: &[ConsumptionLogEntry],
  catalog: &P,
  as_of: DateTime<Utc>,
) -> ProductReport
where
  P: ProductCatalog,
{
  let mut views: HashMap<String, ProductView> = HashMap::new();
  let mut duration_sums: HashMap<String, f64> = HashMap::new();
  // Insertion order, so equal-rank views sort deterministically.
  let mut order: Vec<String> = Vec::new();

  // Seed one view per stocked product. The first record per product id
  // wins; `list_active` returns newest purchase first.
  for item in stock {
    if views.contains_key(&item.product_id) {
      continue;
    }
    let meta = resolve_metadata(catalog, &item.product_id).await;
    let (name, brand, category, image_url) =
      display_fields(meta, "Unknown Product".into());
    views.insert(item.product_id.clone(), ProductView {
      product_id: item.product_id.clone(),
      name,
      brand,
      category,
      image_url,
      status: StockStatus::InStock,
      current_stock: item.quantity,
      unit: item.unit.clone(),
      purchase_date: Some(item.purchase_date),
      history: ConsumptionSummary::default(),
      prediction: None,
    });
    order.push(item.product_id.clone());
  }

  // Accumulate history. Products seen only in the log get an out-of-stock
  // view, with metadata resolved once on first sight.
  for entry in history {
    if !views.contains_key(&entry.product_id) {
      let meta = resolve_metadata(catalog, &entry.product_id).await;
      let (name, brand, category, image_url) =
        display_fields(meta, placeholder_name(&entry.product_id));
      views.insert(entry.product_id.clone(), ProductView {
        product_id: entry.product_id.clone(),
        name,
        brand,
        category,
        image_url,
        status: StockStatus::OutOfStock,
        current_stock: 0.0,
        unit: "units".into(),
        purchase_date: None,
        history: ConsumptionSummary::default(),
        prediction: None,
      });
      order.push(entry.product_id.clone());
    }

    let view = match views.get_mut(&entry.product_id) {
      Some(v) => v,
      None => continue,
    };

    // One discrete consumption event per log entry.
    view.history.total_consumed += 1;
    view.history.times_consumed += 1;
    *duration_sums.entry(entry.product_id.clone()).or_insert(0.0) +=
      entry.duration_days;
    if view
      .history
      .last_consumed
      .is_none_or(|last| entry.consumed_date > last)
    {
      view.history.last_consumed = Some(entry.consumed_date);
    }
  }

  // Replace duration sums with integer-rounded means, then predict for
  // in-stock products with a positive average.
  let mut products: Vec<ProductView> = Vec::with_capacity(order.len());
  for product_id in order {
    let mut view = match views.remove(&product_id) {
      Some(v) => v,
      None => continue,
    };

    if view.history.times_consumed > 0 {
      let sum = duration_sums.get(&product_id).copied().unwrap_or(0.0);
      view.history.average_duration_days =
        (sum / f64::from(view.history.times_consumed)).round() as i64;
    }

    if view.status.is_in_stock() && view.history.average_duration_days > 0 {
      view.prediction = Some(predict(
        view.current_stock,
        view.history.average_duration_days,
        as_of,
      ));
    }

    products.push(view);
  }

  // In-stock first, then case-insensitive by name. The sort is stable, so
  // ties keep insertion order.
  products.sort_by(|a, b| {
    a.status
      .cmp(&b.status)
      .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
  });

  let stats = ReportStats {
    total_products: products.len(),
    in_stock: products
      .iter()
      .filter(|p| p.status.is_in_stock())
      .count(),
    out_of_stock: products
      .iter()
      .filter(|p| !p.status.is_in_stock())
      .count(),
    need_restock: products
      .iter()
      .filter(|p| p.prediction.as_ref().is_some_and(|x| x.needs_restock))
      .count(),
  };

  ProductReport { generated_at: as_of, products, stats }
}

// ─── Prediction ──────────────────────────────────────────────────────────────

fn predict(
  current_stock: f64,
  average_duration_days: i64,
  as_of: DateTime<Utc>,
) -> Prediction {
  // One unit lasts `average_duration_days` days.
  let consumption_rate = 1.0 / average_duration_days as f64;
  let days_until_empty = current_stock / consumption_rate;
  let restock_date =
    as_of + Duration::milliseconds((days_until_empty * 86_400_000.0) as i64);

  Prediction {
    consumption_rate: round_to(consumption_rate, 2),
    days_until_empty: round_to(days_until_empty, 1),
    restock_date,
    // The unrounded value decides the flag.
    needs_restock: days_until_empty < RESTOCK_THRESHOLD_DAYS,
  }
}

fn round_to(value: f64, decimals: i32) -> f64 {
  let scale = 10f64.powi(decimals);
  (value * scale).round() / scale
}

// ─── Metadata resolution ─────────────────────────────────────────────────────

/// Resolve display metadata, degrading catalog failures to "not found".
async fn resolve_metadata<P: ProductCatalog>(
  catalog: &P,
  product_id: &str,
) -> Option<ProductMetadata> {
  match catalog.resolve(product_id).await {
    Ok(meta) => meta,
    Err(e) => {
      warn!(product_id, error = %e, "product metadata lookup failed");
      None
    }
  }
}

/// Pick the view's display fields, falling back field-by-field when the
/// resolved metadata is absent or carries empty strings.
fn display_fields(
  meta: Option<ProductMetadata>,
  fallback_name: String,
) -> (String, String, String, Option<String>) {
  match meta {
    Some(m) => (
      if m.name.is_empty() { fallback_name } else { m.name },
      if m.brand.is_empty() { "-".into() } else { m.brand },
      if m.category.is_empty() { "Other".into() } else { m.category },
      m.image_url,
    ),
    None => (fallback_name, "-".into(), "Other".into(), None),
  }
}

/// Placeholder for a product the catalog has never seen: the truncated id.
fn placeholder_name(product_id: &str) -> String {
  let short: String = product_id.chars().take(8).collect();
  format!("Product {short}")
}
