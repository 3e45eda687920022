//! Product identity and catalog metadata.
//!
//! A product id is a barcode or a synthetic AI-assigned token — whichever
//! identification path first saw the product. It is used as-is across
//! inventory rows, consumption logs, and the catalog; the catalog holds the
//! display metadata those rows deliberately do not carry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Provenance ──────────────────────────────────────────────────────────────

/// How a product entered the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentificationMethod {
  /// Looked up from a scanned barcode.
  Barcode,
  /// Recognised from a photograph by the image-identification service.
  Ai,
  /// Typed in by the user directly.
  Manual,
}

// ─── Display metadata ────────────────────────────────────────────────────────

/// The display subset a metadata resolver returns: what a screen needs to
/// render a product, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMetadata {
  pub name:      String,
  /// May be empty when the identification source did not report one.
  pub brand:     String,
  pub category:  String,
  pub image_url: Option<String>,
}

// ─── Catalog entry ───────────────────────────────────────────────────────────

/// One persisted catalog row per distinct product ever identified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
  /// Barcode or AI-assigned token; unique across the catalog.
  pub product_id:    String,
  pub name:          String,
  pub brand:         String,
  pub flavor:        Option<String>,
  pub category:      String,
  pub image_url:     Option<String>,
  /// Unit suggested when stocking this product (e.g. "units", "grams").
  pub default_unit:  String,
  pub identified_by: IdentificationMethod,
  /// Identification confidence in `[0, 1]`.
  pub confidence:    f64,
  pub created_at:    DateTime<Utc>,
}

// ─── Upsert input ────────────────────────────────────────────────────────────

/// Input to [`crate::store::ProductCatalog::upsert_product`].
/// `created_at` is set by the store on first insert and never refreshed.
#[derive(Debug, Clone)]
pub struct ProductUpsert {
  pub product_id:    String,
  pub name:          String,
  pub brand:         String,
  pub flavor:        Option<String>,
  pub category:      String,
  pub image_url:     Option<String>,
  pub default_unit:  String,
  pub identified_by: IdentificationMethod,
  pub confidence:    f64,
}

impl ProductUpsert {
  /// Convenience constructor with the optional display fields defaulted.
  pub fn new(
    product_id: impl Into<String>,
    name: impl Into<String>,
    identified_by: IdentificationMethod,
  ) -> Self {
    Self {
      product_id: product_id.into(),
      name: name.into(),
      brand: String::new(),
      flavor: None,
      category: "Other".into(),
      image_url: None,
      default_unit: "units".into(),
      identified_by,
      confidence: 1.0,
    }
  }
}
