//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings, so lexicographic index
//! order matches chronological order. UUIDs are stored as hyphenated
//! lowercase strings; the survey payload is compact JSON.

use chrono::{DateTime, Utc};
use larder_core::{
  consumption::{ConsumptionLogEntry, SurveyResponse},
  inventory::{InventoryItem, ItemStatus},
  product::{CatalogEntry, IdentificationMethod, ProductMetadata},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("bad timestamp {s:?}: {e}")))
}

// ─── ItemStatus ──────────────────────────────────────────────────────────────

pub fn encode_item_status(s: ItemStatus) -> &'static str {
  match s {
    ItemStatus::Active => "active",
    ItemStatus::Consumed => "consumed",
    ItemStatus::Wasted => "wasted",
    ItemStatus::Expired => "expired",
  }
}

pub fn decode_item_status(s: &str) -> Result<ItemStatus> {
  match s {
    "active" => Ok(ItemStatus::Active),
    "consumed" => Ok(ItemStatus::Consumed),
    "wasted" => Ok(ItemStatus::Wasted),
    "expired" => Ok(ItemStatus::Expired),
    other => Err(Error::Decode(format!("unknown item status: {other:?}"))),
  }
}

// ─── IdentificationMethod ────────────────────────────────────────────────────

pub fn encode_identification(m: IdentificationMethod) -> &'static str {
  match m {
    IdentificationMethod::Barcode => "barcode",
    IdentificationMethod::Ai => "ai",
    IdentificationMethod::Manual => "manual",
  }
}

pub fn decode_identification(s: &str) -> Result<IdentificationMethod> {
  match s {
    "barcode" => Ok(IdentificationMethod::Barcode),
    "ai" => Ok(IdentificationMethod::Ai),
    "manual" => Ok(IdentificationMethod::Manual),
    other => {
      Err(Error::Decode(format!("unknown identification method: {other:?}")))
    }
  }
}

// ─── Survey ──────────────────────────────────────────────────────────────────

pub fn encode_survey(survey: &SurveyResponse) -> Result<String> {
  Ok(survey.to_json()?)
}

pub fn decode_survey(s: &str) -> Result<SurveyResponse> {
  Ok(SurveyResponse::from_json(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `inventory` row.
pub struct RawInventoryItem {
  pub item_id:       String,
  pub user_id:       String,
  pub product_id:    String,
  pub quantity:      f64,
  pub unit:          String,
  pub purchase_date: String,
  pub expiry_date:   Option<String>,
  pub status:        String,
}

impl RawInventoryItem {
  pub fn into_item(self) -> Result<InventoryItem> {
    Ok(InventoryItem {
      item_id:       decode_uuid(&self.item_id)?,
      user_id:       self.user_id,
      product_id:    self.product_id,
      quantity:      self.quantity,
      unit:          self.unit,
      purchase_date: decode_dt(&self.purchase_date)?,
      expiry_date:   self.expiry_date.as_deref().map(decode_dt).transpose()?,
      status:        decode_item_status(&self.status)?,
    })
  }
}

/// Raw strings read directly from a `consumption_log` row.
pub struct RawLogEntry {
  pub log_id:        String,
  pub user_id:       String,
  pub product_id:    String,
  pub item_id:       String,
  pub consumed_date: String,
  pub duration_days: f64,
  pub survey_json:   Option<String>,
}

impl RawLogEntry {
  pub fn into_entry(self) -> Result<ConsumptionLogEntry> {
    Ok(ConsumptionLogEntry {
      log_id:        decode_uuid(&self.log_id)?,
      user_id:       self.user_id,
      product_id:    self.product_id,
      item_id:       decode_uuid(&self.item_id)?,
      consumed_date: decode_dt(&self.consumed_date)?,
      duration_days: self.duration_days,
      survey:        self
        .survey_json
        .as_deref()
        .map(decode_survey)
        .transpose()?,
    })
  }
}

/// Raw strings read directly from a `products` row.
pub struct RawCatalogEntry {
  pub product_id:    String,
  pub name:          String,
  pub brand:         String,
  pub flavor:        Option<String>,
  pub category:      String,
  pub image_url:     Option<String>,
  pub default_unit:  String,
  pub identified_by: String,
  pub confidence:    f64,
  pub created_at:    String,
}

impl RawCatalogEntry {
  pub fn into_entry(self) -> Result<CatalogEntry> {
    Ok(CatalogEntry {
      product_id:    self.product_id,
      name:          self.name,
      brand:         self.brand,
      flavor:        self.flavor,
      category:      self.category,
      image_url:     self.image_url,
      default_unit:  self.default_unit,
      identified_by: decode_identification(&self.identified_by)?,
      confidence:    self.confidence,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// The display columns of a `products` row, for metadata resolution.
pub struct RawProductMetadata {
  pub name:      String,
  pub brand:     String,
  pub category:  String,
  pub image_url: Option<String>,
}

impl RawProductMetadata {
  pub fn into_metadata(self) -> ProductMetadata {
    ProductMetadata {
      name:      self.name,
      brand:     self.brand,
      category:  self.category,
      image_url: self.image_url,
    }
  }
}
