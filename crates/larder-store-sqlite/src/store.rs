//! [`SqliteStore`] — the SQLite implementation of the Larder store traits.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use larder_core::{
  consumption::{ConsumptionLogEntry, NewConsumptionLog},
  inventory::{InventoryItem, ItemStatus, NewInventoryItem},
  product::{CatalogEntry, ProductMetadata, ProductUpsert},
  store::{ConsumptionLogStore, InventoryStore, ProductCatalog},
};

use crate::{
  Error, Result,
  encode::{
    RawCatalogEntry, RawInventoryItem, RawLogEntry, RawProductMetadata,
    encode_dt, encode_identification, encode_item_status, encode_survey,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Larder store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch one inventory row by id.
  async fn fetch_item(&self, item_id: Uuid) -> Result<Option<InventoryItem>> {
    let id_str = encode_uuid(item_id);

    let raw: Option<RawInventoryItem> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT item_id, user_id, product_id, quantity, unit,
                      purchase_date, expiry_date, status
               FROM inventory WHERE item_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawInventoryItem {
                  item_id:       row.get(0)?,
                  user_id:       row.get(1)?,
                  product_id:    row.get(2)?,
                  quantity:      row.get(3)?,
                  unit:          row.get(4)?,
                  purchase_date: row.get(5)?,
                  expiry_date:   row.get(6)?,
                  status:        row.get(7)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInventoryItem::into_item).transpose()
  }

  /// Insert a fully-built [`InventoryItem`] into the `inventory` table.
  async fn insert_item(&self, item: &InventoryItem) -> Result<()> {
    let item_id_str       = encode_uuid(item.item_id);
    let user_id           = item.user_id.clone();
    let product_id        = item.product_id.clone();
    let quantity          = item.quantity;
    let unit              = item.unit.clone();
    let purchase_date_str = encode_dt(item.purchase_date);
    let expiry_date_str   = item.expiry_date.map(encode_dt);
    let status_str        = encode_item_status(item.status).to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO inventory (
             item_id, user_id, product_id, quantity, unit,
             purchase_date, expiry_date, status
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            item_id_str,
            user_id,
            product_id,
            quantity,
            unit,
            purchase_date_str,
            expiry_date_str,
            status_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── InventoryStore impl ─────────────────────────────────────────────────────

impl InventoryStore for SqliteStore {
  type Error = Error;

  async fn add_item(&self, input: NewInventoryItem) -> Result<InventoryItem> {
    let item = InventoryItem {
      item_id:       Uuid::new_v4(),
      user_id:       input.user_id,
      product_id:    input.product_id,
      quantity:      input.quantity,
      unit:          input.unit,
      purchase_date: input.purchase_date.unwrap_or_else(Utc::now),
      expiry_date:   input.expiry_date,
      status:        ItemStatus::Active,
    };

    self.insert_item(&item).await?;
    Ok(item)
  }

  async fn get_item(&self, item_id: Uuid) -> Result<Option<InventoryItem>> {
    self.fetch_item(item_id).await
  }

  async fn list_active(&self, user_id: &str) -> Result<Vec<InventoryItem>> {
    let user = user_id.to_owned();

    let raws: Vec<RawInventoryItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT item_id, user_id, product_id, quantity, unit,
                  purchase_date, expiry_date, status
           FROM inventory
           WHERE user_id = ?1 AND status = 'active'
           ORDER BY purchase_date DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user], |row| {
            Ok(RawInventoryItem {
              item_id:       row.get(0)?,
              user_id:       row.get(1)?,
              product_id:    row.get(2)?,
              quantity:      row.get(3)?,
              unit:          row.get(4)?,
              purchase_date: row.get(5)?,
              expiry_date:   row.get(6)?,
              status:        row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInventoryItem::into_item).collect()
  }

  async fn adjust_quantity(
    &self,
    item_id:  Uuid,
    quantity: f64,
  ) -> Result<InventoryItem> {
    let id_str = encode_uuid(item_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE inventory SET quantity = ?2 WHERE item_id = ?1",
          rusqlite::params![id_str, quantity],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::ItemNotFound(item_id));
    }

    self
      .fetch_item(item_id)
      .await?
      .ok_or(Error::ItemNotFound(item_id))
  }

  async fn remove_item(&self, item_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(item_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM inventory WHERE item_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::ItemNotFound(item_id));
    }
    Ok(())
  }
}

// ─── ConsumptionLogStore impl ────────────────────────────────────────────────

impl ConsumptionLogStore for SqliteStore {
  type Error = Error;

  async fn log_consumption(
    &self,
    input: NewConsumptionLog,
  ) -> Result<ConsumptionLogEntry> {
    let item = self
      .fetch_item(input.item_id)
      .await?
      .ok_or(Error::ItemNotFound(input.item_id))?;

    if !item.status.is_active() {
      return Err(Error::ItemRetired(input.item_id));
    }

    let consumed_date = Utc::now();
    let duration_days = match input.duration_days {
      Some(d) => d,
      None => (consumed_date - item.purchase_date).num_days() as f64,
    };

    let entry = ConsumptionLogEntry {
      log_id: Uuid::new_v4(),
      user_id: item.user_id,
      product_id: item.product_id,
      item_id: item.item_id,
      consumed_date,
      duration_days,
      survey: input.survey,
    };

    let log_id_str        = encode_uuid(entry.log_id);
    let user_id           = entry.user_id.clone();
    let product_id        = entry.product_id.clone();
    let item_id_str       = encode_uuid(entry.item_id);
    let consumed_date_str = encode_dt(entry.consumed_date);
    let survey_json_str   =
      entry.survey.as_ref().map(encode_survey).transpose()?;
    let consumed_status   = encode_item_status(ItemStatus::Consumed).to_owned();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO consumption_log (
             log_id, user_id, product_id, item_id,
             consumed_date, duration_days, survey_json
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            log_id_str,
            user_id,
            product_id,
            item_id_str,
            consumed_date_str,
            duration_days,
            survey_json_str,
          ],
        )?;
        tx.execute(
          "UPDATE inventory SET status = ?2 WHERE item_id = ?1",
          rusqlite::params![item_id_str, consumed_status],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn history(&self, user_id: &str) -> Result<Vec<ConsumptionLogEntry>> {
    let user = user_id.to_owned();

    let raws: Vec<RawLogEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT log_id, user_id, product_id, item_id,
                  consumed_date, duration_days, survey_json
           FROM consumption_log
           WHERE user_id = ?1
           ORDER BY consumed_date ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user], |row| {
            Ok(RawLogEntry {
              log_id:        row.get(0)?,
              user_id:       row.get(1)?,
              product_id:    row.get(2)?,
              item_id:       row.get(3)?,
              consumed_date: row.get(4)?,
              duration_days: row.get(5)?,
              survey_json:   row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLogEntry::into_entry).collect()
  }

  async fn recent_history(
    &self,
    user_id: &str,
    limit:   usize,
  ) -> Result<Vec<ConsumptionLogEntry>> {
    let user      = user_id.to_owned();
    let limit_val = limit as i64;

    let raws: Vec<RawLogEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT log_id, user_id, product_id, item_id,
                  consumed_date, duration_days, survey_json
           FROM consumption_log
           WHERE user_id = ?1
           ORDER BY consumed_date DESC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user, limit_val], |row| {
            Ok(RawLogEntry {
              log_id:        row.get(0)?,
              user_id:       row.get(1)?,
              product_id:    row.get(2)?,
              item_id:       row.get(3)?,
              consumed_date: row.get(4)?,
              duration_days: row.get(5)?,
              survey_json:   row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLogEntry::into_entry).collect()
  }
}

// ─── ProductCatalog impl ─────────────────────────────────────────────────────

impl ProductCatalog for SqliteStore {
  type Error = Error;

  async fn resolve(&self, product_id: &str) -> Result<Option<ProductMetadata>> {
    let id = product_id.to_owned();

    let raw: Option<RawProductMetadata> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT name, brand, category, image_url
               FROM products WHERE product_id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(RawProductMetadata {
                  name:      row.get(0)?,
                  brand:     row.get(1)?,
                  category:  row.get(2)?,
                  image_url: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawProductMetadata::into_metadata))
  }

  async fn upsert_product(&self, input: ProductUpsert) -> Result<CatalogEntry> {
    let product_id     = input.product_id.clone();
    let name           = input.name;
    let brand          = input.brand;
    let flavor         = input.flavor;
    let category       = input.category;
    let image_url      = input.image_url;
    let default_unit   = input.default_unit;
    let identified_str = encode_identification(input.identified_by).to_owned();
    let confidence     = input.confidence;
    let created_at_str = encode_dt(Utc::now());

    let raw: RawCatalogEntry = self
      .conn
      .call(move |conn| {
        // created_at is set on first insert only; conflicts refresh the
        // display and provenance columns.
        conn.execute(
          "INSERT INTO products (
             product_id, name, brand, flavor, category, image_url,
             default_unit, identified_by, confidence, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
           ON CONFLICT(product_id) DO UPDATE SET
             name          = excluded.name,
             brand         = excluded.brand,
             flavor        = excluded.flavor,
             category      = excluded.category,
             image_url     = excluded.image_url,
             default_unit  = excluded.default_unit,
             identified_by = excluded.identified_by,
             confidence    = excluded.confidence",
          rusqlite::params![
            product_id,
            name,
            brand,
            flavor,
            category,
            image_url,
            default_unit,
            identified_str,
            confidence,
            created_at_str,
          ],
        )?;

        let row = conn.query_row(
          "SELECT product_id, name, brand, flavor, category, image_url,
                  default_unit, identified_by, confidence, created_at
           FROM products WHERE product_id = ?1",
          rusqlite::params![product_id],
          |row| {
            Ok(RawCatalogEntry {
              product_id:    row.get(0)?,
              name:          row.get(1)?,
              brand:         row.get(2)?,
              flavor:        row.get(3)?,
              category:      row.get(4)?,
              image_url:     row.get(5)?,
              default_unit:  row.get(6)?,
              identified_by: row.get(7)?,
              confidence:    row.get(8)?,
              created_at:    row.get(9)?,
            })
          },
        )?;
        Ok(row)
      })
      .await?;

    raw.into_entry()
  }
}
