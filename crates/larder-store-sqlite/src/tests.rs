//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Utc};
use larder_core::{
  consumption::{NewConsumptionLog, SurveyResponse},
  inventory::{ItemStatus, NewInventoryItem},
  product::{IdentificationMethod, ProductUpsert},
  store::{ConsumptionLogStore, InventoryStore, ProductCatalog},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn oat_milk(user_id: &str) -> NewInventoryItem {
  let mut item = NewInventoryItem::new(user_id, "5012345678900");
  item.quantity = 2.0;
  item
}

// ─── Inventory ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_item() {
  let s = store().await;

  let item = s.add_item(oat_milk("u1")).await.unwrap();
  assert_eq!(item.user_id, "u1");
  assert_eq!(item.product_id, "5012345678900");
  assert_eq!(item.quantity, 2.0);
  assert_eq!(item.status, ItemStatus::Active);

  let fetched = s.get_item(item.item_id).await.unwrap();
  assert!(fetched.is_some());
  let fetched = fetched.unwrap();
  assert_eq!(fetched.item_id, item.item_id);
  assert_eq!(fetched.purchase_date, item.purchase_date);
  assert_eq!(fetched.status, ItemStatus::Active);
}

#[tokio::test]
async fn get_item_missing_returns_none() {
  let s = store().await;
  let result = s.get_item(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn list_active_is_scoped_and_newest_first() {
  let s = store().await;
  let now = Utc::now();

  let mut oldest = oat_milk("u1");
  oldest.product_id = "p-old".into();
  oldest.purchase_date = Some(now - Duration::days(3));

  let mut newest = oat_milk("u1");
  newest.product_id = "p-new".into();
  newest.purchase_date = Some(now - Duration::days(1));

  let mut middle = oat_milk("u1");
  middle.product_id = "p-mid".into();
  middle.purchase_date = Some(now - Duration::days(2));

  s.add_item(oldest).await.unwrap();
  s.add_item(newest).await.unwrap();
  s.add_item(middle).await.unwrap();
  s.add_item(oat_milk("u2")).await.unwrap();

  let items = s.list_active("u1").await.unwrap();
  assert_eq!(items.len(), 3);
  assert_eq!(items[0].product_id, "p-new");
  assert_eq!(items[1].product_id, "p-mid");
  assert_eq!(items[2].product_id, "p-old");
  assert!(items.iter().all(|i| i.user_id == "u1"));
}

#[tokio::test]
async fn list_active_excludes_retired_items() {
  let s = store().await;

  let kept = s.add_item(oat_milk("u1")).await.unwrap();
  let eaten = s.add_item(oat_milk("u1")).await.unwrap();
  s.log_consumption(NewConsumptionLog::new(eaten.item_id))
    .await
    .unwrap();

  let items = s.list_active("u1").await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].item_id, kept.item_id);
}

#[tokio::test]
async fn adjust_quantity_updates_only_quantity() {
  let s = store().await;

  let item = s.add_item(oat_milk("u1")).await.unwrap();
  let updated = s.adjust_quantity(item.item_id, 5.5).await.unwrap();

  assert_eq!(updated.quantity, 5.5);
  assert_eq!(updated.unit, item.unit);
  assert_eq!(updated.purchase_date, item.purchase_date);
  assert_eq!(updated.status, ItemStatus::Active);
}

#[tokio::test]
async fn adjust_quantity_missing_item_errors() {
  let s = store().await;
  let err = s.adjust_quantity(Uuid::new_v4(), 1.0).await.unwrap_err();
  assert!(matches!(err, crate::Error::ItemNotFound(_)));
}

#[tokio::test]
async fn remove_item_deletes_the_row() {
  let s = store().await;

  let item = s.add_item(oat_milk("u1")).await.unwrap();
  s.remove_item(item.item_id).await.unwrap();

  assert!(s.get_item(item.item_id).await.unwrap().is_none());
}

#[tokio::test]
async fn remove_item_missing_errors() {
  let s = store().await;
  let err = s.remove_item(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, crate::Error::ItemNotFound(_)));
}

// ─── Consumption log ─────────────────────────────────────────────────────────

#[tokio::test]
async fn log_consumption_retires_item_and_appends_history() {
  let s = store().await;

  let item = s.add_item(oat_milk("u1")).await.unwrap();
  let mut input = NewConsumptionLog::new(item.item_id);
  input.duration_days = Some(5.0);

  let entry = s.log_consumption(input).await.unwrap();
  assert_eq!(entry.user_id, "u1");
  assert_eq!(entry.product_id, item.product_id);
  assert_eq!(entry.item_id, item.item_id);
  assert_eq!(entry.duration_days, 5.0);

  let retired = s.get_item(item.item_id).await.unwrap().unwrap();
  assert_eq!(retired.status, ItemStatus::Consumed);

  let history = s.history("u1").await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].log_id, entry.log_id);
}

#[tokio::test]
async fn log_consumption_derives_duration_from_purchase_date() {
  let s = store().await;

  let mut input = oat_milk("u1");
  input.purchase_date = Some(Utc::now() - Duration::days(10));
  let item = s.add_item(input).await.unwrap();

  let entry = s
    .log_consumption(NewConsumptionLog::new(item.item_id))
    .await
    .unwrap();
  assert_eq!(entry.duration_days, 10.0);
}

#[tokio::test]
async fn log_consumption_twice_errors_and_keeps_one_row() {
  let s = store().await;

  let item = s.add_item(oat_milk("u1")).await.unwrap();
  s.log_consumption(NewConsumptionLog::new(item.item_id))
    .await
    .unwrap();

  let err = s
    .log_consumption(NewConsumptionLog::new(item.item_id))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::ItemRetired(_)));

  let history = s.history("u1").await.unwrap();
  assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn log_consumption_missing_item_errors() {
  let s = store().await;
  let err = s
    .log_consumption(NewConsumptionLog::new(Uuid::new_v4()))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::ItemNotFound(_)));
}

#[tokio::test]
async fn survey_payload_roundtrips() {
  let s = store().await;

  let item = s.add_item(oat_milk("u1")).await.unwrap();
  let mut input = NewConsumptionLog::new(item.item_id);
  input.survey = Some(SurveyResponse {
    user_reported_days: 12.0,
    family_size:        3,
    flagged:            true,
    notes:              "lasted longer than expected".into(),
  });

  s.log_consumption(input).await.unwrap();

  let history = s.history("u1").await.unwrap();
  let survey = history[0].survey.as_ref().expect("survey");
  assert_eq!(survey.user_reported_days, 12.0);
  assert_eq!(survey.family_size, 3);
  assert!(survey.flagged);
  assert_eq!(survey.notes, "lasted longer than expected");
}

#[tokio::test]
async fn history_is_oldest_first_and_recent_is_capped() {
  let s = store().await;

  for product in ["p1", "p2", "p3"] {
    let mut input = oat_milk("u1");
    input.product_id = product.into();
    let item = s.add_item(input).await.unwrap();
    s.log_consumption(NewConsumptionLog::new(item.item_id))
      .await
      .unwrap();
  }

  let history = s.history("u1").await.unwrap();
  assert_eq!(history.len(), 3);
  assert_eq!(history[0].product_id, "p1");
  assert_eq!(history[2].product_id, "p3");

  let recent = s.recent_history("u1", 2).await.unwrap();
  assert_eq!(recent.len(), 2);
  assert_eq!(recent[0].product_id, "p3");
  assert_eq!(recent[1].product_id, "p2");
}

// ─── Product catalog ─────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_product_inserts_then_refreshes() {
  let s = store().await;

  let first = s
    .upsert_product(ProductUpsert::new(
      "5012345678900",
      "Oat Milk",
      IdentificationMethod::Barcode,
    ))
    .await
    .unwrap();
  assert_eq!(first.name, "Oat Milk");
  assert_eq!(first.identified_by, IdentificationMethod::Barcode);

  let mut refresh = ProductUpsert::new(
    "5012345678900",
    "Oat Milk Barista",
    IdentificationMethod::Manual,
  );
  refresh.brand = "Acme".into();
  refresh.confidence = 0.8;

  let second = s.upsert_product(refresh).await.unwrap();
  assert_eq!(second.name, "Oat Milk Barista");
  assert_eq!(second.brand, "Acme");
  assert_eq!(second.identified_by, IdentificationMethod::Manual);
  assert_eq!(second.confidence, 0.8);
  // First insert's timestamp survives the refresh.
  assert_eq!(second.created_at, first.created_at);

  let meta = s.resolve("5012345678900").await.unwrap().expect("metadata");
  assert_eq!(meta.name, "Oat Milk Barista");
  assert_eq!(meta.brand, "Acme");
}

#[tokio::test]
async fn resolve_missing_returns_none() {
  let s = store().await;
  let result = s.resolve("no-such-product").await.unwrap();
  assert!(result.is_none());
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn report_follows_an_item_through_its_lifecycle() {
  use larder_core::view::StockStatus;

  let s = store().await;

  s.upsert_product(ProductUpsert::new(
    "5012345678900",
    "Oat Milk",
    IdentificationMethod::Barcode,
  ))
  .await
  .unwrap();
  let item = s.add_item(oat_milk("u1")).await.unwrap();

  let report = larder_analytics::report_for_user(&s, &s, &s, "u1", None)
    .await
    .unwrap();
  assert_eq!(report.stats.total_products, 1);
  assert_eq!(report.stats.in_stock, 1);
  assert_eq!(report.products[0].name, "Oat Milk");
  assert_eq!(report.products[0].status, StockStatus::InStock);
  assert!(report.products[0].prediction.is_none());

  let mut consume = NewConsumptionLog::new(item.item_id);
  consume.duration_days = Some(6.0);
  s.log_consumption(consume).await.unwrap();

  let report = larder_analytics::report_for_user(&s, &s, &s, "u1", None)
    .await
    .unwrap();
  assert_eq!(report.stats.total_products, 1);
  assert_eq!(report.stats.in_stock, 0);
  assert_eq!(report.stats.out_of_stock, 1);

  let view = &report.products[0];
  assert_eq!(view.name, "Oat Milk");
  assert_eq!(view.status, StockStatus::OutOfStock);
  assert_eq!(view.current_stock, 0.0);
  assert_eq!(view.history.times_consumed, 1);
  assert_eq!(view.history.average_duration_days, 6);
  // Out of stock: history informs the view, but nothing is predicted.
  assert!(view.prediction.is_none());
}
