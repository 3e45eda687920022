//! SQL schema for the Larder SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per distinct product ever identified. Inventory rows reference
-- product_id without a foreign key: stock can exist before identification
-- has filled the catalog in.
CREATE TABLE IF NOT EXISTS products (
    product_id    TEXT PRIMARY KEY,  -- barcode or AI-assigned token
    name          TEXT NOT NULL,
    brand         TEXT NOT NULL DEFAULT '',
    flavor        TEXT,
    category      TEXT NOT NULL DEFAULT 'Other',
    image_url     TEXT,
    default_unit  TEXT NOT NULL DEFAULT 'units',
    identified_by TEXT NOT NULL,     -- 'barcode' | 'ai' | 'manual'
    confidence    REAL NOT NULL DEFAULT 1.0,
    created_at    TEXT NOT NULL      -- ISO 8601 UTC; set on first insert
);

CREATE TABLE IF NOT EXISTS inventory (
    item_id       TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL,
    product_id    TEXT NOT NULL,
    quantity      REAL NOT NULL,
    unit          TEXT NOT NULL,
    purchase_date TEXT NOT NULL,     -- ISO 8601 UTC
    expiry_date   TEXT,
    status        TEXT NOT NULL DEFAULT 'active'
                  -- 'active' | 'consumed' | 'wasted' | 'expired'
);

-- Consumption logs are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS consumption_log (
    log_id        TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL,
    product_id    TEXT NOT NULL,
    item_id       TEXT NOT NULL REFERENCES inventory(item_id),
    consumed_date TEXT NOT NULL,     -- ISO 8601 UTC; store-assigned
    duration_days REAL NOT NULL DEFAULT 0,
    survey_json   TEXT               -- JSON-encoded SurveyResponse or NULL
);

CREATE INDEX IF NOT EXISTS inventory_user_idx    ON inventory(user_id, status);
CREATE INDEX IF NOT EXISTS inventory_product_idx ON inventory(product_id);
CREATE INDEX IF NOT EXISTS log_user_idx          ON consumption_log(user_id);
CREATE INDEX IF NOT EXISTS log_product_idx       ON consumption_log(product_id);

PRAGMA user_version = 1;
";
