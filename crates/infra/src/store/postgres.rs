//! PostgreSQL-backed implementation of [`InventoryStore`].
//!
//! ## Schema
//!
//! Four tables, created on startup by [`ensure_schema`] when absent:
//!
//! - `products`: one row per product, the `version` column guards writers
//! - `transactions`: append-only ledger; `position` breaks timestamp ties
//! - `waste_logs`: append-only waste side-log
//! - `layout_assignments`: product-to-floor-position mapping
//!
//! Enum-like columns (`kind`, `location`, `side`) are stored as their
//! canonical uppercase tags and parsed back on read; an unknown tag is a
//! corrupt row and surfaces as [`StoreError::Backend`].
//!
//! ## Error Mapping
//!
//! | Postgres condition                  | `StoreError`       |
//! |-------------------------------------|--------------------|
//! | unique violation on insert          | `DuplicateBarcode` |
//! | guarded `UPDATE` affects zero rows  | `Concurrency`      |
//! | pool closed / connection failure    | `Backend`          |
//! | any other driver error              | `Backend`          |

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shopfloor_core::{EntryId, ExpectedVersion, ProductId, WasteLogId};
use shopfloor_inventory::{
    Barcode, MovementLocation, Product, StockSide, TransactionEntry, TransactionKind,
    WasteLogEntry,
};
use sqlx::PgPool;
use sqlx::postgres::PgRow;
use std::sync::Arc;
use tracing::{Span, instrument};
use uuid::Uuid;

use super::StoreError;
use super::r#trait::{InventoryStore, StockCommit};

/// Create the inventory tables when they do not exist yet.
///
/// `position BIGSERIAL` on the append-only tables gives rows a total
/// order even when `recorded_at` collides.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id                UUID PRIMARY KEY,
            barcode           TEXT NOT NULL UNIQUE,
            name              TEXT NOT NULL,
            front_quantity    BIGINT NOT NULL,
            back_quantity     BIGINT NOT NULL,
            waste_quantity    BIGINT NOT NULL,
            reorder_threshold BIGINT NOT NULL,
            version           BIGINT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id           UUID PRIMARY KEY,
            position     BIGSERIAL,
            product_id   UUID NOT NULL,
            barcode      TEXT NOT NULL,
            product_name TEXT NOT NULL,
            kind         TEXT NOT NULL,
            delta        BIGINT NOT NULL,
            location     TEXT NOT NULL,
            recorded_at  TIMESTAMPTZ NOT NULL
        )
        "#,
        r#"CREATE INDEX IF NOT EXISTS transactions_barcode_idx ON transactions (barcode)"#,
        r#"CREATE INDEX IF NOT EXISTS transactions_product_id_idx ON transactions (product_id)"#,
        r#"
        CREATE TABLE IF NOT EXISTS waste_logs (
            id           UUID PRIMARY KEY,
            position     BIGSERIAL,
            barcode      TEXT NOT NULL,
            product_name TEXT NOT NULL,
            quantity     BIGINT NOT NULL,
            side         TEXT NOT NULL,
            recorded_at  TIMESTAMPTZ NOT NULL
        )
        "#,
        r#"CREATE INDEX IF NOT EXISTS waste_logs_barcode_idx ON waste_logs (barcode)"#,
        r#"
        CREATE TABLE IF NOT EXISTS layout_assignments (
            product_id UUID PRIMARY KEY,
            aisle      TEXT NOT NULL,
            x          INTEGER NOT NULL,
            y          INTEGER NOT NULL
        )
        "#,
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }
    Ok(())
}

/// PostgreSQL implementation of [`InventoryStore`].
pub struct PostgresInventoryStore {
    pool: Arc<PgPool>,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    #[instrument(skip(self, product), fields(barcode = %product.barcode()), err)]
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, barcode, name, front_quantity, back_quantity, waste_quantity, reorder_threshold, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(product.id().as_uuid())
        .bind(product.barcode().as_str())
        .bind(product.name())
        .bind(product.front_quantity())
        .bind(product.back_quantity())
        .bind(product.waste_quantity())
        .bind(product.reorder_threshold())
        .bind(product.version() as i64)
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateBarcode(product.barcode().to_string())
            } else {
                map_sqlx_error("insert_product", e)
            }
        })?;
        Ok(())
    }

    #[instrument(skip(self), fields(barcode = %barcode), err)]
    async fn product_by_barcode(&self, barcode: &Barcode) -> Result<Option<Product>, StoreError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, barcode, name, front_quantity, back_quantity, waste_quantity, reorder_threshold, version
            FROM products
            WHERE barcode = $1
            "#,
        )
        .bind(barcode.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("product_by_barcode", e))?;

        row.map(Product::try_from).transpose()
    }

    #[instrument(skip(self), err)]
    async fn products(&self) -> Result<Vec<Product>, StoreError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, barcode, name, front_quantity, back_quantity, waste_quantity, reorder_threshold, version
            FROM products
            ORDER BY barcode
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("products", e))?;

        rows.into_iter().map(Product::try_from).collect()
    }

    #[instrument(
        skip(self, commit),
        fields(
            barcode = %commit.product.barcode(),
            kind = commit.entry.kind.as_str(),
            expected_version = ?commit.expected_version,
            outcome = tracing::field::Empty,
        ),
        err
    )]
    async fn commit(&self, commit: StockCommit) -> Result<(), StoreError> {
        let span = Span::current();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("commit.begin", e))?;

        let guard = match commit.expected_version {
            ExpectedVersion::Any => None,
            ExpectedVersion::Exact(version) => Some(version as i64),
        };
        let result = sqlx::query(
            r#"
            UPDATE products
            SET front_quantity = $1, back_quantity = $2, waste_quantity = $3, version = $4
            WHERE id = $5 AND ($6::BIGINT IS NULL OR version = $6)
            "#,
        )
        .bind(commit.product.front_quantity())
        .bind(commit.product.back_quantity())
        .bind(commit.product.waste_quantity())
        .bind(commit.product.version() as i64)
        .bind(commit.product.id().as_uuid())
        .bind(guard)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("commit.update_product", e))?;

        if result.rows_affected() == 0 {
            span.record("outcome", "conflict");
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("commit.rollback", e))?;
            return Err(StoreError::Concurrency(format!(
                "expected {:?} for barcode {}",
                commit.expected_version,
                commit.product.barcode()
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, product_id, barcode, product_name, kind, delta, location, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(commit.entry.id.as_uuid())
        .bind(commit.entry.product_id.as_uuid())
        .bind(commit.entry.barcode.as_str())
        .bind(commit.entry.product_name.as_str())
        .bind(commit.entry.kind.as_str())
        .bind(commit.entry.delta)
        .bind(commit.entry.location.as_str())
        .bind(commit.entry.recorded_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("commit.insert_entry", e))?;

        if let Some(waste) = &commit.waste {
            sqlx::query(
                r#"
                INSERT INTO waste_logs (id, barcode, product_name, quantity, side, recorded_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(waste.id.as_uuid())
            .bind(waste.barcode.as_str())
            .bind(waste.product_name.as_str())
            .bind(waste.quantity)
            .bind(waste.side.as_str())
            .bind(waste.recorded_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("commit.insert_waste", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit.commit", e))?;
        span.record("outcome", "applied");
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn recent_entries(&self, limit: usize) -> Result<Vec<TransactionEntry>, StoreError> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, barcode, product_name, kind, delta, location, recorded_at
            FROM transactions
            ORDER BY recorded_at DESC, position DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("recent_entries", e))?;

        rows.into_iter().map(TransactionEntry::try_from).collect()
    }

    #[instrument(skip(self), fields(barcode = %barcode), err)]
    async fn entries_for_barcode(
        &self,
        barcode: &Barcode,
    ) -> Result<Vec<TransactionEntry>, StoreError> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, barcode, product_name, kind, delta, location, recorded_at
            FROM transactions
            WHERE barcode = $1
            ORDER BY recorded_at DESC, position DESC
            "#,
        )
        .bind(barcode.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("entries_for_barcode", e))?;

        rows.into_iter().map(TransactionEntry::try_from).collect()
    }

    #[instrument(skip(self), fields(product_id = %product_id), err)]
    async fn entries_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<TransactionEntry>, StoreError> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, barcode, product_name, kind, delta, location, recorded_at
            FROM transactions
            WHERE product_id = $1
            ORDER BY recorded_at DESC, position DESC
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("entries_for_product", e))?;

        rows.into_iter().map(TransactionEntry::try_from).collect()
    }

    #[instrument(skip(self), err)]
    async fn waste_entries(&self) -> Result<Vec<WasteLogEntry>, StoreError> {
        let rows: Vec<WasteRow> = sqlx::query_as(
            r#"
            SELECT id, barcode, product_name, quantity, side, recorded_at
            FROM waste_logs
            ORDER BY recorded_at DESC, position DESC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("waste_entries", e))?;

        rows.into_iter().map(WasteLogEntry::try_from).collect()
    }

    #[instrument(skip(self), fields(barcode = %barcode), err)]
    async fn waste_entries_for_barcode(
        &self,
        barcode: &Barcode,
    ) -> Result<Vec<WasteLogEntry>, StoreError> {
        let rows: Vec<WasteRow> = sqlx::query_as(
            r#"
            SELECT id, barcode, product_name, quantity, side, recorded_at
            FROM waste_logs
            WHERE barcode = $1
            ORDER BY recorded_at DESC, position DESC
            "#,
        )
        .bind(barcode.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("waste_entries_for_barcode", e))?;

        rows.into_iter().map(WasteLogEntry::try_from).collect()
    }
}

struct ProductRow {
    id: Uuid,
    barcode: String,
    name: String,
    front_quantity: i64,
    back_quantity: i64,
    waste_quantity: i64,
    reorder_threshold: i64,
    version: i64,
}

impl<'r> sqlx::FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            id: row.try_get("id")?,
            barcode: row.try_get("barcode")?,
            name: row.try_get("name")?,
            front_quantity: row.try_get("front_quantity")?,
            back_quantity: row.try_get("back_quantity")?,
            waste_quantity: row.try_get("waste_quantity")?,
            reorder_threshold: row.try_get("reorder_threshold")?,
            version: row.try_get("version")?,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, StoreError> {
        Ok(Product::from_stored(
            ProductId::from_uuid(row.id),
            parse_barcode(&row.barcode)?,
            row.name,
            row.front_quantity,
            row.back_quantity,
            row.waste_quantity,
            row.reorder_threshold,
            row.version as u64,
        ))
    }
}

struct EntryRow {
    id: Uuid,
    product_id: Uuid,
    barcode: String,
    product_name: String,
    kind: String,
    delta: i64,
    location: String,
    recorded_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for EntryRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            barcode: row.try_get("barcode")?,
            product_name: row.try_get("product_name")?,
            kind: row.try_get("kind")?,
            delta: row.try_get("delta")?,
            location: row.try_get("location")?,
            recorded_at: row.try_get("recorded_at")?,
        })
    }
}

impl TryFrom<EntryRow> for TransactionEntry {
    type Error = StoreError;

    fn try_from(row: EntryRow) -> Result<Self, StoreError> {
        Ok(TransactionEntry {
            id: EntryId::from_uuid(row.id),
            product_id: ProductId::from_uuid(row.product_id),
            barcode: parse_barcode(&row.barcode)?,
            product_name: row.product_name,
            kind: parse_kind(&row.kind)?,
            delta: row.delta,
            location: parse_location(&row.location)?,
            recorded_at: row.recorded_at,
        })
    }
}

struct WasteRow {
    id: Uuid,
    barcode: String,
    product_name: String,
    quantity: i64,
    side: String,
    recorded_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for WasteRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            id: row.try_get("id")?,
            barcode: row.try_get("barcode")?,
            product_name: row.try_get("product_name")?,
            quantity: row.try_get("quantity")?,
            side: row.try_get("side")?,
            recorded_at: row.try_get("recorded_at")?,
        })
    }
}

impl TryFrom<WasteRow> for WasteLogEntry {
    type Error = StoreError;

    fn try_from(row: WasteRow) -> Result<Self, StoreError> {
        Ok(WasteLogEntry {
            id: WasteLogId::from_uuid(row.id),
            barcode: parse_barcode(&row.barcode)?,
            product_name: row.product_name,
            quantity: row.quantity,
            side: parse_side(&row.side)?,
            recorded_at: row.recorded_at,
        })
    }
}

fn parse_barcode(raw: &str) -> Result<Barcode, StoreError> {
    Barcode::new(raw).map_err(|e| StoreError::Backend(format!("corrupt barcode column: {e}")))
}

fn parse_kind(tag: &str) -> Result<TransactionKind, StoreError> {
    TransactionKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == tag)
        .ok_or_else(|| StoreError::Backend(format!("unknown transaction kind '{tag}'")))
}

fn parse_location(tag: &str) -> Result<MovementLocation, StoreError> {
    match tag {
        "FRONT" => Ok(MovementLocation::Front),
        "BACK" => Ok(MovementLocation::Back),
        "BACK_TO_FRONT" => Ok(MovementLocation::BackToFront),
        other => Err(StoreError::Backend(format!(
            "unknown movement location '{other}'"
        ))),
    }
}

fn parse_side(tag: &str) -> Result<StockSide, StoreError> {
    StockSide::parse(tag).map_err(|e| StoreError::Backend(format!("corrupt side column: {e}")))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) => {
            let code = db
                .code()
                .map(|code| code.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            StoreError::Backend(format!(
                "{operation}: database error [{code}] {}",
                db.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("{operation}: connection pool is closed"))
        }
        sqlx::Error::RowNotFound => StoreError::Backend(format!("{operation}: row not found")),
        _ => StoreError::Backend(format!("{operation}: {err}")),
    }
}
