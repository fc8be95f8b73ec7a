//! Floor layout persistence and the default-grid seeder.

use async_trait::async_trait;
use shopfloor_core::ProductId;
use shopfloor_floorview::LayoutAssignment;
use sqlx::PgPool;
use sqlx::postgres::PgRow;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::instrument;
use uuid::Uuid;

use crate::store::r#trait::InventoryStore;
use crate::store::{StoreError, postgres};

/// Port for floor layout persistence. One assignment per product;
/// `put` upserts.
#[async_trait]
pub trait LayoutStore: Send + Sync {
    async fn put(&self, assignment: LayoutAssignment) -> Result<(), StoreError>;

    async fn assignment_for(&self, product_id: &ProductId)
    -> Result<Option<LayoutAssignment>, StoreError>;

    async fn assignments(&self) -> Result<Vec<LayoutAssignment>, StoreError>;
}

#[async_trait]
impl<L> LayoutStore for Arc<L>
where
    L: LayoutStore + ?Sized,
{
    async fn put(&self, assignment: LayoutAssignment) -> Result<(), StoreError> {
        (**self).put(assignment).await
    }

    async fn assignment_for(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<LayoutAssignment>, StoreError> {
        (**self).assignment_for(product_id).await
    }

    async fn assignments(&self) -> Result<Vec<LayoutAssignment>, StoreError> {
        (**self).assignments().await
    }
}

/// In-memory implementation of [`LayoutStore`].
#[derive(Debug, Default)]
pub struct InMemoryLayoutStore {
    inner: RwLock<HashMap<ProductId, LayoutAssignment>>,
}

impl InMemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LayoutStore for InMemoryLayoutStore {
    async fn put(&self, assignment: LayoutAssignment) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        inner.insert(assignment.product_id, assignment);
        Ok(())
    }

    async fn assignment_for(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<LayoutAssignment>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner.get(product_id).cloned())
    }

    async fn assignments(&self) -> Result<Vec<LayoutAssignment>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        let mut assignments: Vec<LayoutAssignment> = inner.values().cloned().collect();
        assignments.sort_by_key(|a| *a.product_id.as_uuid());
        Ok(assignments)
    }
}

/// PostgreSQL implementation of [`LayoutStore`], backed by the
/// `layout_assignments` table.
pub struct PostgresLayoutStore {
    pool: Arc<PgPool>,
}

impl PostgresLayoutStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl LayoutStore for PostgresLayoutStore {
    #[instrument(skip(self, assignment), fields(aisle = %assignment.aisle), err)]
    async fn put(&self, assignment: LayoutAssignment) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO layout_assignments (product_id, aisle, x, y)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (product_id)
            DO UPDATE SET aisle = EXCLUDED.aisle, x = EXCLUDED.x, y = EXCLUDED.y
            "#,
        )
        .bind(assignment.product_id.as_uuid())
        .bind(assignment.aisle.as_str())
        .bind(assignment.x)
        .bind(assignment.y)
        .execute(&*self.pool)
        .await
        .map_err(|e| postgres::map_sqlx_error("layout.put", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %product_id), err)]
    async fn assignment_for(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<LayoutAssignment>, StoreError> {
        let row: Option<LayoutRow> = sqlx::query_as(
            r#"
            SELECT product_id, aisle, x, y
            FROM layout_assignments
            WHERE product_id = $1
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| postgres::map_sqlx_error("layout.assignment_for", e))?;

        Ok(row.map(LayoutAssignment::from))
    }

    #[instrument(skip(self), err)]
    async fn assignments(&self) -> Result<Vec<LayoutAssignment>, StoreError> {
        let rows: Vec<LayoutRow> = sqlx::query_as(
            r#"
            SELECT product_id, aisle, x, y
            FROM layout_assignments
            ORDER BY product_id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| postgres::map_sqlx_error("layout.assignments", e))?;

        Ok(rows.into_iter().map(LayoutAssignment::from).collect())
    }
}

struct LayoutRow {
    product_id: Uuid,
    aisle: String,
    x: i32,
    y: i32,
}

impl<'r> sqlx::FromRow<'r, PgRow> for LayoutRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            product_id: row.try_get("product_id")?,
            aisle: row.try_get("aisle")?,
            x: row.try_get("x")?,
            y: row.try_get("y")?,
        })
    }
}

impl From<LayoutRow> for LayoutAssignment {
    fn from(row: LayoutRow) -> Self {
        LayoutAssignment::new(ProductId::from_uuid(row.product_id), row.aisle, row.x, row.y)
    }
}

/// Fixed grid used for fresh deployments: positions on the floor plan
/// paired with aisle labels, assigned in barcode order.
const DEFAULT_POSITIONS: [(i32, i32); 10] = [
    (100, 450),
    (100, 455),
    (100, 460),
    (100, 800),
    (500, 200),
    (500, 400),
    (500, 600),
    (500, 800),
    (900, 200),
    (900, 400),
];

const DEFAULT_AISLES: [&str; 10] = ["A1", "A2", "A3", "A4", "B1", "B2", "B3", "B4", "C1", "C2"];

/// Assign the first (up to) ten products, ordered by barcode, to the
/// default floor grid.
///
/// No-op when assignments already exist or no products are registered,
/// so it is safe to run on every startup. Returns the number of
/// assignments written.
pub async fn seed_default_layout<L, S>(layouts: &L, store: &S) -> Result<usize, StoreError>
where
    L: LayoutStore,
    S: InventoryStore,
{
    if !layouts.assignments().await?.is_empty() {
        return Ok(0);
    }
    let products = store.products().await?;

    let mut seeded = 0;
    for (i, product) in products.iter().take(DEFAULT_POSITIONS.len()).enumerate() {
        let (x, y) = DEFAULT_POSITIONS[i];
        let aisle = DEFAULT_AISLES[i % DEFAULT_AISLES.len()];
        layouts
            .put(LayoutAssignment::new(product.id(), aisle, x, y))
            .await?;
        seeded += 1;
    }
    if seeded > 0 {
        tracing::info!(seeded, "seeded default floor layout");
    }
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryInventoryStore;
    use shopfloor_inventory::{NewProduct, Product};

    fn test_product(barcode: &str, name: &str) -> Product {
        Product::register(NewProduct {
            barcode: barcode.to_string(),
            name: name.to_string(),
            front_quantity: 5,
            back_quantity: 5,
            reorder_threshold: 2,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn put_upserts_by_product() {
        let layouts = InMemoryLayoutStore::new();
        let product_id = ProductId::new();

        layouts
            .put(LayoutAssignment::new(product_id, "A1", 100, 450))
            .await
            .unwrap();
        layouts
            .put(LayoutAssignment::new(product_id, "B2", 500, 400))
            .await
            .unwrap();

        let assignments = layouts.assignments().await.unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].aisle, "B2");
        assert_eq!((assignments[0].x, assignments[0].y), (500, 400));

        let found = layouts.assignment_for(&product_id).await.unwrap().unwrap();
        assert_eq!(found.aisle, "B2");
        let missing = layouts.assignment_for(&ProductId::new()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn seed_assigns_grid_in_barcode_order() {
        let store = InMemoryInventoryStore::new();
        let layouts = InMemoryLayoutStore::new();
        store
            .insert_product(&test_product("B2", "Bread"))
            .await
            .unwrap();
        store
            .insert_product(&test_product("A1", "Milk"))
            .await
            .unwrap();

        let seeded = seed_default_layout(&layouts, &store).await.unwrap();
        assert_eq!(seeded, 2);

        let assignments = layouts.assignments().await.unwrap();
        assert_eq!(assignments.len(), 2);

        // "A1" sorts before "B2", so Milk takes the first grid slot.
        let milk = store
            .product_by_barcode(&"A1".parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        let assignment = assignments
            .iter()
            .find(|a| a.product_id == milk.id())
            .unwrap();
        assert_eq!(assignment.aisle, "A1");
        assert_eq!((assignment.x, assignment.y), (100, 450));
    }

    #[tokio::test]
    async fn seed_is_idempotent() {
        let store = InMemoryInventoryStore::new();
        let layouts = InMemoryLayoutStore::new();
        store
            .insert_product(&test_product("A1", "Milk"))
            .await
            .unwrap();

        assert_eq!(seed_default_layout(&layouts, &store).await.unwrap(), 1);
        assert_eq!(seed_default_layout(&layouts, &store).await.unwrap(), 0);
        assert_eq!(layouts.assignments().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn seed_with_no_products_is_a_no_op() {
        let store = InMemoryInventoryStore::new();
        let layouts = InMemoryLayoutStore::new();

        assert_eq!(seed_default_layout(&layouts, &store).await.unwrap(), 0);
        assert!(layouts.assignments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seed_caps_at_grid_capacity() {
        let store = InMemoryInventoryStore::new();
        let layouts = InMemoryLayoutStore::new();
        for i in 0..12 {
            store
                .insert_product(&test_product(&format!("P{i:02}"), &format!("Item {i:02}")))
                .await
                .unwrap();
        }

        assert_eq!(seed_default_layout(&layouts, &store).await.unwrap(), 10);
        assert_eq!(layouts.assignments().await.unwrap().len(), 10);
    }
}
