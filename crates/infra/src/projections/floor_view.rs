//! Floor view projection.

use std::collections::HashMap;

use shopfloor_core::ProductId;
use shopfloor_floorview::{FloorTile, LayoutAssignment};
use shopfloor_inventory::{ActivityWindow, RECENT_ACTIVITY_LIMIT};
use tracing::instrument;

use crate::layout::LayoutStore;
use crate::store::{InventoryStore, StoreError};

/// Builds the floor view read model: every product that has a layout
/// assignment, projected onto its tile against the shared
/// recent-activity window.
///
/// Products without an assignment are omitted; assignments whose product
/// was never registered are ignored. Tiles come back sorted by product
/// name so the response is stable across calls.
pub struct FloorViewProjector<S, L> {
    store: S,
    layouts: L,
}

impl<S, L> FloorViewProjector<S, L> {
    pub fn new(store: S, layouts: L) -> Self {
        Self { store, layouts }
    }
}

impl<S, L> FloorViewProjector<S, L>
where
    S: InventoryStore,
    L: LayoutStore,
{
    #[instrument(skip(self), err)]
    pub async fn project(&self) -> Result<Vec<FloorTile>, StoreError> {
        let products = self.store.products().await?;
        let assignments: HashMap<ProductId, LayoutAssignment> = self
            .layouts
            .assignments()
            .await?
            .into_iter()
            .map(|assignment| (assignment.product_id, assignment))
            .collect();

        let recent = self.store.recent_entries(RECENT_ACTIVITY_LIMIT).await?;
        let window = ActivityWindow::from_entries(&recent);

        let mut tiles: Vec<FloorTile> = products
            .iter()
            .filter_map(|product| {
                assignments
                    .get(&product.id())
                    .map(|assignment| FloorTile::project(product, assignment, &window))
            })
            .collect();
        tiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tiles)
    }
}
