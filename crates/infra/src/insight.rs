//! Insight generation: digest the recent window, hand it to the
//! summarizer, wrap the prose in a report.

use chrono::Utc;
use tracing::instrument;

use shopfloor_insight::{InsightReport, InventoryDigest, Summarizer, SummaryError};
use shopfloor_inventory::RECENT_ACTIVITY_LIMIT;

use crate::store::{InventoryStore, StoreError};

#[derive(Debug)]
pub enum InsightError {
    /// Reading products or the ledger failed.
    Store(StoreError),
    /// The external summarizer failed; inventory state is unaffected.
    Summary(SummaryError),
}

impl From<StoreError> for InsightError {
    fn from(value: StoreError) -> Self {
        InsightError::Store(value)
    }
}

impl From<SummaryError> for InsightError {
    fn from(value: SummaryError) -> Self {
        InsightError::Summary(value)
    }
}

/// Builds insight reports from store state plus an external summarizer.
///
/// The digest side is fully deterministic; only the final prose comes
/// from the summarizer. A summarizer failure yields an error and leaves
/// no trace anywhere, since this path never writes.
pub struct InsightService<S, C> {
    store: S,
    summarizer: C,
}

impl<S, C> InsightService<S, C> {
    pub fn new(store: S, summarizer: C) -> Self {
        Self { store, summarizer }
    }
}

impl<S, C> InsightService<S, C>
where
    S: InventoryStore,
    C: Summarizer,
{
    /// Digest the recent activity window and full catalog, then ask the
    /// summarizer for an analysis.
    ///
    /// An analysis that comes back empty (after trimming) is treated as
    /// an upstream failure, not an empty report.
    #[instrument(skip(self), err(Debug))]
    pub async fn generate(&self) -> Result<InsightReport, InsightError> {
        let entries = self.store.recent_entries(RECENT_ACTIVITY_LIMIT).await?;
        let products = self.store.products().await?;
        let digest = InventoryDigest::build(&products, &entries);

        let analysis = self.summarizer.summarize(digest.text()).await?;
        if analysis.trim().is_empty() {
            return Err(InsightError::Summary(SummaryError::Empty));
        }

        tracing::info!(
            transactions = digest.transaction_count(),
            products = digest.product_count(),
            "generated insight report"
        );
        Ok(InsightReport {
            analysis,
            generated_at: Utc::now(),
            transaction_count: digest.transaction_count(),
            product_count: digest.product_count(),
        })
    }
}
