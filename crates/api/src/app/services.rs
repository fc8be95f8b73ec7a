//! Backend selection and service dispatch.
//!
//! `USE_PERSISTENT_STORE=true` wires the engine, projector, and insight
//! service against Postgres; anything else runs fully in memory. Handlers
//! only ever see [`AppServices`] and stay backend-agnostic.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPool;

use shopfloor_floorview::FloorTile;
use shopfloor_infra::engine::{EngineError, InventoryEngine, MovementReceipt};
use shopfloor_infra::insight::{InsightError, InsightService};
use shopfloor_infra::layout::{InMemoryLayoutStore, PostgresLayoutStore};
use shopfloor_infra::projections::FloorViewProjector;
use shopfloor_infra::store::{InMemoryInventoryStore, PostgresInventoryStore, StoreError};
use shopfloor_infra::summarizer::{self, HttpSummarizer};
use shopfloor_infra::{ensure_schema, seed_default_layout};
use shopfloor_insight::InsightReport;
use shopfloor_inventory::{
    NewProduct, Product, RECENT_ACTIVITY_LIMIT, TransactionEntry, WasteLogEntry,
};

const DEFAULT_SUMMARIZER_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// The two wiring modes of the application.
///
/// Both variants carry the same three service objects; only the store types
/// differ. Handlers dispatch through the methods below, so adding a backend
/// touches this file and nothing else.
pub enum AppServices {
    InMemory {
        engine: InventoryEngine<Arc<InMemoryInventoryStore>>,
        projector: FloorViewProjector<Arc<InMemoryInventoryStore>, Arc<InMemoryLayoutStore>>,
        insights: InsightService<Arc<InMemoryInventoryStore>, HttpSummarizer>,
    },
    Persistent {
        engine: InventoryEngine<Arc<PostgresInventoryStore>>,
        projector: FloorViewProjector<Arc<PostgresInventoryStore>, Arc<PostgresLayoutStore>>,
        insights: InsightService<Arc<PostgresInventoryStore>, HttpSummarizer>,
    },
}

/// Builds services for the backend selected by `USE_PERSISTENT_STORE`.
pub async fn build_services() -> anyhow::Result<AppServices> {
    let flag = std::env::var("USE_PERSISTENT_STORE").unwrap_or_else(|_| "false".to_string());
    let use_persistent = match flag.trim() {
        v if v.eq_ignore_ascii_case("true") || v == "1" => true,
        v if v.eq_ignore_ascii_case("false") || v == "0" || v.is_empty() => false,
        other => {
            tracing::warn!("unrecognized USE_PERSISTENT_STORE value {other:?}, using in-memory");
            false
        }
    };

    let summarizer = build_summarizer()?;

    if use_persistent {
        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set when USE_PERSISTENT_STORE=true")?;
        let pool = PgPool::connect(&database_url)
            .await
            .context("failed to connect to Postgres")?;
        ensure_schema(&pool)
            .await
            .context("failed to prepare the database schema")?;

        let store = Arc::new(PostgresInventoryStore::new(pool.clone()));
        let layouts = Arc::new(PostgresLayoutStore::new(pool));
        seed_default_layout(layouts.as_ref(), store.as_ref())
            .await
            .context("failed to seed the floor layout")?;

        tracing::info!("using persistent Postgres stores");
        Ok(AppServices::Persistent {
            engine: InventoryEngine::new(Arc::clone(&store)),
            projector: FloorViewProjector::new(Arc::clone(&store), layouts),
            insights: InsightService::new(store, summarizer),
        })
    } else {
        let store = Arc::new(InMemoryInventoryStore::new());
        let layouts = Arc::new(InMemoryLayoutStore::new());

        tracing::info!("using in-memory stores");
        Ok(AppServices::InMemory {
            engine: InventoryEngine::new(Arc::clone(&store)),
            projector: FloorViewProjector::new(Arc::clone(&store), layouts),
            insights: InsightService::new(store, summarizer),
        })
    }
}

fn build_summarizer() -> anyhow::Result<HttpSummarizer> {
    let endpoint = std::env::var("SUMMARIZER_API_URL").unwrap_or_else(|_| {
        tracing::warn!("SUMMARIZER_API_URL not set, using the default endpoint");
        DEFAULT_SUMMARIZER_URL.to_string()
    });
    let api_key = std::env::var("SUMMARIZER_API_KEY").unwrap_or_else(|_| {
        tracing::warn!("SUMMARIZER_API_KEY not set, insight requests will fail upstream");
        String::new()
    });

    let client = reqwest::Client::builder()
        .timeout(summarizer::REQUEST_TIMEOUT)
        .build()
        .context("failed to build the summarizer HTTP client")?;

    Ok(HttpSummarizer::new(client, endpoint, api_key))
}

impl AppServices {
    pub async fn register_product(&self, input: NewProduct) -> Result<Product, EngineError> {
        match self {
            AppServices::InMemory { engine, .. } => engine.register_product(input).await,
            AppServices::Persistent { engine, .. } => engine.register_product(input).await,
        }
    }

    pub async fn checkout(
        &self,
        barcode: &str,
        quantity: i64,
    ) -> Result<MovementReceipt, EngineError> {
        match self {
            AppServices::InMemory { engine, .. } => engine.checkout(barcode, quantity).await,
            AppServices::Persistent { engine, .. } => engine.checkout(barcode, quantity).await,
        }
    }

    pub async fn restock(
        &self,
        barcode: &str,
        quantity: i64,
    ) -> Result<MovementReceipt, EngineError> {
        match self {
            AppServices::InMemory { engine, .. } => engine.restock(barcode, quantity).await,
            AppServices::Persistent { engine, .. } => engine.restock(barcode, quantity).await,
        }
    }

    pub async fn receive_shipment(
        &self,
        barcode: &str,
        quantity: i64,
    ) -> Result<MovementReceipt, EngineError> {
        match self {
            AppServices::InMemory { engine, .. } => {
                engine.receive_shipment(barcode, quantity).await
            }
            AppServices::Persistent { engine, .. } => {
                engine.receive_shipment(barcode, quantity).await
            }
        }
    }

    pub async fn log_waste(
        &self,
        barcode: &str,
        quantity: i64,
        location: &str,
    ) -> Result<MovementReceipt, EngineError> {
        match self {
            AppServices::InMemory { engine, .. } => {
                engine.log_waste(barcode, quantity, location).await
            }
            AppServices::Persistent { engine, .. } => {
                engine.log_waste(barcode, quantity, location).await
            }
        }
    }

    pub async fn product(&self, barcode: &str) -> Result<Product, EngineError> {
        match self {
            AppServices::InMemory { engine, .. } => engine.product(barcode).await,
            AppServices::Persistent { engine, .. } => engine.product(barcode).await,
        }
    }

    pub async fn products(&self) -> Result<Vec<Product>, EngineError> {
        match self {
            AppServices::InMemory { engine, .. } => engine.products().await,
            AppServices::Persistent { engine, .. } => engine.products().await,
        }
    }

    pub async fn recent_transactions(&self) -> Result<Vec<TransactionEntry>, EngineError> {
        match self {
            AppServices::InMemory { engine, .. } => {
                engine.recent_transactions(RECENT_ACTIVITY_LIMIT).await
            }
            AppServices::Persistent { engine, .. } => {
                engine.recent_transactions(RECENT_ACTIVITY_LIMIT).await
            }
        }
    }

    pub async fn transactions_for(
        &self,
        barcode: &str,
    ) -> Result<Vec<TransactionEntry>, EngineError> {
        match self {
            AppServices::InMemory { engine, .. } => engine.transactions_for(barcode).await,
            AppServices::Persistent { engine, .. } => engine.transactions_for(barcode).await,
        }
    }

    pub async fn waste_log(&self) -> Result<Vec<WasteLogEntry>, EngineError> {
        match self {
            AppServices::InMemory { engine, .. } => engine.waste_log().await,
            AppServices::Persistent { engine, .. } => engine.waste_log().await,
        }
    }

    pub async fn waste_log_for(&self, barcode: &str) -> Result<Vec<WasteLogEntry>, EngineError> {
        match self {
            AppServices::InMemory { engine, .. } => engine.waste_log_for(barcode).await,
            AppServices::Persistent { engine, .. } => engine.waste_log_for(barcode).await,
        }
    }

    pub async fn floor_view(&self) -> Result<Vec<FloorTile>, StoreError> {
        match self {
            AppServices::InMemory { projector, .. } => projector.project().await,
            AppServices::Persistent { projector, .. } => projector.project().await,
        }
    }

    pub async fn insights(&self) -> Result<InsightReport, InsightError> {
        match self {
            AppServices::InMemory { insights, .. } => insights.generate().await,
            AppServices::Persistent { insights, .. } => insights.generate().await,
        }
    }
}
