//! End-to-end flows through the engine, the in-memory store, and the
//! insight service.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shopfloor_insight::{Summarizer, SummaryError};
use shopfloor_inventory::{
    MovementLocation, NewProduct, StockAlert, StockSide, TransactionKind, replay_on_hand,
};

use crate::engine::{EngineError, InventoryEngine};
use crate::insight::{InsightError, InsightService};
use crate::store::{InMemoryInventoryStore, StoreError};

fn new_product(barcode: &str, name: &str, front: i64, back: i64, threshold: i64) -> NewProduct {
    NewProduct {
        barcode: barcode.to_string(),
        name: name.to_string(),
        front_quantity: front,
        back_quantity: back,
        reorder_threshold: threshold,
    }
}

fn test_engine() -> (
    InventoryEngine<Arc<InMemoryInventoryStore>>,
    Arc<InMemoryInventoryStore>,
) {
    let store = Arc::new(InMemoryInventoryStore::new());
    (InventoryEngine::new(store.clone()), store)
}

#[tokio::test]
async fn checkout_restock_waste_shipment_flow() {
    let (engine, _store) = test_engine();
    engine
        .register_product(new_product("X1", "Milk", 10, 5, 8))
        .await
        .unwrap();

    // Checkout 3 drops the front below the threshold.
    let receipt = engine.checkout("X1", 3).await.unwrap();
    assert_eq!(receipt.product.front_quantity(), 7);
    assert_eq!(receipt.product.back_quantity(), 5);
    assert_eq!(receipt.entry.kind, TransactionKind::Checkout);
    assert_eq!(receipt.entry.delta, -3);
    assert_eq!(receipt.entry.location, MovementLocation::Front);
    assert!(receipt.waste.is_none());
    match receipt.alert {
        Some(StockAlert::RestockFront { name, remaining }) => {
            assert_eq!(name, "Milk");
            assert_eq!(remaining, 7);
        }
        other => panic!("Expected RestockFront alert, got {other:?}"),
    }

    // Restocking more than the backroom holds is rejected outright.
    let err = engine.restock("X1", 6).await.unwrap_err();
    match err {
        EngineError::InsufficientStock(msg) => {
            assert_eq!(msg, "Not enough back stock. Available: 5");
        }
        other => panic!("Expected InsufficientStock, got {other:?}"),
    }

    // Restock 4 moves quantity between sides and drains the backroom.
    let receipt = engine.restock("X1", 4).await.unwrap();
    assert_eq!(receipt.product.front_quantity(), 11);
    assert_eq!(receipt.product.back_quantity(), 1);
    assert_eq!(receipt.entry.kind, TransactionKind::Restock);
    assert_eq!(receipt.entry.delta, 4);
    assert_eq!(receipt.entry.location, MovementLocation::BackToFront);
    match receipt.alert {
        Some(StockAlert::ReorderFromSupplier { name, remaining }) => {
            assert_eq!(name, "Milk");
            assert_eq!(remaining, 1);
        }
        other => panic!("Expected ReorderFromSupplier alert, got {other:?}"),
    }

    // Waste 1 from the shelf lands in the ledger and the side-log.
    let receipt = engine.log_waste("X1", 1, "front").await.unwrap();
    assert_eq!(receipt.product.front_quantity(), 10);
    assert_eq!(receipt.product.waste_quantity(), 1);
    assert_eq!(receipt.entry.kind, TransactionKind::Waste);
    assert_eq!(receipt.entry.delta, -1);
    let waste = receipt.waste.expect("waste receipt carries a side-log entry");
    assert_eq!(waste.quantity, 1);
    assert_eq!(waste.side, StockSide::Front);

    // A shipment replenishes the backroom.
    let receipt = engine.receive_shipment("X1", 12).await.unwrap();
    assert_eq!(receipt.product.back_quantity(), 13);
    assert_eq!(receipt.entry.kind, TransactionKind::ShipmentReceived);
    assert_eq!(receipt.entry.delta, 12);
    assert_eq!(receipt.entry.location, MovementLocation::Back);

    // Ledger comes back newest first.
    let kinds: Vec<TransactionKind> = engine
        .transactions_for("X1")
        .await
        .unwrap()
        .iter()
        .map(|entry| entry.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::ShipmentReceived,
            TransactionKind::Waste,
            TransactionKind::Restock,
            TransactionKind::Checkout,
        ]
    );

    // The id-keyed history matches the barcode-keyed one.
    let product = engine.product("X1").await.unwrap();
    let by_id = engine.transactions_for_product(&product.id()).await.unwrap();
    assert_eq!(by_id.len(), 4);
    assert_eq!(by_id[0].kind, TransactionKind::ShipmentReceived);
}

#[tokio::test]
async fn ledger_replay_reconstructs_on_hand() {
    let (engine, _store) = test_engine();
    let opening = engine
        .register_product(new_product("X1", "Milk", 10, 5, 8))
        .await
        .unwrap();
    let baseline = opening.on_hand();

    engine.checkout("X1", 3).await.unwrap();
    engine.restock("X1", 4).await.unwrap();
    engine.log_waste("X1", 1, "FRONT").await.unwrap();
    engine.receive_shipment("X1", 12).await.unwrap();

    // Replay in chronological order: a restock moves quantity between
    // sides, so it must contribute zero to on-hand.
    let mut entries = engine.transactions_for("X1").await.unwrap();
    entries.reverse();
    let replayed = baseline + replay_on_hand(&entries);

    let product = engine.product("X1").await.unwrap();
    assert_eq!(product.on_hand(), 23);
    assert_eq!(replayed, product.on_hand());
}

#[tokio::test]
async fn unknown_barcode_is_not_found() {
    let (engine, _store) = test_engine();

    let err = engine.checkout("GHOST", 1).await.unwrap_err();
    match err {
        EngineError::NotFound(msg) => assert_eq!(msg, "Product not found: GHOST"),
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn waste_reports_unknown_barcode_before_a_bad_location_tag() {
    let (engine, _store) = test_engine();

    // The product lookup runs first, so an unknown barcode wins even when
    // the location tag is also bad.
    let err = engine.log_waste("GHOST", 1, "middle").await.unwrap_err();
    match err {
        EngineError::NotFound(msg) => assert_eq!(msg, "Product not found: GHOST"),
        other => panic!("Expected NotFound, got {other:?}"),
    }

    // With a known barcode the bad tag is the error that comes back, and
    // nothing is recorded.
    engine
        .register_product(new_product("X1", "Milk", 10, 5, 8))
        .await
        .unwrap();
    let err = engine.log_waste("X1", 1, "middle").await.unwrap_err();
    match err {
        EngineError::InvalidLocation(msg) => {
            assert_eq!(msg, "Invalid location: MIDDLE. Must be FRONT or BACK.");
        }
        other => panic!("Expected InvalidLocation, got {other:?}"),
    }
    assert!(engine.transactions_for("X1").await.unwrap().is_empty());
    assert!(engine.waste_log_for("X1").await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_mutation_leaves_no_trace() {
    let (engine, _store) = test_engine();
    engine
        .register_product(new_product("X1", "Milk", 10, 5, 8))
        .await
        .unwrap();

    assert!(engine.checkout("X1", 0).await.is_err());
    assert!(engine.checkout("X1", 11).await.is_err());
    assert!(engine.log_waste("X1", 6, "BACK").await.is_err());

    let product = engine.product("X1").await.unwrap();
    assert_eq!(product.front_quantity(), 10);
    assert_eq!(product.back_quantity(), 5);
    assert_eq!(product.version(), 1);
    assert!(engine.transactions_for("X1").await.unwrap().is_empty());
    assert!(engine.waste_log().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let (engine, _store) = test_engine();
    engine
        .register_product(new_product("X1", "Milk", 10, 5, 8))
        .await
        .unwrap();

    let err = engine
        .register_product(new_product("X1", "Milk Again", 1, 1, 1))
        .await
        .unwrap_err();
    match err {
        EngineError::Store(StoreError::DuplicateBarcode(barcode)) => assert_eq!(barcode, "X1"),
        other => panic!("Expected DuplicateBarcode, got {other:?}"),
    }
}

#[tokio::test]
async fn registration_writes_no_ledger_entry() {
    let (engine, _store) = test_engine();
    engine
        .register_product(new_product("X1", "Milk", 10, 5, 8))
        .await
        .unwrap();

    assert!(engine.recent_transactions(50).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_checkouts_never_oversell() {
    let (engine, _store) = test_engine();
    let engine = Arc::new(engine);
    engine
        .register_product(new_product("X1", "Milk", 60, 0, 0))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..100 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move { engine.checkout("X1", 1).await }));
    }

    let mut successes = 0;
    let mut rejections = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(receipt) => {
                assert_eq!(receipt.entry.delta, -1);
                successes += 1;
            }
            Err(EngineError::InsufficientStock(msg)) => {
                assert_eq!(msg, "Not enough front stock. Available: 0");
                rejections += 1;
            }
            Err(other) => panic!("Expected InsufficientStock, got {other:?}"),
        }
    }
    assert_eq!(successes, 60);
    assert_eq!(rejections, 40);

    let product = engine.product("X1").await.unwrap();
    assert_eq!(product.front_quantity(), 0);
    assert_eq!(product.version(), 61);
    assert_eq!(engine.transactions_for("X1").await.unwrap().len(), 60);
}

struct ScriptedSummarizer {
    reply: Result<String, SummaryError>,
    seen: Mutex<Option<String>>,
}

impl ScriptedSummarizer {
    fn replying(reply: Result<String, SummaryError>) -> Self {
        Self {
            reply,
            seen: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Summarizer for ScriptedSummarizer {
    async fn summarize(&self, digest: &str) -> Result<String, SummaryError> {
        *self.seen.lock().unwrap() = Some(digest.to_string());
        self.reply.clone()
    }
}

#[tokio::test]
async fn insight_report_wraps_the_summarized_digest() {
    let (engine, store) = test_engine();
    engine
        .register_product(new_product("X1", "Milk", 10, 5, 8))
        .await
        .unwrap();
    engine.checkout("X1", 3).await.unwrap();
    engine.log_waste("X1", 1, "FRONT").await.unwrap();

    let summarizer = Arc::new(ScriptedSummarizer::replying(Ok(
        "Watch the milk waste.".to_string()
    )));
    let service = InsightService::new(store, summarizer.clone());

    let report = service.generate().await.unwrap();
    assert_eq!(report.analysis, "Watch the milk waste.");
    assert_eq!(report.transaction_count, 2);
    assert_eq!(report.product_count, 1);

    let digest = summarizer.seen.lock().unwrap().clone().unwrap();
    assert!(digest.contains("=== TRANSACTION HISTORY ==="));
    assert!(digest.contains("Total Transactions: 2"));
    assert!(digest.contains("Milk - Front: 6, Back: 5, Waste: 1, Threshold: 8"));
    assert!(digest.contains("Waste Percentage: 25.00%"));
}

#[tokio::test]
async fn insight_upstream_failure_passes_through() {
    let (engine, store) = test_engine();
    engine
        .register_product(new_product("X1", "Milk", 10, 5, 8))
        .await
        .unwrap();

    let summarizer = ScriptedSummarizer::replying(Err(SummaryError::Status {
        status: 503,
        body: "overloaded".to_string(),
    }));
    let service = InsightService::new(store, summarizer);

    let err = service.generate().await.unwrap_err();
    match err {
        InsightError::Summary(SummaryError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("Expected upstream Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn insight_empty_analysis_is_an_error() {
    let (engine, store) = test_engine();
    engine
        .register_product(new_product("X1", "Milk", 10, 5, 8))
        .await
        .unwrap();

    let service = InsightService::new(
        store,
        ScriptedSummarizer::replying(Ok("  \n".to_string())),
    );

    match service.generate().await.unwrap_err() {
        InsightError::Summary(SummaryError::Empty) => {}
        other => panic!("Expected Empty, got {other:?}"),
    }
}

#[tokio::test]
async fn insight_digest_window_caps_at_recent_limit() {
    let (engine, store) = test_engine();
    engine
        .register_product(new_product("X1", "Milk", 60, 0, 0))
        .await
        .unwrap();
    for _ in 0..55 {
        engine.checkout("X1", 1).await.unwrap();
    }

    let service = InsightService::new(
        store,
        ScriptedSummarizer::replying(Ok("Steady demand.".to_string())),
    );

    let report = service.generate().await.unwrap();
    assert_eq!(report.transaction_count, 50);
}
