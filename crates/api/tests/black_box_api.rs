//! Black-box tests that exercise the HTTP surface over a real socket.
//!
//! Each test spawns its own server on an ephemeral port with fresh in-memory
//! stores, so tests are isolated and run in parallel. The insights endpoint
//! is not exercised here; it calls an external service and is covered with a
//! scripted summarizer in the infrastructure crate.

use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let app = shopfloor_api::app::build_app()
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().expect("listener has no local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        TestServer {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register_product(
    client: &reqwest::Client,
    server: &TestServer,
    barcode: &str,
    name: &str,
    front: i64,
    back: i64,
    threshold: i64,
) -> reqwest::Response {
    client
        .post(server.url("/products"))
        .json(&json!({
            "barcode": barcode,
            "name": name,
            "front_quantity": front,
            "back_quantity": back,
            "reorder_threshold": threshold,
        }))
        .send()
        .await
        .expect("request failed")
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(server.url("/health"))
        .send()
        .await
        .expect("request failed");

    assert_eq!(res.status(), 200);
    let body = res.json::<Value>().await.expect("invalid json");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_and_fetch_product() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = register_product(&client, &server, "X1", "Milk", 10, 5, 8).await;
    assert_eq!(res.status(), 201);
    let created = res.json::<Value>().await.expect("invalid json");
    assert_eq!(created["barcode"], "X1");
    assert_eq!(created["name"], "Milk");
    assert_eq!(created["front_quantity"], 10);
    assert_eq!(created["back_quantity"], 5);
    assert_eq!(created["version"], 1);

    let res = client
        .get(server.url("/products/X1"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(res.status(), 200);
    let fetched = res.json::<Value>().await.expect("invalid json");
    assert_eq!(fetched["name"], "Milk");

    let res = client
        .get(server.url("/products"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(res.status(), 200);
    let listed = res.json::<Value>().await.expect("invalid json");
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = register_product(&client, &server, "X1", "Milk", 10, 5, 8).await;
    assert_eq!(res.status(), 201);

    let res = register_product(&client, &server, "X1", "Milk Again", 1, 1, 1).await;
    assert_eq!(res.status(), 409);
    let body = res.json::<Value>().await.expect("invalid json");
    assert_eq!(body["error"], "duplicate_barcode");
}

#[tokio::test]
async fn invalid_registration_is_bad_request() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = register_product(&client, &server, "  ", "Milk", 10, 5, 8).await;
    assert_eq!(res.status(), 400);
    let body = res.json::<Value>().await.expect("invalid json");
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(server.url("/products/GHOST"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(res.status(), 404);

    let res = client
        .post(server.url("/inventory/checkout"))
        .json(&json!({"barcode": "GHOST", "quantity": 1}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(res.status(), 404);
    let body = res.json::<Value>().await.expect("invalid json");
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Product not found: GHOST");
}

#[tokio::test]
async fn checkout_returns_receipt_and_appends_to_ledger() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register_product(&client, &server, "X1", "Milk", 10, 5, 8).await;

    let res = client
        .post(server.url("/inventory/checkout"))
        .json(&json!({"barcode": "X1", "quantity": 3}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(res.status(), 200);
    let receipt = res.json::<Value>().await.expect("invalid json");
    assert_eq!(receipt["message"], "Checkout successful. Sold 3 of Milk");
    assert_eq!(receipt["product"]["front_quantity"], 7);
    assert_eq!(receipt["product"]["version"], 2);
    assert_eq!(receipt["transaction"]["kind"], "CHECKOUT");
    assert_eq!(receipt["transaction"]["delta"], -3);
    assert_eq!(receipt["transaction"]["location"], "FRONT");
    // Front dropped to the threshold, so the receipt carries an alert.
    assert!(
        receipt["alert"]
            .as_str()
            .is_some_and(|alert| alert.contains("RESTOCK NEEDED")),
        "unexpected alert: {receipt:?}"
    );
    assert!(receipt.get("waste_log").is_none());

    let res = client
        .get(server.url("/inventory/transactions"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(res.status(), 200);
    let entries = res.json::<Value>().await.expect("invalid json");
    let entries = entries.as_array().expect("expected an array").clone();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["kind"], "CHECKOUT");

    let res = client
        .get(server.url("/inventory/transactions/X1"))
        .send()
        .await
        .expect("request failed");
    let entries = res.json::<Value>().await.expect("invalid json");
    assert_eq!(entries.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn insufficient_stock_is_unprocessable() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register_product(&client, &server, "X1", "Milk", 10, 5, 8).await;

    let res = client
        .post(server.url("/inventory/checkout"))
        .json(&json!({"barcode": "X1", "quantity": 99}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(res.status(), 422);
    let body = res.json::<Value>().await.expect("invalid json");
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["message"], "Not enough front stock. Available: 10");
}

#[tokio::test]
async fn invalid_waste_location_is_bad_request() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register_product(&client, &server, "X1", "Milk", 10, 5, 8).await;

    let res = client
        .post(server.url("/inventory/waste"))
        .json(&json!({"barcode": "X1", "quantity": 1, "location": "MIDDLE"}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(res.status(), 400);
    let body = res.json::<Value>().await.expect("invalid json");
    assert_eq!(body["error"], "invalid_location");
    assert_eq!(body["message"], "Invalid location: MIDDLE. Must be FRONT or BACK.");
}

#[tokio::test]
async fn stock_flows_through_all_four_movements() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register_product(&client, &server, "X1", "Milk", 10, 5, 2).await;

    let res = client
        .post(server.url("/inventory/restock"))
        .json(&json!({"barcode": "X1", "quantity": 4}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(res.status(), 200);
    let receipt = res.json::<Value>().await.expect("invalid json");
    assert_eq!(receipt["message"], "Restocked 4 of 'Milk' from Back to Front.");
    assert_eq!(receipt["product"]["front_quantity"], 14);
    assert_eq!(receipt["product"]["back_quantity"], 1);
    assert_eq!(receipt["transaction"]["location"], "BACK_TO_FRONT");

    let res = client
        .post(server.url("/inventory/shipment"))
        .json(&json!({"barcode": "X1", "quantity": 12}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(res.status(), 200);
    let receipt = res.json::<Value>().await.expect("invalid json");
    assert_eq!(receipt["message"], "Received shipment: Added 12 of 'Milk' to back stock.");
    assert_eq!(receipt["product"]["back_quantity"], 13);
    assert_eq!(receipt["transaction"]["kind"], "SHIPMENT_RECEIVED");

    let res = client
        .post(server.url("/inventory/waste"))
        .json(&json!({"barcode": "X1", "quantity": 2, "location": "front"}))
        .send()
        .await
        .expect("request failed");
    assert_eq!(res.status(), 200);
    let receipt = res.json::<Value>().await.expect("invalid json");
    assert_eq!(receipt["message"], "Logged 2 waste for 'Milk' from FRONT.");
    assert_eq!(receipt["product"]["front_quantity"], 12);
    assert_eq!(receipt["product"]["waste_quantity"], 2);
    assert_eq!(receipt["waste_log"]["side"], "FRONT");

    let res = client
        .get(server.url("/inventory/waste-log"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(res.status(), 200);
    let waste = res.json::<Value>().await.expect("invalid json");
    assert_eq!(waste.as_array().map(Vec::len), Some(1));
    assert_eq!(waste[0]["quantity"], 2);

    let res = client
        .get(server.url("/inventory/waste-log/X1"))
        .send()
        .await
        .expect("request failed");
    let waste = res.json::<Value>().await.expect("invalid json");
    assert_eq!(waste.as_array().map(Vec::len), Some(1));

    // Three movements on version 1 leave the product at version 4.
    let res = client
        .get(server.url("/products/X1"))
        .send()
        .await
        .expect("request failed");
    let product = res.json::<Value>().await.expect("invalid json");
    assert_eq!(product["version"], 4);
}

#[tokio::test]
async fn floor_view_omits_products_without_layout() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register_product(&client, &server, "X1", "Milk", 10, 5, 8).await;

    let res = client
        .get(server.url("/floorview"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(res.status(), 200);
    let tiles = res.json::<Value>().await.expect("invalid json");
    assert_eq!(tiles.as_array().map(Vec::len), Some(0));
}
