use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use perflab_api::{app, AppState};
use perflab_core::WiringMode;
use perflab_services::build_demo_provider;
use perflab_store::app_config::{BulkConfig, Config, DatabaseConfig, ServerConfig, ServicesConfig};
use perflab_store::MemoryOrderRepository;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for oneshot

fn test_app_with(repo: &Arc<MemoryOrderRepository>, bulk: BulkConfig) -> Router {
    let services = build_demo_provider(WiringMode::Acyclic, Duration::from_millis(1)).unwrap();
    app(AppState::new(repo.clone(), services, bulk))
}

fn test_app(repo: &Arc<MemoryOrderRepository>) -> Router {
    test_app_with(repo, BulkConfig::default())
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn total(app: Router) -> i64 {
    let (status, json) = send(app, "GET", "/orders/count").await;
    assert_eq!(status, StatusCode::OK);
    json["total"].as_i64().unwrap()
}

#[tokio::test]
async fn test_bulk_naive_then_count() {
    let repo = Arc::new(MemoryOrderRepository::new());
    let app = test_app(&repo);
    let before = total(app.clone()).await;

    let (status, json) = send(app.clone(), "POST", "/orders/bulk-naive?count=5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["inserted"], 5);
    assert_eq!(json["mode"], "naive");
    assert_eq!(total(app).await, before + 5);
    assert_eq!(repo.commits(), 5);
}

#[tokio::test]
async fn test_bulk_optimized_then_count() {
    let repo = Arc::new(MemoryOrderRepository::new());
    let app = test_app(&repo);
    let before = total(app.clone()).await;

    let (status, json) = send(app.clone(), "POST", "/orders/bulk-optimized?count=5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["inserted"], 5);
    assert_eq!(json["mode"], "optimized");
    assert_eq!(total(app).await, before + 5);
    assert_eq!(repo.commits(), 1);

    let customers: Vec<String> = repo.snapshot().await.into_iter().map(|o| o.customer).collect();
    assert_eq!(customers.first().map(String::as_str), Some("Customer-0"));
    assert_eq!(customers.last().map(String::as_str), Some("Customer-4"));
}

#[tokio::test]
async fn test_zero_count_inserts_nothing() {
    let repo = Arc::new(MemoryOrderRepository::new());
    let app = test_app(&repo);

    for uri in ["/orders/bulk-naive?count=0", "/orders/bulk-optimized?count=0"] {
        let (status, json) = send(app.clone(), "POST", uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["inserted"], 0);
    }

    assert_eq!(total(app).await, 0);
}

#[tokio::test]
async fn test_count_defaults_to_configured_value() {
    let repo = Arc::new(MemoryOrderRepository::new());
    let app = test_app(&repo);

    let (status, json) = send(app.clone(), "POST", "/orders/bulk-optimized").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["inserted"], 1000);
    assert_eq!(total(app).await, 1000);
}

#[tokio::test]
async fn test_negative_count_is_not_rejected() {
    let repo = Arc::new(MemoryOrderRepository::new());
    let app = test_app(&repo);

    let (status, json) = send(app.clone(), "POST", "/orders/bulk-naive?count=-3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["inserted"], -3);
    assert_eq!(json["mode"], "naive");
    assert_eq!(total(app).await, 0);
}

#[tokio::test]
async fn test_oversized_count_is_server_error() {
    let repo = Arc::new(MemoryOrderRepository::new());
    let app = test_app(&repo);

    let (status, json) = send(
        app.clone(),
        "POST",
        "/orders/bulk-optimized?count=9223372036854775807",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Internal Server Error");

    // The server keeps answering after the failed request
    assert_eq!(total(app).await, 0);
}

#[tokio::test]
async fn test_non_numeric_count_is_bad_request() {
    let repo = Arc::new(MemoryOrderRepository::new());

    let (status, _) = send(test_app(&repo), "POST", "/orders/bulk-naive?count=many").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(repo.commits(), 0);
}

#[tokio::test]
async fn test_configured_ceiling_rejects_large_counts() {
    let repo = Arc::new(MemoryOrderRepository::new());
    let app = test_app_with(
        &repo,
        BulkConfig {
            default_count: 10,
            max_count: Some(100),
        },
    );

    let (status, json) = send(app.clone(), "POST", "/orders/bulk-optimized?count=101").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("maximum of 100"));
    assert_eq!(total(app).await, 0);
}

#[tokio::test]
async fn test_store_failure_is_server_error() {
    let repo = Arc::new(MemoryOrderRepository::with_commit_limit(2));
    let app = test_app(&repo);

    let (status, json) = send(app.clone(), "POST", "/orders/bulk-naive?count=5").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Internal Server Error");
    assert_eq!(total(app.clone()).await, 2);

    let (status, _) = send(app.clone(), "POST", "/orders/bulk-optimized?count=5").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(total(app).await, 2);
}

#[tokio::test]
async fn test_ping_a_service() {
    let repo = Arc::new(MemoryOrderRepository::new());

    let (status, json) = send(test_app(&repo), "GET", "/orders/ping-a-service").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "work executed");
}

#[tokio::test]
async fn test_circular_wiring_stops_startup() {
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        // Never contacted: wiring is validated before connecting
        database: DatabaseConfig {
            url: "postgres://perflab@unreachable.invalid/perflab".to_string(),
            max_connections: 1,
            acquire_timeout_secs: 1,
        },
        bulk: BulkConfig::default(),
        services: ServicesConfig {
            wiring: WiringMode::Circular,
            work_delay_ms: 1,
        },
    };

    let err = AppState::bootstrap(&config).await.err().unwrap();
    let message = format!("{:#}", err);

    assert!(message.starts_with("Service wiring failed"));
    assert!(message.contains("service-a -> service-b -> service-a"));
}
