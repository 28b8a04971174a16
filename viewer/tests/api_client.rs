use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use viewer::errors::Error;
use viewer::http::ApiClient;
use viewer::services::debug::DebugService;
use viewer::services::latest::LatestService;
use viewer::services::station_image::StationImageService;
use viewer::services::trends::TrendsService;

#[derive(Clone, Default)]
struct Hits {
    latest: Arc<AtomicUsize>,
    debug: Arc<AtomicUsize>,
}

async fn latest_handler(State(hits): State<Hits>) -> Json<Value> {
    let n = hits.latest.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "timestamp": format!("2026-08-27T10:00:{:02}Z", n),
        "error": false,
        "error_type": null,
        "raw_hex": null,
        "rssi_dbm": -70.0,
        "snr_db": 9.0,
        "sensor_data": {
            "temperature_c": 20.0 + n as f64,
            "humidity_pct": 50.0,
            "pressure_hpa": 1013.0,
            "gas_kohms": 100.0
        }
    }))
}

async fn trends_handler(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "bucket_seconds": 300,
        "from": params.get("from").cloned().unwrap_or_default(),
        "to": params.get("to").cloned().unwrap_or_default(),
        "series": {
            "temperature_c": [{"t": "2026-08-27T09:00:00Z", "v": 20.5}],
            "humidity_pct": [],
            "pressure_hpa": [],
            "gas_kohms": []
        }
    }))
}

async fn debug_handler(State(hits): State<Hits>, Json(_body): Json<Value>) -> Json<Value> {
    hits.debug.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "columns": ["timestamp", "rssi_dbm"],
        "rows": [["2026-08-27T10:00:00Z", -70.0]]
    }))
}

async fn images_handler() -> Json<Value> {
    Json(json!([{"src": "/img/station-1.jpg", "caption": "Mast view"}]))
}

async fn failing_handler() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn spawn_fixture(hits: Hits) -> SocketAddr {
    let app = Router::new()
        .route("/latest", get(latest_handler))
        .route("/trends", get(trends_handler))
        .route("/debug", post(debug_handler))
        .route("/station-images", get(images_handler))
        .with_state(hits);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> ApiClient {
    ApiClient::new(&format!("http://{}", addr)).unwrap()
}

#[tokio::test]
async fn test_latest_fetch() {
    let addr = spawn_fixture(Hits::default()).await;
    let service = LatestService::new(client(addr));

    let packet = service.latest().await.unwrap();
    assert!(!packet.error);
    assert_eq!(packet.sensor_data.unwrap().temperature_c, 20.0);
}

#[tokio::test]
async fn test_polling_interval_and_replacement() {
    let addr = spawn_fixture(Hits::default()).await;
    let service = LatestService::new(client(addr));
    let period = Duration::from_millis(100);

    let (tx, mut rx) = mpsc::channel(1);
    let start = Instant::now();
    let poller = tokio::spawn(async move {
        service.poll(period, tx).await;
    });

    // Each delivery fully replaces the held packet.
    let mut held = None;
    for _ in 0..3 {
        held = rx.recv().await;
    }
    let elapsed = start.elapsed();

    drop(rx);
    poller.abort();

    // Third tick fires no earlier than two full periods after start.
    assert!(
        elapsed >= 2 * period,
        "third tick after {:?}, expected at least {:?}",
        elapsed,
        2 * period
    );

    let held = held.unwrap();
    assert_eq!(held.sensor_data.unwrap().temperature_c, 22.0);
}

#[tokio::test]
async fn test_debug_guard_never_calls_server() {
    let hits = Hits::default();
    let addr = spawn_fixture(hits.clone()).await;
    let service = DebugService::new(client(addr));

    let result = service.run_query("DROP TABLE received_packet").await;
    assert!(matches!(result, Err(Error::QueryRejected(_))));
    assert_eq!(hits.debug.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_debug_select_reaches_server() {
    let hits = Hits::default();
    let addr = spawn_fixture(hits.clone()).await;
    let service = DebugService::new(client(addr));

    let response = service
        .run_query("select timestamp, rssi_dbm from received_packet")
        .await
        .unwrap();

    assert_eq!(hits.debug.load(Ordering::SeqCst), 1);
    assert_eq!(response.columns, vec!["timestamp", "rssi_dbm"]);
    assert_eq!(response.rows.len(), 1);
}

#[tokio::test]
async fn test_trends_passes_bounds_through() {
    let addr = spawn_fixture(Hits::default()).await;
    let service = TrendsService::new(client(addr));

    let response = service
        .range("2026-08-26T10:00:00.000Z", "2026-08-27T10:00:00.000Z")
        .await
        .unwrap();

    assert_eq!(response.from, "2026-08-26T10:00:00.000Z");
    assert_eq!(response.to, "2026-08-27T10:00:00.000Z");
    assert_eq!(response.bucket_seconds, Some(300));
    assert_eq!(response.series.temperature_c.len(), 1);
}

#[tokio::test]
async fn test_server_error_maps_to_status_error() {
    let app = Router::new().route("/trends", get(failing_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let service = TrendsService::new(client(addr));
    let result = service.range("a", "b").await;

    match result {
        Err(Error::Status { status, .. }) => {
            assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR)
        }
        other => panic!("expected status error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_station_images_degrade_to_empty_on_failure() {
    // No server at all: connection refused degrades to an empty gallery.
    let service = StationImageService::new(ApiClient::new("http://127.0.0.1:1").unwrap());
    assert!(service.images().await.is_empty());
}
