mod telemetry;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;
use serde::Deserialize;
use std::env;
use telemetry::{
    packet_at, sensor_at, ReceivedPacket, StationImage, TrendPoint, TrendsResponse, TrendsSeries,
};
use tracing::{error, info, warn};

// Server-chosen bucket width: aim for ~288 buckets over the span.
const TARGET_BUCKETS: i64 = 288;
const MIN_BUCKET_SECONDS: i64 = 300;
const MAX_BUCKET_SECONDS: i64 = 7200;

// Fraction of buckets silently dropped so clients see real gaps.
const DROPOUT_RATE: f64 = 0.03;

#[tokio::main]
async fn main() {
    let http_addr = env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    tracing_subscriber::fmt::init();

    info!("Starting weather-station simulator");
    info!("HTTP server: {}", http_addr);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/latest", get(latest_handler))
        .route("/trends", get(trends_handler))
        .route("/debug", post(debug_handler))
        .route("/station-images", get(station_images_handler));

    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", http_addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                error!("HTTP server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down");
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn latest_handler() -> Json<ReceivedPacket> {
    let mut rng = rand::thread_rng();
    Json(packet_at(Utc::now(), &mut rng))
}

#[derive(Debug, Deserialize)]
struct TrendsParams {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

async fn trends_handler(
    Query(params): Query<TrendsParams>,
) -> Result<Json<TrendsResponse>, (StatusCode, String)> {
    if params.from >= params.to {
        return Err((
            StatusCode::BAD_REQUEST,
            "'from' must be before 'to'".to_string(),
        ));
    }

    let span_seconds = (params.to - params.from).num_seconds();
    let bucket_seconds = bucket_for_span(span_seconds);
    info!(
        "trends: {} .. {}, bucket {}s",
        params.from, params.to, bucket_seconds
    );

    let mut rng = rand::thread_rng();
    let mut series = TrendsSeries::default();
    let mut ts = params.from;

    while ts <= params.to {
        // Dropped buckets leave a hole in every channel at once.
        if rng.gen_bool(DROPOUT_RATE) {
            ts += Duration::seconds(bucket_seconds);
            continue;
        }

        let data = sensor_at(ts, &mut rng);
        let t = ts.to_rfc3339_opts(SecondsFormat::Millis, true);
        series.temperature_c.push(TrendPoint {
            t: t.clone(),
            v: data.temperature_c,
        });
        series.humidity_pct.push(TrendPoint {
            t: t.clone(),
            v: data.humidity_pct,
        });
        series.pressure_hpa.push(TrendPoint {
            t: t.clone(),
            v: data.pressure_hpa,
        });
        series.gas_kohms.push(TrendPoint {
            t,
            v: data.gas_kohms,
        });

        ts += Duration::seconds(bucket_seconds);
    }

    Ok(Json(TrendsResponse {
        bucket_seconds: bucket_seconds as u32,
        from: params.from.to_rfc3339_opts(SecondsFormat::Millis, true),
        to: params.to.to_rfc3339_opts(SecondsFormat::Millis, true),
        series,
    }))
}

fn bucket_for_span(span_seconds: i64) -> i64 {
    (span_seconds / TARGET_BUCKETS).clamp(MIN_BUCKET_SECONDS, MAX_BUCKET_SECONDS)
}

#[derive(Debug, Deserialize)]
struct DebugRequest {
    sql: String,
}

async fn debug_handler(
    Json(body): Json<DebugRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    warn!("Running public DEBUG SQL query: {}", body.sql);
    validate_sql(&body.sql)?;

    // No database behind the simulator: answer with the five most recent
    // synthetic packets, flattened to the table the real backend returns.
    let columns = vec![
        "timestamp",
        "error",
        "error_type",
        "raw_hex",
        "rssi_dbm",
        "snr_db",
        "temperature_c",
        "humidity_pct",
        "pressure_hpa",
        "gas_kohms",
    ];

    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let rows: Vec<Vec<serde_json::Value>> = (0..5i64)
        .map(|i| {
            let packet = packet_at(now - Duration::minutes(5 * i), &mut rng);
            packet_row(&packet)
        })
        .collect();

    Ok(Json(serde_json::json!({ "columns": columns, "rows": rows })))
}

fn packet_row(packet: &ReceivedPacket) -> Vec<serde_json::Value> {
    use serde_json::json;

    let mut row = vec![
        json!(packet
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true)),
        json!(packet.error),
        json!(packet.error_type),
        json!(packet.raw_hex),
        json!(packet.rssi_dbm),
        json!(packet.snr_db),
    ];

    match &packet.sensor_data {
        Some(data) => row.extend([
            json!(data.temperature_c),
            json!(data.humidity_pct),
            json!(data.pressure_hpa),
            json!(data.gas_kohms),
        ]),
        None => row.extend([json!(null), json!(null), json!(null), json!(null)]),
    }

    row
}

/// Guard chain of the real backend: lone lowercase SELECT over
/// received_packet, nothing that smells like injection.
fn validate_sql(sql: &str) -> Result<(), (StatusCode, String)> {
    let sql = sql.trim().to_lowercase();

    if !sql.starts_with("select") {
        return Err((
            StatusCode::BAD_REQUEST,
            "Only SELECT statements are allowed".to_string(),
        ));
    }

    if sql.contains("union") || sql.contains(';') || sql.contains("--") || sql.contains("/*") {
        return Err((
            StatusCode::BAD_REQUEST,
            "Potentially unsafe SQL detected".to_string(),
        ));
    }

    if !sql.contains("from received_packet") {
        return Err((
            StatusCode::FORBIDDEN,
            "Only queries on 'received_packet' are allowed".to_string(),
        ));
    }

    Ok(())
}

async fn station_images_handler() -> Json<Vec<StationImage>> {
    Json(vec![
        StationImage {
            src: "/img/station-mast.jpg".to_string(),
            caption: Some("Sensor mast above the roof line".to_string()),
        },
        StationImage {
            src: "/img/station-enclosure.jpg".to_string(),
            caption: Some("Radiation shield and enclosure".to_string()),
        },
        StationImage {
            src: "/img/station-receiver.jpg".to_string(),
            caption: None,
        },
    ])
}
