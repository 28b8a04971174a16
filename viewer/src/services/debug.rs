use crate::errors::{Error, Result};
use crate::http::{self, ApiClient};
use crate::model::{DebugRequest, DebugResponse};
use std::time::Instant;
use tracing::{error, info};

/// Client-side allow-list: only statements lexically starting with `select`
/// are sent to the server. A superficial guard, not a SQL safety mechanism;
/// the server applies its own checks.
pub fn is_select(sql: &str) -> bool {
    sql.trim().to_lowercase().starts_with("select")
}

/// Runs raw SQL against the backend's debug endpoint.
#[derive(Debug, Clone)]
pub struct DebugService {
    api: ApiClient,
}

impl DebugService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Rejects non-SELECT input without issuing any HTTP call.
    pub async fn run_query(&self, sql: &str) -> Result<DebugResponse> {
        if !is_select(sql) {
            return Err(Error::QueryRejected(
                "only SELECT statements are allowed".to_string(),
            ));
        }

        let started = Instant::now();
        info!("run_query: starting");

        let result: Result<DebugResponse> = self
            .api
            .post(
                http::DEBUG,
                &DebugRequest {
                    sql: sql.to_string(),
                },
            )
            .await;

        match &result {
            Ok(res) => info!("run_query OK: {} rows", res.rows.len()),
            Err(e) => error!("run_query failed: {}", e),
        }

        info!(
            "run_query finished in {:.2} ms",
            started.elapsed().as_secs_f64() * 1000.0
        );

        result
    }
}
