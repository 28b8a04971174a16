use crate::errors::{Error, Result};
use crate::http::ApiClient;
use crate::model::DebugResponse;
use crate::render::{self, format_table};
use crate::services::debug::DebugService;
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tracing::error;

pub const DEFAULT_QUERY: &str =
    "SELECT * FROM received_packet ORDER BY timestamp DESC LIMIT 5";

/// Debug console page: run one SQL query and render the result as a table
/// or as raw JSON.
pub async fn run(api: ApiClient, sql: Option<String>, raw: bool) -> Result<()> {
    let sql = sql.unwrap_or_else(|| DEFAULT_QUERY.to_string());
    let service = DebugService::new(api);

    match service.run_query(&sql).await {
        Ok(response) => {
            println!("{}", render_result(&response, raw, false));
        }
        Err(Error::QueryRejected(reason)) => {
            // Guard violation: nothing was sent, tell the user locally.
            println!("query not sent: {}", reason);
        }
        Err(e) => {
            error!("debug query failed: {}", e);
            println!("{}", render_result(&error_row(&e), raw, true));
        }
    }

    Ok(())
}

/// Synthetic single-row result standing in for a failed request.
fn error_row(err: &Error) -> DebugResponse {
    DebugResponse {
        columns: vec![
            "timestamp".to_string(),
            "error_type".to_string(),
            "message".to_string(),
        ],
        rows: vec![vec![
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            json!("HttpError"),
            json!(err.to_string()),
        ]],
    }
}

fn render_result(response: &DebugResponse, raw: bool, is_error: bool) -> String {
    let title = if is_error {
        "Debug console (request failed)"
    } else {
        "Debug console"
    };

    let body = if raw {
        serde_json::to_string_pretty(response).unwrap_or_default()
    } else {
        format_table(&response.columns, &response.rows)
    };

    format!("{}\n{}", render::page_shell(title), body)
}
