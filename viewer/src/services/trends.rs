use crate::errors::Result;
use crate::http::{self, ApiClient};
use crate::model::TrendsResponse;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error, info};

/// One of the three fixed trend windows the UI offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendRange {
    Day,
    Week,
    Month,
}

impl TrendRange {
    pub fn window(self) -> Duration {
        match self {
            TrendRange::Day => Duration::days(1),
            TrendRange::Week => Duration::days(7),
            TrendRange::Month => Duration::days(30),
        }
    }

    /// Daily ranges label the x axis with dates, the 24h range with times.
    pub fn daily_ticks(self) -> bool {
        !matches!(self, TrendRange::Day)
    }

    /// Query bounds for this range ending at `now`, as RFC 3339 strings.
    pub fn bounds(self, now: DateTime<Utc>) -> (String, String) {
        let from = now - self.window();
        (
            from.to_rfc3339_opts(SecondsFormat::Millis, true),
            now.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
    }
}

impl fmt::Display for TrendRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendRange::Day => "24h",
            TrendRange::Week => "7d",
            TrendRange::Month => "30d",
        };
        f.write_str(s)
    }
}

impl FromStr for TrendRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "24h" => Ok(TrendRange::Day),
            "7d" => Ok(TrendRange::Week),
            "30d" => Ok(TrendRange::Month),
            other => Err(format!("unknown range '{}', expected 24h, 7d or 30d", other)),
        }
    }
}

#[derive(Debug, Serialize)]
struct TrendsQuery<'a> {
    from: &'a str,
    to: &'a str,
}

/// Fetches bucketed sensor series for a time range.
#[derive(Debug, Clone)]
pub struct TrendsService {
    api: ApiClient,
}

impl TrendsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn range(&self, from: &str, to: &str) -> Result<TrendsResponse> {
        debug!("requesting trends from {} to {}", from, to);

        let result: Result<TrendsResponse> = self
            .api
            .get_with_query(http::TRENDS, &TrendsQuery { from, to })
            .await;

        match &result {
            Ok(res) => info!(
                "trends OK: {} temperature points, bucket {:?}s",
                res.series.temperature_c.len(),
                res.bucket_seconds
            ),
            Err(e) => error!("trends request failed: {}", e),
        }

        result
    }

    /// Convenience wrapper: bounds computed from `range` ending now.
    pub async fn for_range(&self, range: TrendRange) -> Result<TrendsResponse> {
        let (from, to) = range.bounds(Utc::now());
        self.range(&from, &to).await
    }
}
