use crate::chart::{self, ChartConfig};
use crate::errors::Result;
use crate::http::ApiClient;
use crate::model::TrendsResponse;
use crate::render::{self, CHANNELS};
use crate::services::trends::{TrendRange, TrendsService};
use tracing::error;

/// View state of the trends page: the currently selected range.
#[derive(Debug)]
pub struct TrendsView {
    range: TrendRange,
}

impl TrendsView {
    pub fn new(range: TrendRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> TrendRange {
        self.range
    }

    /// Switches the range. Returns `false` when the selection equals the
    /// current one, in which case no refetch happens.
    pub fn set_range(&mut self, range: TrendRange) -> bool {
        if self.range == range {
            return false;
        }
        self.range = range;
        true
    }
}

pub async fn run(api: ApiClient, range: TrendRange) -> Result<()> {
    let service = TrendsService::new(api);
    let view = TrendsView::new(range);

    // A failed fetch renders empty series instead of aborting the page.
    let response = match service.for_range(view.range()).await {
        Ok(response) => response,
        Err(e) => {
            error!("trends fetch failed, rendering empty series: {}", e);
            TrendsResponse::empty()
        }
    };

    println!("{}", render_trends(&view, &response));
    Ok(())
}

fn render_trends(view: &TrendsView, response: &TrendsResponse) -> String {
    let mut out = String::new();
    out.push_str(&render::page_shell(&format!("Trends ({})", view.range())));
    out.push('\n');

    let gap_ms = chart::gap_threshold_ms(response.bucket_seconds);
    let cfg = ChartConfig {
        daily_ticks: view.range().daily_ticks(),
        ..ChartConfig::default()
    };

    for meta in CHANNELS {
        let points = chart::prepare_points(response.series.channel(meta.key));
        let segments = chart::split_segments(&points, gap_ms);
        out.push_str(&chart::render(meta.label, meta.unit, meta.color, &segments, cfg));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TrendPoint, TrendsSeries};

    #[test]
    fn test_set_range_same_is_noop() {
        let mut view = TrendsView::new(TrendRange::Day);
        assert!(!view.set_range(TrendRange::Day));
        assert_eq!(view.range(), TrendRange::Day);
    }

    #[test]
    fn test_set_range_switches() {
        let mut view = TrendsView::new(TrendRange::Day);
        assert!(view.set_range(TrendRange::Week));
        assert_eq!(view.range(), TrendRange::Week);
    }

    #[test]
    fn test_render_empty_response() {
        let view = TrendsView::new(TrendRange::Day);
        let out = render_trends(&view, &TrendsResponse::empty());

        assert!(out.contains("Trends (24h)"));
        // All four channels render, each falling back to the no-data state.
        assert_eq!(out.matches("(no data)").count(), 4);
    }

    #[test]
    fn test_render_with_points() {
        let view = TrendsView::new(TrendRange::Day);
        let response = TrendsResponse {
            bucket_seconds: Some(300),
            from: "2026-08-26T10:00:00Z".to_string(),
            to: "2026-08-27T10:00:00Z".to_string(),
            series: TrendsSeries {
                temperature_c: vec![
                    TrendPoint {
                        t: "2026-08-27T09:00:00Z".to_string(),
                        v: 20.0,
                    },
                    TrendPoint {
                        t: "2026-08-27T09:05:00Z".to_string(),
                        v: 21.0,
                    },
                ],
                ..TrendsSeries::default()
            },
        };

        let out = render_trends(&view, &response);
        assert!(out.contains("Temperature [°C]"));
        assert_eq!(out.matches("(no data)").count(), 3);
    }
}
