use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw readings from the station's environmental sensor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SensorData {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub gas_kohms: f64,
}

/// One telemetry sample as received over the station's radio link.
///
/// Packets that failed decoding carry `error_type` and the raw hex payload
/// instead of sensor data. A packet is replaced wholesale on each poll tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedPacket {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub raw_hex: Option<String>,
    pub rssi_dbm: f64,
    pub snr_db: f64,
    pub sensor_data: Option<SensorData>,
}

impl SensorData {
    /// Reading by channel key, as used in series responses and display
    /// metadata.
    pub fn value(&self, key: &str) -> Option<f64> {
        match key {
            "temperature_c" => Some(self.temperature_c),
            "humidity_pct" => Some(self.humidity_pct),
            "pressure_hpa" => Some(self.pressure_hpa),
            "gas_kohms" => Some(self.gas_kohms),
            _ => None,
        }
    }
}

/// One `{t, v}` pair of a trends series, timestamp still in wire form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub t: String,
    pub v: f64,
}

/// The four sensor channels of a trends query, one array per channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendsSeries {
    #[serde(default)]
    pub temperature_c: Vec<TrendPoint>,
    #[serde(default)]
    pub humidity_pct: Vec<TrendPoint>,
    #[serde(default)]
    pub pressure_hpa: Vec<TrendPoint>,
    #[serde(default)]
    pub gas_kohms: Vec<TrendPoint>,
}

impl TrendsSeries {
    pub fn channel(&self, key: &str) -> &[TrendPoint] {
        match key {
            "temperature_c" => &self.temperature_c,
            "humidity_pct" => &self.humidity_pct,
            "pressure_hpa" => &self.pressure_hpa,
            "gas_kohms" => &self.gas_kohms,
            _ => &[],
        }
    }
}

/// Response of `GET /trends?from&to`. `bucket_seconds` is the server-chosen
/// aggregation interval for the queried range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsResponse {
    pub bucket_seconds: Option<u32>,
    pub from: String,
    pub to: String,
    pub series: TrendsSeries,
}

impl TrendsResponse {
    /// Fallback value rendered when a trends request fails.
    pub fn empty() -> Self {
        Self {
            bucket_seconds: None,
            from: String::new(),
            to: String::new(),
            series: TrendsSeries::default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DebugRequest {
    pub sql: String,
}

/// Tabular result of a debug SQL query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// One entry of the About-page station gallery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationImage {
    pub src: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_roundtrip_from_backend_shape() {
        let json = r#"{
            "timestamp": "2026-08-27T10:15:00Z",
            "error": false,
            "error_type": null,
            "raw_hex": null,
            "rssi_dbm": -71.0,
            "snr_db": 9.5,
            "sensor_data": {
                "temperature_c": 21.4,
                "humidity_pct": 54.2,
                "pressure_hpa": 1013.8,
                "gas_kohms": 112.3
            }
        }"#;

        let packet: ReceivedPacket = serde_json::from_str(json).unwrap();
        assert!(!packet.error);
        let data = packet.sensor_data.unwrap();
        assert_eq!(data.temperature_c, 21.4);
        assert_eq!(data.gas_kohms, 112.3);
    }

    #[test]
    fn test_error_packet_without_sensor_data() {
        let json = r#"{
            "timestamp": "2026-08-27T10:15:00Z",
            "error": true,
            "error_type": "CrcMismatch",
            "raw_hex": "deadbeef",
            "rssi_dbm": -103.0,
            "snr_db": -4.0,
            "sensor_data": null
        }"#;

        let packet: ReceivedPacket = serde_json::from_str(json).unwrap();
        assert!(packet.error);
        assert_eq!(packet.error_type.as_deref(), Some("CrcMismatch"));
        assert!(packet.sensor_data.is_none());
    }

    #[test]
    fn test_trends_response_missing_bucket() {
        let json = r#"{
            "bucket_seconds": null,
            "from": "2026-08-26T10:00:00Z",
            "to": "2026-08-27T10:00:00Z",
            "series": {
                "temperature_c": [{"t": "2026-08-26T10:00:00Z", "v": 20.0}],
                "humidity_pct": [],
                "pressure_hpa": [],
                "gas_kohms": []
            }
        }"#;

        let res: TrendsResponse = serde_json::from_str(json).unwrap();
        assert!(res.bucket_seconds.is_none());
        assert_eq!(res.series.temperature_c.len(), 1);
        assert!(res.series.humidity_pct.is_empty());
    }
}
