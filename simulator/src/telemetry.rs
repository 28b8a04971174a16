use chrono::{DateTime, Timelike, Utc};
use rand::Rng;
use serde::Serialize;
use std::f64::consts::{PI, TAU};

#[derive(Debug, Clone, Serialize)]
pub struct SensorData {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub gas_kohms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceivedPacket {
    pub timestamp: DateTime<Utc>,
    pub error: bool,
    pub error_type: Option<String>,
    pub raw_hex: Option<String>,
    pub rssi_dbm: f64,
    pub snr_db: f64,
    pub sensor_data: Option<SensorData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub t: String,
    pub v: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TrendsSeries {
    pub temperature_c: Vec<TrendPoint>,
    pub humidity_pct: Vec<TrendPoint>,
    pub pressure_hpa: Vec<TrendPoint>,
    pub gas_kohms: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendsResponse {
    pub bucket_seconds: u32,
    pub from: String,
    pub to: String,
    pub series: TrendsSeries,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationImage {
    pub src: String,
    pub caption: Option<String>,
}

/// Synthetic readings for a point in time: diurnal sine for temperature,
/// humidity and gas, a slow multi-day wave for pressure, noise on top.
pub fn sensor_at(ts: DateTime<Utc>, rng: &mut impl Rng) -> SensorData {
    let day_frac = f64::from(ts.time().num_seconds_from_midnight()) / 86_400.0;
    // Trough around 04:30, peak mid-afternoon.
    let diurnal = (day_frac * TAU - PI * 0.75).sin();
    let pressure_wave = ((ts.timestamp() as f64) / (3.5 * 86_400.0) * TAU).sin();

    SensorData {
        temperature_c: 18.0 + 6.0 * diurnal + rng.gen_range(-0.4..0.4),
        humidity_pct: (62.0 - 18.0 * diurnal + rng.gen_range(-2.0..2.0)).clamp(5.0, 100.0),
        pressure_hpa: 1013.0 + 5.0 * pressure_wave + rng.gen_range(-0.3..0.3),
        gas_kohms: (95.0 + 25.0 * diurnal + rng.gen_range(-4.0..4.0)).max(1.0),
    }
}

/// A full packet with radio metrics; a small fraction fails decoding and
/// carries the raw payload instead of readings.
pub fn packet_at(ts: DateTime<Utc>, rng: &mut impl Rng) -> ReceivedPacket {
    let rssi_dbm = rng.gen_range(-105.0..-55.0_f64).round();
    let snr_db = (rng.gen_range(-6.0..12.0_f64) * 10.0).round() / 10.0;

    if rng.gen_bool(0.05) {
        let raw: String = (0..8).map(|_| format!("{:02x}", rng.gen::<u8>())).collect();
        return ReceivedPacket {
            timestamp: ts,
            error: true,
            error_type: Some("CrcMismatch".to_string()),
            raw_hex: Some(raw),
            rssi_dbm,
            snr_db,
            sensor_data: None,
        };
    }

    ReceivedPacket {
        timestamp: ts,
        error: false,
        error_type: None,
        raw_hex: None,
        rssi_dbm,
        snr_db,
        sensor_data: Some(sensor_at(ts, rng)),
    }
}
