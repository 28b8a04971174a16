use serde_json::Value;

/// Display metadata for one sensor channel: label, unit and chart color
/// (ANSI 256 index).
#[derive(Debug, Clone, Copy)]
pub struct ChannelMeta {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub color: u8,
}

pub const CHANNELS: [ChannelMeta; 4] = [
    ChannelMeta {
        key: "temperature_c",
        label: "Temperature",
        unit: "°C",
        color: 215,
    },
    ChannelMeta {
        key: "humidity_pct",
        label: "Humidity",
        unit: "%",
        color: 111,
    },
    ChannelMeta {
        key: "pressure_hpa",
        label: "Pressure",
        unit: "hPa",
        color: 141,
    },
    ChannelMeta {
        key: "gas_kohms",
        label: "Gas resistance",
        unit: "kΩ",
        color: 79,
    },
];

pub fn divider(width: usize) -> String {
    "─".repeat(width)
}

/// Common page frame: title between dividers.
pub fn page_shell(title: &str) -> String {
    let width = 72;
    format!("{}\n  {}\n{}", divider(width), title, divider(width))
}

/// Renders one JSON cell for the debug table. Strings are unquoted, null
/// shows as a dash.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Plain-text table with per-column widths sized to the widest cell.
pub fn format_table(columns: &[String], rows: &[Vec<Value>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(format_value).collect())
        .collect();

    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();

    for (i, column) in columns.iter().enumerate() {
        out.push_str(&format!("{:<width$}  ", column, width = widths[i]));
    }
    out.push('\n');

    for width in &widths {
        out.push_str(&"─".repeat(*width));
        out.push_str("  ");
    }
    out.push('\n');

    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(cell.len());
            out.push_str(&format!("{:<width$}  ", cell, width = width));
        }
        out.push('\n');
    }

    out
}
