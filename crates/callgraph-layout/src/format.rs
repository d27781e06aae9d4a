//! Human readable metric values, as shown in edge labels and tooltips

use serde::{Deserialize, Serialize};

/// Unit of a metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    Percent,
    Seconds,
    Bytes,
    BytesPerSecond,
    Rate,
    Number,
}

const KIB: f64 = 1024.0;
const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;

pub fn format_value(value: f64, value_type: ValueType) -> String {
    match value_type {
        ValueType::Percent => format!("{:.2}%", value * 100.0),
        ValueType::Seconds => format_seconds(value),
        ValueType::Bytes => format_bytes(value),
        ValueType::BytesPerSecond => format!("{}/s", format_bytes(value)),
        ValueType::Rate => format!("{value:.2}/s"),
        ValueType::Number => format!("{value:.2}"),
    }
}

pub fn format_bytes(value: f64) -> String {
    if value < KIB {
        format!("{value}B")
    } else if value < KIB.powi(2) {
        format!("{:.2}KB", value / KIB)
    } else if value < KIB.powi(3) {
        format!("{:.2}MB", value / KIB.powi(2))
    } else if value < KIB.powi(4) {
        format!("{:.2}GB", value / KIB.powi(3))
    } else {
        format!("{:.2}TB", value / KIB.powi(4))
    }
}

/// Format a duration in seconds with the largest unit that keeps it above one
pub fn format_seconds(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }

    if value >= DAY {
        format!("{:.1}d", value / DAY)
    } else if value >= HOUR {
        format!("{:.1}h", value / HOUR)
    } else if value >= MINUTE {
        format!("{:.1}m", value / MINUTE)
    } else if value >= 1.0 {
        format!("{value:.1}s")
    } else if value >= 0.001 {
        format!("{:.0}ms", value * 1e3)
    } else {
        format!("{:.0}µs", value * 1e6)
    }
}

/// Format a change with an explicit sign
pub fn format_change(value: f64, value_type: ValueType) -> String {
    let sign = if value < 0.0 { '-' } else { '+' };
    format!("{sign}{}", format_value(value.abs(), value_type))
}

/// Edge label text: current latency followed by its change, e.g. `45ms (+3ms)`
pub fn format_latency_label(latency: f64, increase: f64) -> String {
    if latency.is_nan() {
        return "NaN".to_string();
    }
    format!(
        "{} ({})",
        format_seconds(latency),
        format_change(increase, ValueType::Seconds)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn seconds_pick_a_unit() {
        assert_eq!(format_seconds(0.045), "45ms");
        assert_eq!(format_seconds(0.000012), "12µs");
        assert_eq!(format_seconds(2.5), "2.5s");
        assert_eq!(format_seconds(90.0), "1.5m");
        assert_eq!(format_seconds(2.0 * HOUR), "2.0h");
        assert_eq!(format_seconds(3.0 * DAY), "3.0d");
        assert_eq!(format_seconds(f64::NAN), "NaN");
    }

    #[test]
    fn bytes_pick_a_unit() {
        assert_eq!(format_bytes(512.0), "512B");
        assert_eq!(format_bytes(1536.0), "1.50KB");
        assert_eq!(format_bytes(3.0 * KIB * KIB), "3.00MB");
        assert_eq!(format_bytes(KIB.powi(3)), "1.00GB");
        assert_eq!(format_bytes(2.0 * KIB.powi(4)), "2.00TB");
    }

    #[test]
    fn values_and_changes() {
        assert_eq!(format_value(0.0123, ValueType::Percent), "1.23%");
        assert_eq!(format_value(2048.0, ValueType::BytesPerSecond), "2.00KB/s");
        assert_eq!(format_value(3.14159, ValueType::Rate), "3.14/s");
        assert_eq!(format_change(-0.005, ValueType::Seconds), "-5ms");
        assert_eq!(format_change(0.0, ValueType::Number), "+0.00");
    }

    #[test]
    fn latency_label() {
        assert_eq!(format_latency_label(0.045, 0.003), "45ms (+3ms)");
        assert_eq!(format_latency_label(1.5, -0.25), "1.5s (-250ms)");
    }
}
