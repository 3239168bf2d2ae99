use chrono::{Local, TimeZone};

pub fn format_generation_time(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{seconds:.1}s");
    }
    let minutes = (seconds / 60.0).floor();
    let remaining = seconds % 60.0;
    format!("{minutes:.0}m {remaining:.1}s")
}

pub fn truncate_prompt(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}...")
}

/// Renders an epoch-millisecond timestamp as a local calendar date.
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(value) => value.format("%Y-%m-%d").to_string(),
        None => "unknown date".to_string(),
    }
}
