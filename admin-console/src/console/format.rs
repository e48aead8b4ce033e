use chrono::{DateTime, NaiveDateTime};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        "0 KB".to_string()
    } else if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

/// Render a backend timestamp as `YYYY-MM-DD HH:MM:SS`.
///
/// The backend emits naive ISO-8601 (`2024-05-01T09:30:00.123456`) or
/// RFC 3339; anything else is returned untouched.
pub fn format_timestamp(value: &str) -> String {
    const OUT: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed.format(OUT).to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format(OUT).to_string();
    }
    value.to_string()
}
