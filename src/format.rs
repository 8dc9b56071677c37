//! Human-readable formatting for HUD labels

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with one decimal, stepping by 1024
///
/// ```
/// assert_eq!(jarvis::format::format_bytes(1536), "1.5 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in BYTE_UNITS {
        if value < 1024.0 {
            return format!("{:.1} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1} PB", value)
}

/// Format a transfer rate in bytes per second
pub fn format_speed(bytes_per_sec: f64) -> String {
    let rate = bytes_per_sec.max(0.0);
    if rate < 1024.0 {
        format!("{:.0} B/s", rate)
    } else if rate < 1024.0 * 1024.0 {
        format!("{:.1} KB/s", rate / 1024.0)
    } else {
        format!("{:.1} MB/s", rate / (1024.0 * 1024.0))
    }
}

pub fn format_percent(percent: f32) -> String {
    format!("{:.1}%", percent)
}

/// Truncate to at most `max` characters (not bytes)
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0.0 B");
        assert_eq!(format_bytes(500), "500.0 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1024 * 1024 * 3 / 2), "1.5 MB");
        assert_eq!(format_bytes(16 * 1024 * 1024 * 1024), "16.0 GB");
        assert_eq!(format_bytes(1u64 << 50), "1.0 PB");
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(0.0), "0 B/s");
        assert_eq!(format_speed(512.4), "512 B/s");
        assert_eq!(format_speed(2048.0), "2.0 KB/s");
        assert_eq!(format_speed(5.0 * 1024.0 * 1024.0), "5.0 MB/s");
        assert_eq!(format_speed(-10.0), "0 B/s");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(42.0), "42.0%");
        assert_eq!(format_percent(99.96), "100.0%");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("firefox-bin", 10), "firefox-bi");
        assert_eq!(truncate_chars("sh", 10), "sh");
        assert_eq!(truncate_chars("ñandú-process", 5), "ñandú");
    }
}
