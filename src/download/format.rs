use std::time::Duration;

const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];

/// Human-readable byte size using 1024-based units.
///
/// Bytes render as an integer; larger units with two decimals. Values of
/// 1024 PB and above stay in PB.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64;
    for unit in UNITS {
        size /= 1024.0;
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
    }
    format!("{:.2} PB", size)
}

/// Throughput in MiB/s, labelled "MB/s".
pub fn format_throughput(bytes_per_sec: f64) -> String {
    format!("{:.2} MB/s", bytes_per_sec / (1024.0 * 1024.0))
}

pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {:02}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
