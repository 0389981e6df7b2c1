//! Human-facing rendering of listing fields

use chrono::{Local, TimeZone};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count using binary unit steps, one decimal place.
///
/// Scaling stops at TB; larger values keep that unit.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

const RWX: [&str; 8] = ["---", "--x", "-w-", "-wx", "r--", "r-x", "rw-", "rwx"];

/// Render a Unix permission mode as the 10-character `drwxr-xr-x` form
pub fn format_permissions(mode: u32) -> String {
    let mut rendered = String::with_capacity(10);
    rendered.push(if mode & 0o40000 != 0 { 'd' } else { '-' });
    for shift in [6, 3, 0] {
        rendered.push_str(RWX[((mode >> shift) & 0o7) as usize]);
    }
    rendered
}

/// Render a Unix timestamp as `YYYY-MM-DD HH:MM` in local time.
///
/// Epoch zero and absent timestamps render as the empty string; servers
/// that report no mtime commonly send zero.
pub fn format_mtime(mtime: Option<u64>) -> String {
    let Some(secs) = mtime.filter(|&s| s != 0) else {
        return String::new();
    };
    match Local.timestamp_opt(secs as i64, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => String::new(),
    }
}
