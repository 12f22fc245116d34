//! Clock readout formatting.

use chrono::NaiveTime;

const SECONDS_PER_DAY: u64 = 86_400;

/// `HH:MM:SS` for a simulated offset, wrapping every 24 h.
pub fn format_clock(offset_ms: u64) -> String {
    let secs = ((offset_ms / 1000) % SECONDS_PER_DAY) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "00:00:00".to_string())
}
