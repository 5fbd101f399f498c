// crates/scrubline-core/src/helpers/time.rs
//
// Shared time-formatting utilities used by tile labels, marker rows and
// the transport readout.

/// Format a duration in seconds as a timestamp, dropping the hour part
/// when it is zero.
///
/// | Range    | Format    | Example   |
/// |----------|-----------|-----------|
/// | ≥ 3600 s | `H:MM:SS` | `1:04:35` |
/// | < 3600 s | `M:SS`    | `3:07`    |
///
/// ```
/// use scrubline_core::helpers::time::seconds_to_timestamp;
/// assert_eq!(seconds_to_timestamp(0.0),    "0:00");
/// assert_eq!(seconds_to_timestamp(65.4),   "1:05");
/// assert_eq!(seconds_to_timestamp(3875.0), "1:04:35");
/// ```
pub fn seconds_to_timestamp(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    if total >= 3600 {
        format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
    } else {
        format!("{}:{:02}", total / 60, total % 60)
    }
}

/// Label for a tile's time interval, both ends relative to the virtual
/// start.
///
/// ```
/// use scrubline_core::helpers::time::interval_label;
/// assert_eq!(interval_label(5.0, 10.0), "0:05 - 0:10");
/// ```
pub fn interval_label(rel_start: f64, rel_end: f64) -> String {
    format!(
        "{} - {}",
        seconds_to_timestamp(rel_start),
        seconds_to_timestamp(rel_end),
    )
}
