// crates/scrubline-ui/src/helpers/log.rs
//
// Unified logging for the UI crate.
//
// In release builds launched from a desktop shell there is no console
// attached, so `eprintln!` output is silently discarded. All log calls
// go to a temp file instead so they're visible regardless of launch
// mode.
//
// File: $TMPDIR/scrubline.log — append-only, created on first write per session.
//
// Usage:
//   use crate::helpers::log::slog;
//   slog("[app] manifest reload queued");
//
// Or use the macro for format string convenience:
//   scrubline_log!("[scrubber] strip rebuilt: {} tiles", n);

use std::io::Write;

/// Write `msg` to the Scrubline log file in the OS temp directory.
/// Never panics — failures are silently ignored (we're already in a fallback path).
pub fn slog(msg: &str) {
    if let Ok(mut f) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(std::env::temp_dir().join("scrubline.log"))
    {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let _ = writeln!(f, "[{}.{:03}] {msg}", ts / 1000, ts % 1000);
    }
}

/// Convenience macro — formats like `eprintln!` but routes through `slog`.
#[macro_export]
macro_rules! scrubline_log {
    ($($arg:tt)*) => {
        $crate::helpers::log::slog(&format!($($arg)*))
    };
}
