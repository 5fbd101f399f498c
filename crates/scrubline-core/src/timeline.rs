// crates/scrubline-core/src/timeline.rs
//
// Virtual timeline mapping: absolute playback seconds ↔ position within
// the trimmed [start, end) sub-range of a file. When a scene is a
// segment of a longer file, everything the scrubber shows is relative
// to this range, while every seek it requests is absolute.

use serde::{Deserialize, Serialize};

/// The playable sub-range of a media file, in absolute seconds.
///
/// Invariants: `start >= 0`; a well-formed range has `end > start`.
/// A degenerate range (`end <= start`) is representable — mapping
/// through it yields `None` and callers skip the update.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VirtualTimeline {
    pub start: f64,
    pub end:   f64,
}

impl VirtualTimeline {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Build from trim points. An unset or non-positive end trim means
    /// "play to the end of the file".
    pub fn from_trim(start: f64, end: Option<f64>, file_duration: f64) -> Self {
        let end = match end {
            Some(e) if e > 0.0 => e,
            _ => file_duration,
        };
        Self { start: start.max(0.0), end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Fraction of the range covered at `time`, clamped to [0, 1].
    ///
    /// Returns `None` for a degenerate range so no caller ever divides
    /// by zero.
    pub fn progress(&self, time: f64) -> Option<f64> {
        let duration = self.duration();
        if duration <= 0.0 {
            return None;
        }
        let display_time = time.clamp(self.start, self.end);
        Some((display_time - self.start) / duration)
    }

    /// Inverse of `progress`: the absolute second at `fraction` of the
    /// range. This is what a seek request carries — the scrubber never
    /// mutates playback time itself.
    pub fn time_at(&self, fraction: f64) -> f64 {
        self.start + fraction * self.duration()
    }

    /// Seconds since the virtual start, floored at zero. Used for
    /// display labels on tiles and the transport readout.
    pub fn relative(&self, time: f64) -> f64 {
        (time - self.start).max(0.0)
    }
}
