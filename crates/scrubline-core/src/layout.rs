// crates/scrubline-core/src/layout.rs
//
// Sprite strip layout: packs the in-range tiles of a sprite manifest
// into a contiguous left-to-right strip and places scene markers along
// it. The strip's pixel-per-second ratio falls out of sprite density —
// tiles pack by width, not by time-proportional spacing.

use crate::helpers::time::interval_label;
use crate::manifest::SpriteCue;
use crate::state::SceneMarker;
use crate::timeline::VirtualTimeline;
use uuid::Uuid;

/// One thumbnail placed on the strip.
///
/// `left` is strip-space pixels; `sheet_x`/`sheet_y` select the region
/// of the sheet image at `sheet_url`. `start`/`end` stay absolute so a
/// click on the tile can resolve back to a seekable second.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedTile {
    pub left:      f32,
    pub width:     f32,
    pub height:    f32,
    pub sheet_x:   f32,
    pub sheet_y:   f32,
    pub sheet_url: String,
    pub start:     f64,
    pub end:       f64,
    /// Interval shown on the tile, relative to the virtual start.
    pub label:     String,
}

/// A scene marker placed on the strip, time-proportionally.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedMarker {
    pub id:      Uuid,
    pub left:    f32,
    pub seconds: f64,
    pub label:   String,
}

/// The laid-out scrub strip. `width` is the sum of included tile widths;
/// `height` the tallest included tile (for viewport sizing).
#[derive(Clone, Debug, Default)]
pub struct ScrubStrip {
    pub width:   f32,
    pub height:  f32,
    pub tiles:   Vec<PlacedTile>,
    pub markers: Vec<PlacedMarker>,
}

impl ScrubStrip {
    /// Lay out `cues` and `markers` over `range`.
    ///
    /// Tiles whose interval lies entirely outside `[start, end)` are
    /// skipped from both width accumulation and the output; markers
    /// before the start or past a set end are dropped. A degenerate
    /// range or empty manifest yields an empty strip — rendering
    /// degrades to a no-op, never an error.
    pub fn build(cues: &[SpriteCue], markers: &[SceneMarker], range: VirtualTimeline) -> Self {
        let mut total_width = 0.0f32;
        let mut height = 0.0f32;
        let mut tiles = Vec::new();

        for cue in cues {
            if cue.end < range.start || cue.start > range.end {
                continue;
            }

            total_width += cue.w;
            // Position is based on cumulative width of *included* tiles.
            let left = total_width - cue.w;
            height = height.max(cue.h);

            tiles.push(PlacedTile {
                left,
                width:     cue.w,
                height:    cue.h,
                sheet_x:   cue.x,
                sheet_y:   cue.y,
                sheet_url: cue.sheet_url.clone(),
                start:     cue.start,
                end:       cue.end,
                label:     interval_label(range.relative(cue.start), range.relative(cue.end)),
            });
        }

        let duration = range.duration();
        let mut placed_markers = Vec::new();
        if duration > 0.0 && !tiles.is_empty() {
            for marker in markers {
                // Markers outside of range are dropped entirely.
                if marker.seconds < range.start || marker.seconds > range.end {
                    continue;
                }
                placed_markers.push(PlacedMarker {
                    id:      marker.id,
                    left:    total_width * ((marker.seconds - range.start) / duration) as f32,
                    seconds: marker.seconds,
                    label:   marker.label.clone(),
                });
            }
        }

        Self { width: total_width, height, tiles, markers: placed_markers }
    }

    /// The tile covering strip-space `x`, if any.
    pub fn tile_at(&self, x: f32) -> Option<&PlacedTile> {
        self.tiles.iter().find(|t| x >= t.left && x < t.left + t.width)
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(start: f64, end: f64, w: f32) -> SpriteCue {
        SpriteCue {
            start,
            end,
            x: 0.0,
            y: 0.0,
            w,
            h: 90.0,
            sheet_url: "sheet_0.jpg".into(),
        }
    }

    fn marker(seconds: f64, label: &str) -> SceneMarker {
        SceneMarker { id: Uuid::new_v4(), seconds, label: label.into() }
    }

    #[test]
    fn tiles_pack_by_cumulative_width() {
        let cues = [cue(0.0, 5.0, 10.0), cue(5.0, 10.0, 20.0), cue(10.0, 15.0, 15.0)];
        let strip = ScrubStrip::build(&cues, &[], VirtualTimeline::new(0.0, 15.0));

        assert_eq!(strip.width, 45.0);
        let lefts: Vec<f32> = strip.tiles.iter().map(|t| t.left).collect();
        assert_eq!(lefts, vec![0.0, 10.0, 30.0]);
    }

    #[test]
    fn out_of_range_tiles_are_excluded_from_width_and_list() {
        let cues = [
            cue(0.0, 5.0, 10.0),   // entirely before range
            cue(5.0, 10.0, 20.0),  // overlaps start
            cue(10.0, 15.0, 15.0), // inside
            cue(30.0, 35.0, 25.0), // entirely after range
        ];
        let strip = ScrubStrip::build(&cues, &[], VirtualTimeline::new(6.0, 20.0));

        assert_eq!(strip.tiles.len(), 2);
        assert_eq!(strip.width, 35.0);
        assert_eq!(strip.tiles[0].left, 0.0);
        assert_eq!(strip.tiles[1].left, 20.0);
    }

    #[test]
    fn boundary_touching_tiles_are_kept() {
        // end == range.start and start == range.end both survive the filter.
        let cues = [cue(0.0, 6.0, 10.0), cue(20.0, 25.0, 10.0)];
        let strip = ScrubStrip::build(&cues, &[], VirtualTimeline::new(6.0, 20.0));
        assert_eq!(strip.tiles.len(), 2);
    }

    #[test]
    fn labels_are_relative_to_virtual_start() {
        let cues = [cue(65.0, 70.0, 10.0)];
        let strip = ScrubStrip::build(&cues, &[], VirtualTimeline::new(60.0, 120.0));
        assert_eq!(strip.tiles[0].label, "0:05 - 0:10");
    }

    #[test]
    fn labels_clamp_below_virtual_start_to_zero() {
        let cues = [cue(0.0, 8.0, 10.0)];
        let strip = ScrubStrip::build(&cues, &[], VirtualTimeline::new(5.0, 60.0));
        assert_eq!(strip.tiles[0].label, "0:00 - 0:03");
    }

    #[test]
    fn markers_place_proportionally_and_filter() {
        let cues = [cue(0.0, 10.0, 50.0), cue(10.0, 20.0, 50.0)];
        let markers = [marker(2.0, "early"), marker(15.0, "late"), marker(25.0, "gone")];
        let strip = ScrubStrip::build(&cues, &markers, VirtualTimeline::new(0.0, 20.0));

        assert_eq!(strip.markers.len(), 2);
        assert_eq!(strip.markers[0].left, 10.0);  // 100 * 2/20
        assert_eq!(strip.markers[1].left, 75.0);  // 100 * 15/20
    }

    #[test]
    fn empty_inputs_degrade_to_empty_strip() {
        let strip = ScrubStrip::build(&[], &[marker(1.0, "m")], VirtualTimeline::new(0.0, 10.0));
        assert!(strip.is_empty());
        assert_eq!(strip.width, 0.0);
        assert!(strip.markers.is_empty());

        // Degenerate range: marker placement is guarded by the
        // zero-duration check even when a tile survives the filter.
        let strip = ScrubStrip::build(
            &[cue(0.0, 5.0, 10.0)],
            &[marker(1.0, "m")],
            VirtualTimeline::new(5.0, 5.0),
        );
        assert!(strip.markers.is_empty());
    }

    #[test]
    fn tile_at_finds_by_strip_x() {
        let cues = [cue(0.0, 5.0, 10.0), cue(5.0, 10.0, 20.0)];
        let strip = ScrubStrip::build(&cues, &[], VirtualTimeline::new(0.0, 10.0));

        assert_eq!(strip.tile_at(0.0).unwrap().start, 0.0);
        assert_eq!(strip.tile_at(9.9).unwrap().start, 0.0);
        assert_eq!(strip.tile_at(10.0).unwrap().start, 5.0);
        assert!(strip.tile_at(30.0).is_none());
        assert!(strip.tile_at(-1.0).is_none());
    }
}
