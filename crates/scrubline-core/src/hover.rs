// crates/scrubline-core/src/hover.rs
//
// Hover-preview mapping for the transport progress bar: a fixed-width
// bar where pointer x selects a sprite index directly, plus the
// scale-to-fit factor for the popup thumbnail.

/// Sprite index under pointer `x` in a bar of `width` px over `total`
/// sprites: `round((x / width) * (total - 1))`, clamped to
/// `[0, total)`. `None` when there is nothing to select.
pub fn sprite_index_at(x: f32, width: f32, total: usize) -> Option<usize> {
    if total == 0 || width <= 0.0 {
        return None;
    }
    let i = ((x / width) * (total - 1) as f32).round() as i64;
    Some(i.clamp(0, total as i64 - 1) as usize)
}

/// Scale factor that fits `dim` (w, h) into `bounds` (w, h).
///
/// Landscape sprites use the max ratio (cover), portrait the min
/// (contain) — consistent with how the preview popup crops.
pub fn scale_to_fit(dim: (f32, f32), bounds: (f32, f32)) -> f32 {
    let rw = bounds.0 / dim.0;
    let rh = bounds.1 / dim.1;
    if dim.0 > dim.1 {
        rw.max(rh)
    } else {
        rw.min(rh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_spans_the_bar() {
        assert_eq!(sprite_index_at(0.0, 100.0, 81),   Some(0));
        assert_eq!(sprite_index_at(100.0, 100.0, 81), Some(80));
        assert_eq!(sprite_index_at(50.0, 100.0, 81),  Some(40));
    }

    #[test]
    fn index_clamps_outside_the_bar() {
        assert_eq!(sprite_index_at(-10.0, 100.0, 10), Some(0));
        assert_eq!(sprite_index_at(140.0, 100.0, 10), Some(9));
    }

    #[test]
    fn no_sprites_or_width_yields_none() {
        assert_eq!(sprite_index_at(50.0, 100.0, 0), None);
        assert_eq!(sprite_index_at(50.0, 0.0, 10),  None);
    }

    #[test]
    fn single_sprite_is_always_selected() {
        assert_eq!(sprite_index_at(0.0, 100.0, 1),  Some(0));
        assert_eq!(sprite_index_at(99.0, 100.0, 1), Some(0));
    }

    #[test]
    fn landscape_covers_portrait_contains() {
        // Landscape 160x90 into a 100x100 box: max(0.625, 1.111) = 1.111…
        let s = scale_to_fit((160.0, 90.0), (100.0, 100.0));
        assert!((s - 100.0 / 90.0).abs() < 1e-6);
        // Portrait 90x160: min(1.111, 0.625) = 0.625
        let s = scale_to_fit((90.0, 160.0), (100.0, 100.0));
        assert!((s - 100.0 / 160.0).abs() < 1e-6);
    }
}
