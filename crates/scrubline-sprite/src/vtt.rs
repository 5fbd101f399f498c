// crates/scrubline-sprite/src/vtt.rs
//
// WebVTT sprite manifest parsing. Media servers describe preview
// thumbnails as a VTT file whose cues map a time interval to a region
// of a sprite sheet:
//
//   WEBVTT
//
//   00:00:00.000 --> 00:00:05.000
//   scene_sprite.jpg#xywh=0,0,160,90
//
// Sheet references are usually relative to the manifest itself, so they
// are resolved against the manifest's location here — the rest of the
// pipeline only ever sees resolved locations.

use anyhow::{bail, Context, Result};
use scrubline_core::manifest::SpriteCue;

/// Parse a sprite manifest. `source` is the manifest's own path or URL,
/// used to resolve relative sheet references.
///
/// Malformed cues are skipped with a log line; a manifest that yields
/// no usable cues at all is an error.
pub fn parse_sprite_vtt(text: &str, source: &str) -> Result<Vec<SpriteCue>> {
    let mut lines = text.lines();

    let header = lines
        .find(|l| !l.trim().is_empty())
        .context("empty manifest")?;
    if !header.trim_start_matches('\u{feff}').starts_with("WEBVTT") {
        bail!("not a WebVTT file (missing WEBVTT header)");
    }

    let mut cues = Vec::new();

    while let Some(line) = lines.next() {
        let line = line.trim();
        let Some((from, to)) = line.split_once("-->") else { continue };

        let (start, end) = match (parse_timestamp(from.trim()), parse_timestamp(to.trim())) {
            (Ok(s), Ok(e)) => (s, e),
            (Err(e), _) | (_, Err(e)) => {
                eprintln!("[sprite] skipping cue with bad timing {line:?}: {e}");
                continue;
            }
        };

        // Payload is the first non-empty line after the timing line.
        let payload = lines
            .by_ref()
            .map(str::trim)
            .find(|l| !l.is_empty());
        let Some(payload) = payload else { break };

        match parse_payload(payload) {
            Ok((reference, x, y, w, h)) => cues.push(SpriteCue {
                start,
                end,
                x,
                y,
                w,
                h,
                sheet_url: resolve_sheet_ref(source, reference),
            }),
            Err(e) => eprintln!("[sprite] skipping cue payload {payload:?}: {e}"),
        }
    }

    if cues.is_empty() {
        bail!("manifest has no usable sprite cues");
    }
    Ok(cues)
}

/// `HH:MM:SS.mmm` or `MM:SS.mmm` to seconds.
fn parse_timestamp(s: &str) -> Result<f64> {
    let parts: Vec<&str> = s.split(':').collect();
    let (h, m, sec): (f64, f64, &str) = match parts.as_slice() {
        &[h, m, sec] => (h.parse().context("hours")?, m.parse().context("minutes")?, sec),
        &[m, sec]    => (0.0, m.parse().context("minutes")?, sec),
        _            => bail!("timestamp {s:?} is not HH:MM:SS.mmm or MM:SS.mmm"),
    };
    let sec: f64 = sec.parse().context("seconds")?;
    Ok(h * 3600.0 + m * 60.0 + sec)
}

/// `sheet.jpg#xywh=x,y,w,h` → (sheet reference, region).
fn parse_payload(payload: &str) -> Result<(&str, f32, f32, f32, f32)> {
    let (reference, region) = payload
        .split_once("#xywh=")
        .context("payload has no #xywh= fragment")?;
    let mut nums = region.split(',').map(|n| n.trim().parse::<f32>());
    let mut next = |name: &str| -> Result<f32> {
        nums.next()
            .with_context(|| format!("xywh missing {name}"))?
            .with_context(|| format!("xywh bad {name}"))
    };
    let (x, y, w, h) = (next("x")?, next("y")?, next("w")?, next("h")?);
    if w <= 0.0 || h <= 0.0 {
        bail!("xywh region has no area");
    }
    Ok((reference, x, y, w, h))
}

/// Resolve `reference` against the manifest location `source`.
///
/// Absolute references (scheme or leading `/`) pass through; relative
/// ones replace the last segment of the source.
fn resolve_sheet_ref(source: &str, reference: &str) -> String {
    if reference.contains("://") || reference.starts_with('/') {
        return reference.to_string();
    }
    match source.rfind(['/', '\\']) {
        Some(idx) => format!("{}/{}", &source[..idx], reference),
        None      => reference.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "\
WEBVTT

00:00:00.000 --> 00:00:05.000
sprite_0.jpg#xywh=0,0,160,90

00:00:05.000 --> 00:00:10.000
sprite_0.jpg#xywh=160,0,160,90

01:02:03.500 --> 01:02:08.500
sprite_1.jpg#xywh=0,90,160,90
";

    #[test]
    fn parses_cues_and_regions() {
        let cues = parse_sprite_vtt(MANIFEST, "media/scene_42.vtt").unwrap();
        assert_eq!(cues.len(), 3);

        assert_eq!(cues[0].start, 0.0);
        assert_eq!(cues[0].end, 5.0);
        assert_eq!((cues[1].x, cues[1].y, cues[1].w, cues[1].h), (160.0, 0.0, 160.0, 90.0));
        assert_eq!(cues[2].start, 3723.5);
    }

    #[test]
    fn resolves_sheet_refs_against_the_manifest() {
        let cues = parse_sprite_vtt(MANIFEST, "media/scene_42.vtt").unwrap();
        assert_eq!(cues[0].sheet_url, "media/sprite_0.jpg");

        let cues = parse_sprite_vtt(MANIFEST, "http://host/vtt/scene.vtt").unwrap();
        assert_eq!(cues[2].sheet_url, "http://host/vtt/sprite_1.jpg");
    }

    #[test]
    fn absolute_refs_pass_through() {
        let text = "WEBVTT\n\n00:00.000 --> 00:05.000\nhttp://cdn/sheet.jpg#xywh=0,0,10,10\n";
        let cues = parse_sprite_vtt(text, "media/scene.vtt").unwrap();
        assert_eq!(cues[0].sheet_url, "http://cdn/sheet.jpg");
    }

    #[test]
    fn short_timestamps_parse() {
        let text = "WEBVTT\n\n00:30.250 --> 01:00.000\ns.jpg#xywh=0,0,10,10\n";
        let cues = parse_sprite_vtt(text, "s.vtt").unwrap();
        assert_eq!(cues[0].start, 30.25);
        assert_eq!(cues[0].end, 60.0);
    }

    #[test]
    fn malformed_cues_are_skipped_not_fatal() {
        let text = "\
WEBVTT

garbage --> 00:00:05.000
sprite_0.jpg#xywh=0,0,160,90

00:00:05.000 --> 00:00:10.000
sprite_0.jpg#nofragment

00:00:10.000 --> 00:00:15.000
sprite_0.jpg#xywh=0,0,160,90
";
        let cues = parse_sprite_vtt(text, "s.vtt").unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start, 10.0);
    }

    #[test]
    fn missing_header_is_an_error() {
        assert!(parse_sprite_vtt("00:00.000 --> 00:05.000\ns.jpg#xywh=0,0,1,1\n", "s.vtt").is_err());
    }

    #[test]
    fn all_cues_malformed_is_an_error() {
        assert!(parse_sprite_vtt("WEBVTT\n\nnot a cue\n", "s.vtt").is_err());
    }

    #[test]
    fn zero_area_region_is_rejected() {
        let text = "WEBVTT\n\n00:00.000 --> 00:05.000\ns.jpg#xywh=0,0,0,90\n";
        assert!(parse_sprite_vtt(text, "s.vtt").is_err());
    }
}
