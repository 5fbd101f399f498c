// crates/scrubline-sprite/src/worker.rs
//
// SpriteWorker: owns the manifest-loading thread.
// All public API that scrubline-ui calls lives here.

use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use uuid::Uuid;

use anyhow::Result;
use scrubline_core::manifest::SpriteResult;

use crate::decode::decode_sheet;
use crate::fetch::{load_bytes, load_text};
use crate::vtt::parse_sprite_vtt;

// ── Internal types ────────────────────────────────────────────────────────────

struct LoadRequest {
    id:     Uuid,
    source: String,
}

// ── SpriteWorker ──────────────────────────────────────────────────────────────

pub struct SpriteWorker {
    /// Result channel drained by `AppContext::ingest_sprite_results`.
    pub rx: Receiver<SpriteResult>,
    req_tx: Sender<LoadRequest>,
}

impl SpriteWorker {
    pub fn new() -> Self {
        // Requests are rare (one per scene load); results burst to one
        // manifest plus a handful of sheets. 64 gives headroom for a
        // many-sheet scene without the worker ever parking on send.
        let (req_tx, req_rx) = bounded::<LoadRequest>(16);
        let (tx, rx)         = bounded::<SpriteResult>(64);

        thread::spawn(move || {
            for req in req_rx.iter() {
                // Poison-pill: a request with a nil id signals shutdown.
                if req.id == Uuid::nil() {
                    return;
                }
                if let Err(e) = load_scene(req.id, &req.source, &tx) {
                    eprintln!("[sprite] load {}: {e:#}", req.source);
                    let _ = tx.send(SpriteResult::Error { id: req.id, msg: format!("{e:#}") });
                }
            }
        });

        Self { rx, req_tx }
    }

    /// Queue a manifest load. Results arrive on `rx` tagged with `id`;
    /// the UI ignores ids it no longer cares about.
    pub fn load_manifest(&self, id: Uuid, source: String) {
        let _ = self.req_tx.send(LoadRequest { id, source });
    }

    pub fn shutdown(&self) {
        let _ = self.req_tx.send(LoadRequest { id: Uuid::nil(), source: String::new() });
    }
}

impl Default for SpriteWorker {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch + parse the manifest, then fetch + decode each distinct sheet
/// in first-reference order. The manifest goes out before any sheet so
/// the strip can lay out (with placeholder tiles) while images load.
fn load_scene(id: Uuid, source: &str, tx: &Sender<SpriteResult>) -> Result<()> {
    let text = load_text(source)?;
    let cues = parse_sprite_vtt(&text, source)?;

    let mut sheet_urls: Vec<String> = Vec::new();
    for cue in &cues {
        if !sheet_urls.contains(&cue.sheet_url) {
            sheet_urls.push(cue.sheet_url.clone());
        }
    }

    eprintln!("[sprite] {} cues, {} sheets ← {source}", cues.len(), sheet_urls.len());
    let _ = tx.send(SpriteResult::Manifest { id, cues });

    for url in sheet_urls {
        // One bad sheet leaves its tiles as placeholders; the rest of
        // the scene still loads.
        match load_bytes(&url).and_then(|bytes| decode_sheet(&url, &bytes)) {
            Ok(image) => {
                eprintln!("[sprite] sheet {}x{} ← {url}", image.width, image.height);
                let _ = tx.send(SpriteResult::Sheet { id, image });
            }
            Err(e) => {
                eprintln!("[sprite] sheet {url}: {e:#}");
                let _ = tx.send(SpriteResult::Error { id, msg: format!("{e:#}") });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn write_fixture_scene(dir: &std::path::Path) -> String {
        std::fs::create_dir_all(dir).unwrap();

        let mut png = Vec::new();
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([9, 9, 9, 255]));
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(dir.join("sheet_0.png"), &png).unwrap();

        let vtt = "WEBVTT\n\n\
                   00:00:00.000 --> 00:00:05.000\nsheet_0.png#xywh=0,0,2,2\n\n\
                   00:00:05.000 --> 00:00:10.000\nsheet_0.png#xywh=2,0,2,2\n";
        let path = dir.join("scene.vtt");
        std::fs::write(&path, vtt).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn loads_manifest_then_sheets() {
        let source = write_fixture_scene(&std::env::temp_dir().join("scrubline_worker_test"));
        let worker = SpriteWorker::new();
        let id = Uuid::new_v4();
        worker.load_manifest(id, source);

        let first = worker.rx.recv_timeout(Duration::from_secs(5)).unwrap();
        match first {
            SpriteResult::Manifest { id: got, cues } => {
                assert_eq!(got, id);
                assert_eq!(cues.len(), 2);
            }
            _ => panic!("expected the manifest first"),
        }

        let second = worker.rx.recv_timeout(Duration::from_secs(5)).unwrap();
        match second {
            SpriteResult::Sheet { image, .. } => {
                assert_eq!((image.width, image.height), (4, 2));
            }
            _ => panic!("expected the sheet after the manifest"),
        }

        worker.shutdown();
    }

    #[test]
    fn bad_source_reports_an_error() {
        let worker = SpriteWorker::new();
        let id = Uuid::new_v4();
        worker.load_manifest(id, "nope/missing.vtt".into());

        match worker.rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            SpriteResult::Error { id: got, msg } => {
                assert_eq!(got, id);
                assert!(msg.contains("missing.vtt"));
            }
            _ => panic!("expected an error result"),
        }
        worker.shutdown();
    }
}
