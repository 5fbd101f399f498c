// crates/scrubline-core/src/manifest.rs
//
// Types that flow across the channel between scrubline-sprite and
// scrubline-ui. No egui, no HTTP — just plain data.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One preview thumbnail: an absolute time interval and the region of a
/// sprite sheet that depicts it.
///
/// `x`/`y`/`w`/`h` are pixels in sheet space; `sheet_url` is the
/// resolved location of the sheet image (against the manifest's own
/// location, so relative references in the VTT work from both disk and
/// HTTP).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteCue {
    pub start:     f64,
    pub end:       f64,
    pub x:         f32,
    pub y:         f32,
    pub w:         f32,
    pub h:         f32,
    pub sheet_url: String,
}

/// A decoded sprite sheet, RGBA, ready for texture upload.
#[derive(Debug)]
pub struct SheetImage {
    pub url:    String,
    pub width:  u32,
    pub height: u32,
    pub data:   Vec<u8>, // RGBA
}

/// Results sent from the SpriteWorker background thread to the UI.
///
/// `id` is the load-request id; the UI drops results from superseded
/// requests so a slow fetch can never clobber a newer scene.
pub enum SpriteResult {
    Manifest { id: Uuid, cues: Vec<SpriteCue> },
    Sheet    { id: Uuid, image: SheetImage },
    Error    { id: Uuid, msg: String },
}
