// crates/scrubline-ui/src/context.rs
//
// AppContext owns all runtime handles that are NOT part of the
// serializable scene state. ScrublineApp holds one of these plus a
// SceneState and the module list — nothing else.
//
// Layout:
//   AppContext
//     ├── sprite_worker — the manifest/sheet loading thread + channels
//     ├── cues          — the active manifest, as parsed
//     ├── sheets        — GPU-resident sheet textures keyed by resolved URL
//     └── strip         — the laid-out scrub strip for the current trim range

use std::collections::HashMap;

use eframe::egui;
use scrubline_core::layout::ScrubStrip;
use scrubline_core::manifest::{SpriteCue, SpriteResult};
use scrubline_core::state::SceneState;
use scrubline_core::timeline::VirtualTimeline;
use scrubline_sprite::SpriteWorker;
use uuid::Uuid;

/// A decoded sheet on the GPU, with its pixel size kept for uv math.
pub struct SheetTexture {
    pub texture: egui::TextureHandle,
    pub width:   u32,
    pub height:  u32,
}

pub struct AppContext {
    pub sprite_worker: SpriteWorker,
    /// Cues of the active manifest, in source order.
    pub cues:   Vec<SpriteCue>,
    /// Sheet textures keyed by resolved sheet URL. Tiles whose sheet has
    /// not arrived yet render as placeholders.
    pub sheets: HashMap<String, SheetTexture>,
    /// The laid-out strip for (cues, trim range). Rebuilt by
    /// `ensure_strip` whenever either changes.
    pub strip:  ScrubStrip,

    /// Id of the in-flight manifest load. Results tagged with any other
    /// id are from a superseded request and are dropped.
    pending_load: Option<Uuid>,
    /// Range the current strip was built for.
    strip_range:  Option<VirtualTimeline>,
    strip_dirty:  bool,
}

impl AppContext {
    pub fn new(sprite_worker: SpriteWorker) -> Self {
        Self {
            sprite_worker,
            cues:         Vec::new(),
            sheets:       HashMap::new(),
            strip:        ScrubStrip::default(),
            pending_load: None,
            strip_range:  None,
            strip_dirty:  false,
        }
    }

    /// Forget the previous scene and mark `id` as the load to accept.
    pub fn begin_load(&mut self, id: Uuid) {
        self.pending_load = Some(id);
        self.cues.clear();
        self.sheets.clear();
        self.strip = ScrubStrip::default();
        self.strip_range = None;
    }

    /// Dispatch all queued SpriteWorker results into caches / state.
    pub fn ingest_sprite_results(&mut self, state: &mut SceneState, ctx: &egui::Context) {
        while let Ok(result) = self.sprite_worker.rx.try_recv() {
            match result {
                SpriteResult::Manifest { id, cues } => {
                    if self.pending_load != Some(id) {
                        continue; // superseded load
                    }
                    // A scene with no known duration takes it from the
                    // manifest: the last cue's end is the file's end.
                    if state.duration <= 0.0 {
                        if let Some(last) = cues.last() {
                            state.duration = last.end;
                        }
                    }
                    state.scene_status = Some(format!("{} sprites loaded", cues.len()));
                    crate::scrubline_log!("[context] manifest ready: {} cues", cues.len());
                    self.cues = cues;
                    self.strip_dirty = true;
                }
                SpriteResult::Sheet { id, image } => {
                    if self.pending_load != Some(id) {
                        continue;
                    }
                    let texture = ctx.load_texture(
                        image.url.clone(),
                        egui::ColorImage::from_rgba_unmultiplied(
                            [image.width as usize, image.height as usize],
                            &image.data,
                        ),
                        egui::TextureOptions::LINEAR,
                    );
                    self.sheets.insert(image.url, SheetTexture {
                        texture,
                        width:  image.width,
                        height: image.height,
                    });
                }
                SpriteResult::Error { id, msg } => {
                    if self.pending_load != Some(id) {
                        continue;
                    }
                    crate::scrubline_log!("[context] sprite load error: {msg}");
                    state.scene_status = Some(format!("load failed: {msg}"));
                }
            }
        }
    }

    /// Rebuild the strip when the manifest or the trim range changed.
    /// Idempotent: recomputing with unchanged inputs is a no-op.
    pub fn ensure_strip(&mut self, state: &SceneState) {
        let range = state.timeline();
        if !self.strip_dirty && self.strip_range == Some(range) {
            return;
        }
        self.strip = ScrubStrip::build(&self.cues, &state.markers, range);
        self.strip_range = Some(range);
        self.strip_dirty = false;
        crate::scrubline_log!(
            "[context] strip rebuilt: {} tiles, {} markers, {:.0}px",
            self.strip.tiles.len(),
            self.strip.markers.len(),
            self.strip.width,
        );
    }

    /// Force a relayout on the next `ensure_strip` (markers changed).
    pub fn invalidate_strip(&mut self) {
        self.strip_dirty = true;
    }
}
