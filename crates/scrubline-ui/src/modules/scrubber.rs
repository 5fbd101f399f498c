// crates/scrubline-ui/src/modules/scrubber.rs
//
// The scrub strip: sprite tiles packed along a draggable slider, scene
// marker chips above them, a fixed center playhead line, and paging
// buttons on both flanks.
//
// All position/drag/sync logic lives in scrubline_core::scrub — this
// module translates egui pointer state into model calls and paints
// whatever the model says is displayed.

use super::PlayerModule;
use crate::context::AppContext;
use crate::helpers::format::fit_label;
use crate::theme::{
    ACCENT, DARK_BG_0, DARK_BG_2, DARK_BORDER, DARK_TEXT, DARK_TEXT_DIM, MARKER_BG, MARKER_HOVER,
    STRIP_EMPTY,
};
use egui::{
    Align2, Color32, CornerRadius, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui,
    Vec2,
};
use scrubline_core::commands::PlayerCommand;
use scrubline_core::scrub::{ClickTarget, ScrubberModel};
use scrubline_core::state::SceneState;
use scrubline_core::timeline::VirtualTimeline;

// ── Strip layout constants ───────────────────────────────────────────────────
pub const SCRUBBER_HEIGHT: f32 = 140.0;
const STEP_BTN_W:    f32 = 32.0;
const MARKER_ROW_H:  f32 = 20.0;
/// Tiles start below the marker row plus a small gap.
const TILE_TOP:      f32 = 30.0;
const INDICATOR_H:   f32 = 24.0;
const CENTER_LINE_H: f32 = 34.0;
/// Pixel budget for a marker chip label.
const MARKER_LABEL_PX: f32 = 110.0;

pub struct ScrubberModule {
    model: ScrubberModel,
    /// True between a press that landed on the strip and its release.
    pointer_active:   bool,
    /// Last viewport-space pointer x seen during the active session —
    /// the release fallback when the pointer position is gone (e.g. the
    /// button came up outside the window).
    last_pointer_x:   f32,
    last_viewport_w:  f32,
    last_strip_w:     f32,
    /// Time last handed to the model; NaN forces a re-sync.
    last_synced_time: f64,
    /// Marker chip screen rects from the previous paint, with each
    /// chip's strip-space left edge. Used for click hit tests.
    marker_rects: Vec<(Rect, f32)>,
}

impl ScrubberModule {
    pub fn new() -> Self {
        Self {
            model:            ScrubberModel::new(VirtualTimeline::new(0.0, 0.0)),
            pointer_active:   false,
            last_pointer_x:   0.0,
            last_viewport_w:  0.0,
            last_strip_w:     0.0,
            last_synced_time: f64::NAN,
            marker_rects:     Vec::new(),
        }
    }

    /// What a sub-tolerance click at `pos` landed on, markers first
    /// (they are drawn on top of the tiles).
    fn hit_test(&self, pos: Pos2, viewport: Rect, ctx: &AppContext) -> Option<ClickTarget> {
        for (rect, left) in &self.marker_rects {
            if rect.contains(pos) {
                return Some(ClickTarget::Marker { left: *left });
            }
        }

        let strip_x = (pos.x - viewport.left()) - self.model.displayed();
        let tile = ctx.strip.tile_at(strip_x)?;
        let tile_top = viewport.top() + TILE_TOP;
        if pos.y < tile_top || pos.y > tile_top + tile.height {
            return None;
        }
        Some(ClickTarget::Tile { left: tile.left, offset_x: strip_x - tile.left })
    }
}

impl PlayerModule for ScrubberModule {
    fn name(&self) -> &str { "Scrubber" }

    fn ui(&mut self, ui: &mut Ui, state: &SceneState, ctx: &mut AppContext, cmd: &mut Vec<PlayerCommand>) {
        ui.horizontal(|ui| {
            let spacing = ui.spacing().item_spacing.x;

            // ── Back page button ─────────────────────────────────────────────
            if ui.add_sized([STEP_BTN_W, SCRUBBER_HEIGHT], egui::Button::new("⏴")).clicked() {
                self.model.step_back(cmd);
            }

            // ── Strip viewport ───────────────────────────────────────────────
            let avail = (ui.available_width() - STEP_BTN_W - spacing).max(0.0);
            let (viewport, response) =
                ui.allocate_exact_size(Vec2::new(avail, SCRUBBER_HEIGHT), Sense::click_and_drag());

            // Geometry feeds. A viewport resize forgets the sync time so
            // the next position update snaps instead of gliding.
            self.model.set_timeline(state.timeline());
            if (ctx.strip.width - self.last_strip_w).abs() > f32::EPSILON {
                self.last_strip_w = ctx.strip.width;
                self.model.set_strip_width(ctx.strip.width);
                self.last_synced_time = f64::NAN;
            }
            if (viewport.width() - self.last_viewport_w).abs() > 0.5 {
                self.last_viewport_w = viewport.width();
                self.model.set_viewport_width(viewport.width());
                self.last_synced_time = f64::NAN;
            }

            // Reflect externally driven time — only when it changed, so
            // drag positioning is never fought by a stale re-sync.
            // (NaN != NaN, so a forced re-sync always fires.)
            #[allow(clippy::float_cmp)]
            if state.current_time != self.last_synced_time {
                self.model.sync_time(state.current_time);
                self.last_synced_time = state.current_time;
            }

            // ── Pointer input ────────────────────────────────────────────────
            let (primary_pressed, primary_down, primary_released, latest_pos, pointer_delta) =
                ui.input(|i| {
                    (
                        i.pointer.primary_pressed(),
                        i.pointer.primary_down(),
                        i.pointer.primary_released(),
                        i.pointer.latest_pos(),
                        i.pointer.delta(),
                    )
                });

            if primary_pressed {
                if let Some(pos) = latest_pos {
                    if viewport.contains(pos) {
                        self.last_pointer_x = pos.x - viewport.left();
                        self.model.pointer_down(self.last_pointer_x, true);
                        self.pointer_active = true;
                    }
                }
            }
            if self.pointer_active && primary_down && pointer_delta != Vec2::ZERO {
                if let Some(pos) = latest_pos {
                    self.last_pointer_x = pos.x - viewport.left();
                    self.model.pointer_move(self.last_pointer_x, cmd);
                }
            }
            if self.pointer_active && primary_released {
                let target = latest_pos.and_then(|pos| self.hit_test(pos, viewport, ctx));
                let x = latest_pos
                    .map(|pos| pos.x - viewport.left())
                    .unwrap_or(self.last_pointer_x);
                self.model.pointer_up(x, target, cmd);
                self.pointer_active = false;
            }

            response.on_hover_cursor(if self.model.is_dragging() {
                CursorIcon::Grabbing
            } else {
                CursorIcon::Grab
            });

            // ── Paint ────────────────────────────────────────────────────────
            let dt = ui.input(|i| i.stable_dt);
            let displayed = self.model.animate(dt);
            if self.model.is_animating() {
                ui.ctx().request_repaint();
            }

            let painter = ui.painter_at(viewport);
            painter.rect_filled(viewport, 4.0, DARK_BG_0);

            if ctx.strip.is_empty() {
                painter.text(
                    viewport.center(),
                    Align2::CENTER_CENTER,
                    "No sprite manifest loaded — open a .vtt below",
                    FontId::proportional(12.0),
                    DARK_TEXT_DIM,
                );
            } else {
                let origin_x = viewport.left() + displayed;

                // Marker row background.
                painter.rect_filled(
                    Rect::from_min_size(viewport.min, Vec2::new(viewport.width(), MARKER_ROW_H)),
                    0.0,
                    DARK_BG_2,
                );

                // Progress indicator: a fill growing with the playhead
                // fraction, anchored to the viewport (not the strip).
                let indicator_w = self.model.indicator() as f32 * viewport.width();
                painter.rect_filled(
                    Rect::from_min_size(viewport.min, Vec2::new(indicator_w, INDICATOR_H)),
                    0.0,
                    ACCENT.gamma_multiply(0.25),
                );

                // Tiles.
                for tile in &ctx.strip.tiles {
                    let rect = Rect::from_min_size(
                        Pos2::new(origin_x + tile.left, viewport.top() + TILE_TOP),
                        Vec2::new(tile.width, tile.height),
                    );
                    if !rect.intersects(viewport) {
                        continue;
                    }

                    match ctx.sheets.get(&tile.sheet_url) {
                        Some(sheet) => {
                            let (sw, sh) = (sheet.width as f32, sheet.height as f32);
                            let uv = Rect::from_min_max(
                                Pos2::new(tile.sheet_x / sw, tile.sheet_y / sh),
                                Pos2::new(
                                    (tile.sheet_x + tile.width) / sw,
                                    (tile.sheet_y + tile.height) / sh,
                                ),
                            );
                            painter.image(sheet.texture.id(), rect, uv, Color32::WHITE);
                        }
                        None => {
                            // Sheet still loading (or failed): placeholder tile.
                            painter.rect_filled(rect, 2.0, STRIP_EMPTY);
                            painter.rect_stroke(
                                rect,
                                2.0,
                                Stroke::new(1.0, DARK_BORDER),
                                StrokeKind::Inside,
                            );
                        }
                    }

                    painter.text(
                        rect.center_bottom() - Vec2::new(0.0, 2.0),
                        Align2::CENTER_BOTTOM,
                        &tile.label,
                        FontId::proportional(10.0),
                        DARK_TEXT,
                    );
                }

                // Marker chips, and this frame's hit-test rects.
                self.marker_rects.clear();
                let hover = latest_pos;
                for marker in &ctx.strip.markers {
                    let label = fit_label(&marker.label, MARKER_LABEL_PX);
                    let chip_w = label.chars().count() as f32 * 6.0 + 12.0;
                    let rect = Rect::from_center_size(
                        Pos2::new(origin_x + marker.left, viewport.top() + MARKER_ROW_H / 2.0),
                        Vec2::new(chip_w, MARKER_ROW_H),
                    );
                    self.marker_rects.push((rect, marker.left));
                    if !rect.intersects(viewport) {
                        continue;
                    }

                    let hovered = hover.is_some_and(|p| rect.contains(p));
                    painter.rect_filled(
                        rect,
                        CornerRadius { nw: 4, ne: 4, sw: 0, se: 0 },
                        if hovered { MARKER_HOVER } else { MARKER_BG.gamma_multiply(0.9) },
                    );
                    painter.text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        &label,
                        FontId::proportional(10.0),
                        Color32::WHITE,
                    );
                }

                // Fixed playhead line under the viewport center.
                let cx = viewport.center().x;
                painter.line_segment(
                    [Pos2::new(cx, viewport.top()), Pos2::new(cx, viewport.top() + CENTER_LINE_H)],
                    Stroke::new(2.0, ACCENT),
                );
            }

            // ── Forward page button ──────────────────────────────────────────
            if ui.add_sized([STEP_BTN_W, SCRUBBER_HEIGHT], egui::Button::new("⏵")).clicked() {
                self.model.step_forward(cmd);
            }
        });
    }
}
