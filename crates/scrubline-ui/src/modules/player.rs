// crates/scrubline-ui/src/modules/player.rs
//
// The segment player surface: a monitor canvas showing the sprite frame
// under the playhead, a transport bar, a hover-preview progress bar and
// the scene settings row (trim, duration, markers, manifest source).
//
// Playback itself is the host clock in app.rs — this module only reads
// state and emits commands.

use super::PlayerModule;
use crate::context::AppContext;
use crate::theme::{ACCENT, DARK_BG_2, DARK_BG_3, DARK_BORDER, DARK_TEXT_DIM};
use egui::{
    Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, StrokeKind, Ui, Vec2,
};
use scrubline_core::commands::PlayerCommand;
use scrubline_core::helpers::time::seconds_to_timestamp;
use scrubline_core::hover::{scale_to_fit, sprite_index_at};
use scrubline_core::layout::PlacedTile;
use scrubline_core::state::SceneState;

// ── Transport bar layout constants ───────────────────────────────────────────
const BAR_H:        f32 = 40.0;
const HOVER_BAR_H:  f32 = 20.0;
const SETTINGS_H:   f32 = 96.0;
/// Bounding box of the hover-preview popup thumbnail.
const PREVIEW_W:    f32 = 160.0;
const PREVIEW_H:    f32 = 90.0;

pub struct PlayerSurface {
    /// Manifest path/URL entry buffer. Committed with the Load button.
    manifest_input: String,
}

impl PlayerSurface {
    pub fn new() -> Self {
        Self { manifest_input: String::new() }
    }

    /// The tile whose interval covers `time`, for the monitor canvas.
    fn tile_for_time<'a>(ctx: &'a AppContext, time: f64) -> Option<&'a PlacedTile> {
        ctx.strip.tiles.iter().find(|t| time >= t.start && time < t.end)
    }

    fn monitor(&self, ui: &mut Ui, state: &SceneState, ctx: &AppContext) {
        let panel_w = ui.available_width();
        let panel_h =
            (ui.available_height() - BAR_H - HOVER_BAR_H - SETTINGS_H - 24.0).max(80.0);

        let (outer_rect, _) = ui.allocate_exact_size(Vec2::new(panel_w, panel_h), Sense::hover());
        let painter = ui.painter();

        // 16:9 canvas centered in the available box.
        let (canvas_w, canvas_h) = {
            let h = panel_w * 9.0 / 16.0;
            if h <= panel_h { (panel_w, h) } else { (panel_h * 16.0 / 9.0, panel_h) }
        };
        let canvas = Rect::from_center_size(outer_rect.center(), Vec2::new(canvas_w, canvas_h));

        if state.is_playing {
            painter.rect_stroke(
                canvas.expand(2.0),
                4.0,
                Stroke::new(1.5, ACCENT.gamma_multiply(0.55)),
                StrokeKind::Outside,
            );
        } else {
            painter.rect_stroke(
                canvas.expand(1.0),
                4.0,
                Stroke::new(1.0, DARK_BORDER),
                StrokeKind::Outside,
            );
        }
        painter.rect_filled(canvas, 3.0, Color32::BLACK);

        let tile = Self::tile_for_time(ctx, state.current_time);
        let sheet = tile.and_then(|t| ctx.sheets.get(&t.sheet_url));
        match (tile, sheet) {
            (Some(tile), Some(sheet)) => {
                let (sw, sh) = (sheet.width as f32, sheet.height as f32);
                let uv = Rect::from_min_max(
                    Pos2::new(tile.sheet_x / sw, tile.sheet_y / sh),
                    Pos2::new((tile.sheet_x + tile.width) / sw, (tile.sheet_y + tile.height) / sh),
                );
                // Fit the tile into the canvas preserving its own aspect.
                let scale = (canvas.width() / tile.width).min(canvas.height() / tile.height);
                let frame = Rect::from_center_size(
                    canvas.center(),
                    Vec2::new(tile.width * scale, tile.height * scale),
                );
                painter.image(sheet.texture.id(), frame, uv, Color32::WHITE);
            }
            _ => {
                let msg = if ctx.strip.is_empty() {
                    "no scene loaded"
                } else {
                    "no preview for this position"
                };
                painter.text(
                    canvas.center(),
                    Align2::CENTER_CENTER,
                    msg,
                    FontId::proportional(12.0),
                    DARK_TEXT_DIM,
                );
            }
        }
    }

    fn transport_bar(&self, ui: &mut Ui, state: &SceneState, cmd: &mut Vec<PlayerCommand>) {
        let timeline = state.timeline();
        ui.horizontal(|ui| {
            let icon = if state.is_playing { "⏸" } else { "▶" };
            if ui.add_sized([34.0, 28.0], egui::Button::new(icon)).clicked() {
                cmd.push(PlayerCommand::TogglePlay);
            }

            ui.label(
                RichText::new(format!(
                    "{} / {}",
                    seconds_to_timestamp(timeline.relative(state.current_time)),
                    seconds_to_timestamp(timeline.duration().max(0.0)),
                ))
                .monospace(),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if !state.title.is_empty() {
                    ui.label(RichText::new(&state.title).size(12.0).weak());
                }
            });
        });
    }

    /// A slim progress bar that previews sprites on hover and seeks on
    /// click. Pointer x picks a sprite index directly — density here is
    /// per-sprite, unlike the width-packed strip below.
    fn hover_bar(&self, ui: &mut Ui, state: &SceneState, ctx: &AppContext, cmd: &mut Vec<PlayerCommand>) {
        let width = ui.available_width();
        let (bar, response) = ui.allocate_exact_size(Vec2::new(width, HOVER_BAR_H), Sense::click());
        let painter = ui.painter_at(bar);
        painter.rect_filled(bar, 2.0, DARK_BG_3);

        let tiles = &ctx.strip.tiles;
        let hovered_index = response
            .hover_pos()
            .and_then(|pos| sprite_index_at(pos.x - bar.left(), bar.width(), tiles.len()));

        // Fill: hovered sprite fraction while hovering, playhead
        // progress otherwise.
        let fill = match hovered_index {
            Some(i) => (i + 1) as f32 / tiles.len() as f32,
            None => state
                .timeline()
                .progress(state.current_time)
                .unwrap_or(0.0) as f32,
        };
        painter.rect_filled(
            Rect::from_min_size(bar.min, Vec2::new(bar.width() * fill, bar.height())),
            2.0,
            ACCENT.gamma_multiply(0.45),
        );
        painter.rect_stroke(bar, 2.0, Stroke::new(1.0, DARK_BORDER), StrokeKind::Inside);

        if let Some(i) = hovered_index {
            let tile = &tiles[i];
            self.preview_popup(ui, bar, tile, ctx, state);
            if response.clicked() {
                cmd.push(PlayerCommand::Seek(tile.start));
            }
        }
    }

    /// The floating thumbnail above the hover bar.
    fn preview_popup(&self, ui: &Ui, bar: Rect, tile: &PlacedTile, ctx: &AppContext, state: &SceneState) {
        let Some(pos) = ui.ctx().pointer_latest_pos() else { return };
        let scale = scale_to_fit((tile.width, tile.height), (PREVIEW_W, PREVIEW_H));
        let size = Vec2::new(tile.width * scale, tile.height * scale);
        let center = Pos2::new(
            pos.x.clamp(bar.left() + size.x / 2.0, bar.right() - size.x / 2.0),
            bar.top() - size.y / 2.0 - 8.0,
        );
        let frame = Rect::from_center_size(center, size);

        let painter = ui.ctx().layer_painter(egui::LayerId::new(
            egui::Order::Tooltip,
            egui::Id::new("scrub_preview_popup"),
        ));
        painter.rect_filled(frame.expand(3.0), 3.0, DARK_BG_2);
        painter.rect_stroke(frame.expand(3.0), 3.0, Stroke::new(1.0, DARK_BORDER), StrokeKind::Outside);

        match ctx.sheets.get(&tile.sheet_url) {
            Some(sheet) => {
                let (sw, sh) = (sheet.width as f32, sheet.height as f32);
                let uv = Rect::from_min_max(
                    Pos2::new(tile.sheet_x / sw, tile.sheet_y / sh),
                    Pos2::new((tile.sheet_x + tile.width) / sw, (tile.sheet_y + tile.height) / sh),
                );
                painter.image(sheet.texture.id(), frame, uv, Color32::WHITE);
            }
            None => {
                painter.rect_filled(frame, 2.0, Color32::BLACK);
            }
        }
        painter.text(
            frame.center_bottom() + Vec2::new(0.0, 12.0),
            Align2::CENTER_CENTER,
            seconds_to_timestamp(state.timeline().relative(tile.start)),
            FontId::proportional(10.0),
            Color32::WHITE,
        );
    }

    fn settings_row(&mut self, ui: &mut Ui, state: &SceneState, cmd: &mut Vec<PlayerCommand>) {
        egui::Frame::new()
            .fill(DARK_BG_2)
            .inner_margin(egui::Margin::same(6))
            .show(ui, |ui| {
                // ── Trim + duration ──────────────────────────────────────────
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Trim").size(12.0).strong());

                    let mut start = state.start_point;
                    ui.add(
                        egui::DragValue::new(&mut start)
                            .speed(0.5)
                            .range(0.0..=state.duration.max(0.0))
                            .suffix(" s"),
                    );
                    if start != state.start_point {
                        cmd.push(PlayerCommand::SetTrimStart(start));
                    }

                    ui.label("→");

                    let mut has_end = state.end_point.is_some();
                    if ui.checkbox(&mut has_end, "end").changed() {
                        cmd.push(PlayerCommand::SetTrimEnd(if has_end {
                            Some(state.duration)
                        } else {
                            None
                        }));
                    }
                    if let Some(end) = state.end_point {
                        let mut end_val = end;
                        ui.add(
                            egui::DragValue::new(&mut end_val)
                                .speed(0.5)
                                .range(0.0..=state.duration.max(0.0))
                                .suffix(" s"),
                        );
                        if end_val != end {
                            cmd.push(PlayerCommand::SetTrimEnd(Some(end_val)));
                        }
                    }

                    ui.separator();

                    ui.label(RichText::new("Duration").size(12.0).strong());
                    let mut duration = state.duration;
                    ui.add(egui::DragValue::new(&mut duration).speed(1.0).suffix(" s"));
                    if duration != state.duration {
                        cmd.push(PlayerCommand::SetDuration(duration));
                    }

                    ui.separator();

                    if ui.button("✚ Marker").clicked() {
                        cmd.push(PlayerCommand::AddMarkerAtPlayhead);
                    }
                });

                // ── Markers ──────────────────────────────────────────────────
                if !state.markers.is_empty() {
                    ui.horizontal_wrapped(|ui| {
                        for marker in &state.markers {
                            let text = format!(
                                "{} @ {} ✕",
                                marker.label,
                                seconds_to_timestamp(marker.seconds),
                            );
                            if ui.small_button(text).clicked() {
                                cmd.push(PlayerCommand::RemoveMarker(marker.id));
                            }
                        }
                    });
                }

                // ── Manifest source ──────────────────────────────────────────
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Manifest").size(12.0).strong());
                    let field_w = (ui.available_width() - 230.0).max(120.0);
                    ui.add_sized(
                        [field_w, 20.0],
                        egui::TextEdit::singleline(&mut self.manifest_input)
                            .hint_text("path or http(s) URL of a sprite .vtt"),
                    );
                    let can_load = !self.manifest_input.trim().is_empty();
                    if ui.add_enabled(can_load, egui::Button::new("Load")).clicked() {
                        cmd.push(PlayerCommand::LoadManifest(self.manifest_input.trim().to_string()));
                    }
                    if ui.button("Open…").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("WebVTT", &["vtt"])
                            .pick_file()
                        {
                            let path = path.to_string_lossy().to_string();
                            self.manifest_input = path.clone();
                            cmd.push(PlayerCommand::LoadManifest(path));
                        }
                    }
                });

                // ── Scene I/O + status ───────────────────────────────────────
                ui.horizontal(|ui| {
                    if ui.button("Export scene").clicked() {
                        cmd.push(PlayerCommand::ExportScene);
                    }
                    if ui.button("Import scene").clicked() {
                        cmd.push(PlayerCommand::ImportScene);
                    }
                    if let Some(status) = &state.scene_status {
                        ui.separator();
                        ui.label(RichText::new(status).size(12.0).weak());
                        if ui.small_button("✕").clicked() {
                            cmd.push(PlayerCommand::ClearSceneStatus);
                        }
                    }
                });
            });
    }
}

impl PlayerModule for PlayerSurface {
    fn name(&self) -> &str { "Player" }

    fn ui(&mut self, ui: &mut Ui, state: &SceneState, ctx: &mut AppContext, cmd: &mut Vec<PlayerCommand>) {
        ui.vertical(|ui| {
            self.monitor(ui, state, ctx);
            ui.add_space(4.0);
            self.transport_bar(ui, state, cmd);
            self.hover_bar(ui, state, ctx, cmd);
            ui.add_space(4.0);
            self.settings_row(ui, state, cmd);
        });
    }
}
