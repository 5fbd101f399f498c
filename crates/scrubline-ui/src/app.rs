// src/app.rs (scrubline-ui)
use crate::context::AppContext;
use crate::modules::{player::PlayerSurface, scrubber::ScrubberModule, PlayerModule};
use crate::theme::configure_style;
use eframe::egui;
use rfd::FileDialog;
use scrubline_core::commands::PlayerCommand;
use scrubline_core::state::SceneState;
use scrubline_sprite::SpriteWorker;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize)]
struct AppStorage {
    scene: SceneState,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct ScrublineApp {
    state:   SceneState,
    context: AppContext,
    // Panel modules as concrete types — no per-frame name lookup, and a
    // typo is a compile error instead of a silently blank panel.
    scrubber: ScrubberModule,
    player:   PlayerSurface,
    /// Commands emitted by modules each frame, processed after the UI pass
    pending_cmds: Vec<PlayerCommand>,
}

impl ScrublineApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        configure_style(&cc.egui_ctx);
        // Pin to dark mode — prevents egui overwriting our theme on OS light/dark changes.
        cc.egui_ctx.options_mut(|o| {
            o.theme_preference = egui::ThemePreference::Dark;
        });

        let mut state = cc
            .storage
            .and_then(|s| eframe::get_value::<AppStorage>(s, eframe::APP_KEY))
            .map(|d| d.scene)
            .unwrap_or_default();

        // Always reload the manifest on startup — cues and sheet
        // textures are runtime-only; only the source string persists.
        if let Some(source) = state.manifest_source.clone() {
            state.pending_manifest = Some(source);
        }

        let context = AppContext::new(SpriteWorker::new());

        Self {
            state,
            context,
            scrubber:     ScrubberModule::new(),
            player:       PlayerSurface::new(),
            pending_cmds: Vec::new(),
        }
    }

    fn start_playback(&mut self) {
        let timeline = self.state.timeline();
        // Restart from the segment start when playback already ran off
        // the end.
        if timeline.duration() > 0.0 && self.state.current_time >= timeline.end - 0.1 {
            self.state.current_time = timeline.start;
        }
        self.state.is_playing = true;
    }

    fn process_command(&mut self, cmd: PlayerCommand) {
        match cmd {
            // ── Playback ─────────────────────────────────────────────────────
            PlayerCommand::Play => self.start_playback(),
            PlayerCommand::Pause => {
                self.state.is_playing = false;
            }
            PlayerCommand::TogglePlay => {
                if self.state.is_playing {
                    self.state.is_playing = false;
                } else {
                    self.start_playback();
                }
            }
            PlayerCommand::Seek(seconds) => {
                let timeline = self.state.timeline();
                self.state.current_time = if timeline.duration() > 0.0 {
                    seconds.clamp(timeline.start, timeline.end)
                } else {
                    seconds.max(0.0)
                };
                // Resume unless the scrub that led here started from a
                // paused player.
                if !self.state.paused_before_scrub {
                    self.state.is_playing = true;
                }
            }
            PlayerCommand::BeginScrub => {
                if self.state.is_playing {
                    self.state.paused_before_scrub = false;
                    self.state.is_playing = false;
                } else {
                    self.state.paused_before_scrub = true;
                }
            }

            // ── Scene ────────────────────────────────────────────────────────
            PlayerCommand::LoadManifest(source) => {
                crate::scrubline_log!("[app] manifest load queued: {source}");
                self.state.load_manifest(source);
            }
            PlayerCommand::SetTrimStart(start) => {
                self.state.start_point = start.max(0.0);
            }
            PlayerCommand::SetTrimEnd(end) => {
                self.state.end_point = end;
            }
            PlayerCommand::SetDuration(duration) => {
                self.state.duration = duration.max(0.0);
            }
            PlayerCommand::AddMarkerAtPlayhead => {
                let label = format!("Marker {}", self.state.markers.len() + 1);
                self.state.add_marker(self.state.current_time, label);
                self.context.invalidate_strip();
            }
            PlayerCommand::RemoveMarker(id) => {
                self.state.remove_marker(id);
                self.context.invalidate_strip();
            }

            // ── View / UI ────────────────────────────────────────────────────
            PlayerCommand::ClearSceneStatus => {
                self.state.scene_status = None;
            }
            PlayerCommand::ExportScene => self.export_scene(),
            PlayerCommand::ImportScene => self.import_scene(),
        }
    }

    fn export_scene(&mut self) {
        let default_name = if self.state.title.is_empty() {
            "scene.json".to_string()
        } else {
            format!("{}.scene.json", self.state.title)
        };
        let Some(dest) = FileDialog::new()
            .set_file_name(&default_name)
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };

        let result = serde_json::to_string_pretty(&self.state)
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&dest, json).map_err(anyhow::Error::from));
        self.state.scene_status = Some(match result {
            Ok(()) => format!("scene exported to {}", dest.display()),
            Err(e) => {
                crate::scrubline_log!("[app] scene export failed: {e:#}");
                format!("export failed: {e}")
            }
        });
    }

    fn import_scene(&mut self) {
        let Some(path) = FileDialog::new().add_filter("JSON", &["json"]).pick_file() else {
            return;
        };

        match std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|json| serde_json::from_str::<SceneState>(&json).map_err(anyhow::Error::from))
        {
            Ok(mut scene) => {
                // Runtime fields are #[serde(skip)]; re-queue the
                // manifest so cues and sheets reload for the new scene.
                scene.pending_manifest = scene.manifest_source.clone();
                self.state = scene;
                self.context.invalidate_strip();
            }
            Err(e) => {
                crate::scrubline_log!("[app] scene import failed: {e:#}");
                self.state.scene_status = Some(format!("import failed: {e}"));
            }
        }
    }

    fn poll_sprites(&mut self, ctx: &egui::Context) {
        // ── Pre-frame housekeeping ────────────────────────────────────────────
        if let Some(source) = self.state.pending_manifest.take() {
            let id = Uuid::new_v4();
            self.context.begin_load(id);
            self.context.sprite_worker.load_manifest(id, source);
        }

        // ── Dispatch all queued SpriteWorker results into caches / state ──────
        self.context.ingest_sprite_results(&mut self.state, ctx);
        self.context.ensure_strip(&self.state);

        // A freshly loaded scene (or a raised trim start) begins at the
        // segment start, never before it.
        let timeline = self.state.timeline();
        if timeline.duration() > 0.0 && self.state.current_time < timeline.start {
            self.state.current_time = timeline.start;
        }
    }
}

// ── eframe::App ───────────────────────────────────────────────────────────────

impl eframe::App for ScrublineApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &AppStorage { scene: self.state.clone() });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.context.sprite_worker.shutdown();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_sprites(ctx);

        egui::TopBottomPanel::top("top_panel")
            .exact_height(36.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new("◔ Scrubline")
                            .strong()
                            .size(15.0)
                            .color(crate::theme::ACCENT),
                    );
                    ui.separator();
                    ui.label(
                        egui::RichText::new("Sprite-sheet segment scrubber")
                            .size(12.0)
                            .weak(),
                    );
                });
            });

        egui::TopBottomPanel::bottom("scrubber_panel")
            .exact_height(crate::modules::scrubber::SCRUBBER_HEIGHT + 16.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                self.scrubber.ui(ui, &self.state, &mut self.context, &mut self.pending_cmds);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.player.ui(ui, &self.state, &mut self.context, &mut self.pending_cmds);
        });

        // ── Process commands emitted by modules this frame ────────────────────
        let cmds: Vec<PlayerCommand> = self.pending_cmds.drain(..).collect();
        for cmd in cmds {
            self.process_command(cmd);
        }

        // ── Host playback clock ───────────────────────────────────────────────
        if self.state.is_playing {
            let dt = ctx.input(|i| i.stable_dt as f64);
            self.state.current_time += dt;
            let timeline = self.state.timeline();
            // Segment loop: running off the end wraps back to the start.
            if timeline.duration() > 0.0 && self.state.current_time >= timeline.end {
                self.state.current_time = timeline.start;
            }
            ctx.request_repaint();
        }
    }
}
