// crates/scrubline-core/src/commands.rs
//
// Every user action in Scrubline is expressed as a PlayerCommand.
// Modules emit these; app.rs processes them after the UI pass.
// Adding a new feature = add a variant here + one match arm in app.rs.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum PlayerCommand {
    // ── Playback ─────────────────────────────────────────────────────────────
    Play,
    Pause,
    TogglePlay,
    /// Jump to an absolute second. Emitted only by user input (drag
    /// release, click-to-seek, step buttons, the hover bar) — never by
    /// the position synchronizer.
    Seek(f64),
    /// The user started an interactive drag. The host pauses playback
    /// for the duration of the scrub and remembers whether to resume on
    /// the seek that follows.
    BeginScrub,

    // ── Scene ────────────────────────────────────────────────────────────────
    /// Load a sprite manifest (local path or http(s) URL) as the scene.
    LoadManifest(String),
    SetTrimStart(f64),
    /// `None` clears the end trim (play to end of file).
    SetTrimEnd(Option<f64>),
    /// Override the file duration when the manifest's last cue is not
    /// the true end of the file.
    SetDuration(f64),
    AddMarkerAtPlayhead,
    RemoveMarker(Uuid),

    // ── View / UI ────────────────────────────────────────────────────────────
    /// Dismiss the scene-status banner in the transport bar.
    ClearSceneStatus,
    /// Serialize the scene (trim, markers, manifest source) to a JSON
    /// file picked by the user.
    ExportScene,
    /// Load a previously exported scene JSON.
    ImportScene,
}
