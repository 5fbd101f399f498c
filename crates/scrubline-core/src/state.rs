// crates/scrubline-core/src/state.rs
// Pure scene data — no egui, no sockets, no runtime handles.
// Serializable via serde. Used by both scrubline-ui and scrubline-core consumers.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timeline::VirtualTimeline;

/// A tagged point on the scene timeline, in absolute seconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneMarker {
    pub id:      Uuid,
    pub seconds: f64,
    pub label:   String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SceneState {
    /// Display name, derived from the manifest file stem on load.
    pub title:           String,
    /// Full file duration in seconds. 0 until known; filled from the
    /// manifest's last cue when loading a scene with no duration set.
    pub duration:        f64,
    /// Trim start (absolute seconds). 0 = beginning of file.
    pub start_point:     f64,
    /// Trim end (absolute seconds). None or <= 0 = end of file.
    pub end_point:       Option<f64>,
    /// Sprite manifest location (path or URL) the scene was built from.
    pub manifest_source: Option<String>,
    pub markers:         Vec<SceneMarker>,

    pub current_time: f64,
    pub is_playing:   bool,

    /// Whether the player was already paused when the current scrub
    /// began. A seek resumes playback only when this is false.
    #[serde(skip)]
    pub paused_before_scrub: bool,
    /// Manifest source queued for loading, drained by app.rs each frame
    /// and handed to the SpriteWorker.
    #[serde(skip)]
    pub pending_manifest:    Option<String>,
    /// Brief status message shown in the transport bar after a manifest
    /// load finishes or fails.
    #[serde(skip)]
    pub scene_status:        Option<String>,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            title:               String::new(),
            duration:            0.0,
            start_point:         0.0,
            end_point:           None,
            manifest_source:     None,
            markers:             Vec::new(),
            current_time:        0.0,
            is_playing:          false,
            paused_before_scrub: false,
            pending_manifest:    None,
            scene_status:        None,
        }
    }
}

impl SceneState {
    /// The playable range with the end trim resolved against the file
    /// duration.
    pub fn timeline(&self) -> VirtualTimeline {
        VirtualTimeline::from_trim(self.start_point, self.end_point, self.duration)
    }

    /// Queue a manifest for loading and remember it as the scene source.
    pub fn load_manifest(&mut self, source: String) {
        self.title = title_from_source(&source);
        self.manifest_source = Some(source.clone());
        self.pending_manifest = Some(source);
    }

    pub fn add_marker(&mut self, seconds: f64, label: String) -> Uuid {
        let id = Uuid::new_v4();
        self.markers.push(SceneMarker { id, seconds, label });
        id
    }

    pub fn remove_marker(&mut self, id: Uuid) {
        self.markers.retain(|m| m.id != id);
    }
}

/// Scene title from a manifest path or URL: the file stem of the last
/// segment ("clips/beach_thumbs.vtt" → "beach_thumbs").
fn title_from_source(source: &str) -> String {
    let last = source.rsplit(['/', '\\']).next().unwrap_or(source);
    last.strip_suffix(".vtt").unwrap_or(last).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_resolves_end_trim() {
        let mut scene = SceneState::default();
        scene.duration = 300.0;
        scene.start_point = 30.0;
        assert_eq!(scene.timeline(), VirtualTimeline::new(30.0, 300.0));
        scene.end_point = Some(120.0);
        assert_eq!(scene.timeline(), VirtualTimeline::new(30.0, 120.0));
    }

    #[test]
    fn markers_add_and_remove() {
        let mut scene = SceneState::default();
        let a = scene.add_marker(5.0, "intro".into());
        let _b = scene.add_marker(9.0, "drop".into());
        scene.remove_marker(a);
        assert_eq!(scene.markers.len(), 1);
        assert_eq!(scene.markers[0].label, "drop");
    }

    #[test]
    fn title_derives_from_source() {
        assert_eq!(title_from_source("media/scene_42_sprite.vtt"), "scene_42_sprite");
        assert_eq!(title_from_source("http://host/vtt/abc.vtt"),   "abc");
        assert_eq!(title_from_source("plain"),                     "plain");
    }
}
