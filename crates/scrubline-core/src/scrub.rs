// crates/scrubline-core/src/scrub.rs
//
// The scrubber state machine: slider position, drag sessions with
// momentum, click-to-seek, and reconciliation with externally driven
// playback time.
//
// Coordinates: `position` is the strip's horizontal offset relative to
// the viewport's left edge. The current playhead sits under the
// viewport's center marker, so position is clamped to
// [midpoint - scrub_width, midpoint].
//
// The model never mutates playback time. Seeks and scroll-begin
// notifications leave as PlayerCommands; time comes back in through
// `sync_time`, which by construction never emits a seek.

use crate::commands::PlayerCommand;
use crate::sync::{Animation, PositionSync, Transition};
use crate::timeline::VirtualTimeline;

/// Release velocity (px per move event) above which momentum applies.
pub const FLING_THRESHOLD: f32 = 25.0;
/// Extrapolation factor for a fling: `position += velocity * FLING_MULTIPLIER`.
pub const FLING_MULTIPLIER: f32 = 10.0;
/// Pointer travel below this is a click, not a drag.
pub const CLICK_TOLERANCE_PX: f32 = 1.0;
/// Externally driven position changes smaller than this are dropped.
pub const POSITION_DEADBAND_PX: f32 = 1.0;

/// Ephemeral drag bookkeeping, created on pointer-down and discarded on
/// pointer-up. A plain value, not a pile of mutable cells captured by
/// event handlers.
#[derive(Clone, Copy, Debug)]
pub struct DragSession {
    start_x:  f32,
    last_x:   f32,
    velocity: f32,
    /// True once a real (non-zero) move has been processed. Gates the
    /// one-shot scroll notification and the grabbing cursor.
    moved:    bool,
}

impl DragSession {
    fn new(x: f32) -> Self {
        Self { start_x: x, last_x: x, velocity: 0.0, moved: false }
    }
}

/// What a sub-tolerance click landed on, in strip space. The host does
/// the hit test (it owns the drawn geometry) and hands the result to
/// `pointer_up`.
#[derive(Clone, Copy, Debug)]
pub enum ClickTarget {
    /// A sprite tile: its strip-space left edge plus the pointer offset
    /// within the tile.
    Tile { left: f32, offset_x: f32 },
    /// A marker chip: its anchored strip-space left edge.
    Marker { left: f32 },
}

pub struct ScrubberModel {
    timeline:       VirtualTimeline,
    viewport_width: f32,
    scrub_width:    f32,
    /// Committed slider offset (animation target).
    position:       f32,
    /// Playhead fraction through the strip, mirrored by the indicator.
    indicator:      f64,
    transition:     Transition,
    animation:      Option<Animation>,
    drag:           Option<DragSession>,
    sync:           PositionSync,
}

impl ScrubberModel {
    pub fn new(timeline: VirtualTimeline) -> Self {
        Self {
            timeline,
            viewport_width: 0.0,
            scrub_width:    0.0,
            position:       0.0,
            indicator:      0.0,
            transition:     Transition::None,
            animation:      None,
            drag:           None,
            sync:           PositionSync::default(),
        }
    }

    // ── Geometry feeds ───────────────────────────────────────────────────────

    pub fn set_timeline(&mut self, timeline: VirtualTimeline) {
        self.timeline = timeline;
    }

    pub fn set_strip_width(&mut self, width: f32) {
        self.scrub_width = width;
    }

    /// Record a (possibly changed) viewport width. A resize forgets the
    /// previous sync time so the next position update snaps instantly.
    pub fn set_viewport_width(&mut self, width: f32) {
        if (width - self.viewport_width).abs() > f32::EPSILON {
            self.viewport_width = width;
            self.sync.reset();
        }
    }

    // ── Read side ────────────────────────────────────────────────────────────

    pub fn position(&self) -> f32 {
        self.position
    }

    /// Playhead fraction in [0, 1].
    pub fn indicator(&self) -> f64 {
        self.indicator
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(|d| d.moved)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Advance the in-flight animation by `dt` and return the offset to
    /// draw this frame.
    pub fn animate(&mut self, dt: f32) -> f32 {
        if let Some(anim) = &mut self.animation {
            anim.advance(dt);
            if anim.finished() {
                self.animation = None;
            }
        }
        self.displayed()
    }

    /// The currently displayed offset, without advancing time.
    pub fn displayed(&self) -> f32 {
        match &self.animation {
            Some(anim) => anim.value(),
            None       => self.position,
        }
    }

    // ── Position core ────────────────────────────────────────────────────────

    /// Clamp `value` into the valid slider range, commit it, start the
    /// pending transition, and return the playhead fraction. `None` when
    /// the strip has no width yet.
    fn place(&mut self, value: f32) -> Option<f64> {
        if self.scrub_width <= 0.0 {
            return None;
        }

        let midpoint_offset = self.viewport_width / 2.0;

        let (percentage, new_position) = if value >= midpoint_offset {
            (0.0, midpoint_offset)
        } else if value <= midpoint_offset - self.scrub_width {
            (1.0, midpoint_offset - self.scrub_width)
        } else {
            (((midpoint_offset - value) / self.scrub_width) as f64, value)
        };

        let from = self.displayed();
        self.position = new_position;
        self.indicator = percentage;
        self.animation = match self.transition {
            Transition::None => None,
            t                => Some(Animation::new(from, new_position, t)),
        };

        Some(percentage)
    }

    /// Move the slider to `value`. With `seek` the resolved absolute
    /// second is emitted as a seek request; externally driven updates
    /// pass `seek = false` and emit nothing.
    pub fn set_position(&mut self, value: f32, seek: bool, cmd: &mut Vec<PlayerCommand>) {
        if let Some(percentage) = self.place(value) {
            if seek {
                cmd.push(PlayerCommand::Seek(self.timeline.time_at(percentage)));
            }
        }
    }

    // ── Pointer input ────────────────────────────────────────────────────────

    /// Pointer press at viewport-space `x`. Only the primary button
    /// starts a drag session.
    pub fn pointer_down(&mut self, x: f32, primary: bool) {
        if !primary {
            return;
        }
        self.drag = Some(DragSession::new(x));
    }

    /// Pointer moved to `x` while (possibly) dragging.
    pub fn pointer_move(&mut self, x: f32, cmd: &mut Vec<PlayerCommand>) {
        let Some(drag) = &mut self.drag else { return };

        // Negative delta drags right (past), positive left (future).
        let delta = x - drag.last_x;

        if !drag.moved {
            // A zero-delta move can arrive for a plain click; ignore it
            // so a click never pauses the player.
            if delta == 0.0 {
                return;
            }
            cmd.push(PlayerCommand::BeginScrub);
            drag.moved = true;
        }

        drag.velocity = delta;
        drag.last_x = x;

        self.transition = Transition::None;
        let target = self.position + delta;
        self.set_position(target, false, cmd);
    }

    /// Pointer release at `x`. `target` is the strip element under a
    /// sub-tolerance click, if the host found one.
    pub fn pointer_up(&mut self, x: f32, target: Option<ClickTarget>, cmd: &mut Vec<PlayerCommand>) {
        let Some(drag) = self.drag.take() else { return };

        let mut new_position = self.position;
        let midpoint_offset = self.viewport_width / 2.0;

        let travel = (x - drag.start_x).abs();
        if travel < CLICK_TOLERANCE_PX {
            match target {
                Some(ClickTarget::Tile { left, offset_x }) => {
                    new_position = midpoint_offset - (left + offset_x);
                }
                Some(ClickTarget::Marker { left }) => {
                    new_position = midpoint_offset - left;
                }
                None => {}
            }
        }
        if drag.velocity.abs() > FLING_THRESHOLD {
            new_position = self.position + drag.velocity * FLING_MULTIPLIER;
        }

        self.transition = Transition::EaseOut;
        self.set_position(new_position, true, cmd);
    }

    // ── Paging ───────────────────────────────────────────────────────────────

    /// Page one viewport width into the past.
    pub fn step_back(&mut self, cmd: &mut Vec<PlayerCommand>) {
        self.transition = Transition::EaseOut;
        self.set_position(self.position + self.viewport_width, true, cmd);
    }

    /// Page one viewport width into the future.
    pub fn step_forward(&mut self, cmd: &mut Vec<PlayerCommand>) {
        self.transition = Transition::EaseOut;
        self.set_position(self.position - self.viewport_width, true, cmd);
    }

    // ── External time sync ───────────────────────────────────────────────────

    /// Reflect an externally driven playback time. Never seeks.
    ///
    /// Skips entirely while geometry is unknown, for a degenerate range,
    /// and for sub-deadband moves. The deadband returns before the
    /// prev-time bookkeeping, so a skipped update keeps the older
    /// reference time.
    pub fn sync_time(&mut self, time: f64) {
        if self.scrub_width <= 0.0 || self.viewport_width <= 0.0 {
            return;
        }
        let Some(percentage) = self.timeline.progress(time) else { return };

        let new_position = self.viewport_width / 2.0 - percentage as f32 * self.scrub_width;
        if (new_position - self.position).abs() < POSITION_DEADBAND_PX {
            return;
        }

        self.transition = self.sync.transition_for(time);
        self.place(new_position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 200px viewport (midpoint 100) over a 1000px strip for a
    /// [0, 100]s scene: 10px per second.
    fn model() -> ScrubberModel {
        let mut m = ScrubberModel::new(VirtualTimeline::new(0.0, 100.0));
        m.set_viewport_width(200.0);
        m.set_strip_width(1000.0);
        m
    }

    fn seeks(cmd: &[PlayerCommand]) -> Vec<f64> {
        cmd.iter()
            .filter_map(|c| match c {
                PlayerCommand::Seek(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn zero_delta_first_move_is_ignored() {
        let mut m = model();
        let mut cmd = Vec::new();
        m.pointer_down(50.0, true);
        m.pointer_move(50.0, &mut cmd);

        assert!(cmd.is_empty());
        assert!(!m.is_dragging());
    }

    #[test]
    fn begin_scrub_is_emitted_once_per_session() {
        let mut m = model();
        let mut cmd = Vec::new();
        m.pointer_down(50.0, true);
        m.pointer_move(53.0, &mut cmd);
        m.pointer_move(57.0, &mut cmd);

        let begins = cmd.iter()
            .filter(|c| matches!(c, PlayerCommand::BeginScrub))
            .count();
        assert_eq!(begins, 1);
        assert!(m.is_dragging());
    }

    #[test]
    fn drag_moves_do_not_seek() {
        let mut m = model();
        let mut cmd = Vec::new();
        m.pointer_down(50.0, true);
        m.pointer_move(40.0, &mut cmd);
        assert!(seeks(&cmd).is_empty());
    }

    #[test]
    fn secondary_button_does_not_start_a_session() {
        let mut m = model();
        let mut cmd = Vec::new();
        m.pointer_down(50.0, false);
        m.pointer_move(70.0, &mut cmd);
        m.pointer_up(70.0, None, &mut cmd);
        assert!(cmd.is_empty());
    }

    #[test]
    fn click_on_tile_seeks_to_its_offset() {
        let mut m = model();
        let mut cmd = Vec::new();
        m.pointer_down(50.0, true);
        m.pointer_up(50.0, Some(ClickTarget::Tile { left: 30.0, offset_x: 5.0 }), &mut cmd);

        // midpoint(100) - (30 + 5) = 65 → fraction (100-65)/1000 = 0.035
        assert_eq!(m.position(), 65.0);
        assert_eq!(seeks(&cmd), vec![3.5]);
    }

    #[test]
    fn click_on_marker_seeks_to_its_left_edge() {
        let mut m = model();
        let mut cmd = Vec::new();
        m.pointer_down(10.0, true);
        m.pointer_up(10.0, Some(ClickTarget::Marker { left: 250.0 }), &mut cmd);

        assert_eq!(m.position(), -150.0);
        assert_eq!(seeks(&cmd), vec![25.0]);
    }

    #[test]
    fn moved_pointer_ignores_click_target() {
        let mut m = model();
        let mut cmd = Vec::new();
        m.pointer_down(50.0, true);
        m.pointer_move(45.0, &mut cmd);
        let before = m.position();
        m.pointer_up(45.0, Some(ClickTarget::Tile { left: 30.0, offset_x: 5.0 }), &mut cmd);

        // Travel >= tolerance: release commits the dragged position,
        // not the click target (velocity 5 is below the fling gate).
        assert_eq!(m.position(), before);
    }

    #[test]
    fn fast_release_flings_by_velocity_times_multiplier() {
        let mut m = model();
        let mut cmd = Vec::new();
        m.pointer_down(150.0, true);
        m.pointer_move(120.0, &mut cmd); // velocity -30
        let tracked = m.position();
        m.pointer_up(120.0, None, &mut cmd);

        assert_eq!(m.position(), tracked + (-30.0) * FLING_MULTIPLIER);
        assert_eq!(seeks(&cmd).len(), 1);
    }

    #[test]
    fn slow_release_does_not_fling() {
        let mut m = model();
        let mut cmd = Vec::new();
        m.pointer_down(150.0, true);
        m.pointer_move(130.0, &mut cmd); // velocity -20, below threshold
        let tracked = m.position();
        m.pointer_up(130.0, None, &mut cmd);

        assert_eq!(m.position(), tracked);
    }

    #[test]
    fn position_clamps_to_slider_range() {
        let mut m = model();
        let mut cmd = Vec::new();

        // Far past the start: clamp to midpoint, fraction 0.
        m.set_position(500.0, true, &mut cmd);
        assert_eq!(m.position(), 100.0);
        assert_eq!(m.indicator(), 0.0);
        assert_eq!(seeks(&cmd), vec![0.0]);

        // Far past the end: clamp to midpoint - scrub_width, fraction 1.
        cmd.clear();
        m.set_position(-5000.0, true, &mut cmd);
        assert_eq!(m.position(), -900.0);
        assert_eq!(m.indicator(), 1.0);
        assert_eq!(seeks(&cmd), vec![100.0]);
    }

    #[test]
    fn empty_strip_makes_set_position_a_no_op() {
        let mut m = ScrubberModel::new(VirtualTimeline::new(0.0, 100.0));
        m.set_viewport_width(200.0);
        let mut cmd = Vec::new();
        m.set_position(50.0, true, &mut cmd);
        assert!(cmd.is_empty());
        assert_eq!(m.position(), 0.0);
    }

    #[test]
    fn step_buttons_page_one_viewport_width() {
        let mut m = model();
        let mut cmd = Vec::new();
        m.sync_time(50.0); // position = 100 - 0.5*1000 = -400

        m.step_forward(&mut cmd);
        assert_eq!(m.position(), -600.0);
        m.step_back(&mut cmd);
        assert_eq!(m.position(), -400.0);
        assert_eq!(seeks(&cmd), vec![70.0, 50.0]);
    }

    #[test]
    fn sync_never_emits_commands() {
        let mut m = model();
        m.sync_time(10.0);
        m.sync_time(90.0);
        // sync_time has no command sink at all; assert the position moved.
        assert_eq!(m.position(), 100.0 - 0.9 * 1000.0);
    }

    #[test]
    fn sync_skips_degenerate_range() {
        let mut m = model();
        m.set_timeline(VirtualTimeline::new(10.0, 10.0));
        m.sync_time(10.0);
        assert_eq!(m.position(), 0.0);
    }

    #[test]
    fn sync_skips_sub_pixel_moves() {
        let mut m = model();
        m.sync_time(50.0);
        let pos = m.position();
        m.sync_time(50.05); // 0.5px at 10px/s — below the deadband
        assert_eq!(m.position(), pos);
    }

    #[test]
    fn first_sync_snaps_then_tracking_glides() {
        let mut m = model();
        m.sync_time(50.0);
        assert!(!m.is_animating(), "first update must snap");
        assert_eq!(m.displayed(), -400.0);

        m.sync_time(50.5); // delta 0.5s → linear glide
        assert!(m.is_animating());
        let mid = m.animate(crate::sync::LINEAR_TRANSITION_SECS / 2.0);
        assert!(mid > -405.0 && mid < -400.0);
        m.animate(crate::sync::LINEAR_TRANSITION_SECS);
        assert!(!m.is_animating());
        assert_eq!(m.displayed(), -405.0);
    }

    #[test]
    fn resize_resets_sync_to_snap() {
        let mut m = model();
        m.sync_time(50.0);
        m.sync_time(55.0);
        m.set_viewport_width(400.0);
        m.sync_time(60.0);
        assert!(!m.is_animating(), "first update after resize must snap");
    }

    #[test]
    fn drag_clears_any_running_transition() {
        let mut m = model();
        m.sync_time(50.0);
        m.sync_time(60.0); // ease-out animation running
        assert!(m.is_animating());

        let mut cmd = Vec::new();
        m.pointer_down(100.0, true);
        m.pointer_move(90.0, &mut cmd);
        assert!(!m.is_animating(), "drag must track the pointer instantly");
    }
}
