// crates/scrubline-ui/src/modules/mod.rs
//
// Module registry. To add a new panel:
//   1. Create modules/mypanel.rs implementing PlayerModule
//   2. Add `pub mod mypanel;` below
//   3. Add one line to the panel wiring in app.rs

pub mod player;
pub mod scrubber;

use crate::context::AppContext;
use egui::Ui;
use scrubline_core::commands::PlayerCommand;
use scrubline_core::state::SceneState;

/// Every player panel implements this trait.
/// Modules read state, emit commands — they never mutate state directly.
pub trait PlayerModule {
    fn name(&self) -> &str;
    fn ui(
        &mut self,
        ui:    &mut Ui,
        state: &SceneState,
        ctx:   &mut AppContext,
        cmd:   &mut Vec<PlayerCommand>,
    );
}
