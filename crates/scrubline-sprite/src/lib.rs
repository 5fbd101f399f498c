// crates/scrubline-sprite/src/lib.rs
//
// No egui dependency — communicates with scrubline-ui via channels only.
//
// To add a new acquisition capability:
//   1. Create a new module file here
//   2. Add `mod mymodule;` below
//   3. Call it from worker.rs (load_scene or a new SpriteWorker method)

pub mod decode;
pub mod fetch;
pub mod vtt;
pub mod worker;

// Re-export the main public API so scrubline-ui imports are simple.
pub use worker::SpriteWorker;

pub use scrubline_core::manifest::{SheetImage, SpriteCue, SpriteResult};
