//! Pure simulation module
//!
//! Everything that moves lives here. This module must stay platform-free:
//! - Time enters only as explicit `now` / `dt` / `ticks` arguments
//! - Randomness comes from seeded PCG streams
//! - No rendering or DOM dependencies

pub mod camera;
pub mod dialogue;
pub mod field;
pub mod motion;
pub mod page;
pub mod pointer;
pub mod scene;
pub mod ships;
pub mod transition;
pub mod warp;

pub use camera::Camera;
pub use dialogue::{BOOT_LINES, BootSequence, BootStatus, Typewriter, dialogue_for};
pub use field::{DepthEntity, FieldBounds, Star, StarField, advance_entity};
pub use motion::{MotionSignals, Spring, raw_progress, shake_offset};
pub use page::PageId;
pub use pointer::{Crosshair, hud_parallax};
pub use scene::{FrameInput, Planet, Scene};
pub use ships::{Ship, ShipKind, ShipSquadron};
pub use transition::{NavigationOutcome, PageTransitions, TransitionEvent, TransitionStage};
pub use warp::{WarpController, WarpPhase};
