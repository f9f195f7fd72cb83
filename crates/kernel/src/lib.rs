//! Simulation kernel: frame pacing, the tile collision resolver, per-type
//! object behaviours, level population and the game state machine.
//!
//! # Invariants
//! - One frame is: intents, player resolution, object dispatch, animation,
//!   then periodic compaction. Nothing else mutates the game between frames.
//! - Removed objects stay in their room until compaction at a frame
//!   boundary; objects spawned during dispatch run in the same frame.
//! - Health stays in `0..=max_health`; invincibility never goes negative.

pub mod behavior;
pub mod config;
pub mod error;
pub mod factory;
pub mod pacer;
pub mod physics;
pub mod player;
pub mod sim;

pub use behavior::{Behavior, Ctx, Outcome};
pub use config::{PacingConfig, PlayerTuning, SimConfig};
pub use error::{PacerError, SimError};
pub use factory::{SYMBOLS, build_level, create_dynamic_object, create_static_object, spawn};
pub use pacer::{Clock, FramePacer, FrameStats, ManualClock, MonotonicClock};
pub use physics::{Actor, Motion, Resolution, resolve};
pub use player::{Player, blink_alpha};
pub use sim::{GameState, SimEvent, Simulation};

pub fn crate_info() -> &'static str {
    "tileworld-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
