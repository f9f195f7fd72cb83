//! Input: abstract directional intents.
//!
//! The simulation never sees devices. Any source (keyboard, GPIO buttons, a
//! script) reduces what is held during a frame to an [`IntentSet`].
//!
//! # Invariants
//! - An empty set means "no direction".
//! - Debouncing and polling belong to the source, not the simulation.

pub mod intent;
pub mod script;

pub use intent::{Intent, IntentSet, IntentSource};
pub use script::{IntentScript, ScriptError, ScriptPlayer};

pub fn crate_info() -> &'static str {
    "tileworld-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
