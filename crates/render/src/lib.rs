//! Rendering adapter: renderer-agnostic draw lists.
//!
//! # Invariants
//! - Renderers never mutate the simulation.
//! - Draw order is grid cells in row-major order, then objects in store
//!   order with the player at its depth slot.
//!
//! A sprite backend consumes [`draw_list`]; [`TextRenderer`] renders the
//! active room as ASCII for the CLI and tests.

mod draw;
mod renderer;

pub use draw::{Drawable, draw_list, glyph};
pub use renderer::{RenderView, Renderer, TextRenderer};

pub fn crate_info() -> &'static str {
    "tileworld-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
