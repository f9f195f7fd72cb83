//! Level authoring: paint cells of a level's character grid, with undo/redo.
//!
//! # Invariants
//! - All authoring ops are reversible.
//! - The grid always holds exactly `rooms_y * rooms_x * CELL_COUNT` symbols,
//!   each one a known level symbol or a space.

mod editor;

pub use editor::{EditCommand, EditError, Editor, LevelGrid};

pub fn crate_info() -> &'static str {
    "tileworld-author v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("author"));
    }
}
