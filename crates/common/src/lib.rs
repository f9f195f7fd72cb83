//! Shared types for the tileworld engine: grid constants, cell/room
//! coordinates, pixel geometry and per-edge solidity flags.
//!
//! # Invariants
//! - Every room has exactly `ROW_COUNT` x `COLUMN_COUNT` cells.
//! - Positions are real-valued pixels; cells are `CELL_SIZE` pixels square.

pub mod geometry;
pub mod types;

pub use geometry::{BodyRect, Borders, SpriteRect};
pub use types::{CellCoord, RoomCoord, SolidFlags};

/// Edge length of one grid cell, in pixels.
pub const CELL_SIZE: i32 = 16;
/// Half a cell; the midline margin used for room transitions.
pub const CELL_HALF: i32 = CELL_SIZE / 2;
/// Edge length of one sprite-sheet tile, in pixels.
pub const SPRITE_SIZE: i32 = 16;

/// Rows of cells in every room.
pub const ROW_COUNT: usize = 12;
/// Columns of cells in every room.
pub const COLUMN_COUNT: usize = 20;
/// Number of cells in every room.
pub const CELL_COUNT: usize = ROW_COUNT * COLUMN_COUNT;

/// Width of a room in pixels.
pub const LEVEL_WIDTH: i32 = COLUMN_COUNT as i32 * CELL_SIZE;
/// Height of a room in pixels.
pub const LEVEL_HEIGHT: i32 = ROW_COUNT as i32 * CELL_SIZE;

/// Lowest frame rate the physics is tuned for.
pub const MIN_FRAME_RATE: u32 = 24;
/// Longest frame delta the simulation accepts, in milliseconds.
pub const MAX_DELTA_MS: f64 = 1000.0 / MIN_FRAME_RATE as f64;
/// Velocity clamp on each axis, in pixels per second. At the minimum frame
/// rate nothing moves more than one cell per frame.
pub const MAX_SPEED: f64 = MIN_FRAME_RATE as f64 * CELL_SIZE as f64;

/// Clamp `value` into `[-max, max]`.
pub fn limit_absolute(value: f64, max: f64) -> f64 {
    if value > max {
        max
    } else if value < -max {
        -max
    } else {
        value
    }
}

pub fn crate_info() -> &'static str {
    "tileworld-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_dimensions_are_consistent() {
        assert_eq!(LEVEL_WIDTH, 320);
        assert_eq!(LEVEL_HEIGHT, 192);
        assert_eq!(CELL_COUNT, 240);
    }

    #[test]
    fn limit_absolute_clamps_both_signs() {
        assert_eq!(limit_absolute(500.0, MAX_SPEED), MAX_SPEED);
        assert_eq!(limit_absolute(-500.0, MAX_SPEED), -MAX_SPEED);
        assert_eq!(limit_absolute(12.5, MAX_SPEED), 12.5);
    }

    #[test]
    fn max_speed_is_one_cell_per_slow_frame() {
        let travelled = MAX_SPEED * MAX_DELTA_MS / 1000.0;
        assert!((travelled - CELL_SIZE as f64).abs() < 1e-9);
    }
}
