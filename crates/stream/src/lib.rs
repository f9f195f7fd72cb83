//! Streaming: the level's room graph and the tile/cell query layer.
//!
//! A level is a fixed 2-D array of rooms. Exactly one room is active at a
//! time; switching rooms runs that room's one-time initialisation on first
//! entry.
//!
//! # Invariants
//! - Every room has the same `ROW_COUNT` x `COLUMN_COUNT` grid.
//! - A room's coordinate equals its position in the room array.
//! - Cell queries never read outside the grid: out-of-bounds cells are
//!   non-solid, not ladders, not water, and contain nothing.

mod level;
mod room;

pub use level::{Edge, Level, LevelError};
pub use room::{Room, RoomInit};

pub fn crate_info() -> &'static str {
    "tileworld-stream v0.1.0"
}
