use glam::DVec2;
use thiserror::Error;
use tileworld_common::{COLUMN_COUNT, ROW_COUNT, RoomCoord};

use crate::room::Room;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level source has {actual} cells, expected {expected}")]
    SourceLength { expected: usize, actual: usize },
    #[error("room ({row}, {col}) is outside the {rows}x{cols} room array")]
    RoomOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("a level needs at least one room")]
    EmptyGrid,
    #[error("level source has no player start marker")]
    MissingPlayerStart,
}

/// Side of a room, used to walk the room graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// A fixed 2-D array of rooms, exactly one of which is active.
#[derive(Debug)]
pub struct Level {
    rooms_y: usize,
    rooms_x: usize,
    rooms: Vec<Room>,
    active: RoomCoord,
    start: RoomCoord,
    player_start: DVec2,
}

impl Level {
    /// Build `rooms_y * rooms_x` empty rooms. No room is activated yet.
    pub fn new(rooms_y: usize, rooms_x: usize) -> Result<Self, LevelError> {
        if rooms_y == 0 || rooms_x == 0 {
            return Err(LevelError::EmptyGrid);
        }
        let rooms = (0..rooms_y)
            .flat_map(|r| (0..rooms_x).map(move |c| Room::new(RoomCoord::new(r, c))))
            .collect();
        Ok(Self {
            rooms_y,
            rooms_x,
            rooms,
            active: RoomCoord::default(),
            start: RoomCoord::default(),
            player_start: DVec2::ZERO,
        })
    }

    pub fn rooms_y(&self) -> usize {
        self.rooms_y
    }

    pub fn rooms_x(&self) -> usize {
        self.rooms_x
    }

    /// Number of cells a level source for this room array must contain.
    pub fn source_len(&self) -> usize {
        self.rooms_y * self.rooms_x * ROW_COUNT * COLUMN_COUNT
    }

    pub fn contains_room(&self, coord: RoomCoord) -> bool {
        coord.row < self.rooms_y && coord.col < self.rooms_x
    }

    fn slot(&self, coord: RoomCoord) -> Result<usize, LevelError> {
        if self.contains_room(coord) {
            Ok(coord.row * self.rooms_x + coord.col)
        } else {
            Err(LevelError::RoomOutOfRange {
                row: coord.row,
                col: coord.col,
                rows: self.rooms_y,
                cols: self.rooms_x,
            })
        }
    }

    pub fn room(&self, coord: RoomCoord) -> Option<&Room> {
        self.slot(coord).ok().map(|i| &self.rooms[i])
    }

    pub fn room_mut(&mut self, coord: RoomCoord) -> Option<&mut Room> {
        self.slot(coord).ok().map(move |i| &mut self.rooms[i])
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    pub fn rooms_mut(&mut self) -> impl Iterator<Item = &mut Room> {
        self.rooms.iter_mut()
    }

    pub fn active_coord(&self) -> RoomCoord {
        self.active
    }

    pub fn active_room(&self) -> &Room {
        &self.rooms[self.active.row * self.rooms_x + self.active.col]
    }

    pub fn active_room_mut(&mut self) -> &mut Room {
        let i = self.active.row * self.rooms_x + self.active.col;
        &mut self.rooms[i]
    }

    /// Make `coord` the active room, running its init hook on first entry.
    ///
    /// Returns true if the init hook ran during this call.
    pub fn set_active_room(&mut self, coord: RoomCoord) -> Result<bool, LevelError> {
        let i = self.slot(coord)?;
        self.active = coord;
        let first = self.rooms[i].activate();
        tracing::info!(room = %coord, first_entry = first, "active room changed");
        Ok(first)
    }

    /// Coordinate of the room adjoining `coord` across `edge`, if any.
    pub fn neighbor(&self, coord: RoomCoord, edge: Edge) -> Option<RoomCoord> {
        let next = match edge {
            Edge::Left => RoomCoord::new(coord.row, coord.col.checked_sub(1)?),
            Edge::Right => RoomCoord::new(coord.row, coord.col + 1),
            Edge::Top => RoomCoord::new(coord.row.checked_sub(1)?, coord.col),
            Edge::Bottom => RoomCoord::new(coord.row + 1, coord.col),
        };
        self.contains_room(next).then_some(next)
    }

    pub fn start_room(&self) -> RoomCoord {
        self.start
    }

    pub fn set_start_room(&mut self, coord: RoomCoord) -> Result<(), LevelError> {
        self.slot(coord)?;
        self.start = coord;
        Ok(())
    }

    /// Player spawn position in pixels, relative to the start room.
    pub fn player_start(&self) -> DVec2 {
        self.player_start
    }

    pub fn set_player_start(&mut self, pos: DVec2) {
        self.player_start = pos;
    }
}
