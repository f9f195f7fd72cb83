use tileworld_common::{CELL_COUNT, COLUMN_COUNT, CellCoord, ROW_COUNT, RoomCoord};
use tileworld_kernel::{SYMBOLS, build_level};
use tileworld_stream::{Level, LevelError};

/// Errors from edit operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("unknown level symbol {0:?}")]
    UnknownSymbol(char),
    #[error("room {0} is outside the level")]
    RoomOutOfRange(RoomCoord),
    #[error("cell ({}, {}) is outside the room", .0.row, .0.col)]
    CellOutOfRange(CellCoord),
    #[error("level source has {actual} cells, expected {expected}")]
    Length { expected: usize, actual: usize },
}

fn is_symbol(symbol: char) -> bool {
    symbol == ' ' || SYMBOLS.contains(symbol)
}

/// A level's character grid being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelGrid {
    rooms_y: usize,
    rooms_x: usize,
    symbols: Vec<char>,
}

impl LevelGrid {
    /// An all-empty grid.
    pub fn blank(rooms_y: usize, rooms_x: usize) -> Self {
        Self {
            rooms_y,
            rooms_x,
            symbols: vec![' '; rooms_y * rooms_x * CELL_COUNT],
        }
    }

    /// Wrap a flat, newline-free level source. Unknown symbols are kept
    /// as-is; the level builder treats them as empty.
    pub fn from_source(source: &str, rooms_y: usize, rooms_x: usize) -> Result<Self, EditError> {
        let symbols: Vec<char> = source.chars().collect();
        let expected = rooms_y * rooms_x * CELL_COUNT;
        if symbols.len() != expected {
            return Err(EditError::Length {
                expected,
                actual: symbols.len(),
            });
        }
        Ok(Self {
            rooms_y,
            rooms_x,
            symbols,
        })
    }

    pub fn rooms_y(&self) -> usize {
        self.rooms_y
    }

    pub fn rooms_x(&self) -> usize {
        self.rooms_x
    }

    fn index(&self, room: RoomCoord, cell: CellCoord) -> Result<usize, EditError> {
        if room.row >= self.rooms_y || room.col >= self.rooms_x {
            return Err(EditError::RoomOutOfRange(room));
        }
        if cell.row < 0 || cell.row >= ROW_COUNT as i32 || cell.col < 0 || cell.col >= COLUMN_COUNT as i32 {
            return Err(EditError::CellOutOfRange(cell));
        }
        let stride = self.rooms_x * COLUMN_COUNT;
        let world_row = room.row * ROW_COUNT + cell.row as usize;
        let world_col = room.col * COLUMN_COUNT + cell.col as usize;
        Ok(world_row * stride + world_col)
    }

    pub fn symbol(&self, room: RoomCoord, cell: CellCoord) -> Result<char, EditError> {
        self.index(room, cell).map(|i| self.symbols[i])
    }

    /// Write a symbol and return the one it replaced.
    fn replace(&mut self, room: RoomCoord, cell: CellCoord, symbol: char) -> Result<char, EditError> {
        let i = self.index(room, cell)?;
        Ok(std::mem::replace(&mut self.symbols[i], symbol))
    }

    /// The flat source, ready for the level builder.
    pub fn to_source_string(&self) -> String {
        self.symbols.iter().collect()
    }

    /// Populate a playable level from the current grid.
    pub fn build(&self) -> Result<Level, LevelError> {
        build_level(&self.to_source_string(), self.rooms_y, self.rooms_x)
    }
}

/// An editing command that can be applied to the grid and reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    /// Replace one cell's symbol. Undo = restore the old symbol.
    SetCell {
        room: RoomCoord,
        cell: CellCoord,
        old: char,
        new: char,
    },
}

impl EditCommand {
    /// Produce the inverse command (for undo).
    pub fn inverse(&self) -> Self {
        match *self {
            Self::SetCell { room, cell, old, new } => Self::SetCell {
                room,
                cell,
                old: new,
                new: old,
            },
        }
    }
}

/// Editor with undo/redo support for non-destructive level painting.
#[derive(Debug, Default)]
pub struct Editor {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint `symbol` into a cell and push to the undo stack.
    pub fn set_cell(
        &mut self,
        grid: &mut LevelGrid,
        room: RoomCoord,
        cell: CellCoord,
        symbol: char,
    ) -> Result<(), EditError> {
        if !is_symbol(symbol) {
            return Err(EditError::UnknownSymbol(symbol));
        }
        let old = grid.replace(room, cell, symbol)?;
        tracing::debug!(%room, row = cell.row, col = cell.col, ?old, new = ?symbol, "cell painted");
        self.undo_stack.push(EditCommand::SetCell {
            room,
            cell,
            old,
            new: symbol,
        });
        self.redo_stack.clear();
        Ok(())
    }

    /// Cycle a cell through empty, wall and ground.
    pub fn cycle_cell(&mut self, grid: &mut LevelGrid, room: RoomCoord, cell: CellCoord) -> Result<char, EditError> {
        let next = match grid.symbol(room, cell)? {
            ' ' => '*',
            '*' => 'x',
            _ => ' ',
        };
        self.set_cell(grid, room, cell, next)?;
        Ok(next)
    }

    /// Undo the last edit. Returns true if an operation was undone.
    pub fn undo(&mut self, grid: &mut LevelGrid) -> bool {
        let Some(cmd) = self.undo_stack.pop() else {
            return false;
        };
        apply_command(grid, &cmd.inverse());
        self.redo_stack.push(cmd);
        true
    }

    /// Redo the last undone edit. Returns true if an operation was redone.
    pub fn redo(&mut self, grid: &mut LevelGrid) -> bool {
        let Some(cmd) = self.redo_stack.pop() else {
            return false;
        };
        apply_command(grid, &cmd);
        self.undo_stack.push(cmd);
        true
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

fn apply_command(grid: &mut LevelGrid, cmd: &EditCommand) {
    match *cmd {
        EditCommand::SetCell { room, cell, new, .. } => {
            // recorded commands were validated when first applied
            let _ = grid.replace(room, cell, new);
        }
    }
}
