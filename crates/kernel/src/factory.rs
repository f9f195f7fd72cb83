//! Object construction and level population from a character grid.

use glam::DVec2;
use tileworld_common::{CELL_SIZE, CellCoord, COLUMN_COUNT, ROW_COUNT, RoomCoord};
use tileworld_objects::{Object, TypeId, object_type};
use tileworld_stream::{Level, LevelError, Room};

use crate::behavior::behavior;

/// Every symbol the level source understands. Anything else is empty space.
pub const SYMBOLS: &str = "*x~|^-,.;@=doOkhaiSgsprbqfe`_/<>&!123456789P";

/// Write a type into the room's cell grid. Out-of-bounds cells are ignored.
pub fn create_static_object(room: &mut Room, type_id: TypeId, r: i32, c: i32) {
    room.set_cell(r, c, object_type(type_id));
}

/// Create an object at the top-left corner of cell `(r, c)`, initialise it,
/// and append it to the room. The returned object can be customised further.
pub fn create_dynamic_object(room: &mut Room, type_id: TypeId, r: i32, c: i32) -> &mut Object {
    let pos = DVec2::new((CELL_SIZE * c) as f64, (CELL_SIZE * r) as f64);
    spawn(room, type_id, pos)
}

/// Create, initialise and append an object at an arbitrary pixel position.
pub fn spawn(room: &mut Room, type_id: TypeId, pos: DVec2) -> &mut Object {
    let mut object = Object::new(type_id);
    object.pos = pos;
    object.origin = pos;
    behavior(object.ty.behavior).on_init(&mut object);
    tracing::debug!(?type_id, x = pos.x, y = pos.y, "object spawned");
    room.objects.push_mut(object)
}

/// What a single source symbol turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Empty,
    Static(TypeId),
    Dynamic(TypeId),
    /// A drop hanging from the ceiling of its cell.
    Drop,
    /// A numbered trigger.
    Trigger(i32),
    PlayerStart,
}

fn is_block(symbol: char) -> bool {
    symbol == '*' || symbol == 'x'
}

/// Decide what `symbol` at cell `(r, c)` places, given the symbols directly
/// above and below it in the same room (`'\0'` outside the room).
pub fn placement(symbol: char, above: char, below: char, r: i32, c: i32) -> Placement {
    use Placement::{Dynamic, Static};

    let top_row = r == 0;
    match symbol {
        '*' | 'x' => {
            let plain = top_row || is_block(above);
            Static(match (symbol, plain) {
                ('*', true) => TypeId::Wall,
                ('*', false) => TypeId::WallTop,
                (_, true) => TypeId::Ground,
                (_, false) => TypeId::GroundTop,
            })
        }
        '~' => {
            if top_row || above == '~' || is_block(above) {
                Static(TypeId::Water)
            } else {
                Dynamic(TypeId::WaterTop)
            }
        }
        '|' => {
            if top_row || is_block(above) {
                Static(TypeId::PillarTop)
            } else if r == ROW_COUNT as i32 - 1 || is_block(below) {
                Static(TypeId::PillarBottom)
            } else {
                Static(TypeId::Pillar)
            }
        }
        '^' if is_block(above) => Static(TypeId::SpikeTop),
        '^' => Static(TypeId::SpikeBottom),
        '-' => Static(TypeId::WallStair),
        ',' if (c + 1) % 3 != 0 => Static(TypeId::Grass),
        ',' => Static(TypeId::GrassBig),
        '.' => Static(match c % 3 {
            0 => TypeId::Mushroom1,
            1 => TypeId::Mushroom2,
            _ => TypeId::Mushroom3,
        }),
        ';' if c % 2 == 1 => Static(TypeId::Tree1),
        ';' => Static(TypeId::Tree2),
        '@' => Static(TypeId::Rock),
        '=' => Static(TypeId::Ladder),
        'd' => Static(TypeId::Door),
        '<' => Static(TypeId::ArrowLeft),
        '>' => Static(TypeId::ArrowRight),
        'o' => Dynamic(TypeId::Coin),
        'O' => Dynamic(TypeId::Gem),
        'k' => Dynamic(TypeId::Key),
        'h' => Dynamic(TypeId::Heart),
        'a' => Dynamic(TypeId::Apple),
        'i' => Dynamic(TypeId::Pear),
        'S' => Dynamic(TypeId::Statuary),
        'g' => Dynamic(TypeId::Ghost),
        's' => Dynamic(TypeId::Scorpion),
        'p' => Dynamic(TypeId::Spider),
        'r' => Dynamic(TypeId::Rat),
        'b' => Dynamic(TypeId::Bat),
        'q' => Dynamic(TypeId::Blob),
        'f' => Dynamic(TypeId::Fireball),
        'e' => Dynamic(TypeId::Skeleton),
        '_' => Dynamic(TypeId::Platform),
        '/' => Dynamic(TypeId::Spring),
        '&' => Dynamic(TypeId::Cloud1),
        '!' => Dynamic(TypeId::Torch),
        '`' => Placement::Drop,
        '1'..='9' => Placement::Trigger(symbol as i32 - '0' as i32),
        'P' => Placement::PlayerStart,
        _ => Placement::Empty,
    }
}

/// Row-major view of a whole level's source, one symbol per cell.
struct Source<'a> {
    symbols: &'a [char],
    rooms_x: usize,
}

impl Source<'_> {
    /// Symbol at cell `(r, c)` of room `room`; `'\0'` for rows outside it.
    fn at(&self, room: RoomCoord, r: i32, c: i32) -> char {
        if r < 0 || r >= ROW_COUNT as i32 || c < 0 || c >= COLUMN_COUNT as i32 {
            return '\0';
        }
        let stride = COLUMN_COUNT * self.rooms_x;
        let start = room.row * ROW_COUNT * stride + room.col * COLUMN_COUNT;
        self.symbols[start + r as usize * stride + c as usize]
    }
}

/// Populate a `rooms_y` x `rooms_x` level from its character grid.
///
/// The source is row-major over the whole world: world row
/// `room_row * ROW_COUNT + r`, world column `room_col * COLUMN_COUNT + c`.
/// Newlines must already be stripped.
pub fn build_level(source: &str, rooms_y: usize, rooms_x: usize) -> Result<Level, LevelError> {
    let _span = tracing::info_span!("build_level", rooms_y, rooms_x).entered();

    let mut level = Level::new(rooms_y, rooms_x)?;
    let symbols: Vec<char> = source.chars().collect();
    if symbols.len() != level.source_len() {
        return Err(LevelError::SourceLength {
            expected: level.source_len(),
            actual: symbols.len(),
        });
    }
    let source = Source {
        symbols: &symbols,
        rooms_x,
    };

    let mut start: Option<(RoomCoord, CellCoord)> = None;
    for room in level.rooms_mut() {
        let coord = room.coord();
        for r in 0..ROW_COUNT as i32 {
            for c in 0..COLUMN_COUNT as i32 {
                let symbol = source.at(coord, r, c);
                let above = source.at(coord, r - 1, c);
                let below = source.at(coord, r + 1, c);
                match placement(symbol, above, below, r, c) {
                    Placement::Empty => {}
                    Placement::Static(t) => create_static_object(room, t, r, c),
                    Placement::Dynamic(t) => {
                        create_dynamic_object(room, t, r, c);
                    }
                    Placement::Drop => {
                        let drop = create_dynamic_object(room, TypeId::Drop, r, c);
                        let lift = (CELL_SIZE as f64 - drop.ty.body.h) / 2.0 + 1.0;
                        drop.pos.y -= lift;
                        drop.origin = drop.pos;
                    }
                    Placement::Trigger(n) => {
                        create_dynamic_object(room, TypeId::Action, r, c).data = n;
                    }
                    Placement::PlayerStart => start = Some((coord, CellCoord::new(r, c))),
                }
            }
        }
        room.objects.sort_by_depth();
    }

    let (room, cell) = start.ok_or(LevelError::MissingPlayerStart)?;
    level.set_player_start(DVec2::new(
        (CELL_SIZE * cell.col) as f64,
        (CELL_SIZE * cell.row) as f64,
    ));
    level.set_start_room(room)?;
    level.set_active_room(room)?;
    tracing::info!(
        start_row = room.row,
        start_col = room.col,
        objects = level.rooms().map(|r| r.objects.len()).sum::<usize>(),
        "level built"
    );
    Ok(level)
}
