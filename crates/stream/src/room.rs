use tileworld_common::{COLUMN_COUNT, ROW_COUNT, RoomCoord, SolidFlags};
use tileworld_objects::{Kind, ObjectStore, ObjectType, TypeId, object_type};

/// One-time initialisation run the first time a room becomes active.
pub type RoomInit = Box<dyn FnOnce(&mut Room) + Send>;

/// One screen of the level: a fixed tile grid plus the objects living in it.
///
/// Grid cells hold shared descriptors; dynamic objects are owned by
/// `objects`.
pub struct Room {
    coord: RoomCoord,
    cells: [[&'static ObjectType; COLUMN_COUNT]; ROW_COUNT],
    pub objects: ObjectStore,
    init: Option<RoomInit>,
    initialized: bool,
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("coord", &self.coord)
            .field("objects", &self.objects.len())
            .field("has_init", &self.init.is_some())
            .field("initialized", &self.initialized)
            .finish()
    }
}

impl Room {
    /// An empty room: every cell is `TypeId::None`, no objects.
    pub fn new(coord: RoomCoord) -> Self {
        Self {
            coord,
            cells: [[object_type(TypeId::None); COLUMN_COUNT]; ROW_COUNT],
            objects: ObjectStore::new(),
            init: None,
            initialized: false,
        }
    }

    pub fn coord(&self) -> RoomCoord {
        self.coord
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Install the hook run on first activation. Has no effect once the room
    /// has been activated.
    pub fn set_init(&mut self, init: impl FnOnce(&mut Room) + Send + 'static) {
        if !self.initialized {
            self.init = Some(Box::new(init));
        }
    }

    /// Mark the room active, running its init hook the first time only.
    /// Returns true on the first activation.
    pub fn activate(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;
        if let Some(init) = self.init.take() {
            init(self);
        }
        true
    }

    pub fn is_valid(r: i32, c: i32) -> bool {
        r >= 0 && r < ROW_COUNT as i32 && c >= 0 && c < COLUMN_COUNT as i32
    }

    /// Descriptor at `(r, c)`, or `None` outside the grid.
    pub fn cell(&self, r: i32, c: i32) -> Option<&'static ObjectType> {
        if Self::is_valid(r, c) {
            Some(self.cells[r as usize][c as usize])
        } else {
            None
        }
    }

    /// Replace the descriptor at `(r, c)`. Returns false outside the grid.
    pub fn set_cell(&mut self, r: i32, c: i32, ty: &'static ObjectType) -> bool {
        if !Self::is_valid(r, c) {
            return false;
        }
        self.cells[r as usize][c as usize] = ty;
        true
    }

    /// Row-major view of the grid.
    pub fn rows(&self) -> &[[&'static ObjectType; COLUMN_COUNT]; ROW_COUNT] {
        &self.cells
    }

    /// True only if every edge in `flags` is solid at `(r, c)`.
    pub fn is_solid(&self, r: i32, c: i32, flags: SolidFlags) -> bool {
        self.cell(r, c).is_some_and(|t| t.solid.contains(flags))
    }

    /// True if no edge of `(r, c)` is solid. Out-of-bounds cells are open.
    pub fn is_passable_edge(&self, r: i32, c: i32) -> bool {
        self.cell(r, c).is_none_or(|t| !t.solid.is_any())
    }

    pub fn is_ladder(&self, r: i32, c: i32) -> bool {
        self.contains(r, c, Kind::Ladder)
    }

    /// A ladder cell an actor may attach to: one that rests beside solid
    /// ground below-left or below-right, or the top cell of a ladder stack.
    pub fn is_climbable_ladder(&self, r: i32, c: i32) -> bool {
        self.is_ladder(r, c)
            && (self.is_solid(r + 1, c - 1, SolidFlags::TOP)
                || self.is_solid(r + 1, c + 1, SolidFlags::TOP)
                || !self.is_ladder(r - 1, c))
    }

    pub fn is_water(&self, r: i32, c: i32) -> bool {
        self.contains(r, c, Kind::Water)
    }

    pub fn contains(&self, r: i32, c: i32, kind: Kind) -> bool {
        self.cell(r, c).is_some_and(|t| t.kind == kind)
    }

    /// Column of a door at `(r, c)` or directly beside it, checking the
    /// centre first, then left, then right.
    pub fn find_near_door(&self, r: i32, c: i32) -> Option<i32> {
        [c, c - 1, c + 1]
            .into_iter()
            .find(|&col| self.contains(r, col, Kind::Door))
    }

    /// Slot of the most recently added live item whose home cell is `(r, c)`.
    pub fn find_near_item(&self, r: i32, c: i32) -> Option<usize> {
        self.objects
            .iter()
            .enumerate()
            .rev()
            .find(|(_, o)| {
                o.ty.kind == Kind::Item && o.is_alive() && {
                    let home = o.home_cell();
                    home.row == r && home.col == c
                }
            })
            .map(|(i, _)| i)
    }

    /// Slot of the first object of the given type.
    pub fn find_object(&self, type_id: TypeId) -> Option<usize> {
        self.objects.iter().position(|o| o.type_id() == type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tileworld_objects::Object;

    fn room() -> Room {
        Room::new(RoomCoord::new(0, 0))
    }

    fn put(room: &mut Room, r: i32, c: i32, t: TypeId) {
        assert!(room.set_cell(r, c, object_type(t)));
    }

    #[test]
    fn out_of_bounds_queries_are_safe_defaults() {
        let mut room = room();
        for r in 0..ROW_COUNT as i32 {
            for c in 0..COLUMN_COUNT as i32 {
                put(&mut room, r, c, TypeId::Water);
            }
        }
        let outside = [
            (-1, 0),
            (0, -1),
            (ROW_COUNT as i32, 0),
            (0, COLUMN_COUNT as i32),
            (i32::MIN, i32::MAX),
        ];
        for (r, c) in outside {
            assert!(!room.is_solid(r, c, SolidFlags::TOP));
            assert!(!room.is_ladder(r, c));
            assert!(!room.is_climbable_ladder(r, c));
            assert!(!room.is_water(r, c));
            assert!(!room.contains(r, c, Kind::Water));
            assert!(room.is_passable_edge(r, c));
            assert!(room.cell(r, c).is_none());
        }
    }

    #[test]
    fn set_cell_rejects_out_of_bounds() {
        let mut room = room();
        assert!(!room.set_cell(-1, 0, object_type(TypeId::Wall)));
        assert!(!room.set_cell(0, COLUMN_COUNT as i32, object_type(TypeId::Wall)));
    }

    #[test]
    fn solidity_requires_all_flags() {
        let mut room = room();
        put(&mut room, 2, 2, TypeId::WallStair); // solid on top only
        assert!(room.is_solid(2, 2, SolidFlags::TOP));
        assert!(!room.is_solid(2, 2, SolidFlags::LEFT));
        assert!(!room.is_solid(2, 2, SolidFlags::TOP | SolidFlags::BOTTOM));
        assert!(!room.is_passable_edge(2, 2));

        put(&mut room, 3, 3, TypeId::Wall);
        assert!(room.is_solid(3, 3, SolidFlags::ALL));
        assert!(room.is_passable_edge(4, 4));
    }

    #[test]
    fn top_of_ladder_stack_is_climbable() {
        let mut room = room();
        for r in 4..=6 {
            put(&mut room, r, 5, TypeId::Ladder);
        }
        assert!(room.is_climbable_ladder(4, 5));
        assert!(!room.is_climbable_ladder(5, 5));
        assert!(!room.is_climbable_ladder(6, 5));
        assert!(!room.is_climbable_ladder(7, 5));
    }

    #[test]
    fn ladder_beside_ground_below_is_climbable() {
        let mut room = room();
        for r in 4..=6 {
            put(&mut room, r, 5, TypeId::Ladder);
        }
        put(&mut room, 7, 4, TypeId::Ground);
        assert!(room.is_climbable_ladder(6, 5));
        assert!(!room.is_climbable_ladder(5, 5));

        put(&mut room, 6, 6, TypeId::WallStair);
        assert!(room.is_climbable_ladder(5, 5));
    }

    #[test]
    fn door_search_prefers_center_then_left() {
        let mut room = room();
        put(&mut room, 3, 4, TypeId::Door);
        put(&mut room, 3, 6, TypeId::Door);
        assert_eq!(room.find_near_door(3, 5), Some(4));
        assert_eq!(room.find_near_door(3, 6), Some(6));
        assert_eq!(room.find_near_door(3, 7), Some(6));
        assert_eq!(room.find_near_door(4, 5), None);
        assert_eq!(room.find_near_door(-1, 5), None);
    }

    #[test]
    fn find_near_item_returns_latest_live_item() {
        let mut room = room();
        room.objects.push(Object::at_cell(TypeId::Apple, 2, 3));
        room.objects.push(Object::at_cell(TypeId::Pear, 2, 3));
        room.objects.push(Object::at_cell(TypeId::Coin, 2, 3));
        assert_eq!(room.find_near_item(2, 3), Some(1));

        room.objects.get_mut(1).unwrap().remove();
        assert_eq!(room.find_near_item(2, 3), Some(0));
        assert_eq!(room.find_near_item(2, 4), None);
    }

    #[test]
    fn find_object_by_type() {
        let mut room = room();
        room.objects.push(Object::at_cell(TypeId::Rat, 1, 1));
        room.objects.push(Object::at_cell(TypeId::Statuary, 1, 2));
        assert_eq!(room.find_object(TypeId::Statuary), Some(1));
        assert_eq!(room.find_object(TypeId::Bat), None);
    }

    #[test]
    fn init_runs_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut room = room();
        let counter = Arc::clone(&count);
        room.set_init(move |room| {
            counter.fetch_add(1, Ordering::SeqCst);
            room.set_cell(0, 0, object_type(TypeId::Wall));
        });

        assert!(room.activate());
        assert!(!room.activate());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(room.is_solid(0, 0, SolidFlags::ALL));
        assert!(room.is_initialized());
    }
}
