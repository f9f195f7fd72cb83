use glam::DVec2;
use tileworld_common::{
    Borders, CELL_HALF, CELL_SIZE, COLUMN_COUNT, LEVEL_HEIGHT, LEVEL_WIDTH, ROW_COUNT, RoomCoord,
    SolidFlags, limit_absolute,
};
use tileworld_objects::{Object, TypeId};
use tileworld_stream::{Edge, Level, LevelError, Room};

use crate::config::SimConfig;

/// An object driven by the tile resolver.
#[derive(Debug, Clone)]
pub struct Actor {
    pub object: Object,
    pub on_ladder: bool,
    pub in_air: bool,
}

impl Actor {
    pub fn new(type_id: TypeId) -> Self {
        Self {
            object: Object::new(type_id),
            on_ladder: false,
            in_air: false,
        }
    }

    /// Leave ladder mode and show the idle frame.
    pub(crate) fn drop_ladder(&mut self) {
        self.on_ladder = false;
        self.object.anim.set(0, 0, 0.0);
    }
}

/// Speed limits used by [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub max_speed: f64,
    pub gravity: f64,
    pub max_fall_speed: f64,
}

impl Motion {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            max_speed: config.max_speed,
            gravity: config.player.gravity,
            max_fall_speed: config.player.max_fall_speed,
        }
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

/// What happened to the actor during one resolver pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// The room that became active, if the actor crossed into one.
    pub entered_room: Option<RoomCoord>,
    /// The actor dropped out of the bottom of the bottom-most room.
    pub fell_out: bool,
    /// The actor's home cell is water.
    pub in_water: bool,
}

fn sprite_borders(pos: DVec2) -> Borders {
    let size = CELL_SIZE as f64;
    Borders::from_origin(pos.x, pos.y, size, size)
}

fn cell_borders(r: i32, c: i32) -> Borders {
    let size = CELL_SIZE as f64;
    Borders::from_origin((c * CELL_SIZE) as f64, (r * CELL_SIZE) as f64, size, size)
}

/// True if `room` has no solid edge at the cell where it adjoins a moving
/// actor. The row/column is clamped onto the grid.
fn edge_open(room: &Room, r: i32, c: i32) -> bool {
    let r = r.clamp(0, ROW_COUNT as i32 - 1);
    let c = c.clamp(0, COLUMN_COUNT as i32 - 1);
    room.is_passable_edge(r, c)
}

/// Move `actor` by one frame against the active room's tiles.
///
/// Horizontal movement is integrated and resolved strictly before vertical;
/// both use the home cell taken before either axis moved. After collision
/// the actor may cross into a neighbouring room, then gravity and ladder
/// detachment apply.
pub fn resolve(
    level: &mut Level,
    actor: &mut Actor,
    dt_ms: f64,
    motion: &Motion,
) -> Result<Resolution, LevelError> {
    let mut out = Resolution::default();
    let dt = dt_ms / 1000.0;
    let body = actor.object.ty.body;
    let hit_w = (CELL_SIZE as f64 - body.w) / 2.0;
    let hit_h = hit_w;

    let home = actor.object.home_cell();
    let (r, c) = (home.row, home.col);
    let cell = cell_borders(r, c);

    let obj = &mut actor.object;
    obj.vel.x = limit_absolute(obj.vel.x, motion.max_speed);
    obj.vel.y = limit_absolute(obj.vel.y, motion.max_speed);

    {
        let room = level.active_room();

        obj.pos.x += obj.vel.x * dt;
        let sprite = sprite_borders(obj.pos);
        if sprite.left < cell.left && obj.vel.x <= 0.0 {
            let flag = SolidFlags::RIGHT;
            if room.is_solid(r, c - 1, flag)
                || (sprite.top + hit_h < cell.top && room.is_solid(r - 1, c - 1, flag))
                || (sprite.bottom - hit_h > cell.bottom && room.is_solid(r + 1, c - 1, flag))
            {
                obj.pos.x = cell.left;
                obj.vel.x = 0.0;
            }
        } else if sprite.right > cell.right && obj.vel.x >= 0.0 {
            let flag = SolidFlags::LEFT;
            if room.is_solid(r, c + 1, flag)
                || (sprite.top + hit_h < cell.top && room.is_solid(r - 1, c + 1, flag))
                || (sprite.bottom - hit_h > cell.bottom && room.is_solid(r + 1, c + 1, flag))
            {
                obj.pos.x = cell.left;
                obj.vel.x = 0.0;
            }
        }

        obj.pos.y += obj.vel.y * dt;
        let sprite = sprite_borders(obj.pos);
        if sprite.bottom > cell.bottom && obj.vel.y >= 0.0 {
            let flag = SolidFlags::TOP;
            if room.is_solid(r + 1, c, flag)
                || (sprite.left + hit_w < cell.left && room.is_solid(r + 1, c - 1, flag))
                || (sprite.right - hit_w > cell.right && room.is_solid(r + 1, c + 1, flag))
                || (!actor.on_ladder && room.is_climbable_ladder(r + 1, c))
            {
                let obj = &mut actor.object;
                obj.pos.y = cell.top;
                obj.vel.y = 0.0;
                actor.in_air = false;
                if actor.on_ladder {
                    actor.drop_ladder();
                }
            } else {
                actor.in_air = !actor.on_ladder;
            }
        } else if sprite.top < cell.top && obj.vel.y <= 0.0 {
            let flag = SolidFlags::BOTTOM;
            if room.is_solid(r - 1, c, flag)
                || (sprite.left + hit_w < cell.left && room.is_solid(r - 1, c - 1, flag))
                || (sprite.right - hit_w > cell.right && room.is_solid(r - 1, c + 1, flag))
            {
                obj.pos.y = cell.top;
                obj.vel.y += 1.0;
            }
            actor.in_air = !actor.on_ladder;
        }
    }

    cross_room_edges(level, actor, &mut out)?;

    let home = actor.object.home_cell();
    let (r, c) = (home.row, home.col);
    let room = level.active_room();
    let obj = &mut actor.object;

    if !actor.on_ladder {
        obj.vel.y = (obj.vel.y + motion.gravity * dt).min(motion.max_fall_speed);
    }

    if actor.on_ladder && !room.is_climbable_ladder(r, c) {
        actor.drop_ladder();
        let obj = &mut actor.object;
        if obj.vel.y < 0.0 {
            obj.vel.y = 0.0;
            obj.pos.y = (CELL_SIZE * r) as f64;
        }
    }

    out.in_water = room.is_water(r, c);
    Ok(out)
}

/// Room-boundary pass: switch rooms once the sprite centre passes an open
/// edge, clamp against closed or missing neighbours.
fn cross_room_edges(
    level: &mut Level,
    actor: &mut Actor,
    out: &mut Resolution,
) -> Result<(), LevelError> {
    let home = actor.object.home_cell();
    let (r, c) = (home.row, home.col);
    let here = level.active_coord();
    let width = LEVEL_WIDTH as f64;
    let height = LEVEL_HEIGHT as f64;
    let half = CELL_HALF as f64;
    let size = CELL_SIZE as f64;
    let body_h = actor.object.ty.body.h;

    let open = |level: &Level, edge: Edge, r: i32, c: i32| {
        level
            .neighbor(here, edge)
            .filter(|n| level.room(*n).is_some_and(|room| edge_open(room, r, c)))
    };

    let pos = &mut actor.object.pos;
    if pos.x < 0.0 {
        match open(level, Edge::Left, r, COLUMN_COUNT as i32 - 1) {
            Some(next) => {
                if pos.x + half < 0.0 {
                    level.set_active_room(next)?;
                    pos.x = width - half - 1.0;
                    out.entered_room = Some(next);
                }
            }
            None => pos.x = 0.0,
        }
    } else if pos.x + size > width {
        match open(level, Edge::Right, r, 0) {
            Some(next) => {
                if pos.x + half > width {
                    level.set_active_room(next)?;
                    pos.x = -half + 1.0;
                    out.entered_room = Some(next);
                }
            }
            None => pos.x = width - size,
        }
    }

    if pos.y + body_h > height {
        match level.neighbor(here, Edge::Bottom) {
            Some(next) => {
                if level.room(next).is_some_and(|room| edge_open(room, 0, c)) {
                    if pos.y + half > height {
                        level.set_active_room(next)?;
                        pos.y = -half + 1.0;
                        out.entered_room = Some(next);
                    }
                } else {
                    pos.y = height - body_h;
                    actor.in_air = false;
                }
            }
            None => out.fell_out = true,
        }
    } else if pos.y < 0.0 {
        match open(level, Edge::Top, ROW_COUNT as i32 - 1, c) {
            Some(next) => {
                if pos.y + half < 0.0 {
                    level.set_active_room(next)?;
                    pos.y = height - half - 1.0;
                    out.entered_room = Some(next);
                }
            }
            None => pos.y = 0.0,
        }
    }

    if let Some(room) = out.entered_room {
        tracing::debug!(%room, x = pos.x, y = pos.y, "actor crossed into room");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileworld_objects::object_type;

    fn player_at(x: f64, y: f64) -> Actor {
        let mut actor = Actor::new(TypeId::Player);
        actor.object.pos = DVec2::new(x, y);
        actor
    }

    fn level(rooms_y: usize, rooms_x: usize) -> Level {
        let mut level = Level::new(rooms_y, rooms_x).unwrap();
        level.set_active_room(RoomCoord::new(0, 0)).unwrap();
        level
    }

    fn put(level: &mut Level, room: RoomCoord, r: i32, c: i32, t: TypeId) {
        level.room_mut(room).unwrap().set_cell(r, c, object_type(t));
    }

    #[test]
    fn velocity_is_clamped_on_both_axes() {
        let mut level = level(1, 1);
        let mut actor = player_at(64.0, 64.0);
        actor.object.vel = DVec2::new(-10_000.0, 10_000.0);
        let motion = Motion {
            gravity: 0.0,
            ..Motion::default()
        };
        resolve(&mut level, &mut actor, 10.0, &motion).unwrap();
        // 384 px/s for 10 ms
        assert!((actor.object.pos.x - (64.0 - 3.84)).abs() < 1e-9);
        assert!((actor.object.pos.y - (64.0 + 3.84)).abs() < 1e-9);
    }

    #[test]
    fn horizontal_is_resolved_before_vertical() {
        // A single wall diagonally below-right of the player. Moving X first
        // carries the sprite over the wall, which then catches the fall.
        // Resolving Y first would instead drop the player and block X.
        let mut level = level(1, 1);
        put(&mut level, RoomCoord::new(0, 0), 6, 6, TypeId::Wall);
        let mut actor = player_at(80.0, 80.0);
        actor.object.vel = DVec2::new(300.0, 300.0);
        let motion = Motion {
            gravity: 0.0,
            ..Motion::default()
        };

        resolve(&mut level, &mut actor, 25.0, &motion).unwrap();

        assert_eq!(actor.object.pos, DVec2::new(87.5, 80.0));
        assert_eq!(actor.object.vel, DVec2::new(300.0, 0.0));
        assert!(!actor.in_air);
    }

    #[test]
    fn wall_blocks_and_snaps_horizontally() {
        let mut level = level(1, 1);
        put(&mut level, RoomCoord::new(0, 0), 5, 4, TypeId::Wall);
        let mut actor = player_at(80.0, 80.0);
        actor.object.vel = DVec2::new(-72.0, 0.0);
        resolve(&mut level, &mut actor, 20.0, &Motion::default()).unwrap();
        assert_eq!(actor.object.pos.x, 80.0);
        assert_eq!(actor.object.vel.x, 0.0);
    }

    #[test]
    fn landing_on_ground_clears_air_state() {
        let mut level = level(1, 1);
        put(&mut level, RoomCoord::new(0, 0), 6, 5, TypeId::Ground);
        let mut actor = player_at(80.0, 82.0);
        actor.in_air = true;
        actor.object.vel = DVec2::new(0.0, 100.0);
        resolve(&mut level, &mut actor, 20.0, &Motion::default()).unwrap();
        assert_eq!(actor.object.pos.y, 80.0);
        assert!(!actor.in_air);
        // gravity applies after the landing
        assert!(actor.object.vel.y > 0.0);
    }

    #[test]
    fn head_bump_nudges_velocity() {
        let mut level = level(1, 1);
        put(&mut level, RoomCoord::new(0, 0), 4, 5, TypeId::Wall);
        let mut actor = player_at(80.0, 80.0);
        actor.object.vel = DVec2::new(0.0, -216.0);
        let motion = Motion {
            gravity: 0.0,
            ..Motion::default()
        };
        resolve(&mut level, &mut actor, 20.0, &motion).unwrap();
        assert_eq!(actor.object.pos.y, 80.0);
        assert_eq!(actor.object.vel.y, -215.0);
        assert!(actor.in_air);
    }

    #[test]
    fn gravity_is_capped_at_max_fall_speed() {
        let mut level = level(1, 1);
        let mut actor = player_at(80.0, 16.0);
        actor.object.vel.y = 110.0;
        resolve(&mut level, &mut actor, 40.0, &Motion::default()).unwrap();
        assert_eq!(actor.object.vel.y, 120.0);
    }

    #[test]
    fn ladder_state_drops_off_a_non_climbable_cell() {
        let mut level = level(1, 1);
        let mut actor = player_at(80.0, 84.0);
        actor.on_ladder = true;
        actor.object.vel.y = -48.0;
        let res = resolve(&mut level, &mut actor, 10.0, &Motion::default()).unwrap();
        assert!(!actor.on_ladder);
        assert_eq!(actor.object.vel.y, 0.0);
        assert_eq!(actor.object.pos.y, 80.0);
        assert!(!res.in_water);
    }

    #[test]
    fn crossing_right_edge_enters_neighbor() {
        let mut level = level(1, 2);
        let mut actor = player_at(313.0, 80.0);
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert_eq!(res.entered_room, Some(RoomCoord::new(0, 1)));
        assert_eq!(level.active_coord(), RoomCoord::new(0, 1));
        assert_eq!(actor.object.pos.x, -(CELL_HALF as f64) + 1.0);
        assert!(level.active_room().is_initialized());
    }

    #[test]
    fn before_the_midline_the_room_does_not_change() {
        let mut level = level(1, 2);
        let mut actor = player_at(311.0, 80.0);
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert_eq!(res.entered_room, None);
        assert_eq!(level.active_coord(), RoomCoord::new(0, 0));
        assert_eq!(actor.object.pos.x, 311.0);
    }

    #[test]
    fn missing_neighbor_clamps_at_right_edge() {
        let mut level = level(1, 1);
        let mut actor = player_at(313.0, 80.0);
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert_eq!(res.entered_room, None);
        assert_eq!(actor.object.pos.x, (LEVEL_WIDTH - CELL_SIZE) as f64);
    }

    #[test]
    fn solid_neighbor_edge_clamps() {
        let mut level = level(1, 2);
        put(&mut level, RoomCoord::new(0, 1), 5, 0, TypeId::Wall);
        let mut actor = player_at(313.0, 80.0);
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert_eq!(res.entered_room, None);
        assert_eq!(actor.object.pos.x, (LEVEL_WIDTH - CELL_SIZE) as f64);
    }

    #[test]
    fn crossing_left_edge_lands_near_right_side() {
        let mut level = Level::new(1, 2).unwrap();
        level.set_active_room(RoomCoord::new(0, 1)).unwrap();
        let mut actor = player_at(-9.0, 80.0);
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert_eq!(res.entered_room, Some(RoomCoord::new(0, 0)));
        assert_eq!(actor.object.pos.x, (LEVEL_WIDTH - CELL_HALF - 1) as f64);
    }

    #[test]
    fn falling_out_of_the_bottom_room_is_reported() {
        let mut level = level(1, 1);
        let mut actor = player_at(80.0, 180.0);
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert!(res.fell_out);
    }

    #[test]
    fn falling_into_the_room_below() {
        let mut level = level(2, 1);
        let mut actor = player_at(80.0, 186.0);
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert_eq!(res.entered_room, Some(RoomCoord::new(1, 0)));
        assert_eq!(actor.object.pos.y, -(CELL_HALF as f64) + 1.0);
    }

    #[test]
    fn ladder_top_holds_a_falling_actor() {
        let mut level = level(1, 1);
        for r in 7..=9 {
            put(&mut level, RoomCoord::new(0, 0), r, 5, TypeId::Ladder);
        }
        let mut actor = player_at(80.0, 96.0);
        actor.in_air = true;
        actor.object.vel = DVec2::new(0.0, 100.0);

        resolve(&mut level, &mut actor, 20.0, &Motion::default()).unwrap();

        assert_eq!(actor.object.pos, DVec2::new(80.0, 96.0));
        assert!(!actor.in_air);
        assert!(!actor.on_ladder);
    }

    #[test]
    fn ladder_top_lets_a_climber_through() {
        let mut level = level(1, 1);
        for r in 7..=9 {
            put(&mut level, RoomCoord::new(0, 0), r, 5, TypeId::Ladder);
        }
        let mut actor = player_at(80.0, 103.5);
        actor.on_ladder = true;
        actor.object.vel = DVec2::new(0.0, 48.0);

        resolve(&mut level, &mut actor, 20.0, &Motion::default()).unwrap();

        assert!(actor.object.pos.y > 104.0);
        assert!(actor.on_ladder);
        assert!(!actor.in_air);
    }

    #[test]
    fn missing_neighbor_clamps_at_left_edge() {
        let mut level = level(1, 1);
        let mut actor = player_at(-5.0, 80.0);
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert_eq!(res.entered_room, None);
        assert_eq!(actor.object.pos.x, 0.0);
        assert_eq!(level.active_coord(), RoomCoord::new(0, 0));
    }

    #[test]
    fn solid_room_below_clamps_at_bottom_edge() {
        let mut level = level(2, 1);
        put(&mut level, RoomCoord::new(1, 0), 0, 5, TypeId::Wall);
        let mut actor = player_at(80.0, 186.0);
        actor.in_air = true;
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert_eq!(res.entered_room, None);
        assert!(!res.fell_out);
        assert_eq!(actor.object.pos.y, (LEVEL_HEIGHT - CELL_SIZE) as f64);
        assert!(!actor.in_air);
        assert_eq!(level.active_coord(), RoomCoord::new(0, 0));
    }

    #[test]
    fn missing_neighbor_clamps_at_top_edge() {
        let mut level = level(1, 1);
        let mut actor = player_at(80.0, -5.0);
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert_eq!(res.entered_room, None);
        assert_eq!(actor.object.pos.y, 0.0);
    }

    #[test]
    fn crossing_top_edge_past_the_midline() {
        let mut level = Level::new(2, 1).unwrap();
        level.set_active_room(RoomCoord::new(1, 0)).unwrap();

        let mut actor = player_at(80.0, -7.0);
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert_eq!(res.entered_room, None);
        assert_eq!(level.active_coord(), RoomCoord::new(1, 0));
        assert_eq!(actor.object.pos.y, -7.0);

        actor.object.pos.y = -9.0;
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert_eq!(res.entered_room, Some(RoomCoord::new(0, 0)));
        assert_eq!(level.active_coord(), RoomCoord::new(0, 0));
        assert_eq!(actor.object.pos.y, (LEVEL_HEIGHT - CELL_HALF - 1) as f64);
    }

    #[test]
    fn solid_room_above_clamps_at_top_edge() {
        let mut level = Level::new(2, 1).unwrap();
        level.set_active_room(RoomCoord::new(1, 0)).unwrap();
        put(&mut level, RoomCoord::new(0, 0), ROW_COUNT as i32 - 1, 5, TypeId::Wall);
        let mut actor = player_at(80.0, -9.0);
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert_eq!(res.entered_room, None);
        assert_eq!(actor.object.pos.y, 0.0);
    }

    #[test]
    fn water_contact_is_reported() {
        let mut level = level(1, 1);
        put(&mut level, RoomCoord::new(0, 0), 5, 5, TypeId::Water);
        let mut actor = player_at(80.0, 80.0);
        let res = resolve(&mut level, &mut actor, 0.0, &Motion::default()).unwrap();
        assert!(res.in_water);
    }
}
