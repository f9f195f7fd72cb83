use glam::DVec2;
use serde::Serialize;
use tileworld_common::{CELL_SIZE, SpriteRect};
use tileworld_kernel::Simulation;
use tileworld_objects::{Object, TypeId};

/// One sprite to draw: where on the sheet, where in the room, and how.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Drawable {
    pub type_id: TypeId,
    /// Source rectangle of frame 0 on the sprite sheet.
    pub sprite: SpriteRect,
    /// Top-left corner in room pixels.
    pub pos: DVec2,
    pub frame: i32,
    pub flip: bool,
    pub alpha: u8,
}

impl Drawable {
    fn cell(type_id: TypeId, sprite: SpriteRect, r: usize, c: usize) -> Self {
        Self {
            type_id,
            sprite,
            pos: DVec2::new((c as i32 * CELL_SIZE) as f64, (r as i32 * CELL_SIZE) as f64),
            frame: 0,
            flip: false,
            alpha: 255,
        }
    }

    fn object(object: &Object) -> Self {
        Self {
            type_id: object.type_id(),
            sprite: object.ty.sprite,
            pos: object.pos,
            frame: object.anim.frame,
            flip: object.anim.flip,
            alpha: object.anim.alpha,
        }
    }

    /// Source rectangle of the current frame; frames sit side by side.
    pub fn frame_rect(&self) -> SpriteRect {
        SpriteRect::new(
            self.sprite.x + self.frame * self.sprite.w,
            self.sprite.y,
            self.sprite.w,
            self.sprite.h,
        )
    }
}

/// Everything visible in the active room, back to front.
pub fn draw_list(sim: &Simulation) -> Vec<Drawable> {
    let room = sim.level().active_room();
    let mut list = Vec::new();

    for (r, row) in room.rows().iter().enumerate() {
        for (c, ty) in row.iter().enumerate() {
            if ty.id != TypeId::None {
                list.push(Drawable::cell(ty.id, ty.sprite, r, c));
            }
        }
    }

    let player = sim.player().object();
    let mut player_drawn = false;
    for object in room.objects.iter().filter(|o| o.is_alive()) {
        if !player_drawn && object.type_id() < player.type_id() {
            list.push(Drawable::object(player));
            player_drawn = true;
        }
        list.push(Drawable::object(object));
    }
    if !player_drawn {
        list.push(Drawable::object(player));
    }

    tracing::trace!(count = list.len(), "draw list built");
    list
}

/// Level-source symbol used to show a type as text.
pub fn glyph(type_id: TypeId) -> char {
    use TypeId::*;
    match type_id {
        None => ' ',
        Player => 'P',
        WallTop | Wall | WallFake => '*',
        GroundTop | Ground | GroundFake => 'x',
        WallStair | GroundStair => '-',
        WaterTop | Water => '~',
        Grass | GrassBig => ',',
        Rock => '@',
        SpikeTop | SpikeBottom => '^',
        Tree1 | Tree2 => ';',
        Cloud1 | Cloud2 => '&',
        Mushroom1 | Mushroom2 | Mushroom3 => '.',
        PillarTop | Pillar | PillarBottom => '|',
        Torch => '!',
        Door => 'd',
        Ladder => '=',
        Ghost => 'g',
        Scorpion => 's',
        Spider => 'p',
        Rat => 'r',
        Bat => 'b',
        Blob => 'q',
        Fireball => 'f',
        Skeleton => 'e',
        IceShot | FireShot => '+',
        Drop => '`',
        Platform => '_',
        Spring => '/',
        ArrowLeft => '<',
        ArrowRight => '>',
        Key => 'k',
        Coin => 'o',
        Gem => 'O',
        Apple => 'a',
        Pear => 'i',
        Statuary => 'S',
        LadderPart => '#',
        Pick => 'T',
        Heart => 'h',
        Action => '?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileworld_common::{CELL_COUNT, COLUMN_COUNT};
    use tileworld_kernel::{SimConfig, build_level};

    fn sim(cells: &[(usize, usize, char)]) -> Simulation {
        let mut grid = vec![' '; CELL_COUNT];
        for &(r, c, s) in cells {
            grid[r * COLUMN_COUNT + c] = s;
        }
        let level = build_level(&grid.into_iter().collect::<String>(), 1, 1).unwrap();
        Simulation::new(level, SimConfig::default()).unwrap()
    }

    #[test]
    fn cells_come_first_in_row_major_order() {
        let sim = sim(&[(0, 0, 'P'), (5, 3, '*'), (2, 7, '=')]);
        let list = draw_list(&sim);
        assert_eq!(list[0].type_id, TypeId::Ladder);
        assert_eq!(list[0].pos, DVec2::new(112.0, 32.0));
        assert_eq!(list[1].type_id, TypeId::WallTop);
        assert_eq!(list.last().unwrap().type_id, TypeId::Player);
    }

    #[test]
    fn player_is_drawn_at_its_depth_slot() {
        let sim = sim(&[(0, 0, 'P'), (3, 3, 'o'), (3, 4, 'g')]);
        let ids: Vec<TypeId> = draw_list(&sim).iter().map(|d| d.type_id).collect();
        assert_eq!(ids, vec![TypeId::Coin, TypeId::Ghost, TypeId::Player]);
    }

    #[test]
    fn removed_objects_are_not_drawn() {
        let mut sim = sim(&[(0, 0, 'P'), (3, 3, 'o')]);
        let room = sim.level_mut().active_room_mut();
        if let Some(coin) = room.objects.get_mut(0) {
            coin.remove();
        }
        let list = draw_list(&sim);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].type_id, TypeId::Player);
    }

    #[test]
    fn frame_rect_steps_along_the_sheet() {
        let sim = sim(&[(0, 0, 'P')]);
        let mut d = draw_list(&sim)[0];
        d.frame = 2;
        let rect = d.frame_rect();
        assert_eq!(rect.x, d.sprite.x + 2 * d.sprite.w);
        assert_eq!(rect.y, d.sprite.y);
    }

    #[test]
    fn drawables_serialize() {
        let sim = sim(&[(0, 0, 'P')]);
        let json = serde_json::to_string(&draw_list(&sim)).unwrap();
        assert!(json.contains("\"Player\""));
    }
}
