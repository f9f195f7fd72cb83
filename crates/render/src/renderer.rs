use std::fmt::Write;

use tileworld_common::{COLUMN_COUNT, ROW_COUNT};
use tileworld_kernel::Simulation;
use tileworld_objects::TypeId;

use crate::draw::glyph;

/// What a renderer should show besides the room itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Status line with state, health, lives and inventory.
    pub hud: bool,
    /// Draw fully transparent objects such as triggers.
    pub show_hidden: bool,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            hud: true,
            show_hidden: false,
        }
    }
}

/// Renderer-agnostic interface. A renderer reads the simulation and a view
/// and produces output; it never mutates the game.
pub trait Renderer {
    type Output;

    fn render(&self, sim: &Simulation, view: &RenderView) -> Self::Output;
}

/// Renders the active room as `ROW_COUNT` lines of `COLUMN_COUNT` glyphs.
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, sim: &Simulation, view: &RenderView) -> String {
        let room = sim.level().active_room();
        let mut grid = [[' '; COLUMN_COUNT]; ROW_COUNT];
        for (r, row) in room.rows().iter().enumerate() {
            for (c, ty) in row.iter().enumerate() {
                grid[r][c] = glyph(ty.id);
            }
        }

        let mut plot = |r: i32, c: i32, ch: char| {
            if r >= 0 && (r as usize) < ROW_COUNT && c >= 0 && (c as usize) < COLUMN_COUNT {
                grid[r as usize][c as usize] = ch;
            }
        };
        for object in room.objects.iter().filter(|o| o.is_alive()) {
            if object.anim.alpha == 0 && !view.show_hidden {
                continue;
            }
            let ch = match object.type_id() {
                TypeId::Action => char::from_digit(object.data.clamp(0, 9) as u32, 10).unwrap_or('?'),
                t => glyph(t),
            };
            let home = object.home_cell();
            plot(home.row, home.col, ch);
        }
        let home = sim.player().object().home_cell();
        plot(home.row, home.col, 'P');

        let mut out = String::new();
        if view.hud {
            let player = sim.player();
            let coord = sim.level().active_coord();
            let _ = writeln!(
                out,
                "room {coord} state={:?} health={} lives={} coins={} keys={} items={}",
                sim.state(),
                player.health,
                player.lives,
                player.coins,
                player.keys,
                player.items.len()
            );
        }
        for row in grid {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}
