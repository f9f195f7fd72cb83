use glam::DVec2;
use serde::{Deserialize, Serialize};
use tileworld_common::{Borders, CELL_SIZE, CellCoord};

use crate::types::{ObjectType, TypeId, object_type};

/// Stable handle of an object inside its store. Survives compaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Deferred-removal state of an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Removal {
    #[default]
    Alive,
    /// Dead; dropped at the next compaction.
    PendingFree,
    /// Ownership moved elsewhere (e.g. into the player's items); the slot is
    /// dropped at the next compaction without further bookkeeping.
    Freed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationMode {
    /// Cycle `frame_start..=frame_end`, wrapping.
    #[default]
    Frame,
    /// Ping-pong between `frame_start` and `frame_end`.
    Wave,
    /// Hold one frame and mirror it on every tick.
    Flip,
}

/// Sprite animation state consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub mode: AnimationMode,
    pub frame_start: i32,
    pub frame_end: i32,
    /// Frames per second; 0 holds the current frame.
    pub fps: f64,
    pub frame: i32,
    pub flip: bool,
    pub alpha: u8,
    /// Milliseconds accumulated towards the next frame.
    pub elapsed_ms: f64,
    step: i32,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            mode: AnimationMode::Frame,
            frame_start: 0,
            frame_end: 0,
            fps: 0.0,
            frame: 0,
            flip: false,
            alpha: 255,
            elapsed_ms: 0.0,
            step: 1,
        }
    }
}

impl Animation {
    /// Play `start..=end` at `fps`. Re-selecting the running animation keeps
    /// its progress.
    pub fn set(&mut self, start: i32, end: i32, fps: f64) {
        self.select(AnimationMode::Frame, start, end, fps);
    }

    pub fn set_wave(&mut self, start: i32, end: i32, fps: f64) {
        self.select(AnimationMode::Wave, start, end, fps);
    }

    pub fn set_flip(&mut self, frame: i32, fps: f64) {
        self.select(AnimationMode::Flip, frame, frame, fps);
    }

    fn select(&mut self, mode: AnimationMode, start: i32, end: i32, fps: f64) {
        if self.mode == mode && self.frame_start == start && self.frame_end == end && self.fps == fps {
            return;
        }
        self.mode = mode;
        self.frame_start = start;
        self.frame_end = end;
        self.fps = fps;
        self.frame = start;
        self.elapsed_ms = 0.0;
        self.step = 1;
    }

    /// Advance by `dt_ms` of game time.
    pub fn advance(&mut self, dt_ms: f64) {
        if self.fps <= 0.0 {
            return;
        }
        let period = 1000.0 / self.fps;
        self.elapsed_ms += dt_ms;
        while self.elapsed_ms >= period {
            self.elapsed_ms -= period;
            self.tick();
        }
    }

    fn tick(&mut self) {
        match self.mode {
            AnimationMode::Frame => {
                self.frame = if self.frame >= self.frame_end {
                    self.frame_start
                } else {
                    self.frame + 1
                };
            }
            AnimationMode::Wave => {
                if self.frame_start == self.frame_end {
                    return;
                }
                let next = self.frame + self.step;
                if next > self.frame_end || next < self.frame_start {
                    self.step = -self.step;
                }
                self.frame += self.step;
            }
            AnimationMode::Flip => self.flip = !self.flip,
        }
    }
}

/// A dynamic entity: enemy, item, effect, or the player's body.
#[derive(Debug, Clone)]
pub struct Object {
    pub id: ObjectId,
    pub ty: &'static ObjectType,
    pub pos: DVec2,
    pub vel: DVec2,
    /// Where the object was spawned; patrol and reset behaviours return here.
    pub origin: DVec2,
    pub anim: Animation,
    pub removal: Removal,
    /// Free-form payload, e.g. the number of a trigger.
    pub data: i32,
    /// Behaviour-specific state.
    pub state: i32,
    /// Behaviour-specific countdown or accumulator, in milliseconds.
    pub timer: f64,
}

impl Object {
    pub fn new(type_id: TypeId) -> Self {
        Self {
            id: ObjectId::default(),
            ty: object_type(type_id),
            pos: DVec2::ZERO,
            vel: DVec2::ZERO,
            origin: DVec2::ZERO,
            anim: Animation::default(),
            removal: Removal::Alive,
            data: 0,
            state: 0,
            timer: 0.0,
        }
    }

    /// Create an object whose origin is the top-left corner of cell `(r, c)`.
    pub fn at_cell(type_id: TypeId, r: i32, c: i32) -> Self {
        let mut object = Self::new(type_id);
        object.pos = DVec2::new((CELL_SIZE * c) as f64, (CELL_SIZE * r) as f64);
        object.origin = object.pos;
        object
    }

    pub fn type_id(&self) -> TypeId {
        self.ty.id
    }

    pub fn is_alive(&self) -> bool {
        self.removal == Removal::Alive
    }

    /// Tombstone the object; it is dropped at the next compaction.
    pub fn remove(&mut self) {
        if self.removal == Removal::Alive {
            self.removal = Removal::PendingFree;
        }
    }

    pub fn body_center(&self) -> DVec2 {
        self.ty.body.center(self.pos)
    }

    pub fn body_borders(&self) -> Borders {
        self.ty.body.borders(self.pos)
    }

    /// The cell containing the body centre. Coordinates truncate towards
    /// zero, so a body hanging just past the left or top edge still maps to
    /// column/row 0.
    pub fn home_cell(&self) -> CellCoord {
        let center = self.body_center();
        CellCoord::new(
            (center.y / CELL_SIZE as f64) as i32,
            (center.x / CELL_SIZE as f64) as i32,
        )
    }

    /// Axis-aligned overlap of the two collision bodies. Touching edges do
    /// not count.
    pub fn hit_test(&self, other: &Object) -> bool {
        let a = self.ty.body;
        let b = other.ty.body;
        let d = self.body_center() - other.body_center();
        d.x.abs() < (a.w + b.w) / 2.0 && d.y.abs() < (a.h + b.h) / 2.0
    }
}
