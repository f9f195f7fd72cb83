use serde::{Deserialize, Serialize};

/// Axis-aligned extents in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Borders {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Borders {
    /// Extents of a rectangle placed at `(x, y)`.
    pub fn from_origin(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            left: x,
            right: x + w,
            top: y,
            bottom: y + h,
        }
    }
}

/// Collision body relative to an entity origin, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BodyRect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Body centre for an entity at `origin`.
    pub fn center(&self, origin: glam::DVec2) -> glam::DVec2 {
        glam::DVec2::new(origin.x + self.x + self.w / 2.0, origin.y + self.y + self.h / 2.0)
    }

    /// Body extents for an entity at `origin`.
    pub fn borders(&self, origin: glam::DVec2) -> Borders {
        Borders::from_origin(origin.x + self.x, origin.y + self.y, self.w, self.h)
    }
}

/// Source rectangle on the sprite sheet, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl SpriteRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}
