use serde::{Deserialize, Serialize};
use tileworld_common::{BodyRect, SPRITE_SIZE, SolidFlags, SpriteRect};

/// Identity of a tile or actor type. The numeric order is the depth order:
/// the object store sorts higher ids first, so lower ids are drawn on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TypeId {
    None,
    Player,
    WallTop,
    Wall,
    WallFake,
    WallStair,
    GroundTop,
    Ground,
    GroundFake,
    GroundStair,
    WaterTop,
    Water,
    Grass,
    GrassBig,
    Rock,
    SpikeTop,
    SpikeBottom,
    Tree1,
    Tree2,
    Cloud1,
    Cloud2,
    Mushroom1,
    Mushroom2,
    Mushroom3,
    PillarTop,
    Pillar,
    PillarBottom,
    Torch,
    Door,
    Ladder,
    Ghost,
    Scorpion,
    Spider,
    Rat,
    Bat,
    Blob,
    Fireball,
    Skeleton,
    IceShot,
    FireShot,
    Drop,
    Platform,
    Spring,
    ArrowLeft,
    ArrowRight,
    Key,
    Coin,
    Gem,
    Apple,
    Pear,
    Statuary,
    LadderPart,
    Pick,
    Heart,
    Action,
}

/// Number of tile/actor types.
pub const TYPE_COUNT: usize = TypeId::Action as usize + 1;

impl TypeId {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        TYPES.get(index).map(|t| t.id)
    }

    /// The shared descriptor for this type.
    pub fn descriptor(self) -> &'static ObjectType {
        object_type(self)
    }
}

/// Coarse classification used by cell queries and pickups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    None,
    Player,
    Wall,
    WallFake,
    GroundFake,
    Water,
    Background,
    Spike,
    Platform,
    Door,
    Ladder,
    Enemy,
    Drop,
    Spring,
    Key,
    Coin,
    Item,
    Statuary,
    Heart,
    Trigger,
}

/// Selects the behaviour implementation that drives objects of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorId {
    Inert,
    WaterSurface,
    Cloud,
    Torch,
    Walker,
    Shooter,
    Spider,
    Bat,
    Fireball,
    Teleporter,
    Shot,
    Drop,
    Platform,
    Spring,
    Item,
    Trigger,
}

/// Shared, immutable metadata for a class of cell or actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectType {
    pub id: TypeId,
    pub kind: Kind,
    pub solid: SolidFlags,
    pub sprite: SpriteRect,
    pub body: BodyRect,
    /// Movement speed in pixels per second; meaning depends on the behaviour.
    pub speed: f64,
    pub behavior: BehaviorId,
}

impl ObjectType {
    pub fn is_solid(&self, flags: SolidFlags) -> bool {
        self.solid.contains(flags)
    }
}

/// Look up the descriptor for a type.
pub fn object_type(id: TypeId) -> &'static ObjectType {
    &TYPES[id as usize]
}

const FULL_BODY: BodyRect = BodyRect::new(0.0, 0.0, 16.0, 16.0);

#[allow(clippy::too_many_arguments)]
const fn actor(
    id: TypeId,
    kind: Kind,
    solid: SolidFlags,
    sprite_row: i32,
    sprite_col: i32,
    sprite_w: i32,
    sprite_h: i32,
    body: BodyRect,
    speed: f64,
    behavior: BehaviorId,
) -> ObjectType {
    ObjectType {
        id,
        kind,
        solid,
        sprite: SpriteRect::new(
            sprite_col * SPRITE_SIZE,
            sprite_row * SPRITE_SIZE,
            sprite_w,
            sprite_h,
        ),
        body,
        speed,
        behavior,
    }
}

const fn tile(id: TypeId, kind: Kind, solid: SolidFlags, sprite_row: i32, sprite_col: i32) -> ObjectType {
    actor(
        id,
        kind,
        solid,
        sprite_row,
        sprite_col,
        SPRITE_SIZE,
        SPRITE_SIZE,
        FULL_BODY,
        0.0,
        BehaviorId::Inert,
    )
}

const fn item(id: TypeId, kind: Kind, sprite_row: i32, sprite_col: i32, body: BodyRect) -> ObjectType {
    actor(id, kind, SolidFlags::NONE, sprite_row, sprite_col, 16, 16, body, 0.0, BehaviorId::Item)
}

const fn enemy(
    id: TypeId,
    sprite_row: i32,
    sprite_col: i32,
    body: BodyRect,
    speed: f64,
    behavior: BehaviorId,
) -> ObjectType {
    actor(id, Kind::Enemy, SolidFlags::NONE, sprite_row, sprite_col, 16, 16, body, speed, behavior)
}

const NONE: SolidFlags = SolidFlags::NONE;
const ALL: SolidFlags = SolidFlags::ALL;

#[rustfmt::skip]
static TYPES: [ObjectType; TYPE_COUNT] = [
    tile(TypeId::None,          Kind::None,       NONE, 0, 10),
    actor(TypeId::Player,       Kind::Player,     NONE, 1, 26, 16, 16, BodyRect::new(6.0, 0.0, 4.0, 16.0), 0.0, BehaviorId::Inert),
    tile(TypeId::WallTop,       Kind::Wall,       ALL,  4, 6),
    tile(TypeId::Wall,          Kind::Wall,       ALL,  5, 6),
    tile(TypeId::WallFake,      Kind::WallFake,   NONE, 5, 6),
    actor(TypeId::WallStair,    Kind::Wall,       SolidFlags::TOP, 4, 6, 16, 8, FULL_BODY, 0.0, BehaviorId::Inert),
    tile(TypeId::GroundTop,     Kind::Wall,       ALL,  6, 3),
    tile(TypeId::Ground,        Kind::Wall,       ALL,  7, 3),
    tile(TypeId::GroundFake,    Kind::GroundFake, NONE, 7, 3),
    actor(TypeId::GroundStair,  Kind::Wall,       ALL,  6, 3, 16, 8, FULL_BODY, 0.0, BehaviorId::Inert),
    actor(TypeId::WaterTop,     Kind::Water,      NONE, 8, 0, 16, 16, FULL_BODY, 0.0, BehaviorId::WaterSurface),
    tile(TypeId::Water,         Kind::Water,      NONE, 9, 0),
    tile(TypeId::Grass,         Kind::Background, NONE, 40, 0),
    tile(TypeId::GrassBig,      Kind::Background, NONE, 40, 1),
    tile(TypeId::Rock,          Kind::Background, ALL,  50, 0),
    tile(TypeId::SpikeTop,      Kind::Spike,      NONE, 48, 0),
    tile(TypeId::SpikeBottom,   Kind::Spike,      NONE, 49, 0),
    tile(TypeId::Tree1,         Kind::Background, NONE, 41, 3),
    tile(TypeId::Tree2,         Kind::Background, NONE, 41, 4),
    actor(TypeId::Cloud1,       Kind::Platform,   NONE, 51, 6, 16, 16, FULL_BODY, 0.0, BehaviorId::Cloud),
    tile(TypeId::Cloud2,        Kind::Platform,   NONE, 51, 5),
    tile(TypeId::Mushroom1,     Kind::Background, NONE, 47, 0),
    tile(TypeId::Mushroom2,     Kind::Background, NONE, 47, 1),
    tile(TypeId::Mushroom3,     Kind::Background, NONE, 47, 2),
    tile(TypeId::PillarTop,     Kind::Background, NONE, 48, 1),
    tile(TypeId::Pillar,        Kind::Background, NONE, 49, 1),
    tile(TypeId::PillarBottom,  Kind::Background, NONE, 50, 1),
    actor(TypeId::Torch,        Kind::Background, NONE, 62, 26, 16, 16, BodyRect::new(5.0, 0.0, 6.0, 6.0), 0.0, BehaviorId::Torch),
    tile(TypeId::Door,          Kind::Door,       ALL,  10, 0),
    tile(TypeId::Ladder,        Kind::Ladder,     NONE, 12, 2),
    enemy(TypeId::Ghost,        7, 26,  BodyRect::new(2.0, 0.0, 12.0, 16.0), 24.0,  BehaviorId::Shooter),
    enemy(TypeId::Scorpion,     10, 26, BodyRect::new(3.0, 5.0, 10.0, 11.0), 24.0,  BehaviorId::Walker),
    enemy(TypeId::Spider,       11, 26, BodyRect::new(3.0, 6.0, 10.0, 10.0), 24.0,  BehaviorId::Spider),
    enemy(TypeId::Rat,          9, 26,  BodyRect::new(2.0, 5.0, 12.0, 11.0), 24.0,  BehaviorId::Walker),
    enemy(TypeId::Bat,          8, 26,  BodyRect::new(0.0, 3.0, 16.0, 10.0), 48.0,  BehaviorId::Bat),
    enemy(TypeId::Blob,         61, 26, BodyRect::new(3.0, 6.0, 10.0, 10.0), 24.0,  BehaviorId::Walker),
    enemy(TypeId::Fireball,     13, 26, BodyRect::new(2.0, 3.0, 14.0, 12.0), 48.0,  BehaviorId::Fireball),
    enemy(TypeId::Skeleton,     6, 26,  BodyRect::new(1.0, 0.0, 14.0, 16.0), 24.0,  BehaviorId::Teleporter),
    enemy(TypeId::IceShot,      52, 0,  BodyRect::new(0.0, 4.0, 16.0, 7.0),  168.0, BehaviorId::Shot),
    enemy(TypeId::FireShot,     60, 26, BodyRect::new(6.0, 6.0, 4.0, 4.0),   120.0, BehaviorId::Shot),
    actor(TypeId::Drop,         Kind::Drop,       NONE, 37, 43, 16, 16, BodyRect::new(6.0, 6.0, 4.0, 4.0), 0.0, BehaviorId::Drop),
    actor(TypeId::Platform,     Kind::Platform,   NONE, 4, 6, 16, 8,   BodyRect::new(0.0, 0.0, 16.0, 8.0), 48.0, BehaviorId::Platform),
    actor(TypeId::Spring,       Kind::Spring,     NONE, 65, 26, 16, 16, BodyRect::new(0.0, 8.0, 16.0, 8.0), 0.0, BehaviorId::Spring),
    actor(TypeId::ArrowLeft,    Kind::Wall,       SolidFlags::LEFT,  32, 3, 16, 16, FULL_BODY, 0.0, BehaviorId::Inert),
    actor(TypeId::ArrowRight,   Kind::Wall,       SolidFlags::RIGHT, 31, 3, 16, 16, FULL_BODY, 0.0, BehaviorId::Inert),
    item(TypeId::Key,           Kind::Key,        45, 26, FULL_BODY),
    item(TypeId::Coin,          Kind::Coin,       63, 26, FULL_BODY),
    item(TypeId::Gem,           Kind::Coin,       50, 32, FULL_BODY),
    item(TypeId::Apple,         Kind::Item,       15, 26, FULL_BODY),
    item(TypeId::Pear,          Kind::Item,       15, 27, FULL_BODY),
    item(TypeId::Statuary,      Kind::Statuary,   52, 27, FULL_BODY),
    item(TypeId::LadderPart,    Kind::Item,       62, 29, FULL_BODY),
    item(TypeId::Pick,          Kind::Item,       62, 30, FULL_BODY),
    item(TypeId::Heart,         Kind::Heart,      62, 31, BodyRect::new(4.0, 4.0, 8.0, 8.0)),
    actor(TypeId::Action,       Kind::Trigger,    NONE, 0, 10, 16, 16, FULL_BODY, 0.0, BehaviorId::Trigger),
];
