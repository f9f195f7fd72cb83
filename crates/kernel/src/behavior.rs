//! Per-type behaviour hooks.
//!
//! Every descriptor names a [`BehaviorId`]; [`behavior`] maps it to a
//! stateless implementation of [`Behavior`]. Hooks receive the object being
//! driven (detached from its room for the duration of the call) and a
//! [`Ctx`] with the room, the player, and an outcome queue for effects the
//! simulation applies afterwards (damage, death, level completion).

use glam::DVec2;
use tileworld_common::{CELL_HALF, CELL_SIZE, COLUMN_COUNT, LEVEL_HEIGHT, LEVEL_WIDTH, MAX_SPEED, SolidFlags};
use tileworld_objects::{BehaviorId, Kind, Object, Removal, TypeId};
use tileworld_stream::Room;

use crate::config::PlayerTuning;
use crate::factory::spawn;
use crate::player::Player;

pub const TORCH_DAMAGE: i32 = 10;
pub const ENEMY_DAMAGE: i32 = 25;
pub const SHOT_DAMAGE: i32 = 20;
pub const DROP_DAMAGE: i32 = 10;
pub const HEART_HEALTH: i32 = 25;

const CLOUD_FADE_MS: f64 = 1000.0;
const SHOOT_PERIOD_MS: f64 = 2000.0;
const TELEPORT_PERIOD_MS: f64 = 3000.0;
const DROP_HANG_MS: f64 = 1000.0;
const SPRING_HOLD_MS: f64 = 300.0;
const SPRING_BOOST: f64 = 1.5;
const SPIDER_REACH: f64 = 3.0 * CELL_SIZE as f64;
/// Fireball launch speed as a multiple of its descriptor speed.
const FIREBALL_LEAP: f64 = 6.0;

/// Effects on the game that a hook requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Damage(i32),
    Kill,
    CompleteLevel,
    Collected(TypeId),
    Triggered(i32),
}

/// What a hook may touch besides its own object.
pub struct Ctx<'a> {
    pub room: &'a mut Room,
    pub player: &'a mut Player,
    pub tuning: &'a PlayerTuning,
    pub dt_ms: f64,
    outcomes: Vec<Outcome>,
}

impl<'a> Ctx<'a> {
    pub fn new(room: &'a mut Room, player: &'a mut Player, tuning: &'a PlayerTuning, dt_ms: f64) -> Self {
        Self {
            room,
            player,
            tuning,
            dt_ms,
            outcomes: Vec::new(),
        }
    }

    /// Frame time in seconds.
    pub fn dt(&self) -> f64 {
        self.dt_ms / 1000.0
    }

    pub fn emit(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<Outcome> {
        self.outcomes
    }
}

pub trait Behavior: Send + Sync {
    /// Runs once when the object is created, before it joins a room.
    fn on_init(&self, _object: &mut Object) {}

    /// Runs once per frame while the object is alive in the active room.
    fn on_frame(&self, _object: &mut Object, _ctx: &mut Ctx<'_>) {}

    /// Runs after `on_frame` in any frame where the object's body overlaps
    /// the player's.
    fn on_hit(&self, _object: &mut Object, _ctx: &mut Ctx<'_>) {}
}

/// The implementation behind a behaviour id.
pub fn behavior(id: BehaviorId) -> &'static dyn Behavior {
    match id {
        BehaviorId::Inert => &Inert,
        BehaviorId::WaterSurface => &WaterSurface,
        BehaviorId::Cloud => &Cloud,
        BehaviorId::Torch => &Torch,
        BehaviorId::Walker => &Walker,
        BehaviorId::Shooter => &Shooter,
        BehaviorId::Spider => &Spider,
        BehaviorId::Bat => &Bat,
        BehaviorId::Fireball => &Fireball,
        BehaviorId::Teleporter => &Teleporter,
        BehaviorId::Shot => &Shot,
        BehaviorId::Drop => &Drip,
        BehaviorId::Platform => &Platform,
        BehaviorId::Spring => &Spring,
        BehaviorId::Item => &Item,
        BehaviorId::Trigger => &Trigger,
    }
}

/// Move horizontally at `vel.x`, turning around at solid cells and room
/// edges, and at ledges when `ledges` is set. Returns the distance actually
/// moved.
fn patrol(object: &mut Object, room: &Room, dt: f64, ledges: bool) -> f64 {
    let step = object.vel.x * dt;
    object.pos.x += step;

    let body = object.body_borders();
    let size = CELL_SIZE as f64;
    let row = object.home_cell().row;
    let front = if object.vel.x >= 0.0 { body.right } else { body.left };
    let col = (front / size).floor() as i32;

    let blocked = body.left < 0.0
        || body.right > LEVEL_WIDTH as f64
        || !room.is_passable_edge(row, col)
        || (ledges && !room.is_solid(row + 1, col, SolidFlags::TOP));
    if blocked {
        object.pos.x -= step;
        object.vel.x = -object.vel.x;
        object.anim.flip = object.vel.x < 0.0;
        0.0
    } else {
        step
    }
}

/// True if the player is standing on, or falling onto, the top of `object`.
fn supports(player: &Player, object: &Object) -> bool {
    if player.actor.on_ladder || player.object().vel.y < 0.0 {
        return false;
    }
    let feet = player.object().body_borders();
    let top = object.body_borders();
    feet.right > top.left
        && feet.left < top.right
        && feet.bottom >= top.top - 0.5
        && feet.bottom <= top.top + CELL_HALF as f64
}

fn stand_on(player: &mut Player, object: &Object) {
    let top = object.body_borders().top;
    let body = player.object().ty.body;
    let p = player.object_mut();
    p.pos.y = top - (body.y + body.h);
    p.vel.y = 0.0;
    player.actor.in_air = false;
}

struct Inert;

impl Behavior for Inert {}

struct WaterSurface;

impl Behavior for WaterSurface {
    fn on_init(&self, object: &mut Object) {
        object.anim.set_wave(0, 3, 4.0);
    }

    fn on_hit(&self, _object: &mut Object, ctx: &mut Ctx<'_>) {
        ctx.emit(Outcome::Kill);
    }
}

/// Holds a landing player up, then dissolves.
struct Cloud;

impl Behavior for Cloud {
    fn on_frame(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        if supports(ctx.player, object) {
            stand_on(ctx.player, object);
            object.state = 1;
        }
        if object.state == 1 {
            object.timer += ctx.dt_ms;
            let left = (1.0 - object.timer / CLOUD_FADE_MS).clamp(0.0, 1.0);
            object.anim.alpha = (255.0 * left) as u8;
            if object.timer >= CLOUD_FADE_MS {
                object.remove();
            }
        }
    }
}

struct Torch;

impl Behavior for Torch {
    fn on_init(&self, object: &mut Object) {
        object.anim.set(0, 3, 8.0);
    }

    fn on_hit(&self, _object: &mut Object, ctx: &mut Ctx<'_>) {
        ctx.emit(Outcome::Damage(TORCH_DAMAGE));
    }
}

fn start_patrol(object: &mut Object) {
    object.vel.x = object.ty.speed;
    object.anim.set(0, 1, 4.0);
}

/// Ground patrol: scorpions, rats, blobs.
struct Walker;

impl Behavior for Walker {
    fn on_init(&self, object: &mut Object) {
        start_patrol(object);
    }

    fn on_frame(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        patrol(object, ctx.room, ctx.dt(), true);
    }

    fn on_hit(&self, _object: &mut Object, ctx: &mut Ctx<'_>) {
        ctx.emit(Outcome::Damage(ENEMY_DAMAGE));
    }
}

/// Patrols and periodically fires an ice shot the way it faces. Harmless to
/// touch.
struct Shooter;

impl Behavior for Shooter {
    fn on_init(&self, object: &mut Object) {
        start_patrol(object);
    }

    fn on_frame(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        patrol(object, ctx.room, ctx.dt(), true);
        object.timer += ctx.dt_ms;
        if object.timer >= SHOOT_PERIOD_MS {
            object.timer -= SHOOT_PERIOD_MS;
            let dir = if object.vel.x < 0.0 { -1.0 } else { 1.0 };
            let shot = spawn(ctx.room, TypeId::IceShot, object.pos);
            shot.vel = DVec2::new(dir * shot.ty.speed, 0.0);
            shot.anim.flip = dir < 0.0;
            tracing::trace!(x = object.pos.x, y = object.pos.y, dir, "shot fired");
        }
    }
}

/// Lowers itself up to three cells from its origin, then climbs back.
struct Spider;

impl Behavior for Spider {
    fn on_init(&self, object: &mut Object) {
        object.anim.set(0, 1, 4.0);
    }

    fn on_frame(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        let step = object.ty.speed * ctx.dt();
        if object.state == 0 {
            object.pos.y += step;
            let body = object.body_borders();
            let below = (body.bottom / CELL_SIZE as f64).floor() as i32;
            let col = object.home_cell().col;
            if ctx.room.is_solid(below, col, SolidFlags::TOP) {
                object.pos.y -= step;
                object.state = 1;
            } else if object.pos.y - object.origin.y >= SPIDER_REACH {
                object.pos.y = object.origin.y + SPIDER_REACH;
                object.state = 1;
            }
        } else {
            object.pos.y -= step;
            if object.pos.y <= object.origin.y {
                object.pos.y = object.origin.y;
                object.state = 0;
            }
        }
    }

    fn on_hit(&self, _object: &mut Object, ctx: &mut Ctx<'_>) {
        ctx.emit(Outcome::Damage(ENEMY_DAMAGE));
    }
}

/// Horizontal flight, no gravity, no ledge checks.
struct Bat;

impl Behavior for Bat {
    fn on_init(&self, object: &mut Object) {
        object.vel.x = object.ty.speed;
        object.anim.set_wave(0, 2, 8.0);
    }

    fn on_frame(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        patrol(object, ctx.room, ctx.dt(), false);
    }

    fn on_hit(&self, _object: &mut Object, ctx: &mut Ctx<'_>) {
        ctx.emit(Outcome::Damage(ENEMY_DAMAGE));
    }
}

/// Leaps up from its origin and falls back under gravity, forever.
struct Fireball;

impl Behavior for Fireball {
    fn on_init(&self, object: &mut Object) {
        object.vel.y = -FIREBALL_LEAP * object.ty.speed;
        object.anim.set(0, 1, 8.0);
    }

    fn on_frame(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        let dt = ctx.dt();
        object.vel.y += ctx.tuning.gravity * dt;
        object.pos.y += object.vel.y * dt;
        if object.vel.y > 0.0 && object.pos.y >= object.origin.y {
            object.pos.y = object.origin.y;
            object.vel.y = -FIREBALL_LEAP * object.ty.speed;
        }
        object.anim.flip = object.vel.y > 0.0;
    }

    fn on_hit(&self, _object: &mut Object, ctx: &mut Ctx<'_>) {
        ctx.emit(Outcome::Damage(ENEMY_DAMAGE));
    }
}

/// Patrols, and jumps to the mirrored column of its row on a timer or after
/// touching the player.
struct Teleporter;

impl Teleporter {
    fn teleport(object: &mut Object, room: &Room) {
        object.timer = 0.0;
        let home = object.home_cell();
        let mirrored = COLUMN_COUNT as i32 - 1 - home.col;
        if mirrored != home.col
            && room.is_passable_edge(home.row, mirrored)
            && room.is_solid(home.row + 1, mirrored, SolidFlags::TOP)
        {
            object.pos.x += ((mirrored - home.col) * CELL_SIZE) as f64;
            tracing::trace!(from = home.col, to = mirrored, "teleported");
        }
    }
}

impl Behavior for Teleporter {
    fn on_init(&self, object: &mut Object) {
        start_patrol(object);
    }

    fn on_frame(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        patrol(object, ctx.room, ctx.dt(), true);
        object.timer += ctx.dt_ms;
        if object.timer >= TELEPORT_PERIOD_MS {
            Self::teleport(object, ctx.room);
        }
    }

    fn on_hit(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        ctx.emit(Outcome::Damage(ENEMY_DAMAGE));
        Self::teleport(object, ctx.room);
    }
}

/// Straight-line projectile.
struct Shot;

impl Behavior for Shot {
    fn on_init(&self, object: &mut Object) {
        object.anim.set(0, 1, 8.0);
    }

    fn on_frame(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        object.pos += object.vel * ctx.dt();
        let body = object.body_borders();
        let home = object.home_cell();
        let outside = body.right < 0.0
            || body.left > LEVEL_WIDTH as f64
            || body.bottom < 0.0
            || body.top > LEVEL_HEIGHT as f64;
        if outside || !ctx.room.is_passable_edge(home.row, home.col) {
            object.remove();
        }
    }

    fn on_hit(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        ctx.emit(Outcome::Damage(SHOT_DAMAGE));
        object.remove();
    }
}

/// A drip hanging from the ceiling: waits, falls, and starts over.
struct Drip;

impl Drip {
    fn reset(object: &mut Object) {
        object.pos = object.origin;
        object.vel = DVec2::ZERO;
        object.state = 0;
        object.timer = 0.0;
    }
}

impl Behavior for Drip {
    fn on_frame(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        if object.state == 0 {
            object.timer += ctx.dt_ms;
            if object.timer >= DROP_HANG_MS {
                object.state = 1;
                object.timer = 0.0;
            }
            return;
        }
        let dt = ctx.dt();
        object.vel.y = (object.vel.y + ctx.tuning.gravity * dt).min(MAX_SPEED);
        object.pos.y += object.vel.y * dt;
        let body = object.body_borders();
        let row = (body.bottom / CELL_SIZE as f64).floor() as i32;
        let col = object.home_cell().col;
        if body.top > LEVEL_HEIGHT as f64 || ctx.room.is_solid(row, col, SolidFlags::TOP) {
            Self::reset(object);
        }
    }

    fn on_hit(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        ctx.emit(Outcome::Damage(DROP_DAMAGE));
        Self::reset(object);
    }
}

/// Moving platform that carries a player standing on it.
struct Platform;

impl Behavior for Platform {
    fn on_init(&self, object: &mut Object) {
        object.vel.x = object.ty.speed;
    }

    fn on_frame(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        let carried = supports(ctx.player, object);
        let moved = patrol(object, ctx.room, ctx.dt(), false);
        if carried {
            ctx.player.object_mut().pos.x += moved;
        }
        if supports(ctx.player, object) {
            stand_on(ctx.player, object);
        }
    }
}

/// Launches a player that lands on it.
struct Spring;

impl Behavior for Spring {
    fn on_frame(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        if object.state == 1 {
            object.timer -= ctx.dt_ms;
            if object.timer <= 0.0 {
                object.state = 0;
                object.timer = 0.0;
                object.anim.set(0, 0, 0.0);
            }
        }
    }

    fn on_hit(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        if ctx.player.object().vel.y <= 0.0 || !supports(ctx.player, object) {
            return;
        }
        let launch = -SPRING_BOOST * ctx.tuning.jump_speed;
        ctx.player.object_mut().vel.y = launch;
        ctx.player.actor.in_air = true;
        ctx.player.actor.on_ladder = false;
        object.state = 1;
        object.timer = SPRING_HOLD_MS;
        object.anim.set(1, 1, 0.0);
    }
}

/// Pickups: coins, gems, keys, hearts, carried items and the goal statue.
struct Item;

impl Behavior for Item {
    fn on_hit(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        match object.ty.kind {
            Kind::Coin => {
                ctx.player.coins += 1;
                object.remove();
            }
            Kind::Key => {
                ctx.player.keys += 1;
                object.remove();
            }
            Kind::Heart => {
                ctx.player.heal(HEART_HEALTH);
                object.remove();
            }
            Kind::Item => {
                ctx.player.items.push(object.clone());
                object.removal = Removal::Freed;
            }
            Kind::Statuary => {
                object.remove();
                ctx.emit(Outcome::CompleteLevel);
            }
            _ => return,
        }
        tracing::debug!(item = ?object.type_id(), "item collected");
        ctx.emit(Outcome::Collected(object.type_id()));
    }
}

/// Invisible numbered marker; reports its number the first time it is
/// touched.
struct Trigger;

impl Behavior for Trigger {
    fn on_init(&self, object: &mut Object) {
        object.anim.alpha = 0;
    }

    fn on_hit(&self, object: &mut Object, ctx: &mut Ctx<'_>) {
        if object.state == 0 {
            object.state = 1;
            ctx.emit(Outcome::Triggered(object.data));
        }
    }
}
