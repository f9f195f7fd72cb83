use glam::DVec2;
use serde::{Deserialize, Serialize};
use tileworld_common::{CELL_HALF, CELL_SIZE, RoomCoord};
use tileworld_input::{Intent, IntentSet, IntentSource};
use tileworld_objects::{TypeId, object_type};
use tileworld_stream::Level;

use crate::behavior::{Ctx, Outcome, behavior};
use crate::config::SimConfig;
use crate::error::SimError;
use crate::pacer::{Clock, FramePacer};
use crate::physics::{self, Motion};
use crate::player::{Player, blink_alpha};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    /// Waiting for the player to confirm a respawn.
    Killed,
    LevelComplete,
    GameOver,
    /// Terminal.
    Quit,
}

/// Notable things that happened during a frame, drained by the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimEvent {
    RoomEntered(RoomCoord),
    PlayerDamaged { amount: i32, health: i32 },
    PlayerKilled { lives: u32 },
    PlayerRespawned { room: RoomCoord },
    GameOver,
    LevelCompleted,
    DoorOpened { row: i32, col: i32 },
    ItemCollected(TypeId),
    Triggered(i32),
    Compacted { removed: usize },
    Quit,
}

/// The whole game: level, player and the state machine that drives them.
#[derive(Debug)]
pub struct Simulation {
    state: GameState,
    level: Level,
    player: Player,
    config: SimConfig,
    motion: Motion,
    respawn_pos: DVec2,
    respawn_room: RoomCoord,
    clean_deadline_ms: f64,
    /// Blocks jumping until Up is released after climbing off a ladder top.
    jump_denied: bool,
    events: Vec<SimEvent>,
    frame: u64,
    time_ms: f64,
}

impl Simulation {
    /// Start playing `level` with the player at its start marker.
    pub fn new(mut level: Level, config: SimConfig) -> Result<Self, SimError> {
        let start_room = level.start_room();
        level.set_active_room(start_room)?;
        let mut player = Player::new(&config.player);
        player.object_mut().pos = level.player_start();

        Ok(Self {
            state: GameState::Playing,
            respawn_pos: level.player_start(),
            respawn_room: start_room,
            level,
            player,
            motion: Motion::from_config(&config),
            clean_deadline_ms: config.cleanup_period_ms,
            config,
            jump_denied: false,
            events: Vec::new(),
            frame: 0,
            time_ms: 0.0,
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Where, and in which room, the player reappears after a death.
    pub fn respawn_point(&self) -> (RoomCoord, DVec2) {
        (self.respawn_room, self.respawn_pos)
    }

    pub fn is_jump_denied(&self) -> bool {
        self.jump_denied
    }

    /// Frames simulated so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Game time of the last frame, ms.
    pub fn time_ms(&self) -> f64 {
        self.time_ms
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_state(&mut self, next: GameState) {
        if self.state != next {
            tracing::info!(from = ?self.state, to = ?next, "game state changed");
            self.state = next;
        }
    }

    // ---- player operations ----

    /// Subtract `amount` health; reaching zero kills. Ignored while
    /// invincible.
    pub fn damage_player(&mut self, amount: i32) {
        if self.player.is_invincible() {
            return;
        }
        self.player.health = (self.player.health - amount).max(0);
        self.events.push(SimEvent::PlayerDamaged {
            amount,
            health: self.player.health,
        });
        if self.player.health == 0 {
            self.kill_player();
        }
    }

    /// Take a life. Ignored while invincible.
    pub fn kill_player(&mut self) {
        if self.player.is_invincible() {
            return;
        }
        self.player.object_mut().anim.set(5, 5, 0.0);
        self.player.lives = self.player.lives.saturating_sub(1);
        self.events.push(SimEvent::PlayerKilled {
            lives: self.player.lives,
        });
        if self.player.lives > 0 {
            self.set_state(GameState::Killed);
        } else {
            self.events.push(SimEvent::GameOver);
            self.set_state(GameState::GameOver);
        }
    }

    /// Put the player back at the last checkpoint with a grace period.
    /// A player killed by damage comes back with full health; other deaths
    /// keep the health they had.
    pub fn respawn_player(&mut self) -> Result<(), SimError> {
        if self.level.active_coord() != self.respawn_room {
            self.level.set_active_room(self.respawn_room)?;
        }
        let invincibility = self.config.player.respawn_invincibility_ms;
        let player = &mut self.player;
        if player.health == 0 {
            player.health = player.max_health;
        }
        player.invincibility = invincibility;
        player.actor.on_ladder = false;
        player.actor.in_air = false;
        let object = player.object_mut();
        object.anim.set(0, 0, 0.0);
        object.pos = self.respawn_pos;
        object.vel = DVec2::ZERO;
        self.events.push(SimEvent::PlayerRespawned {
            room: self.respawn_room,
        });
        Ok(())
    }

    pub fn complete_level(&mut self) {
        self.events.push(SimEvent::LevelCompleted);
        self.set_state(GameState::LevelComplete);
    }

    // ---- intents ----

    fn run_animation(&mut self) {
        let fps = self.config.player.run_anim_fps;
        let actor = &mut self.player.actor;
        if actor.on_ladder {
            return;
        }
        if actor.in_air {
            actor.object.anim.set(1, 1, fps);
        } else {
            actor.object.anim.set(1, 2, fps);
        }
    }

    pub fn move_left(&mut self) {
        self.run_animation();
        let object = self.player.object_mut();
        object.anim.flip = true;
        object.vel.x = -self.config.player.run_speed;
    }

    pub fn move_right(&mut self) {
        self.run_animation();
        let object = self.player.object_mut();
        object.anim.flip = false;
        object.vel.x = self.config.player.run_speed;
    }

    pub fn no_direction(&mut self) {
        let actor = &mut self.player.actor;
        if !actor.on_ladder {
            actor.object.anim.set(0, 0, 0.0);
        }
        actor.object.vel.x = 0.0;
    }

    /// Jump, or climb when standing in a climbable ladder cell.
    pub fn move_up(&mut self) {
        let tuning = &self.config.player;
        let home = self.player.object().home_cell();
        let climbable = self.level.active_room().is_climbable_ladder(home.row, home.col);
        let actor = &mut self.player.actor;
        if !climbable {
            actor.on_ladder = false;
            if !actor.in_air && !self.jump_denied {
                actor.object.vel.y = -tuning.jump_speed;
            }
        } else {
            actor.on_ladder = true;
            actor.object.vel.y = -tuning.ladder_speed;
            actor.object.pos.x = (home.col * CELL_SIZE) as f64;
            actor.object.anim.set_flip(3, tuning.ladder_anim_fps);
            self.jump_denied = true;
        }
    }

    /// Climb down, mounting a ladder that starts below the player.
    pub fn move_down(&mut self) {
        let tuning = &self.config.player;
        let home = self.player.object().home_cell();
        let below = self.level.active_room().is_climbable_ladder(home.row + 1, home.col);
        let actor = &mut self.player.actor;
        if !below && !actor.on_ladder {
            return;
        }
        if !actor.on_ladder {
            actor.on_ladder = true;
            actor.object.pos.y = (home.row * CELL_SIZE + CELL_HALF + 1) as f64;
        }
        actor.object.vel.y = tuning.ladder_speed;
        actor.object.pos.x = (home.col * CELL_SIZE) as f64;
        actor.object.anim.set_flip(3, tuning.ladder_anim_fps);
    }

    /// Neither up nor down held: hang on the ladder, or re-arm jumping.
    pub fn release_vertical(&mut self) {
        let actor = &mut self.player.actor;
        if actor.on_ladder {
            actor.object.anim.set(3, 3, 0.0);
            actor.object.vel.y = 0.0;
        } else {
            self.jump_denied = false;
        }
    }

    /// Open an adjacent door if the player holds a key.
    pub fn interact(&mut self) {
        let home = self.player.object().home_cell();
        let room = self.level.active_room_mut();
        let Some(col) = room.find_near_door(home.row, home.col) else {
            return;
        };
        if self.player.keys == 0 {
            return;
        }
        self.player.keys -= 1;
        room.set_cell(home.row, col, object_type(TypeId::None));
        tracing::debug!(row = home.row, col, keys = self.player.keys, "door opened");
        self.events.push(SimEvent::DoorOpened { row: home.row, col });
    }

    /// Map one frame's held intents onto the player operations.
    pub fn apply_intents(&mut self, intents: &IntentSet) {
        if intents.contains(Intent::Left) {
            self.move_left();
        } else if intents.contains(Intent::Right) {
            self.move_right();
        } else {
            self.no_direction();
        }

        if intents.contains(Intent::Up) {
            self.move_up();
        } else if intents.contains(Intent::Down) {
            self.move_down();
        } else {
            self.release_vertical();
        }

        if intents.contains(Intent::Interact) {
            self.interact();
        }
    }

    // ---- frame ----

    /// Advance the game by one frame of `dt_ms`, with `now_ms` the game clock
    /// used for periodic cleanup.
    pub fn frame(&mut self, dt_ms: f64, now_ms: f64, intents: &IntentSet) -> Result<(), SimError> {
        let span = tracing::info_span!("sim_frame", frame = self.frame);
        let _enter = span.enter();
        self.frame += 1;
        self.time_ms = now_ms;

        if intents.contains(Intent::Quit) && self.state != GameState::Quit {
            self.events.push(SimEvent::Quit);
            self.set_state(GameState::Quit);
        }

        let confirm = intents.contains(Intent::Interact);
        match self.state {
            GameState::Playing => {
                self.apply_intents(intents);
                self.process_player(dt_ms)?;
                let outcomes = self.process_objects(dt_ms);
                self.apply_outcomes(outcomes);
                self.advance_animations(dt_ms);
            }
            GameState::Killed if confirm => {
                self.set_state(GameState::Playing);
                self.respawn_player()?;
            }
            GameState::LevelComplete | GameState::GameOver if confirm => {
                self.events.push(SimEvent::Quit);
                self.set_state(GameState::Quit);
            }
            _ => {}
        }

        if now_ms >= self.clean_deadline_ms {
            self.clean_deadline_ms = now_ms + self.config.cleanup_period_ms;
            self.compact_rooms();
        }
        Ok(())
    }

    /// Advance by `dt_ms` on the simulation's own clock, clamped like a
    /// paced frame.
    pub fn step(&mut self, dt_ms: f64, intents: &IntentSet) -> Result<(), SimError> {
        let max = self.config.pacing.max_delta_ms;
        let dt_ms = if max > 0.0 { dt_ms.min(max) } else { dt_ms };
        let now = self.time_ms + dt_ms;
        self.frame(dt_ms, now, intents)
    }

    /// Drive frames from `input`, paced by `pacer`, until the game quits or
    /// the input runs dry. Starts the pacer from the config if needed and
    /// always stops it before returning. Returns the number of frames run.
    pub fn run<C: Clock>(
        &mut self,
        pacer: &mut FramePacer<C>,
        input: &mut impl IntentSource,
    ) -> Result<u64, SimError> {
        if !pacer.is_started() {
            let pacing = &self.config.pacing;
            pacer.set_stats_window(pacing.stats_window);
            pacer.start(pacing.frame_rate, pacing.max_delta_ms)?;
        }
        let result = self.drive(pacer, input);
        pacer.stop();
        let frames = result?;
        tracing::info!(frames, state = ?self.state, "run finished");
        Ok(frames)
    }

    fn drive<C: Clock>(
        &mut self,
        pacer: &mut FramePacer<C>,
        input: &mut impl IntentSource,
    ) -> Result<u64, SimError> {
        let mut frames = 0;
        while self.state != GameState::Quit {
            let Some(intents) = input.next_intents() else {
                break;
            };
            pacer.wait_for_next_frame()?;
            self.frame(pacer.elapsed_frame_time_ms(), pacer.elapsed_time_ms(), &intents)?;
            frames += 1;
        }
        Ok(frames)
    }

    fn process_player(&mut self, dt_ms: f64) -> Result<(), SimError> {
        let resolution = physics::resolve(&mut self.level, &mut self.player.actor, dt_ms, &self.motion)?;
        if let Some(room) = resolution.entered_room {
            self.events.push(SimEvent::RoomEntered(room));
        }
        if resolution.fell_out || resolution.in_water {
            self.kill_player();
        }

        let player = &mut self.player;
        if player.invincibility > 0.0 {
            player.invincibility = (player.invincibility - dt_ms).max(0.0);
            let alpha = blink_alpha(player.invincibility, self.config.player.blink_period_ms);
            player.object_mut().anim.alpha = alpha;
        }

        if self.state == GameState::Playing && !player.actor.in_air && !player.actor.on_ladder {
            self.respawn_pos = player.object().pos;
            self.respawn_room = self.level.active_coord();
        }
        Ok(())
    }

    /// Run every live object's frame hook, then its hit hook if it touches
    /// the player. Objects spawned meanwhile run in the same pass.
    fn process_objects(&mut self, dt_ms: f64) -> Vec<Outcome> {
        let room = self.level.active_room_mut();
        let mut ctx = Ctx::new(room, &mut self.player, &self.config.player, dt_ms);
        let mut index = 0;
        while index < ctx.room.objects.len() {
            let Some(mut object) = ctx.room.objects.get(index).filter(|o| o.is_alive()).cloned() else {
                index += 1;
                continue;
            };
            let hooks = behavior(object.ty.behavior);
            hooks.on_frame(&mut object, &mut ctx);
            if object.is_alive() && object.hit_test(ctx.player.object()) {
                hooks.on_hit(&mut object, &mut ctx);
            }
            if let Some(slot) = ctx.room.objects.get_mut(index) {
                *slot = object;
            }
            index += 1;
        }
        ctx.into_outcomes()
    }

    fn apply_outcomes(&mut self, outcomes: Vec<Outcome>) {
        for outcome in outcomes {
            match outcome {
                Outcome::Damage(amount) if self.state == GameState::Playing => self.damage_player(amount),
                Outcome::Kill if self.state == GameState::Playing => self.kill_player(),
                Outcome::CompleteLevel if self.state == GameState::Playing => self.complete_level(),
                Outcome::Collected(t) => self.events.push(SimEvent::ItemCollected(t)),
                Outcome::Triggered(n) => {
                    tracing::debug!(trigger = n, "trigger touched");
                    self.events.push(SimEvent::Triggered(n));
                }
                _ => {}
            }
        }
    }

    fn advance_animations(&mut self, dt_ms: f64) {
        self.player.object_mut().anim.advance(dt_ms);
        for object in self.level.active_room_mut().objects.iter_mut() {
            if object.is_alive() {
                object.anim.advance(dt_ms);
            }
        }
    }

    /// Drop removed objects from every room.
    pub fn compact_rooms(&mut self) -> usize {
        let removed: usize = self
            .level
            .rooms_mut()
            .map(|room| room.objects.compact().removed())
            .sum();
        tracing::debug!(removed, "rooms compacted");
        if removed > 0 {
            self.events.push(SimEvent::Compacted { removed });
        }
        removed
    }
}
