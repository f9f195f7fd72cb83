use glam::DVec2;
use serde::Serialize;
use tileworld_common::{CellCoord, RoomCoord};
use tileworld_kernel::{Clock, FramePacer, GameState, Simulation};
use tileworld_objects::{ObjectId, Removal, TypeId};

/// Simulation inspector for developer tooling.
///
/// Read-only queries against the simulation for debugging, CLI summaries
/// and tests.
pub struct SimInspector;

impl SimInspector {
    /// Produce a summary of the simulation state.
    pub fn summary(sim: &Simulation) -> SimSummary {
        let player = sim.player();
        let room = sim.level().active_room();
        SimSummary {
            frame: sim.frame_count(),
            time_ms: sim.time_ms(),
            state: sim.state(),
            room: sim.level().active_coord(),
            player_pos: player.object().pos,
            health: player.health,
            lives: player.lives,
            coins: player.coins,
            keys: player.keys,
            items: player.items.iter().map(|o| o.type_id()).collect(),
            objects_alive: room.objects.alive_count(),
            objects_total: room.objects.len(),
            pending_events: sim.events().len(),
        }
    }

    /// Details of one object in the active room.
    pub fn inspect_object(sim: &Simulation, id: ObjectId) -> Option<ObjectInfo> {
        sim.level().active_room().objects.by_id(id).map(|o| ObjectInfo {
            id,
            type_id: o.type_id(),
            pos: o.pos,
            vel: o.vel,
            cell: o.home_cell(),
            removal: o.removal,
            state: o.state,
            data: o.data,
        })
    }

    /// Frame timing recorded by a pacer's statistics ring.
    pub fn pacing<C: Clock>(pacer: &FramePacer<C>) -> PacingSummary {
        let stats = pacer.stats();
        PacingSummary {
            frames: pacer.frame_count(),
            fps: pacer.current_fps(),
            window: stats.capacity(),
            samples: stats.count(),
            average_ms: stats.average(),
            min_ms: stats.min(),
            max_ms: stats.max(),
        }
    }

    /// Ids of the live objects in the active room, in draw order.
    pub fn list_objects(sim: &Simulation) -> Vec<ObjectId> {
        sim.level()
            .active_room()
            .objects
            .iter()
            .filter(|o| o.is_alive())
            .map(|o| o.id)
            .collect()
    }
}

/// Summary of simulation state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct SimSummary {
    pub frame: u64,
    pub time_ms: f64,
    pub state: GameState,
    pub room: RoomCoord,
    pub player_pos: DVec2,
    pub health: i32,
    pub lives: u32,
    pub coins: u32,
    pub keys: u32,
    pub items: Vec<TypeId>,
    pub objects_alive: usize,
    pub objects_total: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for SimSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sim: frame={} t={:.0}ms state={:?} room={} player=({:.1}, {:.1}) health={} lives={} coins={} keys={} items={} objects={}/{}",
            self.frame,
            self.time_ms,
            self.state,
            self.room,
            self.player_pos.x,
            self.player_pos.y,
            self.health,
            self.lives,
            self.coins,
            self.keys,
            self.items.len(),
            self.objects_alive,
            self.objects_total,
        )
    }
}

/// Frame timing over the pacer's most recent frames.
#[derive(Debug, Clone, Serialize)]
pub struct PacingSummary {
    pub frames: u64,
    pub fps: f64,
    /// Capacity of the statistics ring.
    pub window: usize,
    pub samples: usize,
    pub average_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl std::fmt::Display for PacingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pacing: frames={} fps={:.1} dt avg={:.2}ms min={:.2}ms max={:.2}ms over {}/{}",
            self.frames, self.fps, self.average_ms, self.min_ms, self.max_ms, self.samples, self.window,
        )
    }
}

/// Detailed info about a single object.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectInfo {
    pub id: ObjectId,
    pub type_id: TypeId,
    pub pos: DVec2,
    pub vel: DVec2,
    pub cell: CellCoord,
    pub removal: Removal,
    pub state: i32,
    pub data: i32,
}

impl std::fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Object #{} {:?} pos=({:.2}, {:.2}) vel=({:.2}, {:.2}) cell=({}, {}) {:?}",
            self.id.0,
            self.type_id,
            self.pos.x,
            self.pos.y,
            self.vel.x,
            self.vel.y,
            self.cell.row,
            self.cell.col,
            self.removal,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileworld_common::{CELL_COUNT, COLUMN_COUNT};
    use tileworld_input::IntentSet;
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
    fn summary_of_a_fresh_game() {
        let sim = sim(&[(9, 2, 'P'), (3, 3, 'o'), (3, 5, 'k')]);
        let summary = SimInspector::summary(&sim);
        assert_eq!(summary.frame, 0);
        assert_eq!(summary.state, GameState::Playing);
        assert_eq!(summary.room, RoomCoord::new(0, 0));
        assert_eq!(summary.player_pos, DVec2::new(32.0, 144.0));
        assert_eq!(summary.objects_alive, 2);
        assert_eq!(summary.lives, 3);
    }

    #[test]
    fn summary_counts_frames() {
        let mut sim = sim(&[(0, 0, 'P')]);
        sim.step(16.0, &IntentSet::EMPTY).unwrap();
        sim.step(16.0, &IntentSet::EMPTY).unwrap();
        let summary = SimInspector::summary(&sim);
        assert_eq!(summary.frame, 2);
        assert_eq!(summary.time_ms, 32.0);
    }

    #[test]
    fn inspect_object_found() {
        let sim = sim(&[(0, 0, 'P'), (3, 3, 'o')]);
        let id = SimInspector::list_objects(&sim)[0];
        let info = SimInspector::inspect_object(&sim, id).unwrap();
        assert_eq!(info.type_id, TypeId::Coin);
        assert_eq!(info.cell, CellCoord::new(3, 3));
        assert_eq!(info.removal, Removal::Alive);
    }

    #[test]
    fn inspect_object_not_found() {
        let sim = sim(&[(0, 0, 'P')]);
        assert!(SimInspector::inspect_object(&sim, ObjectId(999)).is_none());
    }

    #[test]
    fn list_skips_removed_objects() {
        let mut sim = sim(&[(0, 0, 'P'), (3, 3, 'o'), (3, 4, 'o')]);
        if let Some(coin) = sim.level_mut().active_room_mut().objects.get_mut(0) {
            coin.remove();
        }
        assert_eq!(SimInspector::list_objects(&sim).len(), 1);
    }

    #[test]
    fn pacing_reports_the_stats_window() {
        use tileworld_kernel::ManualClock;

        let clock = ManualClock::new();
        let mut pacer = FramePacer::with_clock(clock.clone()).with_stats_window(2);
        pacer.start(0, 0.0).unwrap();
        for ms in [10.0, 20.0, 30.0] {
            clock.advance_ms(ms);
            pacer.wait_for_next_frame().unwrap();
        }

        let pacing = SimInspector::pacing(&pacer);
        assert_eq!(pacing.frames, 3);
        assert_eq!(pacing.window, 2);
        assert_eq!(pacing.samples, 2);
        assert_eq!(pacing.average_ms, 25.0);
        assert_eq!(pacing.min_ms, 20.0);
        assert_eq!(pacing.max_ms, 30.0);
        assert!(format!("{pacing}").contains("over 2/2"));
    }

    #[test]
    fn summary_display_and_json() {
        let sim = sim(&[(0, 0, 'P')]);
        let summary = SimInspector::summary(&sim);
        let s = format!("{summary}");
        assert!(s.contains("frame=0"));
        assert!(s.contains("state=Playing"));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["lives"], 3);
    }
}
