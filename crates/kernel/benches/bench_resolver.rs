use std::hint::black_box;
use std::time::Instant;

use glam::DVec2;
use tileworld_common::{CELL_COUNT, COLUMN_COUNT};
use tileworld_input::{Intent, IntentSet};
use tileworld_kernel::{Actor, Motion, SimConfig, Simulation, build_level, resolve};
use tileworld_objects::{Object, TypeId};

/// A single room with a floor, a few walls and a row of coins.
fn source() -> String {
    let mut grid = vec![' '; CELL_COUNT];
    for c in 0..COLUMN_COUNT {
        grid[10 * COLUMN_COUNT + c] = 'x';
        grid[4 * COLUMN_COUNT + c] = 'o';
    }
    grid[9 * COLUMN_COUNT + 12] = '*';
    grid[9 * COLUMN_COUNT + 2] = 'P';
    grid.into_iter().collect()
}

fn bench_resolve(iterations: usize) {
    let mut level = build_level(&source(), 1, 1).expect("level");
    let motion = Motion::default();
    let mut actor = Actor::new(TypeId::Player);

    let start = Instant::now();
    for i in 0..iterations {
        if i % 200 == 0 {
            actor.object.pos = DVec2::new(32.0, 144.0);
        }
        actor.object.vel.x = 72.0;
        let _ = black_box(resolve(&mut level, black_box(&mut actor), 16.0, &motion));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  resolve ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_frame(iterations: usize) {
    let level = build_level(&source(), 1, 1).expect("level");
    let mut sim = Simulation::new(level, SimConfig::default()).expect("simulation");
    let right = IntentSet::new().with(Intent::Right);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(sim.step(16.0, black_box(&right)));
        sim.drain_events();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  full frame ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_compact(object_count: usize, iterations: usize) {
    let level = build_level(&source(), 1, 1).expect("level");
    let mut sim = Simulation::new(level, SimConfig::default()).expect("simulation");

    let start = Instant::now();
    for _ in 0..iterations {
        let room = sim.level_mut().active_room_mut();
        for i in 0..object_count {
            let mut coin = Object::new(TypeId::Coin);
            if i % 2 == 0 {
                coin.remove();
            }
            room.objects.push(coin);
        }
        let _ = black_box(sim.compact_rooms());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  push + compact ({object_count} objects, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== Resolver Benchmarks ===\n");

    println!("Tile resolver:");
    bench_resolve(100_000);

    println!("\nSimulation frame:");
    bench_frame(10_000);

    println!("\nCompaction:");
    bench_compact(100, 1000);
    bench_compact(1000, 100);

    println!("\n=== Done ===");
}
