use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tileworld_author::{Editor, LevelGrid};
use tileworld_common::{CellCoord, RoomCoord};
use tileworld_input::{IntentScript, IntentSet};
use tileworld_kernel::{FramePacer, SimConfig, SimEvent, Simulation, build_level};
use tileworld_render::{RenderView, Renderer, TextRenderer};
use tileworld_tools::{PacingSummary, SimInspector, SimSummary};

#[derive(Parser)]
#[command(name = "tileworld-cli", about = "CLI host for tileworld levels")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the room array size comes from.
#[derive(Args)]
struct LevelArgs {
    /// Simulation config (YAML); also supplies the room array size
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Room rows, overrides the config
    #[arg(long)]
    rooms_y: Option<usize>,
    /// Room columns, overrides the config
    #[arg(long)]
    rooms_x: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Check that a level file loads and populates
    Validate {
        file: PathBuf,
        #[command(flatten)]
        level: LevelArgs,
    },
    /// Simulate a level headlessly
    Run {
        file: PathBuf,
        #[command(flatten)]
        level: LevelArgs,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Intent script, e.g. "right*30, up+right*5, none*10"
        #[arg(short, long, default_value = "")]
        script: String,
        /// Pace frames against the wall clock instead of fixed steps
        #[arg(long)]
        realtime: bool,
        /// Print the summary and events as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set one cell of a level file
    Paint {
        file: PathBuf,
        #[command(flatten)]
        level: LevelArgs,
        /// Room as "row,col"
        #[arg(long, value_parser = parse_pair::<usize>)]
        room: (usize, usize),
        /// Cell within the room as "row,col"
        #[arg(long, value_parser = parse_pair::<i32>)]
        cell: (i32, i32),
        /// Level symbol to write
        #[arg(long)]
        symbol: char,
        /// Output file, defaults to overwriting the input
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct RunReport {
    summary: SimSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pacing: Option<PacingSummary>,
    events: Vec<SimEvent>,
}

fn parse_pair<T: FromStr>(s: &str) -> Result<(T, T), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"row,col\", got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<T>()
            .map_err(|_| format!("invalid coordinate {v:?}"))
    };
    Ok((parse(a)?, parse(b)?))
}

impl LevelArgs {
    fn load_config(&self) -> anyhow::Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = std::fs::File::open(path)
                    .with_context(|| format!("opening config {}", path.display()))?;
                serde_yaml::from_reader(file)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SimConfig::default(),
        };
        if let Some(rooms_y) = self.rooms_y {
            config.rooms_y = rooms_y;
        }
        if let Some(rooms_x) = self.rooms_x {
            config.rooms_x = rooms_x;
        }
        Ok(config)
    }
}

fn load_source(file: &Path, config: &SimConfig) -> anyhow::Result<String> {
    tileworld_assets::load_level_file(file, config.rooms_y, config.rooms_x)
        .with_context(|| format!("loading level {}", file.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("tileworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", tileworld_common::crate_info());
            println!("objects: {}", tileworld_objects::crate_info());
            println!("stream: {}", tileworld_stream::crate_info());
            println!("input: {}", tileworld_input::crate_info());
            println!("kernel: {}", tileworld_kernel::crate_info());
            println!("render: {}", tileworld_render::crate_info());
            println!("tools: {}", tileworld_tools::crate_info());
            println!("assets: {}", tileworld_assets::crate_info());
            println!("author: {}", tileworld_author::crate_info());
        }
        Commands::Validate { file, level } => {
            let config = level.load_config()?;
            let source = load_source(&file, &config)?;
            let built = build_level(&source, config.rooms_y, config.rooms_x)?;
            let objects: usize = built.rooms().map(|room| room.objects.len()).sum();
            let start = built.player_start();
            println!(
                "OK: {} rooms ({}x{}), {} objects, start room {} at ({:.0}, {:.0})",
                config.rooms_y * config.rooms_x,
                config.rooms_y,
                config.rooms_x,
                objects,
                built.start_room(),
                start.x,
                start.y
            );
        }
        Commands::Run {
            file,
            level,
            frames,
            script,
            realtime,
            json,
        } => {
            let config = level.load_config()?;
            let source = load_source(&file, &config)?;
            let script: IntentScript = script.parse()?;
            let dt_ms = 1000.0 / f64::from(config.pacing.frame_rate.max(1));
            let built = build_level(&source, config.rooms_y, config.rooms_x)?;
            let mut sim = Simulation::new(built, config)?;

            let mut input = script
                .player()
                .chain(std::iter::repeat(IntentSet::new()))
                .take(frames as usize);
            let pacing = if realtime {
                let mut pacer = FramePacer::default();
                sim.run(&mut pacer, &mut input)?;
                Some(SimInspector::pacing(&pacer))
            } else {
                for intents in input {
                    sim.step(dt_ms, &intents)?;
                    if sim.state() == tileworld_kernel::GameState::Quit {
                        break;
                    }
                }
                None
            };

            let summary = SimInspector::summary(&sim);
            if json {
                let report = RunReport {
                    summary,
                    pacing,
                    events: sim.drain_events(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", TextRenderer::new().render(&sim, &RenderView::default()));
                for event in sim.events() {
                    println!("event: {event:?}");
                }
                println!("{summary}");
                if let Some(pacing) = pacing {
                    println!("{pacing}");
                }
            }
        }
        Commands::Paint {
            file,
            level,
            room,
            cell,
            symbol,
            out,
        } => {
            let config = level.load_config()?;
            let source = load_source(&file, &config)?;
            let mut grid = LevelGrid::from_source(&source, config.rooms_y, config.rooms_x)?;
            let mut editor = Editor::new();
            let room = RoomCoord::new(room.0, room.1);
            let cell = CellCoord::new(cell.0, cell.1);
            editor.set_cell(&mut grid, room, cell, symbol)?;
            if let Err(e) = grid.build() {
                tracing::warn!(error = %e, "painted level does not populate");
            }

            let out = out.unwrap_or(file);
            tileworld_assets::save_level_file(&out, &grid.to_source_string(), grid.rooms_x())?;
            println!(
                "Painted {symbol:?} at room {room} cell ({}, {}) -> {}",
                cell.row,
                cell.col,
                out.display()
            );
        }
    }

    Ok(())
}
