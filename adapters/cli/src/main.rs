#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Maze Pursuit headlessly.

mod autopilot;
mod config;
mod render;
mod simulation;

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use maze_pursuit_core::{Maze, GAME_TITLE};
use maze_pursuit_world::layout;
use tracing_subscriber::EnvFilter;

use crate::{config::SimulationConfig, simulation::Simulation};

/// Runs a seeded Maze Pursuit session without a window.
#[derive(Debug, Parser)]
#[command(name = "maze-pursuit", version, about)]
struct Args {
    /// Layout file to load instead of the built-in maze.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// TOML file overriding simulation settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seed for the autopilot player.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print every frame instead of only the last one.
    #[arg(long)]
    frames: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    summary_json: bool,
}

/// Entry point for the Maze Pursuit command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let maze = load_maze(args.layout.as_ref())?;
    tracing::info!(
        rows = maze.rows(),
        columns = maze.columns(),
        seed = args.seed,
        "starting {GAME_TITLE}"
    );

    let mut simulation = Simulation::new(config, maze, args.seed)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let summary = if args.frames {
        simulation.run(args.ticks, Some(&mut out as &mut dyn Write))?
    } else {
        let summary = simulation.run(args.ticks, None)?;
        out.write_all(simulation.last_frame().as_bytes())
            .context("failed to write frame")?;
        summary
    };

    if args.summary_json {
        serde_json::to_writer_pretty(&mut out, &summary).context("failed to write summary")?;
        writeln!(out).context("failed to write summary")?;
    } else {
        writeln!(
            out,
            "{GAME_TITLE}: {} after {} ticks with {} points",
            summary.status, summary.ticks, summary.score
        )
        .context("failed to write summary")?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_maze(path: Option<&PathBuf>) -> Result<Maze> {
    let Some(path) = path else {
        return layout::default_maze().context("built-in layout is invalid");
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file {}", path.display()))?;
    layout::parse(&text).with_context(|| format!("invalid layout file {}", path.display()))
}
