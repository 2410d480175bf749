//! Headless driver wiring the world, the pursuit system and the autopilot.

use std::io::Write;

use anyhow::{bail, Context, Result};
use maze_pursuit_core::{Command, Event, Maze};
use maze_pursuit_system_pursuit::Pursuit;
use maze_pursuit_world::{self as world, query, RunStatus, World};
use serde::Serialize;

use crate::{autopilot::Autopilot, config::SimulationConfig, render};

/// Outcome reported once a run finishes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct Summary {
    pub(crate) seed: u64,
    pub(crate) ticks: u64,
    pub(crate) status: &'static str,
    pub(crate) score: u32,
    pub(crate) pellets_remaining: usize,
    pub(crate) adversaries_remaining: usize,
    pub(crate) adversaries_captured: u32,
    pub(crate) sounds_emitted: u32,
    pub(crate) mode_changes: u32,
}

#[derive(Debug, Default)]
struct Tally {
    captures: u32,
    sounds: u32,
    mode_changes: u32,
}

impl Tally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::AdversaryCaptured { .. } => self.captures += 1,
                Event::SoundEmitted { .. } => self.sounds += 1,
                Event::AdversaryModeChanged { .. } => self.mode_changes += 1,
                _ => {}
            }
        }
    }
}

pub(crate) struct Simulation {
    world: World,
    pursuit: Pursuit,
    autopilot: Autopilot,
    config: SimulationConfig,
    seed: u64,
    tally: Tally,
}

impl Simulation {
    /// Configures the maze and places every entity, rejecting invalid cells.
    pub(crate) fn new(config: SimulationConfig, maze: Maze, seed: u64) -> Result<Self> {
        let mut simulation = Self {
            world: World::with_config(config.world_config()),
            pursuit: Pursuit::new(config.pursuit_config()),
            autopilot: Autopilot::new(seed, config.turn_chance),
            seed,
            tally: Tally::default(),
            config,
        };

        let mut setup = vec![
            Command::ConfigureMaze { maze },
            Command::PlacePlayer {
                cell: simulation.config.player_cell(),
            },
        ];
        setup.extend(
            simulation
                .config
                .adversary_cells()
                .map(|cell| Command::SpawnAdversary { cell }),
        );

        for command in setup {
            let events = simulation.submit(command);
            if let Some(Event::PlacementRejected { cell, reason }) = events
                .iter()
                .find(|event| matches!(event, Event::PlacementRejected { .. }))
            {
                bail!("cannot place entity at {cell:?}: {reason:?}");
            }
        }

        Ok(simulation)
    }

    /// Runs up to `ticks` ticks, stopping early once the run ends.
    pub(crate) fn run(
        &mut self,
        ticks: u64,
        mut frames: Option<&mut dyn Write>,
    ) -> Result<Summary> {
        if let Some(out) = frames.as_deref_mut() {
            out.write_all(render::frame(&self.world).as_bytes())
                .context("failed to write frame")?;
        }

        for _ in 0..ticks {
            if query::status(&self.world) != RunStatus::Running {
                break;
            }
            self.step();

            if let Some(out) = frames.as_deref_mut() {
                out.write_all(render::frame(&self.world).as_bytes())
                    .context("failed to write frame")?;
            }
        }

        let summary = self.summary();
        tracing::info!(
            ticks = summary.ticks,
            score = summary.score,
            status = summary.status,
            "run finished"
        );
        Ok(summary)
    }

    /// Renders the current state of the world.
    pub(crate) fn last_frame(&self) -> String {
        render::frame(&self.world)
    }

    fn step(&mut self) {
        if let Some(cell) = query::player_cell(&self.world) {
            let grid = query::grid_view(&self.world);
            if let Some(direction) = self.autopilot.steer(cell, &grid) {
                let _ = self.submit(Command::SetPlayerHeading { direction });
            }
        }

        let _ = self.submit(Command::Tick {
            dt: self.config.tick(),
        });
    }

    /// Applies a command and lets the pursuit system react until no further
    /// commands are produced. Returns every event broadcast along the way.
    fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut broadcast = Vec::new();
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        while !events.is_empty() {
            self.tally.record(&events);
            let mut commands = Vec::new();
            self.pursuit.handle(
                &events,
                &query::adversary_view(&self.world),
                query::player_cell(&self.world),
                &query::grid_view(&self.world),
                &mut commands,
            );

            broadcast.append(&mut events);
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        broadcast
    }

    fn summary(&self) -> Summary {
        Summary {
            seed: self.seed,
            ticks: query::tick_index(&self.world),
            status: render::status_label(query::status(&self.world)),
            score: query::score(&self.world),
            pellets_remaining: query::maze(&self.world).remaining_collectibles(),
            adversaries_remaining: query::adversary_view(&self.world).len(),
            adversaries_captured: self.tally.captures,
            sounds_emitted: self.tally.sounds,
            mode_changes: self.tally.mode_changes,
        }
    }
}
