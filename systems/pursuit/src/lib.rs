#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adversary behavior engine that turns world events into steering commands.
//!
//! Each live adversary is driven by an [`agent::AdversaryAgent`] combining
//! line of sight ([`perception`]), a mode state machine ([`mode`]) and
//! breadth-first distance fields ([`distance_field`]) consumed by the
//! per-mode strategies in [`decider`].

pub mod agent;
pub mod decider;
pub mod distance_field;
pub mod mode;
pub mod perception;

use std::{collections::BTreeMap, time::Duration};

use maze_pursuit_core::{
    AdversaryId, AdversaryView, BehaviorMode, CellCoord, Command, Event, GridQuery,
};

use crate::agent::AdversaryAgent;

const DEFAULT_CHASE_DURATION: Duration = Duration::from_secs(3);

/// Configuration parameters applied to every adversary agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    chase_duration: Duration,
}

impl Config {
    /// Creates a new configuration.
    #[must_use]
    pub const fn new(chase_duration: Duration) -> Self {
        Self { chase_duration }
    }

    /// Time an adversary keeps chasing after losing sight of the player.
    #[must_use]
    pub const fn chase_duration(&self) -> Duration {
        self.chase_duration
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_CHASE_DURATION)
    }
}

/// Pure system that reacts to world events and emits steering commands.
#[derive(Debug, Default)]
pub struct Pursuit {
    config: Config,
    agents: BTreeMap<AdversaryId, AdversaryAgent>,
    pending_sounds: BTreeMap<AdversaryId, CellCoord>,
}

impl Pursuit {
    /// Creates a new pursuit system using the provided configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            agents: BTreeMap::new(),
            pending_sounds: BTreeMap::new(),
        }
    }

    /// Agent driving the provided adversary, if it is alive.
    #[must_use]
    pub fn agent(&self, adversary: AdversaryId) -> Option<&AdversaryAgent> {
        self.agents.get(&adversary)
    }

    /// Iterator over the live agents in ascending id order.
    pub fn agents(&self) -> impl Iterator<Item = &AdversaryAgent> {
        self.agents.values()
    }

    /// Consumes world events and read-only views to emit steering commands.
    ///
    /// Events are applied in order. Sounds are queued for the listener they
    /// are routed to, and every `TimeAdvanced` event triggers one decision
    /// pass over all agents in ascending id order.
    pub fn handle(
        &mut self,
        events: &[Event],
        adversaries: &AdversaryView,
        player: Option<CellCoord>,
        grid: &impl GridQuery,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::MazeConfigured { .. } => {
                    self.agents.clear();
                    self.pending_sounds.clear();
                }
                Event::AdversarySpawned { adversary, cell } => {
                    let agent =
                        AdversaryAgent::new(*adversary, *cell, self.config.chase_duration);
                    let _ = self.agents.insert(*adversary, agent);
                }
                Event::AdversaryCaptured { adversary, .. } => {
                    let _ = self.agents.remove(adversary);
                    let _ = self.pending_sounds.remove(adversary);
                }
                Event::SoundEmitted { cell } => self.route_sound(*cell, adversaries),
                Event::TimeAdvanced { dt } => self.decide(*dt, adversaries, player, grid, out),
                _ => {}
            }
        }
    }

    /// Hands the sound to the nearest adversary that is not fleeing.
    fn route_sound(&mut self, sound: CellCoord, adversaries: &AdversaryView) {
        let listener = self
            .agents
            .values()
            .filter(|agent| agent.mode() != BehaviorMode::RunAway)
            .map(|agent| {
                let position = adversaries
                    .get(agent.id())
                    .map_or(agent.position(), |snapshot| snapshot.cell);
                (position.manhattan_distance(sound), agent.id())
            })
            .min();

        match listener {
            Some((_, adversary)) => {
                tracing::debug!(adversary = adversary.get(), ?sound, "sound routed");
                let _ = self.pending_sounds.insert(adversary, sound);
            }
            None => tracing::debug!(?sound, "sound dropped"),
        }
    }

    fn decide(
        &mut self,
        dt: Duration,
        adversaries: &AdversaryView,
        player: Option<CellCoord>,
        grid: &impl GridQuery,
        out: &mut Vec<Command>,
    ) {
        for (id, agent) in &mut self.agents {
            let Some(snapshot) = adversaries.get(*id) else {
                let _ = self.pending_sounds.remove(id);
                continue;
            };

            agent.sync_position(snapshot.cell);
            let sound = self.pending_sounds.remove(id);
            let decision = agent.tick(player, sound, dt, grid);
            out.push(Command::SteerAdversary {
                adversary: *id,
                mode: decision.mode(),
                intent: decision.intent,
                player_visible: decision.player_visible,
            });
        }
    }
}
