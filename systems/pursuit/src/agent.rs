//! Per-adversary orchestration of perception, mode selection and movement.

use std::time::Duration;

use maze_pursuit_core::{AdversaryId, BehaviorMode, CellCoord, GridQuery, MovementIntent};

use crate::{
    decider::{MovementDecider, PatrolMemory},
    mode::{ModeController, ModeTransition, Stimulus},
    perception,
};

/// Mutable behavior state carried by a single adversary between ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdversaryState {
    position: CellCoord,
    controller: ModeController,
    decider: MovementDecider,
}

impl AdversaryState {
    /// Cell the adversary occupied when it was last synchronized.
    #[must_use]
    pub fn position(&self) -> CellCoord {
        self.position
    }

    /// Mode the adversary is currently following.
    #[must_use]
    pub fn mode(&self) -> BehaviorMode {
        self.controller.mode()
    }

    /// Sound coordinate being investigated, if any.
    #[must_use]
    pub fn sound_memory(&self) -> Option<CellCoord> {
        self.controller.sound_memory()
    }

    /// Time left before an unseen chase is abandoned.
    #[must_use]
    pub fn chase_remaining(&self) -> Option<Duration> {
        self.controller.chase_remaining()
    }

    /// Patrol orientation carried into the next tick.
    #[must_use]
    pub fn patrol(&self) -> PatrolMemory {
        self.decider.patrol()
    }
}

/// Outcome of a single decision pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Mode change applied before deciding.
    pub transition: ModeTransition,
    /// Step the adversary wants to take.
    pub intent: MovementIntent,
    /// Whether the player was in line of sight when deciding.
    pub player_visible: bool,
}

impl Decision {
    /// Mode the decision was made under.
    #[must_use]
    pub fn mode(&self) -> BehaviorMode {
        self.transition.to
    }
}

/// Drives one adversary's behavior once per tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdversaryAgent {
    id: AdversaryId,
    state: AdversaryState,
}

impl AdversaryAgent {
    /// Creates an agent for a freshly spawned adversary.
    #[must_use]
    pub fn new(id: AdversaryId, position: CellCoord, chase_duration: Duration) -> Self {
        Self::with_patrol(id, position, chase_duration, PatrolMemory::default())
    }

    /// Creates an agent whose patrol starts from the provided orientation.
    #[must_use]
    pub fn with_patrol(
        id: AdversaryId,
        position: CellCoord,
        chase_duration: Duration,
        patrol: PatrolMemory,
    ) -> Self {
        Self {
            id,
            state: AdversaryState {
                position,
                controller: ModeController::new(chase_duration),
                decider: MovementDecider::with_patrol(patrol),
            },
        }
    }

    /// Identifier of the adversary the agent drives.
    #[must_use]
    pub fn id(&self) -> AdversaryId {
        self.id
    }

    /// Read-only behavior state.
    #[must_use]
    pub fn state(&self) -> &AdversaryState {
        &self.state
    }

    /// Cell the adversary occupied when it was last synchronized.
    #[must_use]
    pub fn position(&self) -> CellCoord {
        self.state.position
    }

    /// Mode the adversary is currently following.
    #[must_use]
    pub fn mode(&self) -> BehaviorMode {
        self.state.mode()
    }

    /// Adopts the authoritative position reported by the world.
    pub fn sync_position(&mut self, position: CellCoord) {
        self.state.position = position;
    }

    /// Updates the mode and picks the next step.
    pub fn tick(
        &mut self,
        player: Option<CellCoord>,
        sound: Option<CellCoord>,
        elapsed: Duration,
        grid: &impl GridQuery,
    ) -> Decision {
        let position = self.state.position;
        let player_visible =
            player.is_some_and(|player| perception::can_see(position, player, grid));

        let transition = self.state.controller.update(&Stimulus {
            position,
            player_visible,
            special_effect_active: grid.is_special_effect_active(),
            sound,
            elapsed,
        });
        if transition.is_change() {
            tracing::debug!(
                adversary = self.id.get(),
                from = transition.from.label(),
                to = transition.to.label(),
                "mode transition"
            );
        }

        let target = match transition.to {
            BehaviorMode::InvestigateSound => self.state.controller.sound_memory(),
            BehaviorMode::Chase | BehaviorMode::RunAway => player,
            BehaviorMode::Patrol => None,
        };
        let intent = self
            .state
            .decider
            .decide(position, transition.to, target, grid);

        Decision {
            transition,
            intent,
            player_visible,
        }
    }
}
