//! Finite-state controller selecting an adversary's behavior mode.

use std::time::Duration;

use maze_pursuit_core::{BehaviorMode, CellCoord};

/// Observations fed into a single controller update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stimulus {
    /// Cell the adversary currently occupies.
    pub position: CellCoord,
    /// Whether the player is in the adversary's line of sight.
    pub player_visible: bool,
    /// Whether the special effect makes adversaries vulnerable.
    pub special_effect_active: bool,
    /// Sound delivered to this adversary during the tick, if any.
    pub sound: Option<CellCoord>,
    /// Simulated time elapsed since the previous update.
    pub elapsed: Duration,
}

/// Mode change reported by [`ModeController::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModeTransition {
    /// Mode before the update.
    pub from: BehaviorMode,
    /// Mode after the update.
    pub to: BehaviorMode,
}

impl ModeTransition {
    /// Reports whether the update changed the mode.
    #[must_use]
    pub fn is_change(&self) -> bool {
        self.from != self.to
    }
}

/// State machine owning every write to an adversary's [`BehaviorMode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeController {
    mode: BehaviorMode,
    chase_duration: Duration,
    chase_remaining: Option<Duration>,
    sound_memory: Option<CellCoord>,
}

impl ModeController {
    /// Creates a controller in [`BehaviorMode::Patrol`].
    #[must_use]
    pub fn new(chase_duration: Duration) -> Self {
        Self {
            mode: BehaviorMode::Patrol,
            chase_duration,
            chase_remaining: None,
            sound_memory: None,
        }
    }

    /// Mode currently selected.
    #[must_use]
    pub fn mode(&self) -> BehaviorMode {
        self.mode
    }

    /// Sound coordinate being investigated, if any.
    #[must_use]
    pub fn sound_memory(&self) -> Option<CellCoord> {
        self.sound_memory
    }

    /// Time left before an unseen chase is abandoned.
    #[must_use]
    pub fn chase_remaining(&self) -> Option<Duration> {
        self.chase_remaining
    }

    /// Advances the state machine by one tick.
    ///
    /// Rules are evaluated in priority order and the first match wins:
    /// an active special effect forces `RunAway`; leaving that effect returns
    /// to `Patrol`; sighting the player (re)starts `Chase`; a fresh sound starts
    /// `InvestigateSound`; reaching the investigated cell returns to `Patrol`;
    /// an unseen chase counts down and returns to `Patrol` once it runs out.
    pub fn update(&mut self, stimulus: &Stimulus) -> ModeTransition {
        let from = self.mode;

        if stimulus.special_effect_active {
            self.enter(BehaviorMode::RunAway);
        } else if self.mode == BehaviorMode::RunAway {
            self.enter(BehaviorMode::Patrol);
        } else if stimulus.player_visible {
            self.enter(BehaviorMode::Chase);
            self.chase_remaining = Some(self.chase_duration);
        } else if let Some(sound) = stimulus
            .sound
            .filter(|_| self.mode != BehaviorMode::InvestigateSound)
        {
            self.enter(BehaviorMode::InvestigateSound);
            self.sound_memory = Some(sound);
        } else if self.mode == BehaviorMode::InvestigateSound
            && self.sound_memory == Some(stimulus.position)
        {
            self.enter(BehaviorMode::Patrol);
        } else if self.mode == BehaviorMode::Chase {
            let remaining = self
                .chase_remaining
                .unwrap_or(Duration::ZERO)
                .saturating_sub(stimulus.elapsed);
            if remaining.is_zero() {
                self.enter(BehaviorMode::Patrol);
            } else {
                self.chase_remaining = Some(remaining);
            }
        }

        ModeTransition {
            from,
            to: self.mode,
        }
    }

    fn enter(&mut self, mode: BehaviorMode) {
        if self.mode == BehaviorMode::Chase && mode != BehaviorMode::Chase {
            self.chase_remaining = None;
        }
        if self.mode == BehaviorMode::InvestigateSound && mode != BehaviorMode::InvestigateSound {
            self.sound_memory = None;
        }
        self.mode = mode;
    }
}
