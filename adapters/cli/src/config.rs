//! TOML-backed simulation settings.

use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use maze_pursuit_core::CellCoord;
use maze_pursuit_system_pursuit::Config as PursuitConfig;
use maze_pursuit_world::WorldConfig;
use serde::Deserialize;

/// Settings controlling a headless run. Every field falls back to its default
/// when omitted from the file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationConfig {
    /// Simulated milliseconds advanced per tick.
    pub(crate) tick_ms: u64,
    /// Seconds an adversary keeps chasing after losing sight of the player.
    pub(crate) chase_seconds: f64,
    /// Seconds the special effect lasts after a power pellet.
    pub(crate) special_effect_seconds: f64,
    /// Simulated milliseconds between adversary steps.
    pub(crate) adversary_step_ms: u64,
    /// Probability that the autopilot changes heading at an open junction.
    pub(crate) turn_chance: f64,
    /// Player start cell as `[row, column]`.
    pub(crate) player: [i32; 2],
    /// Adversary spawn cells as `[row, column]` pairs.
    pub(crate) adversaries: Vec<[i32; 2]>,
    #[serde(skip)]
    pub(crate) chase_duration: Duration,
    #[serde(skip)]
    pub(crate) special_effect_duration: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            chase_seconds: 3.0,
            special_effect_seconds: 6.0,
            adversary_step_ms: 400,
            turn_chance: 0.25,
            player: [1, 1],
            adversaries: vec![[12, 11], [14, 15]],
            chase_duration: Duration::from_secs(3),
            special_effect_duration: Duration::from_secs(6),
        }
    }
}

impl SimulationConfig {
    /// Reads and validates a TOML configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub(crate) fn from_toml(text: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(text).context("failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field and converts the second-based settings into
    /// durations.
    fn validate(&mut self) -> Result<()> {
        ensure!(self.tick_ms > 0, "tick_ms must be positive");
        self.chase_duration = Duration::try_from_secs_f64(self.chase_seconds)
            .context("chase_seconds must be a non-negative number of seconds")?;
        self.special_effect_duration = Duration::try_from_secs_f64(self.special_effect_seconds)
            .context("special_effect_seconds must be a non-negative number of seconds")?;
        ensure!(
            (0.0..=1.0).contains(&self.turn_chance),
            "turn_chance must lie between 0 and 1"
        );
        Ok(())
    }

    pub(crate) fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub(crate) fn world_config(&self) -> WorldConfig {
        WorldConfig::new(
            self.special_effect_duration,
            Duration::from_millis(self.adversary_step_ms),
        )
    }

    pub(crate) fn pursuit_config(&self) -> PursuitConfig {
        PursuitConfig::new(self.chase_duration)
    }

    pub(crate) fn player_cell(&self) -> CellCoord {
        CellCoord::new(self.player[0], self.player[1])
    }

    pub(crate) fn adversary_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.adversaries
            .iter()
            .map(|[row, column]| CellCoord::new(*row, *column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = SimulationConfig::from_toml("tick_ms = 50\n").expect("config parses");

        assert_eq!(config.tick(), Duration::from_millis(50));
        assert_eq!(config.player_cell(), CellCoord::new(1, 1));
        assert_eq!(config.adversary_cells().count(), 2);
        assert_eq!(
            config.pursuit_config().chase_duration(),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn full_file_is_honored() {
        let text = r#"
            tick_ms = 200
            chase_seconds = 1.5
            special_effect_seconds = 4.0
            adversary_step_ms = 600
            turn_chance = 0.0
            player = [6, 1]
            adversaries = [[1, 29]]
        "#;

        let config = SimulationConfig::from_toml(text).expect("config parses");

        assert_eq!(
            config.world_config(),
            WorldConfig::new(Duration::from_secs(4), Duration::from_millis(600))
        );
        assert_eq!(
            config.pursuit_config().chase_duration(),
            Duration::from_millis(1500)
        );
        assert_eq!(
            config.adversary_cells().collect::<Vec<_>>(),
            vec![CellCoord::new(1, 29)]
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(SimulationConfig::from_toml("tick_ms = 0").is_err());
        assert!(SimulationConfig::from_toml("turn_chance = 1.5").is_err());
        assert!(SimulationConfig::from_toml("chase_seconds = -1.0").is_err());
        assert!(SimulationConfig::from_toml("chase_seconds = nan").is_err());
    }

    #[test]
    fn durations_too_large_to_represent_are_rejected() {
        assert!(SimulationConfig::from_toml("special_effect_seconds = 1e30").is_err());
        assert!(SimulationConfig::from_toml("chase_seconds = 1e30").is_err());

        let config =
            SimulationConfig::from_toml("special_effect_seconds = 0.25").expect("config parses");
        assert_eq!(
            config.world_config().special_effect_duration(),
            Duration::from_millis(250)
        );
        assert!(SimulationConfig::from_toml("unknown = true").is_err());
    }
}
