//! Optional TOML configuration for the agent.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use pellet_rush_core::PelletValue;
use pellet_rush_system_turn_planner::PlannerConfig;
use serde::Deserialize;

/// Top-level configuration file layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AgentConfig {
    pub(crate) planner: PlannerSection,
    pub(crate) turn: TurnSection,
}

/// `[planner]` section: point values of the two pellet tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlannerSection {
    pub(crate) super_value: u32,
    pub(crate) regular_value: u32,
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            super_value: PelletValue::SUPER.get(),
            regular_value: PelletValue::REGULAR.get(),
        }
    }
}

/// `[turn]` section: timing expectations for a single turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TurnSection {
    /// Turns slower than this are reported at `warn`.
    pub(crate) budget_ms: u64,
}

impl Default for TurnSection {
    fn default() -> Self {
        Self { budget_ms: 50 }
    }
}

impl AgentConfig {
    /// Reads and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config file at {}", path.display()))
    }

    /// Parses and validates configuration text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config toml")?;
        if config.planner.super_value == config.planner.regular_value {
            bail!(
                "planner tiers must differ, both are {}",
                config.planner.super_value
            );
        }
        if config.turn.budget_ms == 0 {
            bail!("turn budget must be at least one millisecond");
        }
        Ok(config)
    }

    pub(crate) fn planner(&self) -> PlannerConfig {
        PlannerConfig {
            super_value: PelletValue::new(self.planner.super_value),
            regular_value: PelletValue::new(self.planner.regular_value),
        }
    }

    pub(crate) fn turn_budget(&self) -> Duration {
        Duration::from_millis(self.turn.budget_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = AgentConfig::parse("").expect("empty config is valid");

        assert_eq!(config, AgentConfig::default());
        assert_eq!(config.planner(), PlannerConfig::default());
        assert_eq!(config.turn_budget(), Duration::from_millis(50));
    }

    #[test]
    fn sections_override_defaults_independently() {
        let config = AgentConfig::parse(
            r#"
            [planner]
            super_value = 50

            [turn]
            budget_ms = 40
            "#,
        )
        .expect("valid config");

        assert_eq!(config.planner().super_value, PelletValue::new(50));
        assert_eq!(config.planner().regular_value, PelletValue::REGULAR);
        assert_eq!(config.turn_budget(), Duration::from_millis(40));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = AgentConfig::parse("[planner]\nsuper = 10\n").expect_err("typo rejected");

        assert!(format!("{error:#}").contains("unknown field"), "{error:#}");
    }

    #[test]
    fn identical_tiers_are_rejected() {
        let error = AgentConfig::parse("[planner]\nsuper_value = 1\n")
            .expect_err("tiers collide with default regular value");

        assert!(error.to_string().contains("tiers must differ"), "{error}");
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("definitely/not/here/pellet-rush.toml");

        let error = AgentConfig::load(path).expect_err("file is missing");

        assert!(error.to_string().contains("pellet-rush.toml"), "{error}");
    }
}
