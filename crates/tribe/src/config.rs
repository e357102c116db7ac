//! Simulation configuration loading.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration, loaded from `.tribe/config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TribeConfig {
    /// Config version
    pub version: Option<String>,

    /// Agent brain scheduling
    pub brain: BrainSection,

    /// Tribal task ledger tunables
    pub tasks: TasksSection,

    /// Log filter and output format
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrainSection {
    /// Each agent thinks once every this many ticks, staggered by agent id.
    #[serde(default = "default_think_every")]
    pub think_every_ticks: u32,

    #[serde(default = "default_true")]
    pub rollback_on_error: bool,
}

impl Default for BrainSection {
    fn default() -> Self {
        Self {
            think_every_ticks: default_think_every(),
            rollback_on_error: default_true(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasksSection {
    #[serde(default = "default_task_timeout")]
    pub task_timeout_hours: f64,

    #[serde(default = "default_hunt_capacity")]
    pub hunt_capacity: usize,

    #[serde(default = "default_attack_capacity")]
    pub attack_capacity: usize,

    #[serde(default = "default_storage_users")]
    pub storage_max_users: usize,
}

impl Default for TasksSection {
    fn default() -> Self {
        Self {
            task_timeout_hours: default_task_timeout(),
            hunt_capacity: default_hunt_capacity(),
            attack_capacity: default_attack_capacity(),
            storage_max_users: default_storage_users(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// `EnvFilter` directive, e.g. `info` or `tribe_tasks=debug`
    #[serde(default = "default_filter")]
    pub filter: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

fn default_think_every() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_task_timeout() -> f64 {
    2.0
}
fn default_hunt_capacity() -> usize {
    3
}
fn default_attack_capacity() -> usize {
    4
}
fn default_storage_users() -> usize {
    2
}
fn default_filter() -> String {
    "info".to_string()
}

impl TribeConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load from project root (looks for .tribe/config.yaml)
    pub fn load_from_project(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".tribe/config.yaml");
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.brain.think_every_ticks >= 1,
            "brain.think_every_ticks must be at least 1"
        );
        ensure!(
            self.tasks.task_timeout_hours.is_finite() && self.tasks.task_timeout_hours > 0.0,
            "tasks.task_timeout_hours must be a positive number of hours"
        );
        ensure!(
            self.tasks.hunt_capacity >= 1
                && self.tasks.attack_capacity >= 1
                && self.tasks.storage_max_users >= 1,
            "task capacities must be at least 1"
        );
        Ok(())
    }

    /// Brain settings for `agent`, with its think slot staggered by id.
    #[cfg(feature = "core")]
    pub fn brain_config(&self, agent: impl tribe_core::AgentId) -> tribe_core::BrainConfig {
        tribe_core::BrainConfig {
            rollback_on_error: self.brain.rollback_on_error,
            ..tribe_core::BrainConfig::deterministic(agent, self.brain.think_every_ticks)
        }
    }

    #[cfg(feature = "tasks")]
    pub fn coordinator_config(&self) -> tribe_tasks::CoordinatorConfig {
        tribe_tasks::CoordinatorConfig {
            task_timeout_hours: self.tasks.task_timeout_hours,
            hunt_capacity: self.tasks.hunt_capacity,
            attack_capacity: self.tasks.attack_capacity,
            storage_max_users: self.tasks.storage_max_users,
        }
    }
}
