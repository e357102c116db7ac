#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::kind::CapacityTask;

/// Ledger tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoordinatorConfig {
    /// A record older than this (game-hours) no longer blocks new claims.
    pub task_timeout_hours: f64,
    pub hunt_capacity: usize,
    pub attack_capacity: usize,
    /// Concurrent users of one storage spot.
    pub storage_max_users: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            task_timeout_hours: 2.0,
            hunt_capacity: 3,
            attack_capacity: 4,
            storage_max_users: 2,
        }
    }
}

impl CoordinatorConfig {
    pub fn capacity_for(&self, task: CapacityTask) -> usize {
        match task {
            CapacityTask::Hunt => self.hunt_capacity,
            CapacityTask::Attack => self.attack_capacity,
        }
    }

    pub fn is_stale(&self, start_time: f64, now: f64) -> bool {
        now - start_time > self.task_timeout_hours
    }
}
