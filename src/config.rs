//! Defaults shared by the library and the command line.

use serde::{Deserialize, Serialize};

use crate::core::Ticks;

/// Round-robin quantum used when none is given.
pub const DEFAULT_QUANTUM: Ticks = 2;

/// Bounds for randomly generated process sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    pub count: usize,
    /// Arrivals are drawn from `[0, max_arrival)`.
    pub max_arrival: Ticks,
    /// Bursts are drawn from `[1, max_burst - 1]`, and are never below 1.
    pub max_burst: Ticks,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            count: 5,
            max_arrival: 10,
            max_burst: 10,
        }
    }
}
