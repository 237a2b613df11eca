use serde::{Deserialize, Serialize};

use crate::core::Ticks;

/// Caller-owned input record. Engines copy it and never write back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub id: String,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    // Display metadata, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Process {
    pub fn new(id: impl Into<String>, arrival_time: Ticks, burst_time: Ticks) -> Self {
        Self {
            id: id.into(),
            arrival_time,
            burst_time,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
