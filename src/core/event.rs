use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::core::Ticks;

/// Who holds the CPU during a [`GanttInterval`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GanttOwner {
    Idle,
    Process(String),
}

impl GanttOwner {
    pub fn label(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Process(id) => id.as_str(),
        }
    }

    pub fn process_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Process(id) => Some(id.as_str()),
        }
    }
}

impl Serialize for GanttOwner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Half-open CPU allocation `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GanttInterval {
    pub owner: GanttOwner,
    pub start: Ticks,
    pub end: Ticks,
    // MLFQ only; 0 is the highest priority level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
}

impl GanttInterval {
    pub fn duration(&self) -> Ticks {
        self.end - self.start
    }

    pub fn is_idle(&self) -> bool {
        self.owner == GanttOwner::Idle
    }
}

impl fmt::Display for GanttInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{},{})", self.owner.label(), self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Start {
        process: String,
        level: Option<usize>,
    },
    Resume {
        process: String,
        level: Option<usize>,
    },
    ContextSwitch {
        from: String,
        to: String,
    },
    Preempt {
        process: String,
        remaining: Ticks,
    },
    Demote {
        process: String,
        level: usize,
    },
    Complete {
        process: String,
    },
    Idle {
        until: Ticks,
    },
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start { process, level } => {
                write!(f, "Process {process} starts execution")?;
                write_level(f, *level)
            }
            Self::Resume { process, level } => {
                write!(f, "Process {process} resumes execution")?;
                write_level(f, *level)
            }
            Self::ContextSwitch { from, to } => {
                write!(f, "Context switch: {from} -> {to}")
            }
            Self::Preempt { process, remaining } => {
                write!(f, "Process {process} is preempted, remaining: {remaining}")
            }
            Self::Demote { process, level } => {
                write!(f, "Process {process} is demoted to level {level}")
            }
            Self::Complete { process } => write!(f, "Process {process} completes execution"),
            Self::Idle { until } => write!(f, "CPU idle until {until}"),
        }
    }
}

fn write_level(f: &mut fmt::Formatter<'_>, level: Option<usize>) -> fmt::Result {
    match level {
        Some(level) => write!(f, " (level {level})"),
        None => Ok(()),
    }
}

/// Audit-trail entry. Observational only; no engine reads it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEvent {
    pub time: Ticks,
    pub kind: EventKind,
}

impl TimelineEvent {
    pub fn description(&self) -> String {
        self.kind.to_string()
    }
}

impl Serialize for TimelineEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TimelineEvent", 3)?;
        state.serialize_field("time", &self.time)?;
        state.serialize_field("description", &self.description())?;
        state.serialize_field("kind", &self.kind)?;
        state.end()
    }
}
