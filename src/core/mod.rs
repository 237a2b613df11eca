pub mod driver;
pub mod error;
pub mod event;
pub mod metrics;
pub mod observer;
pub mod state;

pub use driver::{SchedCore, simulate};
pub use error::{InvalidProcessReason, SimError};
pub use event::{EventKind, GanttInterval, GanttOwner, TimelineEvent};
pub use metrics::{AlgorithmResult, Metric, Metrics};
pub use state::{FeedbackState, ProcIndex, SimCtx, SimulationProcess, Ticks};
