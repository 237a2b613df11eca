//! Deterministic CPU scheduling simulator.
//!
//! Given a fixed set of processes, each policy (FIFO, SJF, STCF, RR, MLFQ)
//! produces a gap-free Gantt chart, an event timeline and per-process
//! turnaround, waiting and response times.

pub mod config;
pub mod core;
pub mod scheduler;
pub mod sim;

pub use crate::core::{AlgorithmResult, GanttInterval, Metric, Metrics, SimError, TimelineEvent};
pub use scheduler::Scheduler;
pub use sim::{Comparison, Policy, Process, run_all};
