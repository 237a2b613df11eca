pub mod fifo;
pub mod mlfq;
pub mod rr;
pub mod sjf;
pub mod stcf;

use std::cmp::Ordering;

use crate::core::{ProcIndex, SimCtx, Ticks};
pub use fifo::FifoScheduler;
pub use mlfq::MlfqScheduler;
pub use rr::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use stcf::StcfScheduler;

/// A scheduling policy driven by [`crate::core::SchedCore`].
///
/// A fresh value is built for every run; any queues it keeps are private to
/// that run.
pub trait Scheduler {
    const NAME: &'static str;

    /// Called once before the first step, e.g. to reorder the working copy.
    fn init(&mut self, _ctx: &mut SimCtx) {}

    /// Make exactly one decision: an idle jump to the next arrival, or one
    /// CPU interval for one process. Only called while some process is
    /// incomplete.
    fn step(&mut self, ctx: &mut SimCtx);
}

/// Ready-set key for shortest-first policies: the smaller time wins and the
/// lower index breaks ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortestFirst {
    pub time: Ticks,
    pub index: ProcIndex,
}

impl ShortestFirst {
    pub fn new(time: Ticks, index: ProcIndex) -> Self {
        Self { time, index }
    }
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop the ordering
impl Ord for ShortestFirst {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.time, other.index).cmp(&(self.time, self.index))
    }
}

impl PartialOrd for ShortestFirst {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
