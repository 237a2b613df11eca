use keyed_priority_queue::KeyedPriorityQueue;
use tracing::debug;

use super::{Scheduler, ShortestFirst};
use crate::{
    core::{AlgorithmResult, ProcIndex, SimCtx, SimError, simulate},
    sim::Process,
};

/// Non-preemptive shortest-job-first.
pub fn run(processes: &[Process]) -> Result<AlgorithmResult, SimError> {
    simulate(SjfScheduler::new(), processes)
}

pub struct SjfScheduler {
    ready: KeyedPriorityQueue<ProcIndex, ShortestFirst>,
    // Working copy is arrival-sorted, so admitted processes form a prefix
    admitted: usize,
}

impl SjfScheduler {
    pub fn new() -> Self {
        Self {
            ready: KeyedPriorityQueue::new(),
            admitted: 0,
        }
    }

    fn admit_arrivals(&mut self, ctx: &SimCtx) {
        while self.admitted < ctx.len() && ctx.has_arrived(self.admitted) {
            let idx = self.admitted;
            self.ready
                .push(idx, ShortestFirst::new(ctx.proc(idx).burst_time, idx));
            self.admitted += 1;
        }
    }
}

impl Default for SjfScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for SjfScheduler {
    const NAME: &'static str = "SJF";

    fn init(&mut self, ctx: &mut SimCtx) {
        ctx.sort_by_arrival();
    }

    fn step(&mut self, ctx: &mut SimCtx) {
        self.admit_arrivals(ctx);

        let Some((idx, _)) = self.ready.pop() else {
            if let Some(next) = ctx.next_arrival() {
                ctx.idle_until(ctx.proc(next).arrival_time);
            }
            return;
        };

        let burst = ctx.proc(idx).remaining_time;
        debug!(process = %ctx.proc(idx).id, now = ctx.now, burst, "sjf dispatch");
        ctx.log_dispatch(idx, None);
        ctx.run_for(idx, burst, None);
        ctx.complete(idx);
    }
}
