use tracing::debug;

use super::Scheduler;
use crate::{
    core::{AlgorithmResult, ProcIndex, SimCtx, SimError, simulate},
    sim::Process,
};

/// Run every process to completion in arrival order.
pub fn run(processes: &[Process]) -> Result<AlgorithmResult, SimError> {
    simulate(FifoScheduler::default(), processes)
}

#[derive(Debug, Default)]
pub struct FifoScheduler {
    cursor: ProcIndex,
}

impl Scheduler for FifoScheduler {
    const NAME: &'static str = "FIFO";

    // Stable, so equal arrivals keep their input order
    fn init(&mut self, ctx: &mut SimCtx) {
        ctx.sort_by_arrival();
    }

    fn step(&mut self, ctx: &mut SimCtx) {
        let idx = self.cursor;
        self.cursor += 1;

        let arrival = ctx.proc(idx).arrival_time;
        if ctx.now < arrival {
            ctx.idle_until(arrival);
        }

        let burst = ctx.proc(idx).remaining_time;
        debug!(process = %ctx.proc(idx).id, now = ctx.now, burst, "fifo dispatch");
        ctx.log_dispatch(idx, None);
        ctx.run_for(idx, burst, None);
        ctx.complete(idx);
    }
}
