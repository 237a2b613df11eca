use keyed_priority_queue::KeyedPriorityQueue;
use tracing::debug;

use super::{Scheduler, ShortestFirst};
use crate::{
    core::{AlgorithmResult, EventKind, ProcIndex, SimCtx, SimError, Ticks, simulate},
    sim::Process,
};

/// Preemptive shortest-time-to-completion-first.
pub fn run(processes: &[Process]) -> Result<AlgorithmResult, SimError> {
    simulate(StcfScheduler::new(), processes)
}

/// Works in input order. Instead of ticking, each step runs the shortest
/// ready process up to the first arrival that would undercut it, or to its
/// completion when no such arrival exists.
pub struct StcfScheduler {
    ready: KeyedPriorityQueue<ProcIndex, ShortestFirst>,
    admitted: Vec<bool>,
    previous: Option<ProcIndex>,
}

impl StcfScheduler {
    pub fn new() -> Self {
        Self {
            ready: KeyedPriorityQueue::new(),
            admitted: Vec::new(),
            previous: None,
        }
    }

    fn admit_arrivals(&mut self, ctx: &SimCtx) {
        for (idx, proc) in ctx.procs.iter().enumerate() {
            if !self.admitted[idx] && proc.arrival_time <= ctx.now {
                self.admitted[idx] = true;
                self.ready
                    .push(idx, ShortestFirst::new(proc.remaining_time, idx));
            }
        }
    }

    /// End of the next slice for `current`: the earliest pending arrival
    /// whose burst is strictly below what `current` will have left at that
    /// instant, else `current`'s own completion.
    fn preemption_point(&self, ctx: &SimCtx, current: ProcIndex) -> Ticks {
        let now = ctx.now;
        let remaining = ctx.proc(current).remaining_time;
        let mut run_until = now + remaining;

        for (idx, proc) in ctx.procs.iter().enumerate() {
            if self.admitted[idx] || proc.arrival_time <= now || proc.arrival_time >= run_until {
                continue;
            }

            let current_left = remaining - (proc.arrival_time - now);
            if proc.remaining_time < current_left {
                run_until = proc.arrival_time;
            }
        }

        run_until
    }

    fn log_switch(&self, ctx: &mut SimCtx, current: ProcIndex) {
        if self.previous == Some(current) {
            return;
        }

        match self.previous {
            Some(prev) => {
                let kind = EventKind::ContextSwitch {
                    from: ctx.proc(prev).id.clone(),
                    to: ctx.proc(current).id.clone(),
                };
                ctx.log(kind);
            }
            None => ctx.log_dispatch(current, None),
        }
    }
}

impl Default for StcfScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for StcfScheduler {
    const NAME: &'static str = "STCF";

    fn init(&mut self, ctx: &mut SimCtx) {
        self.admitted = vec![false; ctx.len()];
    }

    fn step(&mut self, ctx: &mut SimCtx) {
        self.admit_arrivals(ctx);

        let Some(current) = self.ready.peek().map(|(&idx, _)| idx) else {
            if let Some(next) = ctx.next_arrival() {
                ctx.idle_until(ctx.proc(next).arrival_time);
            }
            return;
        };

        self.log_switch(ctx, current);
        let run_until = self.preemption_point(ctx, current);
        debug!(process = %ctx.proc(current).id, now = ctx.now, run_until, "stcf dispatch");

        let remaining = ctx.run_for(current, run_until - ctx.now, None);
        if remaining == 0 {
            self.ready.remove(&current);
            ctx.complete(current);
        } else {
            self.ready
                .push(current, ShortestFirst::new(remaining, current));
            ctx.log_preempt(current);
        }
        self.previous = Some(current);
    }
}
