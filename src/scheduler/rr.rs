use std::collections::VecDeque;

use tracing::debug;

use super::Scheduler;
use crate::{
    core::{AlgorithmResult, ProcIndex, SimCtx, SimError, Ticks, simulate},
    sim::Process,
};

/// Round-robin with a fixed `quantum`.
pub fn run(processes: &[Process], quantum: Ticks) -> Result<AlgorithmResult, SimError> {
    simulate(RoundRobinScheduler::new(quantum)?, processes)
}

pub struct RoundRobinScheduler {
    quantum: Ticks,
    ready: VecDeque<ProcIndex>,
    queued: Vec<bool>,
}

impl RoundRobinScheduler {
    pub fn new(quantum: Ticks) -> Result<Self, SimError> {
        if quantum == 0 {
            return Err(SimError::InvalidQuantum(quantum));
        }

        Ok(Self {
            quantum,
            ready: VecDeque::new(),
            queued: Vec::new(),
        })
    }

    pub fn quantum(&self) -> Ticks {
        self.quantum
    }

    fn enqueue(&mut self, idx: ProcIndex) {
        debug_assert!(!self.queued[idx], "Process {idx} queued twice");
        self.queued[idx] = true;
        self.ready.push_back(idx);
    }
}

impl Scheduler for RoundRobinScheduler {
    const NAME: &'static str = "RR";

    fn init(&mut self, ctx: &mut SimCtx) {
        ctx.sort_by_arrival();
        self.queued = vec![false; ctx.len()];
    }

    fn step(&mut self, ctx: &mut SimCtx) {
        for idx in 0..ctx.len() {
            if !self.queued[idx] && !ctx.is_completed(idx) && ctx.has_arrived(idx) {
                self.enqueue(idx);
            }
        }

        let Some(current) = self.ready.pop_front() else {
            if let Some(next) = ctx.next_arrival() {
                ctx.idle_until(ctx.proc(next).arrival_time);
                self.enqueue(next);
            }
            return;
        };
        self.queued[current] = false;

        let start = ctx.now;
        let slice = self.quantum.min(ctx.proc(current).remaining_time);
        debug!(process = %ctx.proc(current).id, now = start, slice, "rr dispatch");
        ctx.log_dispatch(current, None);
        let remaining = ctx.run_for(current, slice, None);

        // Arrivals during the slice queue ahead of the process that just ran
        for idx in 0..ctx.len() {
            let proc = ctx.proc(idx);
            if idx != current
                && !self.queued[idx]
                && !proc.is_completed()
                && proc.arrival_time > start
                && proc.arrival_time <= ctx.now
            {
                self.enqueue(idx);
            }
        }

        if remaining == 0 {
            ctx.complete(current);
        } else {
            ctx.log_preempt(current);
            self.enqueue(current);
        }
    }
}
