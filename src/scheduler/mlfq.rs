use std::collections::VecDeque;

use tracing::debug;

use super::Scheduler;
use crate::{
    core::{AlgorithmResult, EventKind, FeedbackState, ProcIndex, SimCtx, SimError, Ticks, simulate},
    sim::Process,
};

/// Quantum per priority level, highest priority first.
pub const LEVEL_QUANTUMS: [Ticks; 3] = [1, 2, 4];
pub const LOWEST_LEVEL: usize = LEVEL_QUANTUMS.len() - 1;

/// Three-level feedback queue.
pub fn run(processes: &[Process]) -> Result<AlgorithmResult, SimError> {
    simulate(MlfqScheduler::new(), processes)
}

/// Preemption happens only at quantum boundaries: an arrival never cuts a
/// running slice short, it waits for the next decision point. A process that
/// uses its whole quantum drops one level, down to [`LOWEST_LEVEL`].
pub struct MlfqScheduler {
    levels: [VecDeque<ProcIndex>; LEVEL_QUANTUMS.len()],
    queued: Vec<bool>,
}

impl MlfqScheduler {
    pub fn new() -> Self {
        Self {
            levels: Default::default(),
            queued: Vec::new(),
        }
    }

    fn enqueue(&mut self, level: usize, idx: ProcIndex) {
        debug_assert!(!self.queued[idx], "Process {idx} queued twice");
        self.queued[idx] = true;
        self.levels[level].push_back(idx);
    }

    // Head of the highest-priority non-empty level
    fn pop_highest(&mut self) -> Option<(usize, ProcIndex)> {
        let (level, idx) = self
            .levels
            .iter_mut()
            .enumerate()
            .find_map(|(level, queue)| queue.pop_front().map(|idx| (level, idx)))?;
        self.queued[idx] = false;
        Some((level, idx))
    }

    fn demote(ctx: &mut SimCtx, idx: ProcIndex) {
        let feedback = ctx
            .proc_mut(idx)
            .feedback
            .get_or_insert_with(FeedbackState::default);
        feedback.level += 1;
        feedback.time_in_level = 0;
        let level = feedback.level;

        let kind = EventKind::Demote {
            process: ctx.proc(idx).id.clone(),
            level,
        };
        ctx.log(kind);
    }
}

impl Default for MlfqScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for MlfqScheduler {
    const NAME: &'static str = "MLFQ";

    fn init(&mut self, ctx: &mut SimCtx) {
        self.queued = vec![false; ctx.len()];
        for proc in &mut ctx.procs {
            proc.feedback = Some(FeedbackState::default());
        }
    }

    fn step(&mut self, ctx: &mut SimCtx) {
        // Demoted processes keep their level, even across idle periods
        for idx in 0..ctx.len() {
            if !self.queued[idx] && !ctx.is_completed(idx) && ctx.has_arrived(idx) {
                self.enqueue(ctx.proc(idx).priority_level(), idx);
            }
        }

        let Some((level, current)) = self.pop_highest() else {
            if let Some(next) = ctx.next_arrival() {
                ctx.idle_until(ctx.proc(next).arrival_time);
                self.enqueue(0, next);
            }
            return;
        };

        let start = ctx.now;
        let quantum = LEVEL_QUANTUMS[level];
        let slice = quantum.min(ctx.proc(current).remaining_time);
        debug!(process = %ctx.proc(current).id, now = start, level, slice, "mlfq dispatch");
        ctx.log_dispatch(current, Some(level));
        let remaining = ctx.run_for(current, slice, Some(level));

        for idx in 0..ctx.len() {
            let proc = ctx.proc(idx);
            if idx != current
                && !self.queued[idx]
                && !proc.is_completed()
                && proc.arrival_time > start
                && proc.arrival_time <= ctx.now
            {
                self.enqueue(0, idx);
            }
        }

        if remaining == 0 {
            ctx.complete(current);
            return;
        }

        if slice == quantum && level < LOWEST_LEVEL {
            Self::demote(ctx, current);
        }
        self.enqueue(ctx.proc(current).priority_level(), current);
        ctx.log_preempt(current);
    }
}
