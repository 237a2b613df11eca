use rustc_hash::FxHashMap;

use super::state::{SimCtx, Ticks};

/// Checks run-time invariants of a simulation after every step. All checks
/// are debug assertions, so release builds only pay for the step counter.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    last_now: Ticks,
    last_completed: usize,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;

        // Every step is a decision point: it either advances the clock or finishes someone
        debug_assert!(
            ctx.now > self.last_now || ctx.completed_count() > self.last_completed,
            "Step {} made no progress at t={}",
            self.step,
            ctx.now
        );

        if let Some(last) = ctx.gantt.last() {
            debug_assert_eq!(last.end, ctx.now, "Gantt chart must end at the clock");
            debug_assert!(last.start < last.end, "Empty Gantt interval {last}");
        }
        if let [.., prev, last] = ctx.gantt.as_slice() {
            debug_assert_eq!(
                prev.end, last.start,
                "Gantt intervals {prev} and {last} are not contiguous"
            );
        }

        for proc in &ctx.procs {
            debug_assert!(
                proc.remaining_time <= proc.burst_time,
                "Process {} has more time remaining than its burst",
                proc.id
            );
            debug_assert_eq!(
                proc.is_completed(),
                proc.remaining_time == 0,
                "Process {} completion flag disagrees with remaining time",
                proc.id
            );
        }

        self.last_now = ctx.now;
        self.last_completed = ctx.completed_count();
    }

    /// Whole-run checks once every process has completed.
    pub fn finish(&self, ctx: &SimCtx) {
        debug_assert!(ctx.all_completed(), "Simulation ended early");
        debug_assert!(
            ctx.gantt.first().is_none_or(|first| first.start == 0),
            "Gantt chart must start at t=0"
        );

        let mut service: FxHashMap<&str, Ticks> = FxHashMap::default();
        for interval in &ctx.gantt {
            if let Some(id) = interval.owner.process_id() {
                *service.entry(id).or_default() += interval.duration();
            }
        }
        for proc in &ctx.procs {
            debug_assert_eq!(
                service.get(proc.id.as_str()).copied(),
                Some(proc.burst_time),
                "Process {} ran for a different total than its burst",
                proc.id
            );
            debug_assert!(
                proc.response_time <= proc.waiting_time,
                "Process {} responded after it finished waiting",
                proc.id
            );
        }
    }
}
