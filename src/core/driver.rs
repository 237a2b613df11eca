use rustc_hash::FxHashSet;
use tracing::{debug, info};

use super::{
    error::{InvalidProcessReason, SimError},
    metrics::AlgorithmResult,
    observer::Observer,
    state::{SimCtx, Ticks},
};
use crate::{scheduler::Scheduler, sim::Process};

/// Steps one [`Scheduler`] over a private working copy of the input until
/// every process has completed.
pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(mut scheduler: S, processes: &[Process]) -> Result<Self, SimError> {
        validate(processes)?;

        let mut ctx = SimCtx::new(processes);
        scheduler.init(&mut ctx);
        Ok(Self {
            ctx,
            scheduler,
            observer: Observer::new(),
        })
    }

    /// Advance to the next decision point.
    pub fn step(&mut self) {
        self.scheduler.step(&mut self.ctx);
        self.observer.observe(&self.ctx);
    }

    pub fn run(mut self) -> AlgorithmResult {
        info!(
            policy = S::NAME,
            processes = self.ctx.len(),
            "starting simulation"
        );

        while !self.ctx.all_completed() {
            self.step();
            debug!(
                policy = S::NAME,
                now = self.ctx.now,
                completed = self.ctx.completed_count(),
                "decision point"
            );
        }
        self.observer.finish(&self.ctx);

        let result = self.ctx.into_result();
        info!(
            policy = S::NAME,
            makespan = result.makespan(),
            steps = self.observer.steps(),
            avg_turnaround = result.metrics.avg_turnaround_time,
            avg_waiting = result.metrics.avg_waiting_time,
            avg_response = result.metrics.avg_response_time,
            "simulation finished"
        );
        result
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}

/// Validate `processes`, then run `scheduler` over them to completion.
pub fn simulate<S: Scheduler>(
    scheduler: S,
    processes: &[Process],
) -> Result<AlgorithmResult, SimError> {
    Ok(SchedCore::new(scheduler, processes)?.run())
}

fn validate(processes: &[Process]) -> Result<(), SimError> {
    if processes.is_empty() {
        return Err(SimError::EmptyInput);
    }

    let mut seen = FxHashSet::default();
    for process in processes {
        let reason = if process.burst_time == 0 {
            InvalidProcessReason::ZeroBurst
        } else if !seen.insert(process.id.as_str()) {
            InvalidProcessReason::DuplicateId
        } else {
            continue;
        };

        return Err(SimError::InvalidProcess {
            id: process.id.clone(),
            reason,
        });
    }

    // No run can end later than the last arrival plus every burst back to back
    let latest_arrival = processes
        .iter()
        .map(|process| process.arrival_time)
        .max()
        .unwrap_or_default();
    let mut horizon = latest_arrival;
    for process in processes {
        horizon = horizon.checked_add(process.burst_time).ok_or_else(|| {
            SimError::InvalidProcess {
                id: process.id.clone(),
                reason: InvalidProcessReason::TimeOverflow,
            }
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::SjfScheduler;

    #[test]
    fn steps_one_decision_at_a_time() {
        let procs = [Process::new("P1", 2, 3)];
        let mut core = SchedCore::new(SjfScheduler::new(), &procs).unwrap();
        assert!(!core.ctx.is_empty());
        assert_eq!(core.now(), 0);

        core.step();
        assert_eq!(core.now(), 2);
        assert!(!core.ctx.all_completed());

        core.step();
        assert_eq!(core.now(), 5);
        assert!(core.ctx.all_completed());
        assert_eq!(core.observer().steps(), 2);
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(validate(&[]), Err(SimError::EmptyInput));
    }

    #[test]
    fn rejects_zero_burst() {
        let procs = [Process::new("P1", 0, 2), Process::new("P2", 1, 0)];
        assert_eq!(
            validate(&procs),
            Err(SimError::InvalidProcess {
                id: "P2".to_owned(),
                reason: InvalidProcessReason::ZeroBurst,
            })
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let procs = [
            Process::new("P1", 0, 2),
            Process::new("P2", 1, 1),
            Process::new("P1", 3, 4),
        ];
        assert_eq!(
            validate(&procs),
            Err(SimError::InvalidProcess {
                id: "P1".to_owned(),
                reason: InvalidProcessReason::DuplicateId,
            })
        );
    }

    #[test]
    fn rejects_schedules_past_max_time() {
        let procs = [Process::new("P1", 0, Ticks::MAX), Process::new("P2", 1, 1)];
        assert_eq!(
            validate(&procs),
            Err(SimError::InvalidProcess {
                id: "P1".to_owned(),
                reason: InvalidProcessReason::TimeOverflow,
            })
        );
    }

    #[test]
    fn accepts_schedule_ending_exactly_at_max_time() {
        let procs = [Process::new("P1", Ticks::MAX - 3, 2), Process::new("P2", 0, 1)];
        assert!(validate(&procs).is_ok());
    }

    #[test]
    fn accepts_zero_arrival_and_gaps() {
        let procs = [Process::new("A", 0, 1), Process::new("B", 50, 3)];
        assert!(validate(&procs).is_ok());
    }
}
