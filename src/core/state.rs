use serde::Serialize;

use super::{
    event::{EventKind, GanttInterval, GanttOwner, TimelineEvent},
    metrics::{AlgorithmResult, Metrics},
};
use crate::sim::Process;

// Index into the per-run process Vec
pub type ProcIndex = usize;
pub type Ticks = u64;

/// Multi-level feedback bookkeeping, present only on MLFQ runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackState {
    /// 0 is the highest priority level.
    pub level: usize,
    /// Time run since the last level change. Informational only.
    pub time_in_level: Ticks,
}

/// Working copy of a [`Process`], owned by exactly one engine invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationProcess {
    pub id: String,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub remaining_time: Ticks,
    pub completion_time: Option<Ticks>,
    pub turnaround_time: Option<Ticks>,
    pub waiting_time: Option<Ticks>,
    /// `None` until the first dispatch.
    pub response_time: Option<Ticks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackState>,
}

impl SimulationProcess {
    fn from_process(process: &Process) -> Self {
        Self {
            id: process.id.clone(),
            arrival_time: process.arrival_time,
            burst_time: process.burst_time,
            color: process.color.clone(),
            remaining_time: process.burst_time,
            completion_time: None,
            turnaround_time: None,
            waiting_time: None,
            response_time: None,
            feedback: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completion_time.is_some()
    }

    pub fn has_started(&self) -> bool {
        self.response_time.is_some()
    }

    pub fn priority_level(&self) -> usize {
        self.feedback.map_or(0, |feedback| feedback.level)
    }
}

/// All mutable state of one simulation run: the clock, the working
/// processes and the trace emitted so far.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub procs: Vec<SimulationProcess>,
    pub gantt: Vec<GanttInterval>,
    pub timeline: Vec<TimelineEvent>,

    // Increment upon completion
    completed: usize,
}

impl SimCtx {
    pub fn new(processes: &[Process]) -> Self {
        Self {
            now: 0,
            procs: processes
                .iter()
                .map(SimulationProcess::from_process)
                .collect(),
            gantt: Vec::new(),
            timeline: Vec::new(),
            completed: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    pub fn proc(&self, idx: ProcIndex) -> &SimulationProcess {
        &self.procs[idx]
    }

    pub fn proc_mut(&mut self, idx: ProcIndex) -> &mut SimulationProcess {
        &mut self.procs[idx]
    }

    /// Stable sort of the working copy by arrival time. Only valid before
    /// anything has run, since it renumbers every [`ProcIndex`].
    pub fn sort_by_arrival(&mut self) {
        debug_assert!(
            self.gantt.is_empty() && self.completed == 0,
            "Working copy must not be reordered mid-run"
        );
        self.procs.sort_by_key(|proc| proc.arrival_time);
    }

    pub fn completed_count(&self) -> usize {
        self.completed
    }

    pub fn all_completed(&self) -> bool {
        self.completed == self.procs.len()
    }

    pub fn is_completed(&self, idx: ProcIndex) -> bool {
        self.procs[idx].is_completed()
    }

    pub fn has_arrived(&self, idx: ProcIndex) -> bool {
        self.procs[idx].arrival_time <= self.now
    }

    /// Earliest-arriving incomplete process; lowest index wins ties.
    pub fn next_arrival(&self) -> Option<ProcIndex> {
        self.procs
            .iter()
            .enumerate()
            .filter(|(_, proc)| !proc.is_completed())
            .min_by_key(|(idx, proc)| (proc.arrival_time, *idx))
            .map(|(idx, _)| idx)
    }

    /// Leave the CPU idle until `until`, recording an explicit Idle interval.
    pub fn idle_until(&mut self, until: Ticks) {
        debug_assert!(
            until > self.now,
            "Idle jump to t={until} does not move past t={}",
            self.now
        );
        if until <= self.now {
            return;
        }

        self.gantt.push(GanttInterval {
            owner: GanttOwner::Idle,
            start: self.now,
            end: until,
            level: None,
        });
        self.log(EventKind::Idle { until });
        self.now = until;
    }

    /// Log a start or resume event for `idx`. Must precede [`Self::run_for`].
    pub fn log_dispatch(&mut self, idx: ProcIndex, level: Option<usize>) {
        let proc = &self.procs[idx];
        let process = proc.id.clone();
        let kind = if proc.has_started() {
            EventKind::Resume { process, level }
        } else {
            EventKind::Start { process, level }
        };
        self.log(kind);
    }

    pub fn log_preempt(&mut self, idx: ProcIndex) {
        let proc = &self.procs[idx];
        let kind = EventKind::Preempt {
            process: proc.id.clone(),
            remaining: proc.remaining_time,
        };
        self.log(kind);
    }

    pub fn log(&mut self, kind: EventKind) {
        self.timeline.push(TimelineEvent {
            time: self.now,
            kind,
        });
    }

    /// Run `idx` on the CPU for `duration` ticks starting now. Records the
    /// response time on first dispatch and returns the remaining time.
    pub fn run_for(&mut self, idx: ProcIndex, duration: Ticks, level: Option<usize>) -> Ticks {
        let start = self.now;
        let proc = &mut self.procs[idx];
        debug_assert!(
            !proc.is_completed(),
            "Completed process {} dispatched again",
            proc.id
        );
        debug_assert!(
            proc.arrival_time <= start,
            "Process {} dispatched at t={start} before arriving at t={}",
            proc.id,
            proc.arrival_time
        );
        debug_assert!(
            duration > 0 && duration <= proc.remaining_time,
            "Slice of {duration} invalid for process {} with {} remaining",
            proc.id,
            proc.remaining_time
        );

        if proc.response_time.is_none() {
            proc.response_time = Some(start - proc.arrival_time);
        }
        proc.remaining_time -= duration;
        if let Some(feedback) = proc.feedback.as_mut() {
            feedback.time_in_level += duration;
        }

        let end = start + duration;
        self.gantt.push(GanttInterval {
            owner: GanttOwner::Process(proc.id.clone()),
            start,
            end,
            level,
        });
        self.now = end;

        proc.remaining_time
    }

    /// Finalize `idx` at the current time.
    pub fn complete(&mut self, idx: ProcIndex) {
        let now = self.now;
        let proc = &mut self.procs[idx];
        debug_assert_eq!(
            proc.remaining_time, 0,
            "Process {} completed with time remaining",
            proc.id
        );
        debug_assert!(
            !proc.is_completed(),
            "Process {} completed twice",
            proc.id
        );

        let turnaround = now - proc.arrival_time;
        proc.completion_time = Some(now);
        proc.turnaround_time = Some(turnaround);
        proc.waiting_time = Some(turnaround - proc.burst_time);
        let process = proc.id.clone();

        self.completed += 1;
        self.log(EventKind::Complete { process });
    }

    pub fn into_result(self) -> AlgorithmResult {
        let metrics = Metrics::from_processes(&self.procs);
        AlgorithmResult {
            processes: self.procs,
            timeline: self.timeline,
            gantt: self.gantt,
            metrics,
        }
    }
}
