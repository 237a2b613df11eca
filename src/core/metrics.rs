use std::fmt;

use average::{Estimate, Mean};
use serde::Serialize;

use super::{
    event::{GanttInterval, TimelineEvent},
    state::{SimulationProcess, Ticks},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Turnaround,
    Waiting,
    Response,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Turnaround, Metric::Waiting, Metric::Response];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Turnaround => write!(f, "turnaround"),
            Metric::Waiting => write!(f, "waiting"),
            Metric::Response => write!(f, "response"),
        }
    }
}

/// Per-run averages over every finished process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub avg_turnaround_time: f64,
    pub avg_waiting_time: f64,
    pub avg_response_time: f64,
}

impl Metrics {
    /// Callers reject empty process lists before getting here, so every
    /// mean is over at least one value.
    pub fn from_processes(procs: &[SimulationProcess]) -> Self {
        Self {
            avg_turnaround_time: avg(procs.iter().map(|p| p.turnaround_time)),
            avg_waiting_time: avg(procs.iter().map(|p| p.waiting_time)),
            avg_response_time: avg(procs.iter().map(|p| p.response_time)),
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Turnaround => self.avg_turnaround_time,
            Metric::Waiting => self.avg_waiting_time,
            Metric::Response => self.avg_response_time,
        }
    }
}

fn avg(iter: impl Iterator<Item = Option<Ticks>>) -> f64 {
    iter.map(|value| value.unwrap_or_default() as f64)
        .collect::<Mean>()
        .estimate()
}

/// Everything one engine invocation produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmResult {
    pub processes: Vec<SimulationProcess>,
    pub timeline: Vec<TimelineEvent>,
    pub gantt: Vec<GanttInterval>,
    pub metrics: Metrics,
}

impl AlgorithmResult {
    pub fn process(&self, id: &str) -> Option<&SimulationProcess> {
        self.processes.iter().find(|p| p.id == id)
    }

    pub fn makespan(&self) -> Ticks {
        self.gantt.last().map_or(0, |interval| interval.end)
    }

    /// Compact one-line trace, e.g. `P1[0,5) P2[5,8)`.
    pub fn gantt_line(&self) -> String {
        self.gantt
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(
        id: &str,
        arrival: Ticks,
        burst: Ticks,
        completion: Ticks,
        start: Ticks,
    ) -> SimulationProcess {
        let turnaround = completion - arrival;
        SimulationProcess {
            id: id.to_owned(),
            arrival_time: arrival,
            burst_time: burst,
            color: None,
            remaining_time: 0,
            completion_time: Some(completion),
            turnaround_time: Some(turnaround),
            waiting_time: Some(turnaround - burst),
            response_time: Some(start - arrival),
            feedback: None,
        }
    }

    #[test]
    fn averages_are_arithmetic_means() {
        let procs = [
            finished("P1", 0, 5, 5, 0),
            finished("P2", 1, 3, 8, 5),
            finished("P3", 2, 1, 9, 8),
        ];
        let metrics = Metrics::from_processes(&procs);

        assert!((metrics.avg_turnaround_time - 19.0 / 3.0).abs() < 1e-9);
        assert!((metrics.avg_waiting_time - 10.0 / 3.0).abs() < 1e-9);
        assert!((metrics.avg_response_time - 10.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.get(Metric::Waiting), metrics.avg_waiting_time);
    }

    #[test]
    fn single_process_mean_is_its_value() {
        let metrics = Metrics::from_processes(&[finished("P1", 2, 4, 9, 5)]);
        assert_eq!(metrics.avg_turnaround_time, 7.0);
        assert_eq!(metrics.avg_waiting_time, 3.0);
        assert_eq!(metrics.avg_response_time, 3.0);
    }
}
