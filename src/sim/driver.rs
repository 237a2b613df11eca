use std::fmt;

use serde::Serialize;
use tracing::info;

use super::Process;
use crate::{
    core::{AlgorithmResult, Metric, SimError, Ticks},
    scheduler::{
        FifoScheduler, MlfqScheduler, RoundRobinScheduler, Scheduler, SjfScheduler,
        StcfScheduler, fifo, mlfq, rr, sjf, stcf,
    },
};

/// One scheduling policy, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Policy {
    Fifo,
    Sjf,
    Stcf,
    RoundRobin { quantum: Ticks },
    Mlfq,
}

impl Policy {
    /// Every policy, in the order they are reported.
    pub fn all(quantum: Ticks) -> [Policy; 5] {
        [
            Policy::Fifo,
            Policy::Sjf,
            Policy::Stcf,
            Policy::RoundRobin { quantum },
            Policy::Mlfq,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Policy::Fifo => FifoScheduler::NAME,
            Policy::Sjf => SjfScheduler::NAME,
            Policy::Stcf => StcfScheduler::NAME,
            Policy::RoundRobin { .. } => RoundRobinScheduler::NAME,
            Policy::Mlfq => MlfqScheduler::NAME,
        }
    }

    pub fn run(&self, processes: &[Process]) -> Result<AlgorithmResult, SimError> {
        match *self {
            Policy::Fifo => fifo::run(processes),
            Policy::Sjf => sjf::run(processes),
            Policy::Stcf => stcf::run(processes),
            Policy::RoundRobin { quantum } => rr::run(processes, quantum),
            Policy::Mlfq => mlfq::run(processes),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::RoundRobin { quantum } => write!(f, "{} (q={quantum})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

/// Results of several policies over the same process set, in run order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub results: Vec<(Policy, AlgorithmResult)>,
}

impl Comparison {
    pub fn get(&self, name: &str) -> Option<&AlgorithmResult> {
        self.results
            .iter()
            .find(|(policy, _)| policy.name().eq_ignore_ascii_case(name))
            .map(|(_, result)| result)
    }

    /// Policy with the lowest average for `metric`; the earlier one wins ties.
    pub fn best(&self, metric: Metric) -> Option<Policy> {
        self.results
            .iter()
            .fold(None, |best: Option<(Policy, f64)>, (policy, result)| {
                let value = result.metrics.get(metric);
                match best {
                    Some((_, best_value)) if best_value <= value => best,
                    _ => Some((*policy, value)),
                }
            })
            .map(|(policy, _)| policy)
    }
}

/// Run `policies` one after another on the same input. Each run gets its
/// own working copy, so results never influence each other.
pub fn run_policies(processes: &[Process], policies: &[Policy]) -> Result<Comparison, SimError> {
    let results = policies
        .iter()
        .map(|policy| Ok((*policy, policy.run(processes)?)))
        .collect::<Result<Vec<_>, SimError>>()?;

    info!(policies = results.len(), "comparison finished");
    Ok(Comparison { results })
}

/// Run all five policies, using `quantum` for round-robin.
pub fn run_all(processes: &[Process], quantum: Ticks) -> Result<Comparison, SimError> {
    run_policies(processes, &Policy::all(quantum))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> [Process; 3] {
        [
            Process::new("P1", 0, 5),
            Process::new("P2", 1, 3),
            Process::new("P3", 2, 1),
        ]
    }

    #[test]
    fn runs_every_policy_in_order() {
        let comparison = run_all(&three(), 2).unwrap();
        let names: Vec<_> = comparison.results.iter().map(|(p, _)| p.name()).collect();
        assert_eq!(names, ["FIFO", "SJF", "STCF", "RR", "MLFQ"]);
        assert_eq!(
            comparison.get("stcf").unwrap().gantt_line(),
            "P1[0,1) P2[1,2) P3[2,3) P2[3,5) P1[5,9)"
        );
    }

    #[test]
    fn picks_best_policy_per_metric() {
        let comparison = run_all(&three(), 2).unwrap();
        assert_eq!(comparison.best(Metric::Turnaround), Some(Policy::Stcf));
        assert_eq!(comparison.best(Metric::Waiting), Some(Policy::Stcf));
        // MLFQ dispatches everyone on arrival
        assert_eq!(comparison.best(Metric::Response), Some(Policy::Mlfq));
    }

    #[test]
    fn errors_stop_the_comparison() {
        assert_eq!(run_all(&[], 2).unwrap_err(), SimError::EmptyInput);
        assert_eq!(
            run_all(&three(), 0).unwrap_err(),
            SimError::InvalidQuantum(0)
        );
    }

    #[test]
    fn display_includes_quantum() {
        assert_eq!(Policy::RoundRobin { quantum: 3 }.to_string(), "RR (q=3)");
        assert_eq!(Policy::Mlfq.to_string(), "MLFQ");
    }
}
