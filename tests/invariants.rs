use cpu_sched_sim::{
    AlgorithmResult, Policy, Process,
    config::WorkloadConfig,
    core::{GanttOwner, SimulationProcess},
    sim::{generate_seeded, run_all},
};
use rand::prelude::*;
use rustc_hash::FxHashMap;

const SEEDS: u64 = 64;

fn workloads() -> impl Iterator<Item = Vec<Process>> {
    (0..SEEDS).map(|seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = WorkloadConfig {
            count: rng.random_range(1..=12),
            max_arrival: rng.random_range(1..=20),
            max_burst: rng.random_range(2..=12),
        };
        generate_seeded(&config, seed)
    })
}

fn check_gantt(policy: &Policy, result: &AlgorithmResult) {
    let gantt = &result.gantt;
    assert_eq!(gantt.first().map(|i| i.start), Some(0), "{policy}: starts at 0");
    for interval in gantt {
        assert!(interval.start < interval.end, "{policy}: empty interval {interval}");
    }
    for pair in gantt.windows(2) {
        assert_eq!(pair[0].end, pair[1].start, "{policy}: gap or overlap");
    }

    let last_completion = result
        .processes
        .iter()
        .filter_map(|p| p.completion_time)
        .max();
    assert_eq!(Some(result.makespan()), last_completion, "{policy}: covers run");
}

fn check_processes(policy: &Policy, result: &AlgorithmResult) {
    let mut service: FxHashMap<&str, (u64, usize, u64)> = FxHashMap::default();
    for interval in &result.gantt {
        if let GanttOwner::Process(id) = &interval.owner {
            let entry = service.entry(id.as_str()).or_insert((0, 0, interval.start));
            entry.0 += interval.duration();
            entry.1 += 1;
        }
    }

    for proc in &result.processes {
        let completion = proc.completion_time.expect("every process completes");
        let turnaround = proc.turnaround_time.unwrap();
        let waiting = proc.waiting_time.unwrap();
        let response = proc.response_time.unwrap();

        assert_eq!(turnaround, completion - proc.arrival_time, "{policy}: {}", proc.id);
        assert_eq!(waiting, turnaround - proc.burst_time, "{policy}: {}", proc.id);
        assert!(response <= waiting, "{policy}: {}", proc.id);
        assert!(completion >= proc.arrival_time + proc.burst_time, "{policy}: {}", proc.id);
        assert_eq!(proc.remaining_time, 0);

        let (total, pieces, first_start) = service[proc.id.as_str()];
        assert_eq!(total, proc.burst_time, "{policy}: {} service", proc.id);
        assert!(first_start >= proc.arrival_time, "{policy}: {} ran early", proc.id);
        assert_eq!(first_start - proc.arrival_time, response, "{policy}: {}", proc.id);
        if matches!(policy, Policy::Fifo | Policy::Sjf) {
            assert_eq!(pieces, 1, "{policy}: {} split", proc.id);
        }
    }
}

fn check_timeline(policy: &Policy, result: &AlgorithmResult) {
    assert!(
        result.timeline.windows(2).all(|w| w[0].time <= w[1].time),
        "{policy}: timeline out of order"
    );

    for proc in &result.processes {
        let completions = result
            .timeline
            .iter()
            .filter(|e| e.description() == format!("Process {} completes execution", proc.id))
            .collect::<Vec<_>>();
        assert_eq!(completions.len(), 1, "{policy}: {}", proc.id);
        assert_eq!(Some(completions[0].time), proc.completion_time);

        // Nothing runs after it finished
        let completion = proc.completion_time.unwrap();
        assert!(result.gantt.iter().all(|interval| {
            interval.owner.process_id() != Some(proc.id.as_str()) || interval.end <= completion
        }));
    }
}

fn mean(result: &AlgorithmResult, field: impl Fn(&SimulationProcess) -> Option<u64>) -> f64 {
    let total: u64 = result.processes.iter().map(|p| field(p).unwrap()).sum();
    total as f64 / result.processes.len() as f64
}

fn check_metrics(policy: &Policy, result: &AlgorithmResult) {
    let metrics = result.metrics;
    let turnaround = mean(result, |p| p.turnaround_time);
    let waiting = mean(result, |p| p.waiting_time);
    let response = mean(result, |p| p.response_time);

    assert!((metrics.avg_turnaround_time - turnaround).abs() < 1e-9, "{policy}");
    assert!((metrics.avg_waiting_time - waiting).abs() < 1e-9, "{policy}");
    assert!((metrics.avg_response_time - response).abs() < 1e-9, "{policy}");
}

#[test]
fn every_policy_upholds_trace_invariants() {
    for processes in workloads() {
        for quantum in [1, 2, 3] {
            let comparison = run_all(&processes, quantum).unwrap();
            for (policy, result) in &comparison.results {
                assert_eq!(result.processes.len(), processes.len());
                check_gantt(policy, result);
                check_processes(policy, result);
                check_timeline(policy, result);
                check_metrics(policy, result);
            }
        }
    }
}

#[test]
fn runs_are_deterministic() {
    for processes in workloads().take(8) {
        assert_eq!(run_all(&processes, 2).unwrap(), run_all(&processes, 2).unwrap());
    }
}

#[test]
fn round_robin_with_huge_quantum_matches_fifo() {
    for processes in workloads() {
        let max_burst = processes.iter().map(|p| p.burst_time).max().unwrap();
        let fifo = Policy::Fifo.run(&processes).unwrap();
        let rr = Policy::RoundRobin { quantum: max_burst }.run(&processes).unwrap();

        let completions = |r: &AlgorithmResult| -> Vec<_> {
            r.processes
                .iter()
                .map(|p| (p.id.clone(), p.completion_time))
                .collect()
        };
        assert_eq!(completions(&fifo), completions(&rr));
    }
}

#[test]
fn mlfq_levels_stay_in_range() {
    for processes in workloads() {
        let result = Policy::Mlfq.run(&processes).unwrap();
        for interval in result.gantt.iter().filter(|i| !i.is_idle()) {
            assert!(interval.level.is_some_and(|level| level <= 2));
        }
        for proc in &result.processes {
            assert!(proc.feedback.is_some_and(|f| f.level <= 2));
        }
    }
}
