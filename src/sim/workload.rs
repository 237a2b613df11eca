use rand::prelude::*;

use super::Process;
use crate::config::WorkloadConfig;

/// Random process set named `P1..Pn`, stably sorted by arrival time.
pub fn generate(config: &WorkloadConfig, rng: &mut impl Rng) -> Vec<Process> {
    let mut processes: Vec<Process> = (1..=config.count)
        .map(|n| {
            let arrival_time = rng.random_range(0..config.max_arrival.max(1));
            let burst_time = rng.random_range(1..config.max_burst.max(2));
            let color = format!("#{:06X}", rng.random_range(0..=0xFF_FFFFu32));
            Process::new(format!("P{n}"), arrival_time, burst_time).with_color(color)
        })
        .collect();

    processes.sort_by_key(|process| process.arrival_time);
    processes
}

pub fn generate_seeded(config: &WorkloadConfig, seed: u64) -> Vec<Process> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate(config, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respects_bounds_and_order() {
        let config = WorkloadConfig {
            count: 200,
            max_arrival: 7,
            max_burst: 4,
        };
        let processes = generate_seeded(&config, 42);

        assert_eq!(processes.len(), 200);
        assert!(processes.windows(2).all(|w| w[0].arrival_time <= w[1].arrival_time));
        for process in &processes {
            assert!(process.arrival_time < 7);
            assert!((1..=3).contains(&process.burst_time));
            assert!(process.color.as_ref().is_some_and(|c| c.len() == 7));
        }
    }

    #[test]
    fn same_seed_same_workload() {
        let config = WorkloadConfig::default();
        assert_eq!(generate_seeded(&config, 7), generate_seeded(&config, 7));
    }

    #[test]
    fn degenerate_bounds_still_valid() {
        let config = WorkloadConfig {
            count: 3,
            max_arrival: 0,
            max_burst: 1,
        };
        for process in generate_seeded(&config, 1) {
            assert_eq!(process.arrival_time, 0);
            assert_eq!(process.burst_time, 1);
        }
    }
}
