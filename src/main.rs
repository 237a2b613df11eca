use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cpu_sched_sim::{
    AlgorithmResult, Comparison, Metric, Policy, Process,
    config::{DEFAULT_QUANTUM, WorkloadConfig},
    sim::{generate_seeded, run_policies},
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
enum PolicyArg {
    /// First-in-first-out, run to completion
    Fifo,
    /// Shortest job first, non-preemptive
    Sjf,
    /// Shortest time to completion first, preemptive
    Stcf,
    /// Round-robin with `--quantum`
    Rr,
    /// Three-level feedback queue
    Mlfq,
    /// Run every policy and compare
    All,
}

/// Simulate CPU scheduling policies over a fixed process set
#[derive(Parser, Debug)]
#[command(name = "cpu_sched_sim", version, about, long_about = None)]
struct Args {
    /// Policy to simulate
    #[arg(short, long, value_enum, default_value_t = PolicyArg::All)]
    policy: PolicyArg,

    /// Round-robin time quantum
    #[arg(short, long, default_value_t = DEFAULT_QUANTUM)]
    quantum: u64,

    /// JSON array of processes; a random set is generated when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Number of generated processes
    #[arg(short = 'n', long, default_value_t = WorkloadConfig::default().count)]
    count: usize,

    /// Generated arrivals fall in [0, max_arrival)
    #[arg(long, default_value_t = WorkloadConfig::default().max_arrival)]
    max_arrival: u64,

    /// Generated bursts fall in [1, max_burst - 1]
    #[arg(long, default_value_t = WorkloadConfig::default().max_burst)]
    max_burst: u64,

    /// Seed for the process generator
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log every decision point
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let processes = load_processes(&args)?;
    let policies = match args.policy {
        PolicyArg::Fifo => vec![Policy::Fifo],
        PolicyArg::Sjf => vec![Policy::Sjf],
        PolicyArg::Stcf => vec![Policy::Stcf],
        PolicyArg::Rr => vec![Policy::RoundRobin {
            quantum: args.quantum,
        }],
        PolicyArg::Mlfq => vec![Policy::Mlfq],
        PolicyArg::All => Policy::all(args.quantum).to_vec(),
    };
    let comparison = run_policies(&processes, &policies)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    print_processes(&processes);
    for (policy, result) in &comparison.results {
        print_result(policy, result);
    }
    if comparison.results.len() > 1 {
        print_best(&comparison);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_processes(args: &Args) -> Result<Vec<Process>> {
    match &args.input {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse processes from {}", path.display()))
        }
        None => {
            let config = WorkloadConfig {
                count: args.count,
                max_arrival: args.max_arrival,
                max_burst: args.max_burst,
            };
            Ok(generate_seeded(&config, args.seed))
        }
    }
}

fn print_processes(processes: &[Process]) {
    println!("{:<8} {:>8} {:>6}", "id", "arrival", "burst");
    for process in processes {
        println!(
            "{:<8} {:>8} {:>6}",
            process.id, process.arrival_time, process.burst_time
        );
    }
}

fn print_result(policy: &Policy, result: &AlgorithmResult) {
    println!();
    println!("== {policy}");
    println!("{}", result.gantt_line());
    println!(
        "{:<8} {:>10} {:>10} {:>8} {:>8}",
        "id", "completion", "turnaround", "waiting", "response"
    );
    for proc in &result.processes {
        println!(
            "{:<8} {:>10} {:>10} {:>8} {:>8}",
            proc.id,
            proc.completion_time.unwrap_or_default(),
            proc.turnaround_time.unwrap_or_default(),
            proc.waiting_time.unwrap_or_default(),
            proc.response_time.unwrap_or_default(),
        );
    }
    println!("Average turnaround time: {:.2}", result.metrics.avg_turnaround_time);
    println!("Average waiting time: {:.2}", result.metrics.avg_waiting_time);
    println!("Average response time: {:.2}", result.metrics.avg_response_time);
}

fn print_best(comparison: &Comparison) {
    println!();
    for metric in Metric::ALL {
        if let Some(policy) = comparison.best(metric) {
            println!("Lowest average {metric} time: {policy}");
        }
    }
}
