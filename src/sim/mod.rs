pub mod driver;
pub mod process;
pub mod workload;

pub use driver::{Comparison, Policy, run_all, run_policies};
pub use process::Process;
pub use workload::{generate, generate_seeded};
