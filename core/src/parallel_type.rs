use std::fmt;
use serde::{Deserialize, Serialize};

/// Execution strategy of a simulation, chosen once at construction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParallelType {
    /// Plain loops on the calling thread
    NoParallel,
    /// Compute kernels on a GPU adapter
    Accelerator,
    /// Work-stealing thread pool on the host
    #[default]
    ThreadPool,
}

impl fmt::Display for ParallelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParallelType::NoParallel => "no parallel",
            ParallelType::Accelerator => "accelerator",
            ParallelType::ThreadPool => "thread pool",
        };
        write!(f, "{}", name)
    }
}
