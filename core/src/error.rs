use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// No adapter could be acquired. Simulations can be rebuilt with
    /// [`crate::ParallelType::ThreadPool`] or [`crate::ParallelType::NoParallel`].
    #[error("Accelerator is unavailable: {0}")]
    AcceleratorUnavailable(String),

    #[error("Kernel compilation failed: {0}")]
    KernelCompilation(String),

    #[error("Device synchronization failed: {0}")]
    Synchronization(String),

    #[error("Can't open config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
