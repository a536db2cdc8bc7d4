use std::path::PathBuf;
use clap::{Parser, ValueEnum};
use ljargon_core::ParallelType;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file with simulation config. Options given on the command line override it
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// number of fcc cells along each axis
    #[arg(short = 'n', long)]
    pub supercells: Option<usize>,
    /// scaling of the equilibrium lattice constant
    #[arg(short = 's', long)]
    pub scale: Option<f64>,
    /// temperature in Kelvin
    #[arg(short = 'T', long)]
    pub temperature: Option<f64>,
    /// where the physics runs
    #[arg(short = 'p', long, value_enum)]
    pub parallel: Option<ParallelChoose>,
    /// periodic image shells summed along each axis
    #[arg(long)]
    pub shells: Option<u32>,
    /// seed of the velocity generator
    #[arg(long)]
    pub seed: Option<u64>,
    /// number of time steps
    #[arg(short = 'i', long, default_value_t = 1000)]
    pub iterations: usize,
    /// csv file for per step energies, temperature and pressure
    #[arg(short = 'o', long)]
    pub out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ParallelChoose {
    /// single thread
    NoParallel,
    /// wgpu compute kernels
    Accelerator,
    /// rayon thread pool
    ThreadPool,
}

impl From<ParallelChoose> for ParallelType {
    fn from(choose: ParallelChoose) -> Self {
        match choose {
            ParallelChoose::NoParallel => ParallelType::NoParallel,
            ParallelChoose::Accelerator => ParallelType::Accelerator,
            ParallelChoose::ThreadPool => ParallelType::ThreadPool,
        }
    }
}
