use std::error::Error;
use std::path::Path;
use indicatif::ProgressBar;
use log::{info, warn};
use serde::Serialize;
use ljargon_core::{ParallelType, SimulationConfig, SolverError};
use ljargon_solver::Simulation;
use crate::args::Args;

/// One csv row. Scalars are the ones recorded at the start of step `iteration`.
#[derive(Debug, Serialize)]
pub struct StepRecord {
    pub iteration: u64,
    pub time: f64,
    pub kinetic_energy: f64,
    pub potential_energy: f64,
    pub total_energy: f64,
    #[serde(rename = "temperature_K")]
    pub temperature_kelvin: f64,
    pub pressure: f64,
}

impl StepRecord {
    fn from_simulation(simulation: &Simulation) -> Self {
        Self {
            iteration: simulation.iteration() - 1,
            time: simulation.time(),
            kinetic_energy: simulation.kinetic_energy(),
            potential_energy: simulation.potential_energy(),
            total_energy: simulation.total_energy(),
            temperature_kelvin: simulation.temperature_kelvin(),
            pressure: simulation.pressure(),
        }
    }
}

/// Config file (or defaults) with command line overrides applied.
pub fn build_config(args: &Args) -> Result<SimulationConfig, SolverError> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_from_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(supercells) = args.supercells {
        config.supercells = supercells;
    }
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
    if let Some(parallel) = args.parallel {
        config.parallel_type = parallel.into();
    }
    if let Some(shells) = args.shells {
        config.shells = shells;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

/// Create the simulation, dropping to the thread pool when no accelerator can be used.
pub fn create_simulation(config: SimulationConfig) -> Result<Simulation, SolverError> {
    match Simulation::new(config.clone()) {
        Err(SolverError::AcceleratorUnavailable(reason)) => {
            warn!("Accelerator unavailable ({}), falling back to {}", reason, ParallelType::ThreadPool);
            Simulation::new(SimulationConfig {
                parallel_type: ParallelType::ThreadPool,
                ..config
            })
        }
        res => res,
    }
}

/// Run `iterations` steps and write one record per step to `out_file`.
/// Returns the number of records written.
pub fn solve(config: SimulationConfig,
             iterations: usize,
             out_file: &Path) -> Result<usize, Box<dyn Error>> {
    let mut simulation = create_simulation(config)?;
    let mut writer = csv::Writer::from_path(out_file)?;
    let pb = ProgressBar::new(iterations as u64);
    for _ in 0..iterations {
        simulation.compute_forces()?;
        simulation.advance_step()?;
        writer.serialize(StepRecord::from_simulation(&simulation))?;
        pb.inc(1);
    }
    writer.flush()?;
    pb.finish_with_message(format!("Calculated. Records saved to {}", out_file.to_string_lossy()));
    info!("{} atoms at {:.3} K, total energy {:.6e} Hartree",
          simulation.num_atoms(), simulation.temperature_kelvin(), simulation.total_energy_hartree());
    Ok(iterations)
}

pub fn run(args: &Args) -> Result<usize, Box<dyn Error>> {
    let config = build_config(args)?;
    solve(config, args.iterations, &args.out)
}
