use log::info;
use na::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ljargon_core::{ParallelType, ReducedUnits, SimulationConfig, SolverError, State};
use crate::initializer::{initialize_positions, initialize_velocities};
use crate::solver::{engine_for, Engine};

/// Argon crystal in a periodic box together with the engine that moves it.
///
/// Each step is a call to [Simulation::compute_forces] followed by a call to
/// [Simulation::advance_step].
///
/// # Examples
///
/// ```
/// # use ljargon_core::{ParallelType, SimulationConfig};
/// # use ljargon_solver::Simulation;
/// let config = SimulationConfig {
///     supercells: 1,
///     parallel_type: ParallelType::NoParallel,
///     seed: Some(1),
///     ..Default::default()
/// };
/// let mut simulation = Simulation::new(config).expect("Can't create simulation");
/// assert_eq!(simulation.num_atoms(), 4);
/// simulation.compute_forces().expect("Can't compute forces");
/// simulation.advance_step().expect("Can't advance");
/// assert_eq!(simulation.iteration(), 2);
/// ```
pub struct Simulation {
    state: State,
    units: ReducedUnits,
    engine: Box<dyn Engine>,
}

impl Simulation {
    /// Build the lattice and velocities described by `config` and pick its engine.
    pub fn new(config: SimulationConfig) -> Result<Self, SolverError> {
        match config.seed {
            Some(seed) => Self::with_rng(config, &mut StdRng::seed_from_u64(seed)),
            None => Self::with_rng(config, &mut rand::thread_rng()),
        }
    }

    /// Same as [Simulation::new] with velocities drawn from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(config: SimulationConfig, rng: &mut R) -> Result<Self, SolverError> {
        config.validate()?;
        let units = ReducedUnits::new(config.scale, config.temperature);
        let positions = initialize_positions(config.supercells, units.lattice_constant);
        let velocities = initialize_velocities(positions.len(), units.temperature, rng);
        let periodic_length = units.lattice_constant * config.supercells as f64;
        let state = State::new(positions, velocities, periodic_length)?;
        info!("Initialized {} atoms, lattice constant {:.6}, box {:.6}",
              state.num_atoms(), units.lattice_constant, periodic_length);
        Self::from_state(state, units, config.parallel_type, config.shells)
    }

    /// Wrap an existing ensemble. Mismatched particle sequences and a box edge
    /// that is not positive and finite are rejected.
    pub fn from_state(state: State,
                      units: ReducedUnits,
                      parallel_type: ParallelType,
                      shells: u32) -> Result<Self, SolverError> {
        if state.num_atoms() == 0 {
            return Err(SolverError::Configuration(String::from("ensemble has no atoms")));
        }
        state.validate()?;
        let shells = i32::try_from(shells).map_err(|_| SolverError::Configuration(
            format!("too many image shells: {}", shells)))?;
        let engine = engine_for(parallel_type, &state, &units, shells)?;
        Ok(Self {
            state,
            units,
            engine,
        })
    }

    pub fn compute_forces(&mut self) -> Result<(), SolverError> {
        self.engine.compute_forces(&mut self.state, &self.units)
    }

    pub fn advance_step(&mut self) -> Result<(), SolverError> {
        self.engine.advance_step(&mut self.state, &self.units)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn units(&self) -> &ReducedUnits {
        &self.units
    }

    pub fn parallel_type(&self) -> ParallelType {
        self.engine.parallel_type()
    }

    pub fn num_atoms(&self) -> usize {
        self.state.num_atoms()
    }

    pub fn periodic_length(&self) -> f64 {
        self.state.periodic_length
    }

    pub fn iteration(&self) -> u64 {
        self.state.iteration
    }

    pub fn time(&self) -> f64 {
        self.state.time
    }

    pub fn positions(&self) -> &[Vector3<f64>] {
        &self.state.positions
    }

    pub fn velocities(&self) -> &[Vector3<f64>] {
        &self.state.velocities
    }

    pub fn forces(&self) -> &[Vector3<f64>] {
        &self.state.forces
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.state.macro_parameters.kinetic_energy
    }

    pub fn potential_energy(&self) -> f64 {
        self.state.macro_parameters.potential_energy
    }

    pub fn total_energy(&self) -> f64 {
        self.state.macro_parameters.total_energy
    }

    pub fn total_energy_hartree(&self) -> f64 {
        self.units.energy_to_hartree(self.total_energy())
    }

    /// Temperature in reduced units
    pub fn temperature(&self) -> f64 {
        self.state.macro_parameters.temperature
    }

    pub fn temperature_kelvin(&self) -> f64 {
        self.units.temperature_to_kelvin(self.temperature())
    }

    /// Pressure in reduced units
    pub fn pressure(&self) -> f64 {
        self.state.macro_parameters.pressure
    }

    pub fn pressure_atm(&self) -> f64 {
        self.units.pressure_to_atm(self.pressure())
    }
}
