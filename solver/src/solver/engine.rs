use log::info;
use rayon::prelude::*;
use ljargon_core::{wrap_position, ParallelType, ReducedUnits, SolverError, State};
use crate::gpu::GpuEngine;
use crate::macro_parameters::{get_kinetic_energy, par_get_kinetic_energy};
use crate::solver::{finish_step, move_atoms, par_move_atoms, par_update_force, prepare_step,
                    update_force, LennardJonesPotential, PairSums};

/// One way of running the physics. The caller alternates
/// [Engine::compute_forces] and [Engine::advance_step], never overlapping them.
pub trait Engine: Send {
    fn parallel_type(&self) -> ParallelType;

    /// Recalculate forces, potential energy and virial for current positions.
    fn compute_forces(&mut self, state: &mut State, units: &ReducedUnits) -> Result<(), SolverError>;

    /// Move atoms one step, wrap them into the box and advance the clock.
    fn advance_step(&mut self, state: &mut State, units: &ReducedUnits) -> Result<(), SolverError>;
}

pub(crate) fn store_pair_sums(state: &mut State, sums: PairSums) {
    state.macro_parameters.potential_energy = sums.potential_energy;
    state.macro_parameters.virial = sums.virial;
}

/// Everything on the calling thread.
pub struct SerialEngine {
    potential: LennardJonesPotential,
    shells: i32,
}

impl SerialEngine {
    pub fn new(units: &ReducedUnits, shells: i32) -> Self {
        Self {
            potential: LennardJonesPotential::new(units),
            shells,
        }
    }
}

impl Engine for SerialEngine {
    fn parallel_type(&self) -> ParallelType {
        ParallelType::NoParallel
    }

    fn compute_forces(&mut self, state: &mut State, _units: &ReducedUnits) -> Result<(), SolverError> {
        let sums = update_force(state, &self.potential, self.shells);
        store_pair_sums(state, sums);
        Ok(())
    }

    fn advance_step(&mut self, state: &mut State, units: &ReducedUnits) -> Result<(), SolverError> {
        let kinetic_energy = get_kinetic_energy(&state.velocities);
        let stage = prepare_step(state, units, kinetic_energy);
        move_atoms(state, units, stage);
        state.apply_boundary_conditions();
        finish_step(state, units);
        Ok(())
    }
}

/// Outer loops split over the rayon thread pool.
pub struct ThreadPoolEngine {
    potential: LennardJonesPotential,
    shells: i32,
}

impl ThreadPoolEngine {
    pub fn new(units: &ReducedUnits, shells: i32) -> Self {
        Self {
            potential: LennardJonesPotential::new(units),
            shells,
        }
    }
}

impl Engine for ThreadPoolEngine {
    fn parallel_type(&self) -> ParallelType {
        ParallelType::ThreadPool
    }

    fn compute_forces(&mut self, state: &mut State, _units: &ReducedUnits) -> Result<(), SolverError> {
        let sums = par_update_force(state, &self.potential, self.shells);
        store_pair_sums(state, sums);
        Ok(())
    }

    fn advance_step(&mut self, state: &mut State, units: &ReducedUnits) -> Result<(), SolverError> {
        let kinetic_energy = par_get_kinetic_energy(&state.velocities);
        let stage = prepare_step(state, units, kinetic_energy);
        par_move_atoms(state, units, stage);
        par_apply_boundary_conditions(state);
        finish_step(state, units);
        Ok(())
    }
}

pub fn par_apply_boundary_conditions(state: &mut State) {
    let length = state.periodic_length;
    state.positions.par_iter_mut()
        .zip(state.previous_positions.par_iter_mut())
        .for_each(|(position, previous)| wrap_position(position, previous, length));
}

/// Build the engine for `parallel_type`. Only the accelerator can fail, and
/// then nothing is left half-initialized.
pub fn engine_for(parallel_type: ParallelType,
                  state: &State,
                  units: &ReducedUnits,
                  shells: i32) -> Result<Box<dyn Engine>, SolverError> {
    let engine: Box<dyn Engine> = match parallel_type {
        ParallelType::NoParallel => Box::new(SerialEngine::new(units, shells)),
        ParallelType::ThreadPool => Box::new(ThreadPoolEngine::new(units, shells)),
        ParallelType::Accelerator => {
            let engine = GpuEngine::new(state, units, shells)?;
            info!("Using adapter {}", engine.adapter_name());
            Box::new(engine)
        }
    };
    info!("Running {} atoms on {} engine", state.num_atoms(), parallel_type);
    Ok(engine)
}
