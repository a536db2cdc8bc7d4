use log::debug;
use na::Vector3;
use rayon::prelude::*;
use ljargon_core::{ReducedUnits, State};
use crate::initializer::WoodcockThermostat;
use crate::macro_parameters::{get_pressure, get_temperature};

/// Rule used to move atoms on the current step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stage {
    /// First step. No previous positions exist yet, so atoms are moved by the
    /// modified Euler method after scaling velocities by `lambda`.
    Bootstrap { lambda: f64 },
    /// Every later step. <https://doi.org/10.1103/PhysRev.159.98>
    Verlet,
}

/// Record the scalars of the step about to be taken and choose how to take it.
///
/// `kinetic_energy` is `0.5 Σ|V|²` of the current velocities; the potential
/// energy and virial come from the last force evaluation.
pub fn prepare_step(state: &mut State, units: &ReducedUnits, kinetic_energy: f64) -> Stage {
    let number_particles = state.num_atoms();
    let volume = state.volume();
    let parameters = &mut state.macro_parameters;
    parameters.kinetic_energy = kinetic_energy;
    parameters.total_energy = kinetic_energy + parameters.potential_energy;
    parameters.temperature = get_temperature(kinetic_energy, number_particles);
    parameters.pressure = get_pressure(number_particles, parameters.temperature,
                                       parameters.virial, volume);
    debug!("Step {}: total energy {:.15}, temperature {:.6}",
           state.iteration, parameters.total_energy, parameters.temperature);
    if state.iteration == 1 {
        let thermostat = WoodcockThermostat::new(units.alpha);
        let lambda = thermostat.calculate_lambda(parameters.temperature, units.temperature);
        Stage::Bootstrap { lambda }
    } else {
        Stage::Verlet
    }
}

/// Advance the clock after atoms have been moved and wrapped.
pub fn finish_step(state: &mut State, units: &ReducedUnits) {
    state.time = state.iteration as f64 * units.dt;
    state.iteration += 1;
}

fn move_atom(stage: Stage,
             dt: f64,
             position: &mut Vector3<f64>,
             previous: &mut Vector3<f64>,
             velocity: &mut Vector3<f64>,
             force: &Vector3<f64>) {
    match stage {
        Stage::Bootstrap { lambda } => {
            *previous = *position;
            *velocity *= lambda;
            *position += *velocity * dt + force * (0.5 * dt * dt);
            *velocity += force * dt;
        }
        Stage::Verlet => {
            let current = *position;
            *position = current * 2.0 - *previous + force * (dt * dt);
            *velocity = (*position - *previous) * (0.5 / dt);
            *previous = current;
        }
    }
}

pub fn move_atoms(state: &mut State, units: &ReducedUnits, stage: Stage) {
    let dt = units.dt;
    state.positions.iter_mut()
        .zip(state.previous_positions.iter_mut())
        .zip(state.velocities.iter_mut())
        .zip(state.forces.iter())
        .for_each(|(((position, previous), velocity), force)| {
            move_atom(stage, dt, position, previous, velocity, force);
        });
}

pub fn par_move_atoms(state: &mut State, units: &ReducedUnits, stage: Stage) {
    let dt = units.dt;
    state.positions.par_iter_mut()
        .zip(state.previous_positions.par_iter_mut())
        .zip(state.velocities.par_iter_mut())
        .zip(state.forces.par_iter())
        .for_each(|(((position, previous), velocity), force)| {
            move_atom(stage, dt, position, previous, velocity, force);
        });
}
