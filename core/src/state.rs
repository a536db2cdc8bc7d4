use na::Vector3;
use crate::SolverError;

/// Scalars recomputed on every step. Nothing here keeps history.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MacroParameters {
    /// 0.5 Σ|V|² at the start of the last step
    pub kinetic_energy: f64,
    /// Truncated potential energy from the last force evaluation
    pub potential_energy: f64,
    pub total_energy: f64,
    /// Instantaneous temperature, kinetic energy / (1.5 N)
    pub temperature: f64,
    /// Σ r·F over all pairs from the last force evaluation
    pub virial: f64,
    pub pressure: f64,
}

/// Structure that keeps current state of the ensemble.
///
/// All particle sequences have the same length and index `i` refers to the
/// same atom in every one of them.
#[derive(Clone, Debug)]
pub struct State {
    /// Position of every atom
    pub positions: Vec<Vector3<f64>>,
    /// Position of every atom one step earlier
    pub previous_positions: Vec<Vector3<f64>>,
    pub velocities: Vec<Vector3<f64>>,
    /// The sum of the forces acting on every atom
    pub forces: Vec<Vector3<f64>>,
    /// Edge length of the cubic periodic box
    pub periodic_length: f64,
    /// Step counter, starts at 1
    pub iteration: u64,
    /// Simulated time in reduced units
    pub time: f64,
    pub macro_parameters: MacroParameters,
}

impl State {
    /// Create state at iteration 1 with zero forces. Previous positions start
    /// equal to `positions`.
    pub fn new(positions: Vec<Vector3<f64>>,
               velocities: Vec<Vector3<f64>>,
               periodic_length: f64) -> Result<Self, SolverError> {
        let count = positions.len();
        let state = State {
            previous_positions: positions.clone(),
            positions,
            velocities,
            forces: vec![Vector3::zeros(); count],
            periodic_length,
            iteration: 1,
            time: 0.0,
            macro_parameters: MacroParameters::default(),
        };
        state.validate()?;
        Ok(state)
    }

    /// Check that every particle sequence has one entry per atom and the box
    /// has a usable edge.
    pub fn validate(&self) -> Result<(), SolverError> {
        let count = self.positions.len();
        let lengths = [
            ("previous positions", self.previous_positions.len()),
            ("velocities", self.velocities.len()),
            ("forces", self.forces.len()),
        ];
        for (name, len) in lengths {
            if len != count {
                return Err(SolverError::Configuration(format!(
                    "{} atoms have positions but {} have {}", count, len, name)));
            }
        }
        if !(self.periodic_length > 0.0 && self.periodic_length.is_finite()) {
            return Err(SolverError::Configuration(format!(
                "periodic length must be positive and finite, got {}", self.periodic_length)));
        }
        Ok(())
    }

    pub fn num_atoms(&self) -> usize {
        self.positions.len()
    }

    pub fn volume(&self) -> f64 {
        self.periodic_length.powi(3)
    }

    /// Makes every particle to satisfy periodic boundary conditions.
    pub fn apply_boundary_conditions(&mut self) {
        let length = self.periodic_length;
        self.positions.iter_mut()
            .zip(self.previous_positions.iter_mut())
            .for_each(|(position, previous)| wrap_position(position, previous, length));
    }
}

/// Bring `position` back into `[0, length)` along every axis. `previous` is
/// shifted by the same amount so `position - previous` survives the wrap.
pub fn wrap_position(position: &mut Vector3<f64>, previous: &mut Vector3<f64>, length: f64) {
    for axis in 0..3 {
        if position[axis] >= length {
            position[axis] -= length;
            previous[axis] -= length;
        } else if position[axis] < 0.0 {
            position[axis] += length;
            previous[axis] += length;
            // tiny negative coordinates round up to `length`
            if position[axis] >= length {
                previous[axis] -= position[axis];
                position[axis] = 0.0;
            }
        }
    }
}
