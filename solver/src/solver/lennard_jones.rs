use ljargon_core::ReducedUnits;

/// 12-6 Lennard-Jones potential in reduced units, truncated at `rc` and
/// shifted so that it vanishes there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LennardJonesPotential {
    rc2: f64,
    v_cut: f64,
}

impl LennardJonesPotential {
    pub fn new(units: &ReducedUnits) -> Self {
        Self {
            rc2: units.rc2,
            v_cut: units.vrc,
        }
    }

    pub fn cutoff_squared(&self) -> f64 {
        self.rc2
    }

    /// Potential energy and force magnitude for a pair at squared distance `r2`.
    ///
    /// Returns `None` outside the cutoff and for coincident points.
    /// A positive force pushes the pair apart.
    pub fn get_potential_and_force(&self, r2: f64) -> Option<(f64, f64)> {
        if r2 > self.rc2 || r2 <= 0.0 {
            return None;
        }
        let r = r2.sqrt();
        let rm6 = 1.0 / (r2 * r2 * r2);
        let rm7 = rm6 / r;
        let rm12 = rm6 * rm6;
        let rm13 = rm12 / r;
        Some((
            4.0 * (rm12 - rm6) - self.v_cut,
            48.0 * rm13 - 24.0 * rm7,
        ))
    }
}
