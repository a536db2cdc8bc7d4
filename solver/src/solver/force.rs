use std::ops::Add;
use itertools::iproduct;
use na::Vector3;
use rayon::prelude::*;
use ljargon_core::State;
use crate::solver::LennardJonesPotential;

/// Scalar sums collected while visiting pairs. Every pair is visited from
/// both sides, so each visit adds half of the pair's share.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PairSums {
    pub potential_energy: f64,
    pub virial: f64,
}

impl Add for PairSums {
    type Output = PairSums;

    fn add(self, other: PairSums) -> PairSums {
        PairSums {
            potential_energy: self.potential_energy + other.potential_energy,
            virial: self.virial + other.virial,
        }
    }
}

/// Translation of one periodic image of the box.
#[derive(Clone, Copy, Debug)]
pub struct ImageShift {
    pub shift: Vector3<f64>,
    /// The box itself rather than a copy
    pub is_origin: bool,
}

/// Every image translation in `[-shells, shells]³`.
pub fn image_shifts(shells: i32, periodic_length: f64) -> Vec<ImageShift> {
    iproduct!(-shells..=shells, -shells..=shells, -shells..=shells)
        .map(|(i, j, k)| ImageShift {
            shift: Vector3::new(i as f64, j as f64, k as f64) * periodic_length,
            is_origin: i == 0 && j == 0 && k == 0,
        })
        .collect()
}

/// Force on atom `n` from every atom and every image in `shifts`.
fn particle_force(n: usize,
                  positions: &[Vector3<f64>],
                  shifts: &[ImageShift],
                  potential: &LennardJonesPotential) -> (Vector3<f64>, PairSums) {
    let rn = positions[n];
    let mut force = Vector3::zeros();
    let mut sums = PairSums::default();
    for (m, rm) in positions.iter().enumerate() {
        for image in shifts {
            // no self interaction inside the box
            if n == m && image.is_origin {
                continue;
            }
            let d = rn - (rm + image.shift);
            let r2 = d.norm_squared();
            if let Some((potential_energy, fr)) = potential.get_potential_and_force(r2) {
                let r = r2.sqrt();
                force += d * (fr / r);
                sums.potential_energy += 0.5 * potential_energy;
                sums.virial += 0.5 * fr * r;
            }
        }
    }
    (force, sums)
}

/// Recalculate forces of every atom on the calling thread.
pub fn update_force(state: &mut State, potential: &LennardJonesPotential, shells: i32) -> PairSums {
    let shifts = image_shifts(shells, state.periodic_length);
    let positions = &state.positions;
    let mut total = PairSums::default();
    for (n, force) in state.forces.iter_mut().enumerate() {
        let (f, sums) = particle_force(n, positions, &shifts, potential);
        *force = f;
        total = total + sums;
    }
    total
}

/// Recalculate forces of every atom on the thread pool. Each worker writes only
/// the force slots of the atoms it owns.
pub fn par_update_force(state: &mut State, potential: &LennardJonesPotential, shells: i32) -> PairSums {
    let shifts = image_shifts(shells, state.periodic_length);
    let positions = &state.positions;
    state.forces.par_iter_mut()
        .enumerate()
        .map(|(n, force)| {
            let (f, sums) = particle_force(n, positions, &shifts, potential);
            *force = f;
            sums
        })
        .reduce(PairSums::default, |a, b| a + b)
}

/// Potential energy and virial on the thread pool, without touching forces.
pub fn par_get_pair_sums(positions: &[Vector3<f64>],
                         periodic_length: f64,
                         potential: &LennardJonesPotential,
                         shells: i32) -> PairSums {
    let shifts = image_shifts(shells, periodic_length);
    (0..positions.len()).into_par_iter()
        .map(|n| particle_force(n, positions, &shifts, potential).1)
        .reduce(PairSums::default, |a, b| a + b)
}
