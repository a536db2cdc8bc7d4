use log::debug;
use na::Vector3;
use crate::macro_parameters::get_mean;

/// Fractional coordinates of the four atoms of a face-centered cubic cell.
/// The order fixes the index of every atom in the ensemble.
pub const FCC_BASIS: [(f64, f64, f64); 4] = [
    (0.0, 0.0, 0.0),
    (0.5, 0.5, 0.0),
    (0.0, 0.5, 0.5),
    (0.5, 0.0, 0.5),
];

/// Place `4 * supercells³` atoms on a face-centered cubic lattice with cell
/// edge `lattice_constant` and move their centroid to the origin.
///
/// Cells are visited with `z` fastest, then `y`, then `x`, and each cell emits
/// its atoms in [FCC_BASIS] order.
pub fn initialize_positions(supercells: usize, lattice_constant: f64) -> Vec<Vector3<f64>> {
    let mut positions = Vec::with_capacity(FCC_BASIS.len() * supercells.pow(3));
    for x in 0..supercells {
        for y in 0..supercells {
            for z in 0..supercells {
                let origin = Vector3::new(x as f64, y as f64, z as f64) * lattice_constant;
                for (bx, by, bz) in FCC_BASIS {
                    positions.push(origin + Vector3::new(bx, by, bz) * lattice_constant);
                }
            }
        }
    }
    move_center_to_origin(&mut positions);
    debug!("Placed {} atoms on {}³ cells", positions.len(), supercells);
    positions
}

pub fn move_center_to_origin(positions: &mut [Vector3<f64>]) {
    let center = get_mean(positions);
    positions.iter_mut().for_each(|position| *position -= center);
}
