use log::warn;
use na::Vector3;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use crate::macro_parameters::get_mean;

/// Give every atom the speed `√(3 T)` in a random direction and remove the
/// center of mass drift.
pub fn initialize_velocities<R: Rng + ?Sized>(count: usize, temperature: f64, rng: &mut R)
                                              -> Vec<Vector3<f64>> {
    let speed = f64::sqrt(3.0 * temperature);
    let uniform = Uniform::new_inclusive(-1.0f64, 1.0);
    let mut velocities: Vec<Vector3<f64>> = (0..count)
        .map(|_| random_direction(rng, &uniform) * speed)
        .collect();
    remove_drift(&mut velocities);
    velocities
}

/// Subtract mean velocity so that total momentum is zero.
pub fn remove_drift(velocities: &mut [Vector3<f64>]) {
    let drift = get_mean(velocities);
    velocities.iter_mut().for_each(|velocity| *velocity -= drift);
}

fn random_direction<R: Rng + ?Sized>(rng: &mut R, uniform: &Uniform<f64>) -> Vector3<f64> {
    loop {
        let draw = Vector3::new(uniform.sample(rng), uniform.sample(rng), uniform.sample(rng));
        if let Some(direction) = normalize_direction(&draw) {
            return direction;
        }
        warn!("Degenerate random direction {:?}, drawing again", draw);
    }
}

/// Unit vector along `v`, or `None` when `v` has no usable length.
pub fn normalize_direction(v: &Vector3<f64>) -> Option<Vector3<f64>> {
    let norm = v.norm();
    if norm > 0.0 && norm.is_finite() {
        Some(v / norm)
    } else {
        None
    }
}
