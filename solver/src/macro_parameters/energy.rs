use na::Vector3;
use rayon::prelude::*;

fn particle_kinetic_energy(velocity: &Vector3<f64>) -> f64 {
    velocity.dot(velocity) / 2.0
}

pub fn get_kinetic_energy(velocities: &[Vector3<f64>]) -> f64 {
    velocities.iter().map(particle_kinetic_energy).sum()
}

pub fn par_get_kinetic_energy(velocities: &[Vector3<f64>]) -> f64 {
    velocities.par_iter().map(particle_kinetic_energy).sum()
}
