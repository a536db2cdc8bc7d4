/// Kinetic temperature in reduced units, `2 E / (3 N)`.
pub fn get_temperature(kinetic_energy: f64, number_particles: usize) -> f64 {
    if number_particles == 0 {
        return 0.0;
    }
    kinetic_energy / (1.5 * number_particles as f64)
}
