/// Virial pressure `(N T + W / 3) / V` in reduced units, where `W` is the sum
/// of `r·F` over all interacting pairs.
pub fn get_pressure(number_particles: usize, temperature: f64, virial: f64, volume: f64) -> f64 {
    (number_particles as f64 * temperature + virial / 3.0) / volume
}
