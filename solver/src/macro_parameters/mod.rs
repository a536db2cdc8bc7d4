mod energy;
mod pressure;
mod temperature;

pub use energy::*;
pub use pressure::*;
pub use temperature::*;
use na::Vector3;

/// Arithmetic mean of `vectors`, zero for an empty slice.
pub fn get_mean(vectors: &[Vector3<f64>]) -> Vector3<f64> {
    if vectors.is_empty() {
        return Vector3::zeros();
    }
    let sum: Vector3<f64> = vectors.iter().sum();
    sum / vectors.len() as f64
}
