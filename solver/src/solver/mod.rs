mod engine;
mod force;
mod integrator;
mod lennard_jones;
mod simulation;

pub use engine::*;
pub use force::*;
pub use integrator::*;
pub use lennard_jones::*;
pub use simulation::*;
