mod config;
mod error;
mod parallel_type;
mod state;
mod units;
extern crate nalgebra as na;
extern crate serde;

pub use config::SimulationConfig;
pub use error::SolverError;
pub use parallel_type::ParallelType;
pub use state::{wrap_position, MacroParameters, State};
pub use units::*;
