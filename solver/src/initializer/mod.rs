mod position;
mod velocity;
mod thermostat;

pub use position::*;
pub use velocity::*;
pub use thermostat::*;
