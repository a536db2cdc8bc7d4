use log::warn;

/// Woodcock velocity scaling. Moves the kinetic temperature a fraction
/// `1 - alpha` of the way to the target in one rescaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WoodcockThermostat {
    pub alpha: f64,
}

impl WoodcockThermostat {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    /// Calculate velocity scaling coefficient
    pub fn calculate_lambda(&self, temperature: f64, target_temperature: f64) -> f64 {
        if !(temperature > 0.0 && temperature.is_finite()) {
            warn!("Can't rescale velocities at temperature {}, leaving them as is", temperature);
            return 1.0;
        }
        let lambda_squared =
            (target_temperature + self.alpha * (temperature - target_temperature)) / temperature;
        lambda_squared.max(0.0).sqrt()
    }
}
