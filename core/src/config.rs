use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::{ParallelType, SolverError};

/// Everything needed to build a simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of unit cells along each axis. The ensemble holds `4 * supercells³` atoms.
    pub supercells: usize,
    /// Scaling of the equilibrium lattice constant
    pub scale: f64,
    /// Target temperature in Kelvin
    pub temperature: f64,
    pub parallel_type: ParallelType,
    /// Periodic image shells summed along each axis
    pub shells: u32,
    /// Seed of the velocity generator. Unseeded runs draw from the thread rng.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub const DEFAULT_SUPERCELLS: usize = 4;
    pub const DEFAULT_SCALE: f64 = 1.0;
    pub const DEFAULT_TEMPERATURE: f64 = 50.0;
    pub const DEFAULT_SHELLS: u32 = 3;

    /// Check the configuration before anything is allocated for it.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.supercells == 0 {
            return Err(SolverError::Configuration(
                String::from("supercell count must be positive")));
        }
        let atoms = self.supercells
            .checked_pow(3)
            .and_then(|cells| cells.checked_mul(4))
            .and_then(|atoms| u32::try_from(atoms).ok());
        if atoms.is_none() {
            return Err(SolverError::Configuration(
                format!("{} supercells give too many atoms", self.supercells)));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SolverError::Configuration(
                format!("lattice scale must be positive, got {}", self.scale)));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(SolverError::Configuration(
                format!("temperature must be non-negative, got {}", self.temperature)));
        }
        if i32::try_from(self.shells).is_err() {
            return Err(SolverError::Configuration(
                format!("too many image shells: {}", self.shells)));
        }
        Ok(())
    }

    pub fn num_atoms(&self) -> usize {
        4 * self.supercells.pow(3)
    }

    /// Read a JSON configuration. Missing fields take their default values.
    pub fn load_from_file(path: &Path) -> Result<Self, SolverError> {
        let file = File::open(path).map_err(|source| SolverError::Io {
            path: path.to_string_lossy().into_owned(),
            source,
        })?;
        let config: SimulationConfig = serde_json::de::from_reader(BufReader::new(file))
            .map_err(|source| SolverError::Parse {
                path: path.to_string_lossy().into_owned(),
                source,
            })?;
        config.validate()?;
        debug!("Loaded {:?} from {}", config, path.display());
        Ok(config)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            supercells: Self::DEFAULT_SUPERCELLS,
            scale: Self::DEFAULT_SCALE,
            temperature: Self::DEFAULT_TEMPERATURE,
            parallel_type: ParallelType::default(),
            shells: Self::DEFAULT_SHELLS,
            seed: None,
        }
    }
}
