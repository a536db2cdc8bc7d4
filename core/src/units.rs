/// Boltzmann constant, J/K
pub const K_B: f64 = 1.3806488E-23;
/// Avogadro constant, 1/mol
pub const AVOGADRO_CONSTANT: f64 = 6.022140857E+23;
/// Lennard-Jones σ for argon, m
pub const SIGMA: f64 = 3.405E-10;
/// Lennard-Jones ε for argon, J
pub const EPSILON: f64 = 1.6540172624E-21;
/// Molar mass of argon, kg/mol
pub const ARGON_MOLAR_MASS: f64 = 0.039948;
/// One Hartree, J
pub const HARTREE: f64 = 4.35974465054E-18;
/// Standard atmospheres per pascal
pub const ATM: f64 = 9.86923266716013E-6;

/// Constants of the reduced unit system, where lengths are measured in σ,
/// energies in ε and times in τ = √(mσ²/ε).
///
/// Built once when a simulation is created and shared by reference with every
/// engine afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReducedUnits {
    /// Time step Δt
    pub dt: f64,
    /// Δt²
    pub dt2: f64,
    /// Cutoff radius of the interaction
    pub rc: f64,
    /// rc²
    pub rc2: f64,
    /// rc⁻⁶
    pub rcm6: f64,
    /// rc⁻¹²
    pub rcm12: f64,
    /// Potential value at the cutoff, subtracted so the potential is continuous there
    pub vrc: f64,
    /// Damping coefficient of the Woodcock velocity scaling
    pub alpha: f64,
    /// Target temperature
    pub temperature: f64,
    /// Scaling applied to the equilibrium lattice constant
    pub scale: f64,
    /// Edge of the cubic unit cell
    pub lattice_constant: f64,
    /// Time unit τ in seconds
    pub tau: f64,
}

impl ReducedUnits {
    pub const DT: f64 = 0.001;
    pub const CUTOFF_RADIUS: f64 = 2.5;
    pub const WOODCOCK_ALPHA: f64 = 0.2;

    /// Create the unit system for lattice `scale` and target temperature given in Kelvin.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ljargon_core::ReducedUnits;
    /// let units = ReducedUnits::new(1.0, 50.0);
    /// assert_eq!(units.rc2, 6.25);
    /// assert!((units.temperature_to_kelvin(units.temperature) - 50.0).abs() < 1e-10);
    /// ```
    pub fn new(scale: f64, temperature_kelvin: f64) -> Self {
        let rc = Self::CUTOFF_RADIUS;
        let rcm6 = rc.powi(-6);
        let rcm12 = rc.powi(-12);
        let mass = ARGON_MOLAR_MASS / AVOGADRO_CONSTANT;
        Self {
            dt: Self::DT,
            dt2: Self::DT * Self::DT,
            rc,
            rc2: rc * rc,
            rcm6,
            rcm12,
            vrc: 4.0 * (rcm12 - rcm6),
            alpha: Self::WOODCOCK_ALPHA,
            temperature: temperature_kelvin * K_B / EPSILON,
            scale,
            lattice_constant: 2.0f64.powf(2.0 / 3.0) * scale,
            tau: (mass * SIGMA * SIGMA / EPSILON).sqrt(),
        }
    }

    pub fn temperature_to_kelvin(&self, temperature: f64) -> f64 {
        temperature * EPSILON / K_B
    }

    pub fn energy_to_hartree(&self, energy: f64) -> f64 {
        energy * EPSILON / HARTREE
    }

    /// Convert reduced pressure (ε/σ³) to standard atmospheres.
    pub fn pressure_to_atm(&self, pressure: f64) -> f64 {
        pressure * EPSILON / SIGMA.powi(3) * ATM
    }

    pub fn time_to_seconds(&self, time: f64) -> f64 {
        time * self.tau
    }
}
