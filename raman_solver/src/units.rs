//! Conversion from physical units to the dimensionless frequencies used by the
//! integrator. Every frequency is divided by [`FREQUENCY_SCALE`].
use crate::{
    config::{ModeTable, RunConfig},
    context::{Mode, QuadratureParams, ScaledInputs},
    error::Result,
};

/// J per eV
pub const EV: f64 = 1.602_176_6e-19;
/// J per meV
pub const MEV: f64 = 1.602_176_6e-22;
/// J s
pub const HBAR: f64 = 1.054_571_8e-34;
/// J / K
pub const BOLTZMANN: f64 = 1.380_648_52e-23;
/// cm^-1 per meV
pub const MEV_TO_WAVENUMBER: f64 = 8.065_543_835_4;
/// rad / s
pub const FREQUENCY_SCALE: f64 = 1.0e14;

/// `1 / k_B T`, in 1/J
#[must_use]
pub fn beta(temperature: f64) -> f64 {
    1.0 / (BOLTZMANN * temperature)
}

/// `\hbar \Omega_0 \beta`, so that a scaled frequency times this is `\hbar\omega\beta`
#[must_use]
pub fn scaled_beta(temperature: f64) -> f64 {
    HBAR * FREQUENCY_SCALE * beta(temperature)
}

#[must_use]
pub fn ev_to_scaled(energy: f64) -> f64 {
    energy * EV / HBAR / FREQUENCY_SCALE
}

#[must_use]
pub fn mev_to_scaled(energy: f64) -> f64 {
    energy * MEV / HBAR / FREQUENCY_SCALE
}

#[must_use]
pub fn mev_to_wavenumber(energy: f64) -> f64 {
    energy * MEV_TO_WAVENUMBER
}

impl ScaledInputs {
    /// Convert a run configuration and its mode table into the dimensionless
    /// inputs of the integrator.
    ///
    /// # Errors
    ///
    /// Returns an error if the converted inputs fail validation
    pub fn from_physical(config: &RunConfig, table: &ModeTable) -> Result<Self> {
        let beta_scaled = scaled_beta(config.temperature);
        let modes = table
            .modes
            .iter()
            .map(|m| Mode::new(m.huang_rhys, m.omega, m.omega_excited, beta_scaled))
            .collect();
        let params = QuadratureParams {
            step: QuadratureParams::step_from_count(config.n_steps),
            log_limit: QuadratureParams::log_limit_from_limit(config.limit),
            decay_rate: mev_to_scaled(config.decay_rate),
            smearing: mev_to_scaled(config.smearing),
            mid_level: ev_to_scaled(config.mid_level),
            n_exp_steps: config.n_exp_steps,
        };
        ScaledInputs::new(
            modes,
            config.energy_shifts.iter().copied().map(mev_to_scaled).collect(),
            config.laser_energies.iter().copied().map(ev_to_scaled).collect(),
            params,
        )
    }
}
