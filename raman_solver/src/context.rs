use crate::error::{RamanError, Result};

/// A single vibrational mode, in scaled frequency units.
#[derive(Clone, Debug, PartialEq)]
pub struct Mode {
    /// Huang-Rhys factor `S_j`
    pub huang_rhys: f64,
    /// Ground state frequency `\omega_j`
    pub omega: f64,
    /// Excited state frequency `\omega_{nj}`
    pub omega_excited: f64,
    /// `\delta\omega = \omega_{nj} - \omega_j`
    pub detuning: f64,
    /// `\hbar \omega_j \beta`, dimensionless
    pub thermal: f64,
    /// `e^{thermal / 2} / (e^{thermal} - 1)`, the denominator of every
    /// per-mode thermal fraction, evaluated as `e^{-thermal / 2} / (1 - e^{-thermal})`
    pub thermal_norm: f64,
}

impl Mode {
    /// Build a mode, where `beta_scaled` is `\hbar \Omega_0 \beta` so that
    /// `beta_scaled * omega` is the dimensionless thermal factor.
    #[must_use]
    pub fn new(huang_rhys: f64, omega: f64, omega_excited: f64, beta_scaled: f64) -> Self {
        let thermal = beta_scaled * omega;
        Mode {
            huang_rhys,
            omega,
            omega_excited,
            detuning: omega_excited - omega,
            thermal,
            thermal_norm: (-0.5 * thermal).exp() / -(-thermal).exp_m1(),
        }
    }
}

/// Scalar controls of the quadrature, all dimensionless.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadratureParams {
    /// Integration step, `2\pi / n_steps`
    pub step: f64,
    /// `-ln(limit)`
    pub log_limit: f64,
    /// Decay rate of the x and y integrands
    pub decay_rate: f64,
    /// Smearing of the t integrand
    pub smearing: f64,
    /// Frequency of the intermediate electronic level
    pub mid_level: f64,
    /// Number of samples in one period of the exponential table
    pub n_exp_steps: usize,
}

impl QuadratureParams {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn step_from_count(n_steps: usize) -> f64 {
        std::f64::consts::TAU / n_steps as f64
    }

    #[must_use]
    pub fn log_limit_from_limit(limit: f64) -> f64 {
        -limit.ln()
    }
}

/// The read-only bundle every worker integrates against.
///
/// Built once, validated once, then shared by reference with every worker.
#[derive(Clone, Debug)]
pub struct ScaledInputs {
    modes: Vec<Mode>,
    energy_shifts: Vec<f64>,
    laser_energies: Vec<f64>,
    params: QuadratureParams,
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RamanError::InvalidParameter(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

impl ScaledInputs {
    /// # Errors
    ///
    /// Returns [`RamanError::InvalidParameter`] if any rate, step or limit is not
    /// strictly positive, if a list is empty, or if a mode has a non-positive
    /// thermal factor.
    pub fn new(
        modes: Vec<Mode>,
        energy_shifts: Vec<f64>,
        laser_energies: Vec<f64>,
        params: QuadratureParams,
    ) -> Result<Self> {
        check_positive("step", params.step)?;
        check_positive("log limit", params.log_limit)?;
        check_positive("decay rate", params.decay_rate)?;
        check_positive("smearing", params.smearing)?;
        if !params.mid_level.is_finite() {
            return Err(RamanError::InvalidParameter(
                "mid level must be finite".to_owned(),
            ));
        }
        if params.n_exp_steps == 0 {
            return Err(RamanError::InvalidParameter(
                "exponential table needs at least one step".to_owned(),
            ));
        }
        if modes.is_empty() {
            return Err(RamanError::InvalidParameter("no modes".to_owned()));
        }
        if energy_shifts.is_empty() {
            return Err(RamanError::InvalidParameter("no energy shifts".to_owned()));
        }
        if laser_energies.is_empty() {
            return Err(RamanError::InvalidParameter("no laser energies".to_owned()));
        }
        for (i, mode) in modes.iter().enumerate() {
            check_positive(&format!("thermal factor of mode {}", i + 1), mode.thermal)?;
            if !(mode.huang_rhys.is_finite() && mode.omega_excited.is_finite()) {
                return Err(RamanError::InvalidParameter(format!(
                    "mode {} is not finite",
                    i + 1
                )));
            }
        }
        if let Some(e) = energy_shifts
            .iter()
            .chain(&laser_energies)
            .find(|e| !e.is_finite())
        {
            return Err(RamanError::InvalidParameter(format!(
                "energy {e} is not finite"
            )));
        }

        Ok(ScaledInputs {
            modes,
            energy_shifts,
            laser_energies,
            params,
        })
    }

    #[must_use]
    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    #[must_use]
    pub fn energy_shifts(&self) -> &[f64] {
        &self.energy_shifts
    }

    #[must_use]
    pub fn laser_energies(&self) -> &[f64] {
        &self.laser_energies
    }

    #[must_use]
    pub fn params(&self) -> &QuadratureParams {
        &self.params
    }

    #[must_use]
    pub fn n_shifts(&self) -> usize {
        self.energy_shifts.len()
    }

    #[must_use]
    pub fn n_lasers(&self) -> usize {
        self.laser_energies.len()
    }
}
