use std::ops::Range;

use log::debug;
use ndarray::{Array1, Array2};
use num_complex::Complex;

use crate::{
    context::ScaledInputs,
    exp_table::ExponentialTable,
    lineshape::{detuning_fraction, lineshape, thermal_fraction},
    partition::IntegrationDomain,
    reduce::PartialSum,
};

/// Per-mode factors that depend only on the outer and middle points.
struct ModeFactors {
    exp_x: Vec<Complex<f64>>,
    exp_y: Vec<Complex<f64>>,
    fraction: Vec<Complex<f64>>,
}

/// Evaluates the truncated triple sum over an owned range of outer indices.
pub struct Integrator<'a> {
    inputs: &'a ScaledInputs,
    table: &'a ExponentialTable,
    domain: IntegrationDomain,
}

impl<'a> Integrator<'a> {
    #[must_use]
    pub fn new(inputs: &'a ScaledInputs, table: &'a ExponentialTable) -> Self {
        Integrator {
            inputs,
            table,
            domain: IntegrationDomain::new(inputs.params()),
        }
    }

    #[must_use]
    pub fn domain(&self) -> &IntegrationDomain {
        &self.domain
    }

    /// The outer x-sum over `outer`, one entry per `[shift, laser]`.
    ///
    /// An empty range yields an all-zero partial sum. When `report_progress`
    /// is set each outer index is logged as it starts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn integrate(&self, outer: Range<usize>, report_progress: bool) -> PartialSum {
        let params = self.inputs.params();
        let modes = self.inputs.modes();
        let detunings = self.laser_detunings();

        let mut partial = PartialSum::zeros(self.inputs.n_shifts(), self.inputs.n_lasers());
        let mut factors = ModeFactors {
            exp_x: vec![Complex::default(); modes.len()],
            exp_y: vec![Complex::default(); modes.len()],
            fraction: vec![Complex::default(); modes.len()],
        };

        for j in outer {
            if report_progress {
                debug!("outer index {j} of {}", self.domain.j_max());
            }
            let x = (j as f64 + 0.5) * params.step;
            for (e, mode) in factors.exp_x.iter_mut().zip(modes) {
                *e = Complex::from_polar(1.0, mode.omega_excited * x);
            }

            let y_sum = self.integrate_middle(j, x, &detunings, &mut factors);

            for ((mut column, y_column), &nu) in partial
                .as_array_mut()
                .columns_mut()
                .into_iter()
                .zip(y_sum.columns())
                .zip(&detunings)
            {
                let decay = (-Complex::new(params.decay_rate, -nu) * x).exp();
                column.zip_mut_with(&y_column, |s, &v| *s += v * decay);
            }
        }
        partial
    }

    /// `laser - mid_level` for each laser energy.
    fn laser_detunings(&self) -> Vec<f64> {
        let mid_level = self.inputs.params().mid_level;
        self.inputs
            .laser_energies()
            .iter()
            .map(|laser| laser - mid_level)
            .collect()
    }

    /// The y-sum for a fixed outer index, indexed `[shift, laser]`.
    #[allow(clippy::cast_precision_loss)]
    fn integrate_middle(
        &self,
        j: usize,
        x: f64,
        detunings: &[f64],
        factors: &mut ModeFactors,
    ) -> Array2<Complex<f64>> {
        let params = self.inputs.params();
        let modes = self.inputs.modes();
        let mut y_sum = Array2::zeros([self.inputs.n_shifts(), detunings.len()]);

        for k in 0..=self.domain.k_max(j) {
            let y = (k as f64 + 0.5) * params.step;
            let mut prefactor = Complex::new(1.0, 0.0);
            for (m, mode) in modes.iter().enumerate() {
                factors.exp_y[m] = Complex::from_polar(1.0, -mode.omega_excited * y);
                factors.fraction[m] = detuning_fraction(mode.detuning, mode.thermal, x - y);
                prefactor *= thermal_fraction(mode.detuning, mode.thermal, x - y);
            }

            let t_sum = self.integrate_time(self.domain.inner_count(j, k), factors);

            for (mut column, &nu) in y_sum.columns_mut().into_iter().zip(detunings) {
                let weight = (-Complex::new(params.decay_rate, nu) * y).exp() * prefactor;
                column.zip_mut_with(&t_sum, |s, &v| *s += v * weight);
            }
        }
        y_sum
    }

    /// The t-sum over `0..=last`, one entry per energy shift.
    #[allow(clippy::cast_precision_loss)]
    fn integrate_time(&self, last: usize, factors: &ModeFactors) -> Array1<Complex<f64>> {
        let params = self.inputs.params();
        let modes = self.inputs.modes();
        let shifts = self.inputs.energy_shifts();
        let mut t_sum = Array1::zeros(shifts.len());

        for l in 0..=last {
            let t = (l as f64 + 0.5) * params.step;
            let phase = modes
                .iter()
                .zip(&factors.exp_x)
                .zip(&factors.exp_y)
                .zip(&factors.fraction)
                .map(|(((mode, &exp_x), &exp_y), &fraction)| {
                    let exp_t = self.table.cis(-mode.omega * t);
                    lineshape(exp_t, exp_x, exp_y, fraction) * mode.huang_rhys
                })
                .sum::<Complex<f64>>();

            // e^{i phase - smearing |t|}, shared by every shift
            let common = (Complex::<f64>::i() * phase - params.smearing * t.abs()).exp();
            for (s, &shift) in t_sum.iter_mut().zip(shifts) {
                *s += common * Complex::from_polar(1.0, -shift * t);
            }
        }
        t_sum
    }
}
