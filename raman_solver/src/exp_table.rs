use num_complex::Complex;

/// Unit complex exponentials `e^{i\theta}` sampled uniformly over one period.
///
/// Lookups linearly interpolate between neighbouring samples, so the error of
/// [`ExponentialTable::cis`] falls as `1 / n_steps^2`. The table holds
/// `n_steps + 2` samples: the extra sample past `2\pi` lets a phase whose
/// reduced position rounds up to exactly one period still read `table[i + 1]`.
#[derive(Clone, Debug)]
pub struct ExponentialTable {
    samples: Vec<Complex<f64>>,
    n_steps: usize,
}

impl ExponentialTable {
    /// # Panics
    ///
    /// Will panic if `n_steps` is zero
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(n_steps: usize) -> Self {
        assert!(n_steps > 0, "exponential table needs at least one step");
        let step = std::f64::consts::TAU / n_steps as f64;
        let samples = (0..n_steps + 2)
            .map(|n| Complex::from_polar(1.0, n as f64 * step))
            .collect();
        ExponentialTable { samples, n_steps }
    }

    #[must_use]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Approximate `e^{i\theta}` for any real `theta`.
    #[inline]
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn cis(&self, theta: f64) -> Complex<f64> {
        let periods = theta / std::f64::consts::TAU;
        let position = (periods - periods.floor()) * self.n_steps as f64;
        let index = position.floor();
        let frac = position - index;
        let index = index as usize;
        self.samples[index] * (1.0 - frac) + self.samples[index + 1] * frac
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand_distr::Uniform;

    use super::ExponentialTable;

    fn max_error(table: &ExponentialTable, thetas: &[f64]) -> f64 {
        thetas
            .iter()
            .map(|&theta| (table.cis(theta) - num_complex::Complex::from_polar(1.0, theta)).norm())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_exact_at_samples() {
        let n = 360;
        let table = ExponentialTable::new(n);
        for i in 0..n {
            #[allow(clippy::cast_precision_loss)]
            let theta = std::f64::consts::TAU * i as f64 / n as f64;
            let expected = num_complex::Complex::from_polar(1.0, theta);
            assert!((table.cis(theta) - expected).norm() < 1e-12);
        }
    }

    #[test]
    fn test_periodic_and_negative_phases() {
        let table = ExponentialTable::new(10_000);
        for &theta in &[-1e-20, -0.3, -7.0, 1e3, -1e3, 2.0 * std::f64::consts::TAU] {
            let expected = num_complex::Complex::from_polar(1.0, theta);
            assert!((table.cis(theta) - expected).norm() < 1e-6);
        }
    }

    #[test]
    fn test_interpolation_error_converges_quadratically() {
        let rng = rand::thread_rng();
        let thetas = rng
            .sample_iter(Uniform::new(-50.0, 50.0))
            .take(20_000)
            .collect::<Vec<f64>>();

        let coarse = max_error(&ExponentialTable::new(64), &thetas);
        let fine = max_error(&ExponentialTable::new(128), &thetas);

        // The chord sags by at most h^2 / 8 below the unit circle
        let h = std::f64::consts::TAU / 64.0;
        assert!(coarse <= 1.01 * h * h / 8.0);
        let ratio = coarse / fine;
        assert!(ratio > 3.5 && ratio < 4.5, "ratio was {ratio}");
    }
}
