//! Per-mode pieces of the integrand.
//!
//! For mode `j` at the point `(x, y, t)` the lineshape is
//!
//! ```latex
//! F_j = \sin(\omega_j t) + \sin(\omega_{nj} x - \omega_j t) - \sin(\omega_{nj} y + \omega_j t)
//!       - \sin(\omega_{nj} (x - y) - \omega_j t) - \sin(\omega_{nj} x) + \sin(\omega_{nj} y)
//!     + c_j [2 - \cos(\omega_j t) + \cos(\omega_{nj} x - \omega_j t) + \cos(\omega_{nj} y + \omega_j t)
//!       - \cos(\omega_{nj} (x - y) - \omega_j t) - \cos(\omega_{nj} x) - \cos(\omega_{nj} y)]
//! ```
//!
//! with `\omega_j` the ground state and `\omega_{nj}` the excited state
//! frequency, and `c_j` the [`detuning_fraction`]. The phase of the time
//! integrand is `\sum_j S_j F_j`.
use num_complex::Complex;

/// The lineshape `F_j` of one mode, from three precomputed phase factors.
///
/// * `exp_t = e^{-i\omega_j t}` (from the exponential table)
/// * `exp_x = e^{i\omega_{nj} x}`
/// * `exp_y = e^{-i\omega_{nj} y}`
///
/// Expanding
///
/// ```latex
/// E = -e^{-i\omega_j t}(1 - e^{i\omega_{nj} x})(1 - e^{-i\omega_{nj} y})
///     - (e^{i\omega_{nj} x} + e^{-i\omega_{nj} y})
///   = -e^{-i\omega_j t} + e^{i(\omega_{nj} x - \omega_j t)} + e^{-i(\omega_{nj} y + \omega_j t)}
///     - e^{i(\omega_{nj} (x - y) - \omega_j t)} - e^{i\omega_{nj} x} - e^{-i\omega_{nj} y}
/// ```
///
/// gives `Im(E)` equal to the sine bracket of `F_j` and `Re(2 + E)` equal to the
/// cosine bracket, so `F_j = Im(E) + c_j Re(2 + E)`. The six sines and six
/// cosines of the lineshape therefore cost two complex products and no
/// trigonometric calls.
#[inline]
#[must_use]
pub fn lineshape(
    exp_t: Complex<f64>,
    exp_x: Complex<f64>,
    exp_y: Complex<f64>,
    detuning_fraction: Complex<f64>,
) -> Complex<f64> {
    let one = Complex::new(1.0, 0.0);
    let combined = -exp_t * (one - exp_x) * (one - exp_y) - (exp_x + exp_y);
    combined.im + detuning_fraction * (2.0 + combined.re)
}

/// `c_j = \sin\theta / (1 - \cos\theta) = \cot(\theta / 2)` with
/// `\theta = \delta\omega (x - y) - i \hbar\omega_j\beta`.
///
/// The prefactor of the cosine bracket of [`lineshape`]. Evaluated as
/// `i (1 + w) / (1 - w)` with `w = e^{-i\theta}`, `|w| = e^{-\hbar\omega_j\beta} < 1`,
/// which stays finite however cold the mode is.
#[inline]
#[must_use]
pub fn detuning_fraction(detuning: f64, thermal: f64, x_minus_y: f64) -> Complex<f64> {
    let w = Complex::new(-thermal, -detuning * x_minus_y).exp();
    Complex::<f64>::i() * (1.0 + w) / (1.0 - w)
}

/// `e^{\theta/2} / (e^\theta - 1)` with `\theta = \hbar\omega_j\beta + i \delta\omega (x - y)`,
/// divided by its value at `x = y` (see [`Mode::thermal_norm`](crate::context::Mode)).
///
/// Both are rewritten with `e^{-\theta}`, so the ratio is
/// `e^{-i\delta\omega (x - y) / 2} (1 - e^{-\hbar\omega_j\beta}) / (1 - e^{-\theta})`.
#[inline]
#[must_use]
pub fn thermal_fraction(detuning: f64, thermal: f64, x_minus_y: f64) -> Complex<f64> {
    let phase = detuning * x_minus_y;
    let theta = Complex::new(thermal, phase);
    Complex::from_polar(-(-thermal).exp_m1(), -0.5 * phase) / (1.0 - (-theta).exp())
}

#[cfg(test)]
mod tests {
    use num_complex::Complex;
    use rand::Rng;

    use super::{detuning_fraction, lineshape, thermal_fraction};

    fn lineshape_by_trig(
        omega: f64,
        omega_n: f64,
        (x, y, t): (f64, f64, f64),
        fraction: Complex<f64>,
    ) -> Complex<f64> {
        let (wt, wx, wy) = (omega * t, omega_n * x, omega_n * y);
        let sines = wt.sin() + (wx - wt).sin() - (wy + wt).sin() - (wx - wy - wt).sin() - wx.sin()
            + wy.sin();
        let cosines = 2.0 - wt.cos() + (wx - wt).cos() + (wy + wt).cos()
            - (wx - wy - wt).cos()
            - wx.cos()
            - wy.cos();
        sines + fraction * cosines
    }

    #[test]
    fn test_lineshape_matches_trig_expansion() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let omega = rng.gen_range(0.1..5.0);
            let omega_n = rng.gen_range(0.1..5.0);
            let x = rng.gen_range(0.0..10.0);
            let y = rng.gen_range(0.0..10.0);
            let t = rng.gen_range(0.0..10.0);
            let fraction = Complex::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));

            let actual = lineshape(
                Complex::from_polar(1.0, -omega * t),
                Complex::from_polar(1.0, omega_n * x),
                Complex::from_polar(1.0, -omega_n * y),
                fraction,
            );
            let expected = lineshape_by_trig(omega, omega_n, (x, y, t), fraction);
            assert!((actual - expected).norm() < 1e-10);
        }
    }

    #[test]
    fn test_lineshape_vanishes_at_origin() {
        let one = Complex::new(1.0, 0.0);
        let fraction = Complex::new(0.3, -0.7);
        assert!(lineshape(one, one, one, fraction).norm() < 1e-15);
    }

    #[test]
    fn test_detuning_fraction_is_half_angle_cotangent() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let detuning = rng.gen_range(-1.0..1.0);
            let thermal = rng.gen_range(0.1..5.0);
            let x_minus_y = rng.gen_range(-10.0..10.0);
            let half = Complex::new(detuning * x_minus_y, -thermal) / 2.0;
            let expected = half.cos() / half.sin();
            let actual = detuning_fraction(detuning, thermal, x_minus_y);
            assert!((actual - expected).norm() < 1e-9 * expected.norm().max(1.0));
        }
    }

    #[test]
    fn test_thermal_fraction_is_one_without_detuning() {
        let thermal = 0.8;
        for &x_minus_y in &[-3.0, 0.0, 2.5] {
            let value = thermal_fraction(0.0, thermal, x_minus_y);
            assert!((value - 1.0).norm() < 1e-12);
        }
        let value = thermal_fraction(0.4, thermal, 0.0);
        assert!((value - 1.0).norm() < 1e-12);
    }

    #[test]
    fn test_thermal_fraction_matches_direct_ratio() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let detuning = rng.gen_range(-1.0..1.0);
            let thermal: f64 = rng.gen_range(0.1..5.0);
            let x_minus_y = rng.gen_range(-10.0..10.0);
            let theta = Complex::new(thermal, detuning * x_minus_y);
            let norm = (0.5 * thermal).exp() / thermal.exp_m1();
            let expected = (0.5 * theta).exp() / (theta.exp() - 1.0) / norm;
            let actual = thermal_fraction(detuning, thermal, x_minus_y);
            assert!((actual - expected).norm() < 1e-10 * expected.norm().max(1.0));
        }
    }

    #[test]
    fn test_fractions_stay_finite_for_cold_modes() {
        for &thermal in &[50.0, 800.0, 1.0e4] {
            for &x_minus_y in &[-7.0, 0.0, 3.5] {
                let fraction = detuning_fraction(-0.1, thermal, x_minus_y);
                assert!((fraction - Complex::new(0.0, 1.0)).norm() < 1e-9);
                let value = thermal_fraction(-0.1, thermal, x_minus_y);
                assert!(value.re.is_finite() && value.im.is_finite());
                assert!((value.norm() - 1.0).abs() < 1e-9);
            }
        }
    }
}
