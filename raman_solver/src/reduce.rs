use ndarray::Array2;
use num_complex::Complex;
#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// One worker's running sum, indexed `[shift, laser]`.
#[derive(Clone, Debug, PartialEq)]
pub struct PartialSum {
    sums: Array2<Complex<f64>>,
}

impl PartialSum {
    #[must_use]
    pub fn zeros(n_shifts: usize, n_lasers: usize) -> Self {
        PartialSum {
            sums: Array2::zeros([n_shifts, n_lasers]),
        }
    }

    #[must_use]
    pub fn from_array(sums: Array2<Complex<f64>>) -> Self {
        PartialSum { sums }
    }

    #[must_use]
    pub fn get(&self, shift: usize, laser: usize) -> Complex<f64> {
        self.sums[[shift, laser]]
    }

    #[must_use]
    pub fn as_array(&self) -> &Array2<Complex<f64>> {
        &self.sums
    }

    pub(crate) fn as_array_mut(&mut self) -> &mut Array2<Complex<f64>> {
        &mut self.sums
    }
}

/// The reduced, scaled result, indexed `[shift, laser]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct GlobalSum {
    values: Array2<Complex<f64>>,
}

impl GlobalSum {
    /// Sum the partial sums in the order given (ascending rank), then scale by
    /// `2 step^3`.
    ///
    /// `step^3` turns the discrete triple sum into a midpoint-rule integral;
    /// the extra factor of two accounts for integrating only the positive half
    /// of the time axis.
    ///
    /// # Panics
    ///
    /// Will panic if the partial sums do not all share one shape, or if there
    /// are none
    #[must_use]
    pub fn reduce<I: IntoIterator<Item = PartialSum>>(partials: I, step: f64) -> Self {
        let mut iter = partials.into_iter();
        let mut total = iter
            .next()
            .expect("reduction needs at least one partial sum")
            .sums;
        for partial in iter {
            assert_eq!(total.shape(), partial.sums.shape());
            total += &partial.sums;
        }
        total *= Complex {
            re: 2.0 * step.powi(3),
            im: 0f64,
        };
        GlobalSum { values: total }
    }

    #[must_use]
    pub fn get(&self, shift: usize, laser: usize) -> Complex<f64> {
        self.values[[shift, laser]]
    }

    #[must_use]
    pub fn as_array(&self) -> &Array2<Complex<f64>> {
        &self.values
    }

    /// Normalized intensities, the real part of each entry.
    #[must_use]
    pub fn intensities(&self) -> Array2<f64> {
        self.values.map(|v| v.re)
    }
}
