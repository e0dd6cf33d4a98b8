use std::ops::Range;

use crate::context::QuadratureParams;

/// The truncated `(x, y, t)` index space.
///
/// Outer (x) indices run over `0..=j_max`, middle (y) indices over
/// `0..=j_max - j`, and each `(j, k)` pair owns `inner_count(j, k)` steps of t.
/// Because the inner width shrinks as `j + k` grows, rows near `j = 0` carry far
/// more work than rows near `j_max`.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegrationDomain {
    j_max: usize,
    limit_in_steps: f64,
    decay_rate: f64,
    smearing: f64,
}

impl IntegrationDomain {
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(params: &QuadratureParams) -> Self {
        let limit_in_steps = params.log_limit / params.step;
        IntegrationDomain {
            j_max: (limit_in_steps / params.decay_rate).floor() as usize,
            limit_in_steps,
            decay_rate: params.decay_rate,
            smearing: params.smearing,
        }
    }

    /// Largest outer (and middle) index.
    #[must_use]
    pub fn j_max(&self) -> usize {
        self.j_max
    }

    /// Largest middle index for the outer index `j`.
    #[must_use]
    pub fn k_max(&self, j: usize) -> usize {
        self.j_max - j
    }

    /// `floor((log_limit / step - decay_rate (j + k)) / smearing)`, the last t
    /// index visited for the pair `(j, k)`.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn inner_count(&self, j: usize, k: usize) -> usize {
        let remaining = self.limit_in_steps - self.decay_rate * (j + k) as f64;
        (remaining / self.smearing).floor().max(0.0) as usize
    }

    /// Total inner work of one outer row.
    #[must_use]
    pub fn row_work(&self, j: usize) -> u64 {
        (0..=self.k_max(j))
            .map(|k| self.inner_count(j, k) as u64)
            .sum()
    }

    #[must_use]
    pub fn total_work(&self) -> u64 {
        (0..=self.j_max).map(|j| self.row_work(j)).sum()
    }

    /// The contiguous outer-index range owned by `rank` out of `n_workers`.
    ///
    /// Each worker calls this independently; since every rank walks the same
    /// cumulative sum they agree on the boundaries without communicating.
    ///
    /// # Panics
    ///
    /// Will panic if `rank >= n_workers`
    #[must_use]
    pub fn assign(&self, rank: usize, n_workers: usize) -> Range<usize> {
        WorkPartitioner::new(self).range(rank, n_workers)
    }
}

/// Cumulative row work of a domain, used to split the outer index between workers.
#[derive(Clone, Debug)]
pub struct WorkPartitioner {
    /// `cumulative[j] = sum_{j' <= j} row_work(j')`
    cumulative: Vec<u64>,
}

impl WorkPartitioner {
    #[must_use]
    pub fn new(domain: &IntegrationDomain) -> Self {
        let cumulative = (0..=domain.j_max())
            .scan(0u64, |acc, j| {
                *acc += domain.row_work(j);
                Some(*acc)
            })
            .collect();
        WorkPartitioner { cumulative }
    }

    #[must_use]
    pub fn total_work(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Worker `r` starts at the first row whose cumulative work reaches
    /// `r / n_workers` of the total and stops just before the row where worker
    /// `r + 1` starts. The last worker always ends at `j_max`, so trailing rows
    /// with no inner work are still owned. Ranges may be empty when there are
    /// more workers than units of work.
    ///
    /// # Panics
    ///
    /// Will panic if `rank >= n_workers`
    #[must_use]
    pub fn range(&self, rank: usize, n_workers: usize) -> Range<usize> {
        assert!(rank < n_workers, "rank {rank} out of {n_workers} workers");
        self.boundary(rank, n_workers)..self.boundary(rank + 1, n_workers)
    }

    /// First row reaching `part / n_parts` of the total work, or `j_max + 1`
    /// for the closing boundary.
    fn boundary(&self, part: usize, n_parts: usize) -> usize {
        if part == 0 {
            return 0;
        }
        if part == n_parts {
            return self.cumulative.len();
        }
        // cum * n_parts >= part * total, in exact integer arithmetic
        let target = u128::from(self.total_work()) * part as u128;
        self.cumulative
            .iter()
            .position(|&cum| u128::from(cum) * n_parts as u128 >= target)
            .unwrap_or(self.cumulative.len())
    }
}
