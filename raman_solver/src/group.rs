use std::{sync::Barrier, thread};

use log::{debug, info};

use crate::{
    context::ScaledInputs,
    error::{RamanError, Result},
    exp_table::ExponentialTable,
    integrator::Integrator,
    partition::IntegrationDomain,
    reduce::{GlobalSum, PartialSum},
};

/// What one worker sees: its place in the group and the shared, read-only inputs.
pub struct WorkerContext<'a> {
    pub rank: usize,
    pub size: usize,
    pub inputs: &'a ScaledInputs,
    pub table: &'a ExponentialTable,
}

impl WorkerContext<'_> {
    /// Rank zero reports progress and owns the reduced result.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.rank == 0
    }

    /// Partition, wait for the whole group, then integrate the owned rows.
    fn run(&self, barrier: &Barrier) -> PartialSum {
        let integrator = Integrator::new(self.inputs, self.table);
        let range = integrator.domain().assign(self.rank, self.size);
        debug!(
            "worker {} of {} owns outer indices {:?}",
            self.rank, self.size, range
        );
        barrier.wait();
        integrator.integrate(range, self.is_root())
    }
}

/// A fixed-size group of workers sharing one snapshot of the inputs.
///
/// Workers are scoped threads; the inputs and the exponential table are built
/// once before any worker starts and are only ever read. Each worker computes its
/// own partition of the outer index, all workers meet at a barrier, and then
/// integrate independently. The partial sums come back through the join handles
/// and are reduced in ascending rank order.
///
/// The shared `&ScaledInputs` takes the place of broadcasting the inputs to
/// separate processes: every worker reads the same snapshot, already complete
/// before the group starts.
pub struct WorkerGroup {
    size: usize,
}

impl WorkerGroup {
    /// # Errors
    ///
    /// Returns [`RamanError::InvalidParameter`] for an empty group
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(RamanError::InvalidParameter(
                "a worker group needs at least one worker".to_owned(),
            ));
        }
        Ok(WorkerGroup { size })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Run every worker over `inputs` and reduce their partial sums.
    ///
    /// # Panics
    ///
    /// Will panic if any worker panics; there is no recovery from a lost worker
    #[must_use]
    pub fn run(&self, inputs: &ScaledInputs) -> GlobalSum {
        let table = ExponentialTable::new(inputs.params().n_exp_steps);
        let domain = IntegrationDomain::new(inputs.params());
        info!(
            "{} modes, {} shifts, {} lasers, j_max {}, total work {}, {} workers",
            inputs.modes().len(),
            inputs.n_shifts(),
            inputs.n_lasers(),
            domain.j_max(),
            domain.total_work(),
            self.size
        );

        let barrier = Barrier::new(self.size);
        let partials = thread::scope(|s| {
            let handles = (0..self.size)
                .map(|rank| {
                    let context = WorkerContext {
                        rank,
                        size: self.size,
                        inputs,
                        table: &table,
                    };
                    let barrier = &barrier;
                    s.spawn(move || context.run(barrier))
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect::<Vec<_>>()
        });

        info!("calculation finalized");
        GlobalSum::reduce(partials, inputs.params().step)
    }
}

/// Compute the scaled global sum with `n_workers` workers.
///
/// # Errors
///
/// Returns [`RamanError::InvalidParameter`] if `n_workers` is zero
pub fn compute_intensities(inputs: &ScaledInputs, n_workers: usize) -> Result<GlobalSum> {
    Ok(WorkerGroup::new(n_workers)?.run(inputs))
}
