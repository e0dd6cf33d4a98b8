#![warn(clippy::pedantic)]

pub mod config;
pub mod context;
pub mod error;
pub mod exp_table;
pub mod group;
pub mod integrator;
pub mod lineshape;
pub mod partition;
pub mod reduce;
pub mod report;
pub mod units;

pub use config::{ModeTable, RunConfig};
pub use context::{Mode, QuadratureParams, ScaledInputs};
pub use error::{RamanError, Result};
pub use group::{compute_intensities, WorkerGroup};
pub use reduce::GlobalSum;
