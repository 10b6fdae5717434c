//! fvavg-core: shared types and error taxonomy for the FVAvg pipeline.
//!
//! This crate holds the structures threaded through every stage of the
//! pipeline implemented in `fvavg-engine`: raw recordings, breath phases,
//! per-breath resampled bundles, and the aggregated loops produced by the
//! averaging stage. Nothing here touches files or spreadsheets — that is
//! `fvavg-io`'s job.

mod breath;
mod error;
mod loop_stats;
mod phase;
mod sample;

pub use breath::*;
pub use error::*;
pub use loop_stats::*;
pub use phase::*;
pub use sample::*;
