//! fvavg-engine: the FVAvg pipeline itself (§2-§6) — zero-crossing
//! detection, phase trimming, breath peeling, both resampling schemes,
//! normalization, cross-breath aggregation, and persistence of the fixed
//! output workbook schema.

mod aggregate;
mod config;
mod peel;
mod persist;
mod pipeline;
mod time_bins;
mod trim;
mod volume_bins;
mod zero_cross;

pub use aggregate::*;
pub use config::*;
pub use peel::*;
pub use persist::*;
pub use pipeline::*;
pub use time_bins::*;
pub use trim::*;
pub use volume_bins::*;
pub use zero_cross::*;
