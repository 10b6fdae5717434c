//! fvavg-io: spreadsheet read/write primitives shared by the ingester,
//! the engine's persistence stage, and the consolidator.
//!
//! Reading goes through `calamine` (uniform across .xlsx/.xls/.xlsb/.ods);
//! writing goes through `rust_xlsxwriter`. Neither the sheet/column schema
//! of a particular input form nor the workbook schema FVAvg or the
//! consolidator emit lives here — this crate only knows how to get cells
//! in and out of a workbook.

mod error;
mod reader;
mod writer;

pub use error::*;
pub use reader::*;
pub use writer::*;

/// Re-exported so callers can match on cell contents without depending on
/// `calamine` directly.
pub use calamine::Data;
pub type Range = calamine::Range<Data>;
