//! fvavg-ingest: turns one input spreadsheet into the three numeric
//! sequences the engine consumes (§4.1).

mod error;
mod formatted;
mod raw;
mod subject_id;

pub use error::*;
pub use formatted::*;
pub use raw::*;
pub use subject_id::*;

use std::path::Path;

use fvavg_core::Recording;
use fvavg_io::WorkbookReader;
use log::info;

/// Which sheet layout an input file uses (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// Linear scan of marker-delimited flow/volume blocks in column A.
    Raw,
    /// Header row `Time, Vol, Flow`.
    Formatted,
}

/// Open `path` and ingest its first sheet under the given mode.
pub fn ingest_file(path: &Path, mode: IngestMode) -> IngestResult<Recording> {
    let mut reader = WorkbookReader::open(path)?;
    let first = reader
        .sheet_names()
        .into_iter()
        .next()
        .ok_or(fvavg_io::IoError::NoSheets)?;
    let range = reader.sheet(&first)?;

    let recording = match mode {
        IngestMode::Raw => raw::ingest_raw(&range)?,
        IngestMode::Formatted => formatted::ingest_formatted(&range)?,
    };

    info!(
        "ingested {} samples from {} ({:?}, dt={})",
        recording.len(),
        path.display(),
        mode,
        recording.dt
    );
    Ok(recording)
}
