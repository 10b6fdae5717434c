use fvavg_core::FvavgError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("no recognizable flow/volume blocks found in raw file")]
    NoColumns,

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("time/volume/flow columns have mismatched lengths")]
    ColumnLengthMismatch,

    #[error(transparent)]
    Io(#[from] fvavg_io::IoError),
}

pub type IngestResult<T> = Result<T, IngestError>;

impl From<IngestError> for FvavgError {
    fn from(e: IngestError) -> Self {
        FvavgError::Read(e.to_string())
    }
}
