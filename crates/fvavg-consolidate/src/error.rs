use fvavg_core::FvavgError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsolidateError {
    /// `find_column` could not locate one of the four required columns in
    /// an `Avg Vol Bin Data` sheet.
    #[error("missing required column in {file}: {which}")]
    MissingColumn { file: String, which: &'static str },

    #[error("TLC must be a positive real, got {0}")]
    InvalidTlc(f64),

    #[error(transparent)]
    Io(#[from] fvavg_io::IoError),
}

pub type ConsolidateResult<T> = Result<T, ConsolidateError>;

impl From<ConsolidateError> for FvavgError {
    fn from(e: ConsolidateError) -> Self {
        match e {
            ConsolidateError::InvalidTlc(v) => {
                FvavgError::Parameter(format!("TLC must be a positive real, got {v}"))
            }
            other => FvavgError::Read(other.to_string()),
        }
    }
}
