//! The shared error taxonomy (§7). Each downstream crate wraps these in
//! its own scoped error enum and converts up via `#[from]`, the way
//! `rf-file`/`rf-offline` compose in the parent project this crate is
//! descended from.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FvavgError {
    /// File missing, unreadable, or no recognizable columns/blocks.
    #[error("failed to read input: {0}")]
    Read(String),

    /// The trimmer could not find both a leading inspiration-starting pair
    /// and a trailing expiration-ending pair: the input has no full breath.
    #[error("no full breath found in recording")]
    NoFullBreath,

    /// `K <= 0` or `TLC <= 0`.
    #[error("invalid parameter: {0}")]
    Parameter(String),

    /// Output path not writable.
    #[error("failed to write output: {0}")]
    Write(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FvavgResult<T> = Result<T, FvavgError>;
