use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("failed to open workbook {0}: {1}")]
    Open(String, String),

    #[error("failed to read sheet {0}: {1}")]
    Sheet(String, String),

    #[error("workbook has no sheets")]
    NoSheets,

    #[error("failed to write sheet {0}: {1}")]
    Write(String, String),
}

pub type IoResult<T> = Result<T, IoError>;
