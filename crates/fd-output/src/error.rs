use fd_courier::FleetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// A courier could not be placed on the map for a snapshot.
    #[error("snapshot error: {0}")]
    Fleet(#[from] FleetError),
}

pub type OutputResult<T> = Result<T, OutputError>;
