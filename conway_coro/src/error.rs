// error.rs - Engine error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("cannot split {rows} rows between {workers} workers")]
    TooManyWorkers { workers: usize, rows: usize },
    #[error("input stream holds {actual} cells, expected {expected}")]
    InputLength { expected: usize, actual: usize },
    #[error("input {0} was not delivered")]
    InputUnavailable(String),
    #[error("i/o collaborator hung up")]
    IoClosed,
    #[error("event stream receiver was dropped")]
    EventsClosed,
    #[error("worker task failed: {0}")]
    WorkerFailed(#[from] tokio::task::JoinError),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
