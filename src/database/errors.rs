use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),
    #[error("Record not found")]
    NotFound,
    #[error("Transport failure: {0}")]
    TransportFailure(String),
    #[error("Request failed with status {status}: {body}")]
    StatusError { status: u16, body: String },
    #[error("Conflicting record: {0}")]
    Conflict(String),
    #[error("Decode error: {0}")]
    DecodeError(String),
}
