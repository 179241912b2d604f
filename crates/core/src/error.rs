use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("malformed ID")]
    MalformedId,

    #[error("malformed event ID")]
    MalformedEventId,

    #[error("failed to encode entry: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    #[error("entropy source unavailable: {reason}")]
    EntropyUnavailable { reason: String },

    #[error("cipher initialization failed")]
    CipherInit,

    #[error("sink is closed")]
    SinkClosed,

    #[error("invalid configuration: {var} {reason}")]
    InvalidConfig { var: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, TraceError>;
