use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Capacity exceeded: {required} bits required, {available} bits available")]
    CapacityExceeded { required: u64, available: u64 },

    #[error("Insufficient capacity: frame declares {required} bits, image holds {available}")]
    InsufficientCapacity { required: u64, available: u64 },

    #[error("Invalid message length: {0}")]
    InvalidLength(u64),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Master key not configured")]
    KeyNotConfigured,

    #[error("Crypto failure: {0}")]
    CryptoFailure(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Crypto unavailable: {0}")]
    CryptoUnavailable(String),
}

pub type Result<T> = std::result::Result<T, StegError>;
