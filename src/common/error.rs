use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Malformed input on {channel}: {reason}")]
    MalformedInput { channel: &'static str, reason: String },

    #[error("Invalid map: {reason}")]
    InvalidMap { reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

impl DomainError {
    pub fn malformed(channel: &'static str, reason: impl Into<String>) -> Self {
        DomainError::MalformedInput {
            channel,
            reason: reason.into(),
        }
    }

    pub fn invalid_map(reason: impl Into<String>) -> Self {
        DomainError::InvalidMap {
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// A local endpoint could not be bound. Fatal: the control loop cannot run.
    #[error("Cannot bind endpoint {address}: {source}")]
    ResourceSetup {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
