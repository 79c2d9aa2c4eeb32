use thiserror::Error;

/// Failure taxonomy for remote-collection operations.
///
/// Every operation reports exactly one of these; presentation (CLI output,
/// log lines) is layered on top and nothing here is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("network_failure - {0}")]
    Network(String),
    #[error("server_rejected - unexpected status {status}")]
    ServerRejected { status: u16 },
    #[error("not_found - {0}")]
    NotFound(String),
    #[error("busy - {0}")]
    Busy(String),
    #[error("invalid_input - {0}")]
    InvalidInput(String),
    #[error("invalid_data - {0}")]
    InvalidData(String),
}

impl SyncError {
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::Network(message.into())
    }

    pub fn server_rejected(status: u16) -> Self {
        Self::ServerRejected { status }
    }

    pub fn not_found<M: Into<String>>(message: M) -> Self {
        Self::NotFound(message.into())
    }

    pub fn busy<M: Into<String>>(message: M) -> Self {
        Self::Busy(message.into())
    }

    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "network_failure",
            Self::ServerRejected { .. } => "server_rejected",
            Self::NotFound(_) => "not_found",
            Self::Busy(_) => "busy",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
