//! Error types for the log shipping pipeline

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Dialing the daemon endpoint failed
    #[error("Failed to connect to '{endpoint}': {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// Socket I/O failure while talking to the daemon
    #[error("Transport error while {operation}: {source}")]
    Transport {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// No socket is currently open
    #[error("Transport is not connected")]
    NotConnected,

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Serialized record does not fit in a frame
    #[error("Serialized record is {size} bytes, frame size is {max}")]
    FrameTooLarge { size: usize, max: usize },

    /// Daemon answered `NO`
    #[error("Daemon rejected the frame")]
    AckRejected,

    /// Daemon answered with something other than `OK` or `NO`
    #[error("Unrecognized acknowledgement token {token:?}")]
    Protocol { token: [u8; 2] },

    /// Transport panicked while a worker held the record
    #[error("Worker panicked while sending: {0}")]
    WorkerPanicked(String),

    /// Logger already stopped
    #[error("Logger already stopped")]
    LoggerStopped,

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a connection error for an endpoint
    pub fn connection(endpoint: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::Connection {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Create a transport error with the operation that failed
    pub fn transport(operation: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::Transport {
            operation: operation.into(),
            source,
        }
    }

    /// Create a frame size error
    pub fn frame_too_large(size: usize, max: usize) -> Self {
        LoggerError::FrameTooLarge { size, max }
    }

    /// Whether another attempt at the same frame can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LoggerError::Transport { .. }
                | LoggerError::NotConnected
                | LoggerError::AckRejected
                | LoggerError::Protocol { .. }
                | LoggerError::Connection { .. }
                | LoggerError::Io(_)
        )
    }

    /// Whether the stream is unusable after this error and must be re-dialed
    ///
    /// A clean `NO` leaves the stream in sync; an unknown token does not.
    pub fn breaks_connection(&self) -> bool {
        matches!(
            self,
            LoggerError::Transport { .. }
                | LoggerError::NotConnected
                | LoggerError::Protocol { .. }
                | LoggerError::Connection { .. }
                | LoggerError::Io(_)
        )
    }
}
