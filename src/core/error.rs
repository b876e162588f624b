//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The arena could not satisfy a request even after a forced flush
    #[error(
        "Log arena exhausted: could not reserve {requested} bytes of {capacity} even after a forced flush"
    )]
    ArenaExhausted { requested: usize, capacity: usize },

    /// A buffer was released out of allocation order
    #[error("Arena buffers must be released oldest first: expected offset {expected}, got {found}")]
    ReleaseOrderViolation { expected: usize, found: usize },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File lock error
    #[error("Failed to acquire file lock on '{path}'")]
    FileLockError { path: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// The background flush worker panicked
    #[error("Flush worker panicked: {0}")]
    WorkerPanicked(String),

    /// The process-wide logger was already installed
    #[error("Global logger already initialized")]
    AlreadyInitialized,

    /// Teardown found other live handles, so the worker could not be joined
    #[error("Logger still has {handles} other handle(s): queue flushed, worker left running")]
    StillShared { handles: usize },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn arena_exhausted(requested: usize, capacity: usize) -> Self {
        LoggerError::ArenaExhausted {
            requested,
            capacity,
        }
    }

    pub fn release_order(expected: usize, found: usize) -> Self {
        LoggerError::ReleaseOrderViolation { expected, found }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn file_lock(path: impl Into<String>) -> Self {
        LoggerError::FileLockError { path: path.into() }
    }

    /// Failure reported by a sink's own output
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }
}
