/*!
 * Error types for the farasa-rs application.
 *
 * This module contains custom error types for the different parts of the
 * wrapper, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when running one of the external Farasa tools
#[derive(Error, Debug)]
pub enum ToolError {
    /// The child process could not be started at all
    #[error("Failed to start {tool}: {message}")]
    Spawn {
        /// Display name of the tool
        tool: String,
        /// Reason reported by the operating system
        message: String,
    },

    /// The tool ran but exited with a non-zero status
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        /// Display name of the tool
        tool: String,
        /// Exit status as reported by the OS (`code 1`, `signal 9`, ...)
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// The tool did not finish within the configured timeout
    #[error("{tool} timed out after {secs}s")]
    TimedOut {
        /// Display name of the tool
        tool: String,
        /// Timeout that was exceeded
        secs: u64,
    },

    /// The tool exited successfully but never wrote the expected output file
    #[error("{tool} produced no output file at {path}")]
    MissingOutput {
        /// Display name of the tool
        tool: String,
        /// Output path that was requested
        path: String,
    },

    /// A file left at the output path could not be removed before the run
    #[error("Cannot remove previous output {path} for {tool}: {message}")]
    StaleOutput {
        /// Display name of the tool
        tool: String,
        /// Output path that was requested
        path: String,
        /// Underlying error message
        message: String,
    },
}

/// Errors that can occur while pre- or post-processing text around a tool call
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// The tagged output holds a different number of placeholders than spans were masked
    #[error("Span count mismatch: masked {expected} non-Arabic span(s) but found {found} placeholder(s) in tagged output")]
    SpanCountMismatch {
        /// Number of spans extracted before tagging
        expected: usize,
        /// Number of tagged placeholders located afterwards
        found: usize,
    },

    /// Reading or writing an intermediate file failed
    #[error("I/O error on {path}: {message}")]
    Io {
        /// File involved
        path: String,
        /// Underlying error message
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from an external tool
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Error from text processing
    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input path is neither a file nor a folder
    #[error("No such file or folder: {0}")]
    InputNotFound(String),

    /// Requested operation is not `segment` or `POS_tag`
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
