//! Error types shared across Vidmark crates.

use std::path::PathBuf;

/// Top-level error type for Vidmark operations.
#[derive(Debug, thiserror::Error)]
pub enum VidmarkError {
    /// The input video could not be opened or probed. Fatal: raised before
    /// any frame is processed.
    #[error("Source open error: {message}")]
    SourceOpen { message: String },

    /// The output target could not be created. Fatal: raised before any
    /// frame is processed.
    #[error("Sink open error: {message}")]
    SinkOpen { message: String },

    /// A read or write fault in the middle of an open stream. The pipeline
    /// treats read faults as premature end-of-stream, not as a crash.
    #[error("Stream error: {message}")]
    Stream { message: String },

    /// An analysis failure surfaced past the pipeline boundary. Inside the
    /// frame loop analysis failures are contained and never reach here.
    #[error("Analysis error: {message}")]
    Analysis { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using VidmarkError.
pub type VidmarkResult<T> = Result<T, VidmarkError>;

impl VidmarkError {
    pub fn source_open(msg: impl Into<String>) -> Self {
        Self::SourceOpen {
            message: msg.into(),
        }
    }

    pub fn sink_open(msg: impl Into<String>) -> Self {
        Self::SinkOpen {
            message: msg.into(),
        }
    }

    pub fn stream(msg: impl Into<String>) -> Self {
        Self::Stream {
            message: msg.into(),
        }
    }

    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}
