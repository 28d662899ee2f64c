//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for question-store operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing / serialization errors.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Malformed or missing required input fields, detected before any
    /// external call.
    #[error("validation error: {0}")]
    Validation(String),

    /// The external embedding call failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] embedding_service::EmbeddingServiceError),

    /// Mismatch between a produced vector and the configured dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// No embedding provider was supplied where one is required.
    #[error("missing embedding and no provider supplied")]
    MissingEmbedding,

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),
}
