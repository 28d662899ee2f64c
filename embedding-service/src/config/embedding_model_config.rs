use crate::config::embedding_provider::EmbeddingProvider;

/// Configuration for an embedding model invocation.
///
/// The model identifier and encoding format are fixed configuration of the
/// deployment, never per-call parameters: the vector index a deployment
/// writes to is created for one dimensionality, and that dimensionality is a
/// property of the configured model.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingModelConfig {
    /// The embeddings backend.
    pub provider: EmbeddingProvider,

    /// Model identifier string (e.g., `"text-embedding-3-small"`).
    pub model: String,

    /// Inference endpoint base URL (remote API or a compatible local server).
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// Wire encoding of the returned vector (`"float"` for plain JSON arrays).
    pub encoding_format: String,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
