/// Represents the backend used to compute embedding vectors.
///
/// Only OpenAI-compatible REST endpoints are supported today. The enum keeps
/// the provider explicit at every call site, so adding another backend later
/// (e.g., a local inference server) is a matter of extending this enum and
/// routing in the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbeddingProvider {
    /// OpenAI REST API, or any server speaking the same `/v1/embeddings` protocol.
    OpenAI,
}
