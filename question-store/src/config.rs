//! Runtime and index configuration.

use crate::errors::IndexError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Describes the vector space of a namespace collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Configuration for question indexing.
///
/// `index` is the logical index name shared by all courses; each course gets
/// its own namespace collection under that name.
#[derive(Clone, Debug)]
pub struct IndexConfig {
    /// Qdrant HTTP endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Logical index name, e.g. `questions`.
    pub index: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Dimensionality the index collections are created with. Must match
    /// the configured embedding model's output.
    pub embedding_dim: usize,
    /// Per-request timeout for index calls, in seconds.
    pub timeout_secs: Option<u64>,
    /// Concurrency limit for batch reindexing.
    pub embed_concurrency: usize,
}

impl IndexConfig {
    /// Creates a sane default config for a given index name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            index: index.into(),
            distance: DistanceKind::Cosine,
            embedding_dim: 1536,
            timeout_secs: Some(30),
            embed_concurrency: 4,
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(IndexError::Config("qdrant_url is empty".into()));
        }
        if self.index.trim().is_empty() {
            return Err(IndexError::Config("index is empty".into()));
        }
        if self.embedding_dim == 0 {
            return Err(IndexError::Config("embedding_dim must be > 0".into()));
        }
        if self.embed_concurrency == 0 {
            return Err(IndexError::Config("embed_concurrency must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = IndexConfig::new_default("http://localhost:6334", "questions");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_index_is_rejected() {
        let cfg = IndexConfig::new_default("http://localhost:6334", "");
        assert!(matches!(cfg.validate(), Err(IndexError::Config(_))));
    }
}
