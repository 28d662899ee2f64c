//! OpenAI-backed embedding provider implementation.
//!
//! Wraps `embedding_service::OpenAiService` and enforces the dimensionality
//! the index collections were created with.

use std::sync::Arc;

use tracing::warn;

use crate::{EmbeddingsProvider, IndexError};
use embedding_service::OpenAiService;

/// Configuration for the OpenAI embedding backend.
#[derive(Clone, Debug)]
pub struct OpenAiEmbedderConfig {
    pub svc: Arc<OpenAiService>,
    /// Expected embedding dimension size.
    pub dim: usize,
}

/// OpenAI embedding provider (async).
///
/// A vector of the wrong length means the configured model does not match
/// the index; that is surfaced as [`IndexError::VectorSizeMismatch`] so the
/// caller can treat it as a fatal configuration problem rather than a
/// retryable transport error.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    svc: Arc<OpenAiService>,
    dim: usize,
}

impl OpenAiEmbedder {
    /// Construct a new embedder from configuration.
    pub fn new(cfg: OpenAiEmbedderConfig) -> Self {
        Self {
            svc: cfg.svc,
            dim: cfg.dim,
        }
    }
}

impl EmbeddingsProvider for OpenAiEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>>
    {
        Box::pin(async move {
            let resp = self.svc.embeddings(text).await?;

            if resp.len() != self.dim {
                warn!(got = resp.len(), want = self.dim, "embedding dimension drift");
                return Err(IndexError::VectorSizeMismatch {
                    got: resp.len(),
                    want: self.dim,
                });
            }

            Ok(resp)
        })
    }
}
