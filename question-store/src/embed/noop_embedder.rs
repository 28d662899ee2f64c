use crate::{EmbeddingsProvider, IndexError};
use std::{future::Future, pin::Pin};

/// Provider stand-in for wiring where embeddings are not available.
/// Every call fails with [`IndexError::MissingEmbedding`].
#[derive(Clone)]
pub struct NoopEmbedder;

impl EmbeddingsProvider for NoopEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
        Box::pin(async { Err(IndexError::MissingEmbedding) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_reports_missing_embedding() {
        let res = NoopEmbedder.embed("anything").await;
        assert!(matches!(res, Err(IndexError::MissingEmbedding)));
    }
}
