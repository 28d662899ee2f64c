//! High-level question indexing facade: sanitize + embed + upsert over Qdrant.
//!
//! This crate provides a clean API to:
//! - Re-index a question record into its course namespace (sanitize
//!   metadata, embed the text, upsert the vector under the question's
//!   stable id)
//! - Remove a question's vector from its course namespace
//! - Batch-reindex question dumps from JSONL files
//!
//! The design is flat (no deep nesting) and splits responsibilities into focused modules.

mod config;
mod embed;
mod errors;
mod io_jsonl;
mod metadata;
mod namespace;
mod qdrant_facade;
mod record;
mod reindex;

pub use config::{DistanceKind, IndexConfig, VectorSpace};
pub use embed::noop_embedder::NoopEmbedder;
pub use embed::openai::{OpenAiEmbedder, OpenAiEmbedderConfig};
pub use embed::{EmbeddingsProvider, embedding_input};
pub use errors::IndexError;
pub use io_jsonl::{read_all_questions, read_questions_tolerant};
pub use metadata::{MetadataValue, sanitize};
pub use namespace::resolve_namespace;
pub use qdrant_facade::{IndexWriter, QdrantFacade};
pub use record::{QuestionRecord, UpsertOutcome};

use tracing::{debug, trace, warn};

/// High-level facade that wires configuration and the Qdrant client.
///
/// This is the single entry point recommended for application code. It holds
/// no per-request state: every operation is an independent unit of work, and
/// concurrent calls for different question ids are safe. Concurrent calls
/// for the *same* id race at the index (last write wins).
pub struct QuestionIndex {
    cfg: IndexConfig,
    client: QdrantFacade,
}

impl QuestionIndex {
    /// Constructs a new index facade from the given configuration.
    ///
    /// # Errors
    /// Returns `IndexError::Config` if the client initialization fails.
    pub fn new(cfg: IndexConfig) -> Result<Self, IndexError> {
        trace!("QuestionIndex::new index={}", cfg.index);
        let client = QdrantFacade::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    /// Re-indexes a single question into its course namespace.
    ///
    /// # Errors
    /// Returns validation and embedding errors; index-write failures come
    /// back as `Ok(UpsertOutcome { success: false, .. })`.
    pub async fn reindex_question(
        &self,
        record: &QuestionRecord,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<UpsertOutcome, IndexError> {
        trace!("QuestionIndex::reindex_question id={}", record.id);
        reindex::reindex_question(record, provider, &self.client).await
    }

    /// Removes a question's vector from its course namespace.
    ///
    /// Deleting an id that was never indexed reports success.
    ///
    /// # Errors
    /// Returns validation errors only.
    pub async fn remove_question(
        &self,
        id: &str,
        course_code: &str,
    ) -> Result<UpsertOutcome, IndexError> {
        trace!("QuestionIndex::remove_question id={id}");
        reindex::remove_question(id, course_code, &self.client).await
    }

    /// Re-indexes every question in a JSONL dump, with bounded concurrency.
    ///
    /// Tries the strict reader first and falls back to the tolerant one, so
    /// one malformed row degrades to a warning instead of failing the batch.
    ///
    /// # Errors
    /// Returns errors on I/O only; per-record results are reported
    /// individually.
    pub async fn reindex_file(
        &self,
        jsonl_path: impl AsRef<std::path::Path>,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<Vec<(String, Result<UpsertOutcome, IndexError>)>, IndexError> {
        debug!("QuestionIndex::reindex_file path={:?}", jsonl_path.as_ref());

        let records = match io_jsonl::read_all_questions(&jsonl_path) {
            Ok(v) => v,
            Err(e @ IndexError::Io(_)) => return Err(e),
            Err(e) => {
                warn!("Strict parser failed: {e}. Falling back to tolerant reader…");
                io_jsonl::read_questions_tolerant(&jsonl_path)?
            }
        };

        Ok(reindex::reindex_batch(records, provider, &self.client, self.cfg.embed_concurrency).await)
    }
}
