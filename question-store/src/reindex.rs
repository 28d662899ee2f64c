//! End-to-end indexing orchestration: validate → sanitize → embed → resolve
//! namespace → write.
//!
//! The orchestrator is stateless between invocations and never retries; it
//! decides only what is fatal and what is reportable. Embedding failures
//! abort the attempt before any write (this pipeline never stores a
//! vector-less entry). Index-write failures come back as data so a batch can
//! keep going.

use crate::embed::{EmbeddingsProvider, embedding_input};
use crate::errors::IndexError;
use crate::metadata::sanitize;
use crate::namespace::resolve_namespace;
use crate::qdrant_facade::IndexWriter;
use crate::record::{QuestionRecord, UpsertOutcome};

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

/// Re-indexes a single question.
///
/// Pipeline: validate required fields → sanitize metadata → embed the
/// question text (+ optional description) → resolve the course namespace →
/// upsert `{id, vector, metadata}`.
///
/// # Errors
/// - [`IndexError::Validation`] if `id`, `question` or `course_code` is empty
///   (checked before any external call).
/// - Embedding failures ([`IndexError::Embedding`], [`IndexError::VectorSizeMismatch`],
///   [`IndexError::MissingEmbedding`]) — fatal for this attempt, nothing written.
///
/// Index-write failures are **not** errors: they return
/// `Ok(UpsertOutcome { success: false, .. })` so batch callers keep their
/// visibility into per-item problems without one failure aborting the job.
pub async fn reindex_question(
    record: &QuestionRecord,
    provider: &dyn EmbeddingsProvider,
    writer: &dyn IndexWriter,
) -> Result<UpsertOutcome, IndexError> {
    validate_record(record)?;

    let metadata = sanitize(record);
    let input = embedding_input(
        &record.question,
        record.has_description,
        record.description_content.as_deref(),
    );

    // Abort before any write if the embedding is unavailable.
    let vector = provider.embed(&input).await?;

    let namespace = resolve_namespace(&record.course_code);
    debug!(
        id = %record.id,
        %namespace,
        dim = vector.len(),
        fields = metadata.len(),
        "upserting question vector"
    );

    match writer.upsert_entry(&namespace, &record.id, vector, metadata).await {
        Ok(()) => Ok(UpsertOutcome::ok(
            "question indexed",
            record.id.clone(),
            namespace,
        )),
        // Dimension drift is a deployment misconfiguration, not a per-item
        // write failure; it stays fatal.
        Err(err @ IndexError::VectorSizeMismatch { .. }) => Err(err),
        Err(err) => {
            warn!(id = %record.id, %namespace, error = %err, "upsert failed");
            Ok(UpsertOutcome::failed(err.to_string()))
        }
    }
}

/// Removes a question's vector from its course namespace.
///
/// No embedding or metadata step. Deleting an id that was never indexed is
/// reported as success (idempotent delete).
///
/// # Errors
/// - [`IndexError::Validation`] if `id` or `course_code` is empty.
pub async fn remove_question(
    id: &str,
    course_code: &str,
    writer: &dyn IndexWriter,
) -> Result<UpsertOutcome, IndexError> {
    if id.trim().is_empty() {
        return Err(IndexError::Validation("id is empty".into()));
    }
    if course_code.trim().is_empty() {
        return Err(IndexError::Validation("course_code is empty".into()));
    }

    let namespace = resolve_namespace(course_code);
    debug!(%id, %namespace, "deleting question vector");

    match writer.delete_entry(&namespace, id).await {
        Ok(()) => Ok(UpsertOutcome::ok("question removed", id, namespace)),
        Err(err) => {
            warn!(%id, %namespace, error = %err, "delete failed");
            Ok(UpsertOutcome::failed(err.to_string()))
        }
    }
}

/// Re-indexes a batch of questions with bounded concurrency.
///
/// Each record is an independent unit of work: one record's failure (of any
/// class) never affects another. Returns one `(question id, result)` pair
/// per input record, in completion order.
pub async fn reindex_batch(
    records: Vec<QuestionRecord>,
    provider: &dyn EmbeddingsProvider,
    writer: &dyn IndexWriter,
    concurrency: usize,
) -> Vec<(String, Result<UpsertOutcome, IndexError>)> {
    info!(
        total = records.len(),
        concurrency, "reindex_batch: starting"
    );

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        )
        .unwrap()
        .progress_chars("##-"),
    );

    let outcomes: Vec<(String, Result<UpsertOutcome, IndexError>)> =
        stream::iter(records.into_iter())
            .map(|record| {
                let pb = &pb;
                async move {
                    let id = record.id.clone();
                    let res = reindex_question(&record, provider, writer).await;
                    pb.inc(1);
                    (id, res)
                }
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

    pb.finish_with_message("Reindex complete ✔");

    let ok = outcomes
        .iter()
        .filter(|(_, r)| matches!(r, Ok(o) if o.success))
        .count();
    info!(
        total = outcomes.len(),
        ok,
        failed = outcomes.len() - ok,
        "reindex_batch: finished"
    );

    outcomes
}

/// Checks the fields the pipeline cannot proceed without.
fn validate_record(record: &QuestionRecord) -> Result<(), IndexError> {
    if record.id.trim().is_empty() {
        return Err(IndexError::Validation("id is empty".into()));
    }
    if record.question.trim().is_empty() {
        return Err(IndexError::Validation("question is empty".into()));
    }
    if record.course_code.trim().is_empty() {
        return Err(IndexError::Validation("course_code is empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataValue;
    use std::collections::BTreeMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    /// Embedder returning a fixed-size vector, recording every input text.
    /// Calls whose text contains `fail_marker` fail instead.
    struct ScriptedEmbedder {
        dim: usize,
        fail_marker: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedEmbedder {
        fn new(dim: usize) -> Self {
            Self {
                dim,
                fail_marker: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_on(dim: usize, marker: &'static str) -> Self {
            Self {
                dim,
                fail_marker: Some(marker),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl EmbeddingsProvider for ScriptedEmbedder {
        fn embed<'a>(
            &'a self,
            text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push(text.to_string());
                if let Some(marker) = self.fail_marker {
                    if text.contains(marker) {
                        return Err(IndexError::MissingEmbedding);
                    }
                }
                Ok(vec![0.25; self.dim])
            })
        }
    }

    /// Index writer recording every call; optionally failing upserts.
    #[derive(Default)]
    struct RecordingWriter {
        upserts: Mutex<Vec<(String, String, BTreeMap<String, MetadataValue>)>>,
        deletes: Mutex<Vec<(String, String)>>,
        fail_upserts: bool,
        mismatch_upserts: bool,
    }

    impl IndexWriter for RecordingWriter {
        fn upsert_entry<'a>(
            &'a self,
            namespace: &'a str,
            id: &'a str,
            _vector: Vec<f32>,
            metadata: BTreeMap<String, MetadataValue>,
        ) -> Pin<Box<dyn Future<Output = Result<(), IndexError>> + Send + 'a>> {
            Box::pin(async move {
                if self.mismatch_upserts {
                    return Err(IndexError::VectorSizeMismatch { got: 8, want: 16 });
                }
                if self.fail_upserts {
                    return Err(IndexError::Qdrant("connection refused".into()));
                }
                self.upserts.lock().unwrap().push((
                    namespace.to_string(),
                    id.to_string(),
                    metadata,
                ));
                Ok(())
            })
        }

        fn delete_entry<'a>(
            &'a self,
            namespace: &'a str,
            id: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<(), IndexError>> + Send + 'a>> {
            Box::pin(async move {
                self.deletes
                    .lock()
                    .unwrap()
                    .push((namespace.to_string(), id.to_string()));
                Ok(())
            })
        }
    }

    fn record(id: &str, question: &str) -> QuestionRecord {
        QuestionRecord {
            id: id.into(),
            question: question.into(),
            has_description: false,
            description_content: None,
            course_code: "CSE-1111".into(),
            exam_type: Some("final".into()),
            semester_term: None,
            created_at: None,
            updated_at: None,
            extra: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn reindex_writes_into_course_namespace() {
        let provider = ScriptedEmbedder::new(8);
        let writer = RecordingWriter::default();

        let outcome = reindex_question(&record("q-1", "What is X?"), &provider, &writer)
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.vector_id.as_deref(), Some("q-1"));
        assert_eq!(outcome.namespace.as_deref(), Some("course-cse-1111"));

        let upserts = writer.upserts.lock().unwrap();
        assert_eq!(upserts.len(), 1);
        assert_eq!(upserts[0].0, "course-cse-1111");
        assert_eq!(upserts[0].1, "q-1");
        assert_eq!(
            upserts[0].2.get("id_text"),
            Some(&MetadataValue::Text("q-1".into()))
        );
    }

    #[tokio::test]
    async fn description_flows_into_embedding_input() {
        let provider = ScriptedEmbedder::new(8);
        let writer = RecordingWriter::default();

        let mut r = record("q-1", "What is X?");
        r.has_description = true;
        r.description_content = Some("See chapter 2".into());

        reindex_question(&r, &provider, &writer).await.unwrap();

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), ["What is X? | See chapter 2"]);
    }

    #[tokio::test]
    async fn embedding_failure_aborts_before_any_write() {
        let provider = ScriptedEmbedder::failing_on(8, "What");
        let writer = RecordingWriter::default();

        let res = reindex_question(&record("q-1", "What is X?"), &provider, &writer).await;

        assert!(matches!(res, Err(IndexError::MissingEmbedding)));
        assert!(writer.upserts.lock().unwrap().is_empty());
        assert!(writer.deletes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn index_write_failure_is_returned_as_data() {
        let provider = ScriptedEmbedder::new(8);
        let writer = RecordingWriter {
            fail_upserts: true,
            ..Default::default()
        };

        let outcome = reindex_question(&record("q-1", "What is X?"), &provider, &writer)
            .await
            .unwrap();

        assert!(!outcome.success);
        assert!(outcome.message.contains("connection refused"));
    }

    #[tokio::test]
    async fn dimension_mismatch_from_writer_stays_fatal() {
        let provider = ScriptedEmbedder::new(8);
        let writer = RecordingWriter {
            mismatch_upserts: true,
            ..Default::default()
        };

        let res = reindex_question(&record("q-1", "What is X?"), &provider, &writer).await;
        assert!(matches!(
            res,
            Err(IndexError::VectorSizeMismatch { got: 8, want: 16 })
        ));
    }

    #[tokio::test]
    async fn validation_happens_before_external_calls() {
        let provider = ScriptedEmbedder::new(8);
        let writer = RecordingWriter::default();

        let res = reindex_question(&record("", "What is X?"), &provider, &writer).await;

        assert!(matches!(res, Err(IndexError::Validation(_))));
        assert!(provider.calls.lock().unwrap().is_empty());
        assert!(writer.upserts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_skips_embedding_and_metadata() {
        let writer = RecordingWriter::default();

        let outcome = remove_question("q-1", "CSE-1111", &writer).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.namespace.as_deref(), Some("course-cse-1111"));
        let deletes = writer.deletes.lock().unwrap();
        assert_eq!(deletes.as_slice(), [("course-cse-1111".to_string(), "q-1".to_string())]);
    }

    #[tokio::test]
    async fn batch_isolates_per_record_failures() {
        let provider = ScriptedEmbedder::failing_on(8, "SECOND");
        let writer = RecordingWriter::default();

        let records = vec![
            record("q-1", "first question"),
            record("q-2", "SECOND question"),
            record("q-3", "third question"),
        ];

        let outcomes = reindex_batch(records, &provider, &writer, 2).await;
        assert_eq!(outcomes.len(), 3);

        let ok_ids: Vec<&str> = outcomes
            .iter()
            .filter(|(_, r)| matches!(r, Ok(o) if o.success))
            .map(|(id, _)| id.as_str())
            .collect();
        let failed_ids: Vec<&str> = outcomes
            .iter()
            .filter(|(_, r)| r.is_err())
            .map(|(id, _)| id.as_str())
            .collect();

        assert_eq!(failed_ids, ["q-2"]);
        assert_eq!(ok_ids.len(), 2);
        assert_eq!(writer.upserts.lock().unwrap().len(), 2);
    }
}
