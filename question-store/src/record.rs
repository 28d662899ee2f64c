//! Core data models used by the library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A question record as produced by the external question store.
///
/// `id` is the vector identity key: it is unique and immutable, so
/// re-indexing a changed question overwrites the existing entry instead of
/// creating a new one. Attributes the pipeline does not model explicitly are
/// captured in `extra` and flow into the index metadata after sanitization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub has_description: bool,
    #[serde(default)]
    pub description_content: Option<String>,
    pub course_code: String,
    #[serde(default)]
    pub exam_type: Option<String>,
    #[serde(default)]
    pub semester_term: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Uniform result of an index write (upsert or delete).
///
/// Transport and storage failures collapse into `success == false` with a
/// human-readable `message`, so batch callers can keep processing other
/// questions without caring about the index client's exception taxonomy.
#[derive(Clone, Debug, Serialize)]
pub struct UpsertOutcome {
    pub success: bool,
    pub message: String,
    pub vector_id: Option<String>,
    pub namespace: Option<String>,
}

impl UpsertOutcome {
    /// A successful write scoped to one `(namespace, id)` pair.
    pub(crate) fn ok(
        message: impl Into<String>,
        vector_id: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            vector_id: Some(vector_id.into()),
            namespace: Some(namespace.into()),
        }
    }

    /// A failed write, already normalized to data.
    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            vector_id: None,
            namespace: None,
        }
    }
}
