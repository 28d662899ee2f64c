//! Metadata sanitization: question record → flat primitive-valued mapping.
//!
//! The vector index only accepts primitive payload values, so everything a
//! record carries is coerced here, once, at the boundary. Downstream code
//! never sees `serde_json::Value` again.

use crate::record::QuestionRecord;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute names that carry the external store's internal identifier.
/// Never indexed.
const INTERNAL_ID_KEY: &str = "_id";

/// The four designated filter fields that always get a `<field>_text`
/// companion so queries can match on a guaranteed string type.
const TEXT_COMPANION_FIELDS: [&str; 4] = ["id", "course_code", "exam_type", "semester_term"];

/// A metadata value accepted by the vector index.
///
/// Closed sum type over the primitives the index supports; enforcement
/// happens in [`sanitize`], not downstream.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl MetadataValue {
    /// Canonical string form, used for the `<field>_text` companions.
    pub fn to_text(&self) -> String {
        match self {
            MetadataValue::Text(s) => s.clone(),
            MetadataValue::Number(n) => {
                // Integral numbers render without a trailing `.0` so filter
                // values match what callers type.
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            MetadataValue::Flag(b) => b.to_string(),
        }
    }
}

/// Converts a question record into flat index metadata.
///
/// Rules, in order:
/// - null/absent values are omitted entirely;
/// - the internal database identifier (`_id`) is dropped unconditionally;
/// - timestamps become canonical RFC 3339 strings;
/// - composite extra values (objects/arrays) are serialized to JSON text;
/// - string/number/boolean values pass through unchanged;
/// - for each of `id`, `course_code`, `exam_type`, `semester_term` present
///   in the output, a `<field>_text` string companion is added (idempotent
///   duplication for fields that are already strings is fine).
///
/// Pure function: no side effects and no failure mode — an empty record
/// yields an empty mapping.
pub fn sanitize(record: &QuestionRecord) -> BTreeMap<String, MetadataValue> {
    let mut out = BTreeMap::new();

    out.insert("id".to_string(), MetadataValue::Text(record.id.clone()));
    out.insert(
        "question".to_string(),
        MetadataValue::Text(record.question.clone()),
    );
    out.insert(
        "course_code".to_string(),
        MetadataValue::Text(record.course_code.clone()),
    );
    out.insert(
        "has_description".to_string(),
        MetadataValue::Flag(record.has_description),
    );

    if let Some(desc) = &record.description_content {
        out.insert(
            "description_content".to_string(),
            MetadataValue::Text(desc.clone()),
        );
    }
    if let Some(exam) = &record.exam_type {
        out.insert("exam_type".to_string(), MetadataValue::Text(exam.clone()));
    }
    if let Some(term) = &record.semester_term {
        out.insert(
            "semester_term".to_string(),
            MetadataValue::Text(term.clone()),
        );
    }
    if let Some(ts) = &record.created_at {
        out.insert(
            "created_at".to_string(),
            MetadataValue::Text(ts.to_rfc3339()),
        );
    }
    if let Some(ts) = &record.updated_at {
        out.insert(
            "updated_at".to_string(),
            MetadataValue::Text(ts.to_rfc3339()),
        );
    }

    for (key, value) in &record.extra {
        if key == INTERNAL_ID_KEY {
            continue;
        }
        if let Some(coerced) = coerce_value(value) {
            // Typed fields win over same-named extra attributes.
            out.entry(key.clone()).or_insert(coerced);
        }
    }

    for field in TEXT_COMPANION_FIELDS {
        if let Some(v) = out.get(field) {
            out.insert(format!("{field}_text"), MetadataValue::Text(v.to_text()));
        }
    }

    out
}

/// Coerces an arbitrary JSON value into a primitive metadata value.
///
/// `None` means "omit the attribute" (null values). Composites are
/// serialized to their JSON text representation rather than dropped.
fn coerce_value(value: &Value) -> Option<MetadataValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(MetadataValue::Flag(*b)),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) => MetadataValue::Number(f),
            // u64 values above f64's exact range keep their decimal form.
            None => MetadataValue::Text(n.to_string()),
        }),
        Value::String(s) => Some(MetadataValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => Some(MetadataValue::Text(
            serde_json::to_string(value).unwrap_or_default(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record() -> QuestionRecord {
        QuestionRecord {
            id: "q-42".into(),
            question: "What is ownership?".into(),
            has_description: true,
            description_content: Some("See the book, chapter 4.".into()),
            course_code: "CSE-1111".into(),
            exam_type: Some("final".into()),
            semester_term: Some("2025-autumn".into()),
            created_at: Some(chrono::Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap()),
            updated_at: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn internal_id_is_dropped() {
        let mut r = record();
        r.extra
            .insert("_id".into(), json!("6501a2b3c4d5e6f708091a0b"));
        let m = sanitize(&r);
        assert!(!m.contains_key("_id"));
        assert!(!m.contains_key("_id_text"));
    }

    #[test]
    fn null_values_are_omitted() {
        let mut r = record();
        r.extra.insert("difficulty".into(), Value::Null);
        let m = sanitize(&r);
        assert!(!m.contains_key("difficulty"));
    }

    #[test]
    fn text_companions_match_source_fields() {
        let m = sanitize(&record());
        assert_eq!(m["id_text"], MetadataValue::Text("q-42".into()));
        assert_eq!(m["course_code_text"], MetadataValue::Text("CSE-1111".into()));
        assert_eq!(m["exam_type_text"], MetadataValue::Text("final".into()));
        assert_eq!(
            m["semester_term_text"],
            MetadataValue::Text("2025-autumn".into())
        );
    }

    #[test]
    fn companions_skip_absent_fields() {
        let mut r = record();
        r.exam_type = None;
        r.semester_term = None;
        let m = sanitize(&r);
        assert!(!m.contains_key("exam_type"));
        assert!(!m.contains_key("exam_type_text"));
        assert!(!m.contains_key("semester_term_text"));
    }

    #[test]
    fn composites_become_json_text() {
        let mut r = record();
        r.extra
            .insert("tags".into(), json!(["rust", "ownership"]));
        r.extra
            .insert("stats".into(), json!({"attempts": 3, "correct": 1}));
        let m = sanitize(&r);
        assert_eq!(
            m["tags"],
            MetadataValue::Text("[\"rust\",\"ownership\"]".into())
        );
        assert_eq!(
            m["stats"],
            MetadataValue::Text("{\"attempts\":3,\"correct\":1}".into())
        );
    }

    #[test]
    fn primitives_pass_through() {
        let mut r = record();
        r.extra.insert("points".into(), json!(2.5));
        r.extra.insert("archived".into(), json!(false));
        let m = sanitize(&r);
        assert_eq!(m["points"], MetadataValue::Number(2.5));
        assert_eq!(m["archived"], MetadataValue::Flag(false));
    }

    #[test]
    fn timestamps_are_rfc3339() {
        let m = sanitize(&record());
        assert_eq!(
            m["created_at"],
            MetadataValue::Text("2025-09-01T12:00:00+00:00".into())
        );
        assert!(!m.contains_key("updated_at"));
    }

    #[test]
    fn number_to_text_has_no_trailing_fraction() {
        assert_eq!(MetadataValue::Number(7.0).to_text(), "7");
        assert_eq!(MetadataValue::Number(2.5).to_text(), "2.5");
    }
}
