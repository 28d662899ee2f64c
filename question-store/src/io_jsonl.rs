//! JSONL helpers: strict question reader and tolerant fallback.
//!
//! Provides two utilities:
//! - [`read_all_questions`] → strict parsing into [`QuestionRecord`]
//!   (requires `id`, `question`, `course_code`).
//! - [`read_questions_tolerant`] → skips malformed rows with a warning.

use crate::errors::IndexError;
use crate::record::QuestionRecord;
use std::io::{BufRead, BufReader};
use std::{fs::File, path::Path};
use tracing::{debug, info, warn};

/// Reads question JSONL strictly.
///
/// - Expects at least `id`, `question`, and `course_code` per row.
/// - Fails on malformed rows with [`IndexError::Parse`].
/// - Ignores empty lines.
///
/// # Errors
/// - [`IndexError::Io`] if the file cannot be read.
/// - [`IndexError::Parse`] if any line fails strict deserialization.
pub fn read_all_questions(jsonl_path: impl AsRef<Path>) -> Result<Vec<QuestionRecord>, IndexError> {
    info!("Reading strict question JSONL: {:?}", jsonl_path.as_ref());

    let file = File::open(jsonl_path.as_ref())?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let r: QuestionRecord = serde_json::from_str(&line)
            .map_err(|e| IndexError::Parse(format!("line {} parse error: {}", i + 1, e)))?;
        out.push(r);
    }

    debug!("Loaded {} question records", out.len());
    Ok(out)
}

/// Reads question JSONL tolerantly.
///
/// - Empty lines are skipped.
/// - Malformed lines are logged (`warn!`) but not fatal.
///
/// # Errors
/// - [`IndexError::Io`] if the file cannot be opened.
pub fn read_questions_tolerant(
    jsonl_path: impl AsRef<Path>,
) -> Result<Vec<QuestionRecord>, IndexError> {
    info!("Reading tolerant question JSONL: {:?}", jsonl_path.as_ref());

    let file = File::open(jsonl_path)?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<QuestionRecord>(&line) {
            Ok(r) => out.push(r),
            Err(e) => {
                warn!("Skipping malformed question on line {}: {}", i + 1, e);
            }
        }
    }

    debug!("Loaded {} question records (tolerant)", out.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_jsonl(name: &str, lines: &[&str]) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("questions-{name}-{}.jsonl", std::process::id()));
        let mut f = File::create(&path).unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn strict_reader_rejects_malformed_rows() {
        let path = write_jsonl("strict", &[
            r#"{"id":"q-1","question":"What is X?","course_code":"CSE-1111"}"#,
            r#"{"id":"q-2"}"#,
        ]);
        let res = read_all_questions(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(res, Err(IndexError::Parse(_))));
    }

    #[test]
    fn tolerant_reader_skips_malformed_rows() {
        let path = write_jsonl("tolerant", &[
            r#"{"id":"q-1","question":"What is X?","course_code":"CSE-1111"}"#,
            "",
            r#"{"id":"q-2"}"#,
            r#"{"id":"q-3","question":"What is Y?","course_code":"CSE-1111","extra_field":7}"#,
        ]);
        let records = read_questions_tolerant(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "q-1");
        assert_eq!(records[1].id, "q-3");
        assert_eq!(records[1].extra["extra_field"], serde_json::json!(7));
    }
}
