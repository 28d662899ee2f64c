//! Embedding seam: provider trait and input composition policy.

use crate::errors::IndexError;
use std::{future::Future, pin::Pin};

/// Separator between the question text and its description in the embedding
/// input. Fixed by contract; changing it would silently shift every stored
/// vector.
pub const INPUT_SEPARATOR: &str = " | ";

/// Provider interface for embedding generation.
///
/// Async because real providers perform HTTP requests. Implement this trait
/// to plug in another embedding backend.
pub trait EmbeddingsProvider: Send + Sync {
    /// Computes one embedding vector for `text`. One external call per
    /// invocation; no caching, no batching.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, IndexError>> + Send + 'a>>;
}

/// Builds the embedding input for a question.
///
/// The description is appended only when the record says it has one and the
/// content is non-empty; order is fixed (question first).
pub fn embedding_input(
    question: &str,
    has_description: bool,
    description: Option<&str>,
) -> String {
    match description {
        Some(d) if has_description && !d.is_empty() => {
            format!("{question}{INPUT_SEPARATOR}{d}")
        }
        _ => question.to_string(),
    }
}

pub mod noop_embedder;
pub mod openai;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_with_description() {
        assert_eq!(
            embedding_input("What is X?", true, Some("See chapter 2")),
            "What is X? | See chapter 2"
        );
    }

    #[test]
    fn question_without_description() {
        assert_eq!(embedding_input("What is X?", false, None), "What is X?");
    }

    #[test]
    fn flag_without_content_is_ignored() {
        assert_eq!(embedding_input("What is X?", true, None), "What is X?");
        assert_eq!(embedding_input("What is X?", true, Some("")), "What is X?");
    }

    #[test]
    fn content_without_flag_is_ignored() {
        assert_eq!(
            embedding_input("What is X?", false, Some("See chapter 2")),
            "What is X?"
        );
    }
}
