//! Unified error handling for `embedding-service`.
//!
//! This module exposes a single top-level error type [`EmbeddingServiceError`]
//! for the whole crate, and groups domain-specific errors in nested types
//! (e.g., [`ConfigError`], [`ProviderError`]). Small helpers for
//! reading/validating environment variables are provided and return the
//! unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[Embedding Service]` to simplify
//! attribution in logs.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::config::embedding_provider::EmbeddingProvider;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, EmbeddingServiceError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `embedding-service` crate.
///
/// Variants wrap domain-specific types (config/provider) and a few common
/// cases (HTTP transport, timeouts). Prefer adding new sub-enums for distinct
/// domains instead of growing this type indefinitely.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EmbeddingServiceError {
    /// Configuration/validation errors (startup/readiness).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider protocol errors (bad status, undecodable payload, ...).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[Embedding Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Operation exceeded the configured timeout.
    #[error("[Embedding Service] operation timed out after {0:?}")]
    Timeout(Duration),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
///
/// Keep this focused: only errors that realistically happen at config
/// load/validation time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[Embedding Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[Embedding Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `EMBEDDING_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[Embedding Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `OPENAI_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// Model name was empty or invalid.
    #[error("[Embedding Service] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// A provider-attributed protocol error.
#[derive(Debug, Error)]
#[error("[Embedding Service] {provider:?} provider error: {kind}")]
pub struct ProviderError {
    /// Which backend produced the error.
    pub provider: EmbeddingProvider,
    /// What went wrong.
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    /// Creates a new provider error.
    pub fn new(provider: EmbeddingProvider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

/// Classification of provider protocol errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    /// The config has an unexpected provider for this client.
    #[error("config does not match this provider")]
    InvalidProvider,

    /// The provider requires an API key but none was configured.
    #[error("missing API key")]
    MissingApiKey,

    /// The endpoint is empty or does not start with http/https.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Upstream returned a non-successful HTTP status.
    #[error(transparent)]
    HttpStatus(HttpError),

    /// Response payload could not be decoded as expected.
    #[error("decode error: {0}")]
    Decode(String),

    /// The embeddings response carried no vectors at all.
    #[error("empty `data` in embeddings response")]
    EmptyData,
}

/// Details of a non-2xx upstream response.
#[derive(Debug, Error)]
#[error("HTTP {status} from {url}: {snippet}")]
pub struct HttpError {
    /// Numeric HTTP status code.
    pub status: StatusCode,
    /// Request URL.
    pub url: String,
    /// Short snippet of the response body (trimmed).
    pub snippet: String,
}

/// Produces a single-line, length-capped snippet of a response body for logs
/// and error messages.
pub fn make_snippet(body: &str) -> String {
    const MAX: usize = 200;
    let mut s: String = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.len() > MAX {
        let mut end = MAX;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
        s.push('…');
    }
    s
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// Returns [`EmbeddingServiceError::Config`] with [`ConfigError::MissingVar`]
/// if the variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`EmbeddingServiceError::Config`] with [`ConfigError::InvalidNumber`]
/// if the variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u64>().map(Some).map_err(|_| {
            EmbeddingServiceError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_single_line_and_capped() {
        let s = make_snippet("line one\nline   two");
        assert_eq!(s, "line one line two");

        let long = "x".repeat(500);
        assert!(make_snippet(&long).len() <= 204);
    }
}
