//! Default embedding configs loaded strictly from environment variables.
//!
//! This module provides convenience constructors for
//! [`EmbeddingModelConfig`], grouped by provider. Currently only the
//! **OpenAI-compatible** REST protocol is supported.
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`            = API key (mandatory)
//! - `EMBEDDING_MODEL`           = embedding model id (mandatory)
//! - `OPENAI_URL`                = endpoint base URL (optional; defaults to
//!   `https://api.openai.com`)
//! - `EMBEDDING_TIMEOUT_SECS`    = per-request timeout (optional, u64)

use crate::{
    config::{
        embedding_model_config::EmbeddingModelConfig, embedding_provider::EmbeddingProvider,
    },
    error_handler::{EmbeddingServiceError, env_opt_u64, must_env},
};

/// Resolves the OpenAI endpoint from the environment.
///
/// Uses `OPENAI_URL` when present and non-empty, otherwise the public API
/// endpoint.
fn openai_endpoint() -> String {
    match std::env::var("OPENAI_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => "https://api.openai.com".to_string(),
    }
}

/// Constructs the **embedding** config for an OpenAI-compatible backend.
///
/// # Env
/// - `OPENAI_API_KEY` (required)
/// - `EMBEDDING_MODEL` (required)
/// - `OPENAI_URL` (optional)
/// - `EMBEDDING_TIMEOUT_SECS` (optional)
///
/// # Defaults
/// - `encoding_format = "float"`
/// - `timeout_secs = Some(30)`
pub fn config_openai_embedding() -> Result<EmbeddingModelConfig, EmbeddingServiceError> {
    let endpoint = openai_endpoint();
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = must_env("EMBEDDING_MODEL")?;
    let timeout_secs = env_opt_u64("EMBEDDING_TIMEOUT_SECS")?.or(Some(30));

    Ok(EmbeddingModelConfig {
        provider: EmbeddingProvider::OpenAI,
        model,
        endpoint,
        api_key: Some(api_key),
        encoding_format: "float".to_string(),
        timeout_secs,
    })
}
