//! OpenAI-compatible embeddings client.
//!
//! Minimal, non-streaming client around the embeddings REST API. The
//! endpoint is derived from `EmbeddingModelConfig::endpoint`:
//! - POST {endpoint}/v1/embeddings — embeddings retrieval
//!
//! Constructor validation:
//! - `cfg.provider` must be `EmbeddingProvider::OpenAI`
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::{
        embedding_model_config::EmbeddingModelConfig, embedding_provider::EmbeddingProvider,
    },
    error_handler::{
        EmbeddingServiceError, HttpError, ProviderError, ProviderErrorKind, make_snippet,
    },
};

/// Thin client for an OpenAI-compatible embeddings API.
///
/// Constructed from a complete [`EmbeddingModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
///
/// Each call to [`OpenAiService::embeddings`] issues exactly one HTTP
/// request; there is no local caching and no batching.
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: EmbeddingModelConfig,
    url_embeddings: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// Validates the provider, API key, and endpoint scheme. Builds an HTTP
    /// client with default headers and a configurable timeout.
    ///
    /// # Errors
    /// - [`EmbeddingServiceError::Provider`] with `InvalidProvider` if `cfg.provider` is not OpenAI
    /// - [`EmbeddingServiceError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`EmbeddingServiceError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`EmbeddingServiceError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: EmbeddingModelConfig) -> Result<Self, EmbeddingServiceError> {
        // 1) Provider must be OpenAI.
        if cfg.provider != EmbeddingProvider::OpenAI {
            return Err(
                ProviderError::new(cfg.provider, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        // 2) API key must be present.
        let api_key = cfg
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::new(cfg.provider, ProviderErrorKind::MissingApiKey))?;

        // 3) Endpoint must use http/https.
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                cfg.provider,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        // 4) HTTP client: timeout + default headers.
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(30));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                ProviderError::new(
                    cfg.provider,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_embeddings = format!("{}/v1/embeddings", base);

        info!(
            provider = ?cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs.unwrap_or(30),
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_embeddings,
        })
    }

    /// Retrieves a single embeddings vector via `/v1/embeddings`.
    ///
    /// Sends `{model, input, encoding_format}` and extracts
    /// `data[0].embedding` from the response. The vector is returned exactly
    /// as produced, with no truncation or normalization.
    ///
    /// # Errors
    /// - [`EmbeddingServiceError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`EmbeddingServiceError::HttpTransport`] for client/network failures (incl. timeout)
    /// - [`EmbeddingServiceError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`EmbeddingServiceError::Provider`] with `EmptyData` if no vectors are returned
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, EmbeddingServiceError> {
        let started = Instant::now();
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
            encoding_format: &self.cfg.encoding_format,
        };

        debug!(
            model = %self.cfg.model,
            endpoint = %self.cfg.endpoint,
            input_len = input.len(),
            "POST {}", self.url_embeddings
        );

        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                endpoint = %self.cfg.endpoint,
                latency_ms = started.elapsed().as_millis(),
                "/v1/embeddings returned non-success status"
            );

            return Err(ProviderError::new(
                self.cfg.provider,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: EmbeddingsResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    endpoint = %self.cfg.endpoint,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode /v1/embeddings response"
                );
                return Err(ProviderError::new(
                    self.cfg.provider,
                    ProviderErrorKind::Decode(format!(
                        "serde error: {e}; expected `data[0].embedding`"
                    )),
                )
                .into());
            }
        };

        let first = out
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::new(self.cfg.provider, ProviderErrorKind::EmptyData))?;

        info!(
            model = %self.cfg.model,
            endpoint = %self.cfg.endpoint,
            dim = first.embedding.len(),
            latency_ms = started.elapsed().as_millis(),
            "embeddings completed"
        );

        Ok(first.embedding)
    }

    /// Returns the configuration this client was built from.
    pub fn config(&self) -> &EmbeddingModelConfig {
        &self.cfg
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/v1/embeddings`.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'a str,
}

/// Response body for `/v1/embeddings`.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> EmbeddingModelConfig {
        EmbeddingModelConfig {
            provider: EmbeddingProvider::OpenAI,
            model: "text-embedding-3-small".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: Some("sk-test".into()),
            encoding_format: "float".into(),
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn constructor_requires_api_key() {
        let mut c = cfg();
        c.api_key = None;
        assert!(matches!(
            OpenAiService::new(c),
            Err(EmbeddingServiceError::Provider(ProviderError {
                kind: ProviderErrorKind::MissingApiKey,
                ..
            }))
        ));
    }

    #[test]
    fn constructor_rejects_bad_endpoint() {
        let mut c = cfg();
        c.endpoint = "localhost:8080".into();
        assert!(matches!(
            OpenAiService::new(c),
            Err(EmbeddingServiceError::Provider(ProviderError {
                kind: ProviderErrorKind::InvalidEndpoint(_),
                ..
            }))
        ));
    }

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let mut c = cfg();
        c.endpoint = "https://api.openai.com/".into();
        let svc = OpenAiService::new(c).unwrap();
        assert_eq!(svc.url_embeddings, "https://api.openai.com/v1/embeddings");
    }
}
