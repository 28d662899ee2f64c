//! Health probe for the embeddings backend.
//!
//! Exposes a lightweight check against an OpenAI-compatible endpoint:
//! `GET {endpoint}/v1/models` with Bearer auth (best-effort model existence
//! check). The returned [`HealthStatus`] is JSON-serializable and suitable
//! for a startup readiness log. [`HealthService::check`] is resilient and
//! never fails (errors mapped to `ok=false`); the strict probe returns a
//! `Result`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::embedding_model_config::EmbeddingModelConfig;
use crate::error_handler::{
    EmbeddingServiceError, HttpError, ProviderError, ProviderErrorKind, make_snippet,
};

/// A serializable health snapshot for a single provider/config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend/provider (e.g., "OpenAI").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Optional model identifier relevant to the probe (if any).
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the main probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    #[inline]
    fn ok(cfg: &EmbeddingModelConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok: true,
            latency_ms,
            message: message.into(),
        }
    }

    #[inline]
    fn fail(cfg: &EmbeddingModelConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok: false,
            latency_ms,
            message: message.into(),
        }
    }
}

/// A health checker that reuses a single HTTP client.
///
/// The client is constructed with a default timeout. Individual probes may
/// override the timeout per request based on the provided config.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`EmbeddingServiceError::HttpTransport`] if the HTTP client
    /// cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, EmbeddingServiceError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks health for a single embedding config.
    ///
    /// This method is **resilient**: it never returns an error. Any failure
    /// is converted to `HealthStatus { ok: false, message: ... }`.
    pub async fn check(&self, cfg: &EmbeddingModelConfig) -> HealthStatus {
        // Quick endpoint validation to avoid obvious issues.
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            warn!(
                provider = ?cfg.provider,
                endpoint = %cfg.endpoint,
                "invalid endpoint (empty or missing http/https)"
            );
            return HealthStatus::fail(cfg, 0, "endpoint is empty or missing http/https");
        }

        let start = Instant::now();
        match self.try_probe_openai(cfg).await {
            Ok(mut status) => {
                if status.latency_ms == 0 {
                    status.latency_ms = start.elapsed().as_millis();
                }
                info!(
                    provider = %status.provider,
                    endpoint = %status.endpoint,
                    model = %status.model.as_deref().unwrap_or("n/a"),
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::fail(cfg, start.elapsed().as_millis(), err.to_string());
                warn!(
                    provider = %status.provider,
                    endpoint = %status.endpoint,
                    model = %status.model.as_deref().unwrap_or("n/a"),
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    /// Strict OpenAI probe. Returns an error on hard failures.
    ///
    /// Probe:
    /// - `GET {endpoint}/v1/models` with `Authorization: Bearer <api_key>`
    /// - Ensure 2xx
    /// - Best-effort: verify `cfg.model` exists in the returned list
    async fn try_probe_openai(
        &self,
        cfg: &EmbeddingModelConfig,
    ) -> Result<HealthStatus, EmbeddingServiceError> {
        let base = cfg.endpoint.trim_end_matches('/').to_string();
        let url = format!("{}/v1/models", base);
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout);

        let api_key = cfg.api_key.as_ref().ok_or_else(|| {
            ProviderError::new(cfg.provider, ProviderErrorKind::MissingApiKey)
        })?;

        let auth_header =
            header::HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                ProviderError::new(
                    cfg.provider,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?;

        let start = Instant::now();
        debug!(
            provider = ?cfg.provider,
            endpoint = %cfg.endpoint,
            model = %cfg.model,
            "GET {}", url
        );

        let resp = self
            .client
            .get(&url)
            .timeout(timeout)
            .header(header::AUTHORIZATION, auth_header)
            .send()
            .await
            .map_err(EmbeddingServiceError::from)?;

        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                provider = ?cfg.provider,
                %url,
                %status,
                %snippet,
                latency_ms = latency,
                "health GET /v1/models returned non-success status"
            );

            return Err(ProviderError::new(
                cfg.provider,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        // Expected minimal JSON: { "data": [ { "id": "<model>" }, ... ] }
        #[derive(serde::Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(serde::Deserialize)]
        struct Models {
            data: Vec<ModelItem>,
        }

        match resp.json::<Models>().await {
            Ok(models) => {
                let exists = models.data.iter().any(|m| m.id == cfg.model);
                if exists {
                    Ok(HealthStatus::ok(
                        cfg,
                        latency,
                        "endpoint is healthy; model is available",
                    ))
                } else {
                    Ok(HealthStatus::fail(
                        cfg,
                        latency,
                        "endpoint is up, but model not found in /v1/models",
                    ))
                }
            }
            Err(e) => {
                warn!(
                    provider = ?cfg.provider,
                    endpoint = %cfg.endpoint,
                    model = %cfg.model,
                    error = %e,
                    latency_ms = latency,
                    "failed to decode /v1/models; treating server as reachable"
                );
                Ok(HealthStatus::ok(
                    cfg,
                    latency,
                    format!("endpoint is reachable; failed to decode /v1/models: {e}"),
                ))
            }
        }
    }
}
