use std::sync::Arc;

use anyhow::Context;
use embedding_service::OpenAiService;
use embedding_service::config::default_config::config_openai_embedding;
use embedding_service::health_service::HealthService;
use question_store::{IndexConfig, OpenAiEmbedder, OpenAiEmbedderConfig, QuestionIndex};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file.
    // Fails if .env file not found, not readable or invalid.
    dotenvy::dotenv()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,question_store=info"))?;

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Embedding profile (OPENAI_API_KEY, EMBEDDING_MODEL, OPENAI_URL, ...).
    let embedding_cfg = config_openai_embedding()?;

    // Startup readiness: probe the embeddings endpoint once. A failing probe
    // is logged but not fatal; per-question calls carry their own errors.
    let health = HealthService::new(Some(10))?;
    let status = health.check(&embedding_cfg).await;
    if !status.ok {
        tracing::warn!(message = %status.message, "embedding endpoint probe failed; continuing");
    }

    let dim = env_usize("EMBEDDING_DIM", 1536)?;

    let mut cfg = IndexConfig::new_default(
        std::env::var("QDRANT_URL").context("QDRANT_URL must be set in environment")?,
        std::env::var("QUESTION_INDEX").unwrap_or_else(|_| "questions".into()),
    );
    cfg.qdrant_api_key = std::env::var("QDRANT_API_KEY")
        .ok()
        .filter(|s| !s.trim().is_empty());
    cfg.embedding_dim = dim;
    if let Some(concurrency) = env_opt_usize("EMBED_CONCURRENCY")? {
        cfg.embed_concurrency = concurrency;
    }

    let svc = Arc::new(OpenAiService::new(embedding_cfg)?);
    let embedder = OpenAiEmbedder::new(OpenAiEmbedderConfig { svc, dim });

    let index = QuestionIndex::new(cfg)?;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "questions.jsonl".into());
    let outcomes = index.reindex_file(&path, &embedder).await?;

    let ok = outcomes
        .iter()
        .filter(|(_, r)| matches!(r, Ok(o) if o.success))
        .count();
    tracing::info!(
        total = outcomes.len(),
        ok,
        failed = outcomes.len() - ok,
        "reindex run finished"
    );

    for (id, res) in &outcomes {
        match res {
            Ok(o) if o.success => {}
            Ok(o) => tracing::warn!(%id, message = %o.message, "index write failed"),
            Err(e) => tracing::warn!(%id, error = %e, "reindex failed"),
        }
    }

    Ok(())
}

/// Parses a `usize` env var, falling back to `default` when unset.
fn env_usize(name: &str, default: usize) -> anyhow::Result<usize> {
    Ok(env_opt_usize(name)?.unwrap_or(default))
}

/// Parses an optional `usize` env var (`None` when unset or empty).
fn env_opt_usize(name: &str) -> anyhow::Result<Option<usize>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(Some(
            v.parse()
                .with_context(|| format!("{name} must be a positive integer"))?,
        )),
        _ => Ok(None),
    }
}
