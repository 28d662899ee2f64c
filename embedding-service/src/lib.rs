//! Embeddings client for OpenAI-compatible endpoints.
//!
//! The crate exposes:
//! - [`config`] — typed configuration structs plus strict env-driven constructors.
//! - [`services::open_ai_service::OpenAiService`] — the HTTP client itself.
//! - [`health_service`] — a best-effort endpoint probe for startup checks.
//! - [`error_handler`] — one unified error type for the whole crate.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod services;

pub use config::embedding_model_config::EmbeddingModelConfig;
pub use config::embedding_provider::EmbeddingProvider;
pub use error_handler::EmbeddingServiceError;
pub use services::open_ai_service::OpenAiService;
