//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind a minimal API,
//! hiding away the verbose builder pattern and keeping the rest of the
//! application decoupled from `qdrant-client`.
//!
//! One logical index fans out into one Qdrant collection per namespace
//! (`<index>-<namespace>`), created on first write. Point identity is the
//! UUIDv5 of the question's stable id, so a re-indexed question overwrites
//! its previous entry instead of duplicating it.

use std::collections::{BTreeMap, HashMap};
use std::{future::Future, pin::Pin};

use crate::config::{DistanceKind, IndexConfig, VectorSpace};
use crate::errors::IndexError;
use crate::metadata::MetadataValue;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, DeletePointsBuilder, Distance, PointId, PointStruct, PointsIdsList,
    UpsertPointsBuilder, Value as QValue, Vector, VectorParamsBuilder, Vectors, value, vectors,
};
use services::uuid::stable_uuid;
use tracing::{debug, info, warn};

/// Write interface to the vector index.
///
/// Both operations touch exactly one `(index, namespace, id)` triple. The
/// trait exists so the orchestration layer can be exercised against a fake
/// in tests; the production implementation is [`QdrantFacade`].
pub trait IndexWriter: Send + Sync {
    /// Inserts or overwrites the entry stored under `id` in `namespace`.
    fn upsert_entry<'a>(
        &'a self,
        namespace: &'a str,
        id: &'a str,
        vector: Vec<f32>,
        metadata: BTreeMap<String, MetadataValue>,
    ) -> Pin<Box<dyn Future<Output = Result<(), IndexError>> + Send + 'a>>;

    /// Removes the entry stored under `id` in `namespace`. Removing an id
    /// that does not exist is not an error.
    fn delete_entry<'a>(
        &'a self,
        namespace: &'a str,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), IndexError>> + Send + 'a>>;
}

/// A facade over the Qdrant client to keep the rest of the code clean and stable.
///
/// This struct encapsulates:
/// - The underlying Qdrant client (with per-request timeout).
/// - The logical index name used as the collection prefix.
/// - The vector space every namespace collection is created with.
pub struct QdrantFacade {
    client: Qdrant,
    index: String,
    distance: DistanceKind,
    dim: usize,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Uses the modern builder-based API of `qdrant-client` and supports
    /// optional API key authentication.
    pub fn new(cfg: &IndexConfig) -> Result<Self, IndexError> {
        cfg.validate()?; // Early validation of config.

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            index: cfg.index.clone(),
            distance: cfg.distance,
            dim: cfg.embedding_dim,
        })
    }

    /// Collection holding one namespace of the logical index.
    fn collection_name(&self, namespace: &str) -> String {
        format!("{}-{}", self.index, namespace)
    }

    /// Ensures that the namespace collection exists in Qdrant.
    ///
    /// - If the collection already exists → no-op.
    /// - If missing → creates it with the configured vector space.
    async fn ensure_namespace(&self, namespace: &str) -> Result<String, IndexError> {
        let collection = self.collection_name(namespace);
        let space = VectorSpace {
            size: self.dim,
            distance: self.distance,
        };

        // Try to fetch collection info first.
        match self.client.collection_info(&collection).await {
            Ok(_) => {
                debug!("Collection '{}' already exists", collection);
                return Ok(collection);
            }
            Err(err) => {
                debug!(
                    "Collection '{}' not found, will be created (error={})",
                    collection, err
                );
            }
        }

        // Create collection with vector configuration.
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&collection).vectors_config(
                    VectorParamsBuilder::new(space.size as u64, to_distance(space.distance)),
                ),
            )
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        info!(
            "Collection '{}' created (size={} distance={:?})",
            collection, space.size, space.distance
        );
        Ok(collection)
    }
}

impl IndexWriter for QdrantFacade {
    fn upsert_entry<'a>(
        &'a self,
        namespace: &'a str,
        id: &'a str,
        vector: Vec<f32>,
        metadata: BTreeMap<String, MetadataValue>,
    ) -> Pin<Box<dyn Future<Output = Result<(), IndexError>> + Send + 'a>> {
        Box::pin(async move {
            if vector.len() != self.dim {
                return Err(IndexError::VectorSizeMismatch {
                    got: vector.len(),
                    want: self.dim,
                });
            }

            let collection = self.ensure_namespace(namespace).await?;

            let payload: HashMap<String, QValue> = metadata
                .into_iter()
                .map(|(k, v)| (k, metadata_to_qvalue(v)))
                .collect();

            // Stable point id: same question id → same point, so upsert
            // overwrites instead of duplicating.
            let pid: PointId = stable_uuid(id).to_string().into();

            let vectors = Vectors {
                vectors_options: Some(vectors::VectorsOptions::Vector(Vector {
                    data: vector,
                    indices: None,
                    vectors_count: None,
                    vector: None,
                })),
            };

            let point = PointStruct {
                id: Some(pid),
                payload,
                vectors: Some(vectors),
                ..Default::default()
            };

            debug!("Upserting point '{}' into collection '{}'", id, collection);

            self.client
                .upsert_points(UpsertPointsBuilder::new(&collection, vec![point]))
                .await
                .map_err(|e| IndexError::Qdrant(e.to_string()))?;

            Ok(())
        })
    }

    fn delete_entry<'a>(
        &'a self,
        namespace: &'a str,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), IndexError>> + Send + 'a>> {
        Box::pin(async move {
            let collection = self.collection_name(namespace);

            // A namespace that was never written to holds nothing to delete.
            if self.client.collection_info(&collection).await.is_err() {
                warn!(
                    "Collection '{}' does not exist; treating delete of '{}' as a no-op",
                    collection, id
                );
                return Ok(());
            }

            let pid: PointId = stable_uuid(id).to_string().into();

            debug!("Deleting point '{}' from collection '{}'", id, collection);

            self.client
                .delete_points(
                    DeletePointsBuilder::new(&collection).points(PointsIdsList { ids: vec![pid] }),
                )
                .await
                .map_err(|e| IndexError::Qdrant(e.to_string()))?;

            Ok(())
        })
    }
}

/// Maps the crate's distance kind onto the Qdrant enum.
fn to_distance(kind: DistanceKind) -> Distance {
    match kind {
        DistanceKind::Cosine => Distance::Cosine,
        DistanceKind::Dot => Distance::Dot,
        DistanceKind::Euclid => Distance::Euclid,
    }
}

/// Wraps a sanitized metadata value into a Qdrant `Value`.
fn metadata_to_qvalue(v: MetadataValue) -> QValue {
    use value::Kind as K;
    match v {
        MetadataValue::Text(s) => QValue {
            kind: Some(K::StringValue(s)),
        },
        MetadataValue::Number(n) => QValue {
            kind: Some(K::DoubleValue(n)),
        },
        MetadataValue::Flag(b) => QValue {
            kind: Some(K::BoolValue(b)),
        },
    }
}
