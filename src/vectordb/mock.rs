use std::collections::HashMap;

use crate::vectordb::{
    CachePoint, QueryHit, RecordPayload, VectorDbError, VectorStore, cosine_similarity,
};

/// In-memory vector store honoring the full [`VectorStore`] contract,
/// including duplicate-id rejection and server-side scope filtering.
#[derive(Default)]
pub struct MockVectorStore {
    collections: std::sync::RwLock<HashMap<String, MockCollection>>,
}

#[derive(Default, Clone)]
struct MockCollection {
    vector_size: u64,
    points: HashMap<u64, MockStoredPoint>,
}

#[derive(Clone)]
struct MockStoredPoint {
    vector: Vec<f32>,
    payload: RecordPayload,
}

impl MockVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .ok()?
            .get(collection)
            .map(|c| c.points.len())
    }
}

impl VectorStore for MockVectorStore {
    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        let mut collections =
            self.collections
                .write()
                .map_err(|_| VectorDbError::CreateCollectionFailed {
                    collection: name.to_string(),
                    message: "lock poisoned".to_string(),
                })?;

        collections
            .entry(name.to_string())
            .or_insert(MockCollection {
                vector_size,
                points: HashMap::new(),
            });

        Ok(())
    }

    async fn add(&self, collection: &str, point: CachePoint) -> Result<(), VectorDbError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| VectorDbError::AddFailed {
                collection: collection.to_string(),
                message: "lock poisoned".to_string(),
            })?;

        let coll =
            collections
                .get_mut(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        if point.vector.len() as u64 != coll.vector_size {
            return Err(VectorDbError::InvalidDimension {
                expected: coll.vector_size as usize,
                actual: point.vector.len(),
            });
        }

        if coll.points.contains_key(&point.id) {
            return Err(VectorDbError::DuplicateId {
                collection: collection.to_string(),
                point_id: point.id,
            });
        }

        coll.points.insert(
            point.id,
            MockStoredPoint {
                vector: point.vector,
                payload: point.payload,
            },
        );

        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
        scope_filter: Option<i64>,
    ) -> Result<Vec<QueryHit>, VectorDbError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: "lock poisoned".to_string(),
            })?;

        let coll =
            collections
                .get(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        let mut hits: Vec<QueryHit> = coll
            .points
            .values()
            .filter(|p| scope_filter.is_none() || scope_filter == Some(p.payload.scope_id))
            .map(|p| QueryHit {
                distance: 1.0 - cosine_similarity(&vector, &p.vector),
                payload: p.payload.clone(),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        hits.truncate(limit as usize);
        Ok(hits)
    }

    async fn count(&self, collection: &str) -> Result<u64, VectorDbError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| VectorDbError::CountFailed {
                collection: collection.to_string(),
                message: "lock poisoned".to_string(),
            })?;

        let coll =
            collections
                .get(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        Ok(coll.points.len() as u64)
    }

    async fn scan_payloads(&self, collection: &str) -> Result<Vec<RecordPayload>, VectorDbError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| VectorDbError::ScanFailed {
                collection: collection.to_string(),
                message: "lock poisoned".to_string(),
            })?;

        let coll =
            collections
                .get(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        Ok(coll.points.values().map(|p| p.payload.clone()).collect())
    }

    async fn drop_collection(&self, name: &str) -> Result<(), VectorDbError> {
        let mut collections =
            self.collections
                .write()
                .map_err(|_| VectorDbError::DropCollectionFailed {
                    collection: name.to_string(),
                    message: "lock poisoned".to_string(),
                })?;

        collections.remove(name);
        Ok(())
    }
}
