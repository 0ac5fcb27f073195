use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CountPointsBuilder, CreateCollectionBuilder, Distance, Filter, GetPointsBuilder,
    PointId, PointStruct, ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};

use super::error::VectorDbError;
use super::model::{
    CachePoint, QueryHit, RecordPayload, SCOPE_FIELD, payload_from_retrieved_point,
};

const SCROLL_PAGE_SIZE: u32 = 256;

#[derive(Clone)]
/// Qdrant-backed vector store.
pub struct QdrantStore {
    client: Qdrant,
    url: String,
}

impl QdrantStore {
    /// Creates a store client for `url`.
    pub async fn new(url: &str) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Creates a collection with cosine distance.
    pub async fn create_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> Result<(), VectorDbError> {
        let vectors_config = VectorParamsBuilder::new(vector_size, Distance::Cosine);

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(vectors_config)
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn point_exists(&self, collection: &str, id: u64) -> Result<bool, VectorDbError> {
        let ids: Vec<PointId> = vec![id.into()];

        let response = self
            .client
            .get_points(GetPointsBuilder::new(collection, ids))
            .await
            .map_err(|e| VectorDbError::AddFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(!response.result.is_empty())
    }
}

/// Minimal async interface used by the cache service.
///
/// Distances are ascending cosine distances in `[0, 2]`. `add` rejects an
/// existing id and the point is searchable once the call returns.
pub trait VectorStore: Send + Sync {
    /// Ensures a collection exists (creates it if missing).
    fn ensure_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Inserts a point; fails with [`VectorDbError::DuplicateId`] if the id
    /// is taken.
    fn add(
        &self,
        collection: &str,
        point: CachePoint,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Returns up to `limit` nearest neighbors, ascending by distance.
    ///
    /// When `scope_filter` is set, only points whose scope payload field
    /// matches exactly are considered. The filter runs server-side so that
    /// isolation holds even while concurrent saves are in flight.
    fn query(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
        scope_filter: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<QueryHit>, VectorDbError>> + Send;

    /// Exact number of stored points.
    fn count(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<u64, VectorDbError>> + Send;

    /// Full payload scan, used for aggregate statistics.
    fn scan_payloads(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<Vec<RecordPayload>, VectorDbError>> + Send;

    /// Irreversibly deletes the collection.
    fn drop_collection(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;
}

impl VectorStore for QdrantStore {
    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        let exists = self.client.collection_exists(name).await.map_err(|e| {
            VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            }
        })?;

        if !exists {
            self.create_collection(name, vector_size).await?;
        }

        Ok(())
    }

    async fn add(&self, collection: &str, point: CachePoint) -> Result<(), VectorDbError> {
        // Existence probe before the write: upsert semantics would silently
        // overwrite on an id collision, and entries are immutable.
        if self.point_exists(collection, point.id).await? {
            return Err(VectorDbError::DuplicateId {
                collection: collection.to_string(),
                point_id: point.id,
            });
        }

        let qdrant_point =
            PointStruct::new(point.id, point.vector, point.payload.to_qdrant_payload());

        // wait=true: the entry must be searchable once save returns.
        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, vec![qdrant_point]).wait(true))
            .await
            .map_err(|e| VectorDbError::AddFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
        scope_filter: Option<i64>,
    ) -> Result<Vec<QueryHit>, VectorDbError> {
        let mut search_builder =
            SearchPointsBuilder::new(collection, vector, limit).with_payload(true);

        if let Some(scope_id) = scope_filter {
            let filter = Filter::must([Condition::matches(SCOPE_FIELD, scope_id)]);
            search_builder = search_builder.filter(filter);
        }

        let search_result = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        // Qdrant returns descending similarity, which is ascending distance.
        let hits = search_result
            .result
            .into_iter()
            .map(QueryHit::from_scored_point)
            .collect();

        Ok(hits)
    }

    async fn count(&self, collection: &str) -> Result<u64, VectorDbError> {
        let response = self
            .client
            .count(CountPointsBuilder::new(collection).exact(true))
            .await
            .map_err(|e| VectorDbError::CountFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }

    async fn scan_payloads(&self, collection: &str) -> Result<Vec<RecordPayload>, VectorDbError> {
        let mut payloads = Vec::new();
        let mut offset: Option<PointId> = None;

        loop {
            let mut scroll_builder = ScrollPointsBuilder::new(collection)
                .limit(SCROLL_PAGE_SIZE)
                .with_payload(true)
                .with_vectors(false);

            if let Some(next) = offset.take() {
                scroll_builder = scroll_builder.offset(next);
            }

            let response = self.client.scroll(scroll_builder).await.map_err(|e| {
                VectorDbError::ScanFailed {
                    collection: collection.to_string(),
                    message: e.to_string(),
                }
            })?;

            payloads.extend(response.result.iter().map(payload_from_retrieved_point));

            match response.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(payloads)
    }

    async fn drop_collection(&self, name: &str) -> Result<(), VectorDbError> {
        self.client
            .delete_collection(name)
            .await
            .map_err(|e| VectorDbError::DropCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}
