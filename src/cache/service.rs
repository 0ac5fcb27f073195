use std::collections::BTreeSet;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::constants::{FILTER_FETCH_MULTIPLIER, MAX_COSINE_DISTANCE};
use crate::embedding::EmbeddingProvider;
use crate::hashing::point_id_for_entry;
use crate::vectordb::{CachePoint, VectorStore};

use super::document::{CacheDocument, CacheMatch, CacheStats, SearchParams};
use super::error::{CacheError, CacheResult};
use super::payload::{decode_match, encode_payload};
use super::searchable::build_searchable_text;

/// Converts a raw store distance to a bounded similarity score.
///
/// Heuristic normalization, not a probabilistic measure: it assumes the
/// store's metric is scaled so that `2.0` means maximal dissimilarity, which
/// holds for cosine distance. Swap this function if the underlying metric
/// changes.
pub fn score_from_distance(distance: f32) -> f32 {
    (1.0 - distance / MAX_COSINE_DISTANCE).clamp(0.0, 1.0)
}

fn round_score(score: f32) -> f32 {
    (score * 10_000.0).round() / 10_000.0
}

/// Semantic cache for generated code snippets.
///
/// Orchestrates save and search over an embedding provider and a vector
/// store. Save fails closed with an explicit error; search fails open,
/// degrading to "no cache hit" so a provider outage never errors out the
/// surrounding workflow.
pub struct CodeCacheService<E: EmbeddingProvider, S: VectorStore> {
    embedder: E,
    store: S,
    collection_name: String,
}

impl<E: EmbeddingProvider, S: VectorStore> std::fmt::Debug for CodeCacheService<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeCacheService")
            .field("collection_name", &self.collection_name)
            .field("embedding_model", &self.embedder.model())
            .field("embedding_dim", &self.embedder.dim())
            .finish_non_exhaustive()
    }
}

impl<E: EmbeddingProvider, S: VectorStore> CodeCacheService<E, S> {
    pub fn new(embedder: E, store: S, collection_name: impl Into<String>) -> Self {
        Self {
            embedder,
            store,
            collection_name: collection_name.into(),
        }
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates the backing collection if it does not exist yet. Call once at
    /// startup.
    pub async fn ensure_collection(&self) -> CacheResult<()> {
        self.store
            .ensure_collection(&self.collection_name, self.embedder.dim() as u64)
            .await?;
        Ok(())
    }

    /// Saves a snippet and returns its assigned entry id.
    ///
    /// Validation runs before any external call; on embedding or store
    /// failure no partial entry is created.
    #[instrument(skip(self, document), fields(action = %document.action))]
    pub async fn save(&self, document: &CacheDocument) -> CacheResult<String> {
        Self::validate(document)?;

        let searchable_text =
            build_searchable_text(&document.description, &document.input_schema);

        debug!(
            text_len = searchable_text.len(),
            "Generating embedding for entry"
        );
        let embedding = self.embedder.embed(&searchable_text).await?;

        let entry_id = self.next_entry_id().await?;

        let created_at = if document.metadata.created_at.is_empty() {
            Utc::now().to_rfc3339()
        } else {
            document.metadata.created_at.clone()
        };

        let payload = encode_payload(&entry_id, document, created_at);
        let point = CachePoint::new(point_id_for_entry(&entry_id), embedding, payload);

        self.store.add(&self.collection_name, point).await?;

        info!(
            entry_id = %entry_id,
            scope_id = ?document.scope_id,
            "Saved code to semantic cache"
        );

        Ok(entry_id)
    }

    /// Searches for snippets semantically similar to `query_text`.
    ///
    /// Fail-open: any embedding or store failure is logged and yields an
    /// empty list.
    #[instrument(
        skip(self, query_text),
        fields(
            query_len = query_text.len(),
            threshold = params.threshold,
            limit = params.limit,
            scope_id = ?params.scope_id,
        )
    )]
    pub async fn search(&self, query_text: &str, params: &SearchParams) -> Vec<CacheMatch> {
        match self.try_search(query_text, params).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!(error = %e, "Search failed, degrading to no cache hit");
                Vec::new()
            }
        }
    }

    async fn try_search(
        &self,
        query_text: &str,
        params: &SearchParams,
    ) -> CacheResult<Vec<CacheMatch>> {
        // Short circuit before the provider call: an empty cache has nothing
        // to match and the embedding round trip is not free.
        if self.store.count(&self.collection_name).await? == 0 {
            debug!("Code cache is empty, no results");
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query_text).await?;

        let fetch_count = if params.needs_wide_fetch() {
            params.limit * FILTER_FETCH_MULTIPLIER
        } else {
            params.limit
        };

        let hits = self
            .store
            .query(
                &self.collection_name,
                query_embedding,
                fetch_count as u64,
                params.scope_id,
            )
            .await?;

        let candidate_count = hits.len();
        let available_keys: Option<HashSet<&str>> = params
            .available_keys
            .as_ref()
            .map(|keys| keys.iter().map(String::as_str).collect());

        let mut matches = Vec::new();

        // Hits arrive in ascending distance, so accepted matches are already
        // in descending score order.
        for hit in hits {
            let score = score_from_distance(hit.distance);
            if score < params.threshold {
                continue;
            }

            let matched = decode_match(&hit.payload, round_score(score));

            // Superset compatibility: every declared schema key must be
            // available in the calling context. `required_keys` stays
            // unenforced; callers validate it themselves.
            if let Some(ref available) = available_keys {
                let compatible = matched
                    .input_schema
                    .keys()
                    .all(|key| available.contains(key.as_str()));
                if !compatible {
                    debug!(
                        entry_id = %hit.payload.entry_id,
                        "Candidate schema requires unavailable keys, skipping"
                    );
                    continue;
                }
            }

            matches.push(matched);

            if matches.len() >= params.limit {
                break;
            }
        }

        info!(
            candidates = candidate_count,
            matches = matches.len(),
            "Search complete"
        );

        Ok(matches)
    }

    /// Aggregate statistics via a full metadata scan.
    ///
    /// Acceptable at modest corpus sizes only; a corpus beyond a few
    /// thousand entries wants incrementally maintained counters instead.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> CacheResult<CacheStats> {
        let total = self.store.count(&self.collection_name).await?;
        if total == 0 {
            return Ok(CacheStats::empty());
        }

        let payloads = self.store.scan_payloads(&self.collection_name).await?;

        let mut actions = BTreeSet::new();
        let mut total_success: i64 = 0;

        for payload in &payloads {
            actions.insert(payload.action.clone());
            total_success += payload.success_count;
        }

        let avg = total_success as f64 / total as f64;

        Ok(CacheStats {
            total,
            actions: actions.into_iter().collect(),
            avg_success_count: (avg * 100.0).round() / 100.0,
        })
    }

    /// Irreversibly drops all cached entries and recreates the empty
    /// collection under the same name.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> CacheResult<()> {
        warn!(collection = %self.collection_name, "Clearing code cache collection");

        self.store.drop_collection(&self.collection_name).await?;
        self.ensure_collection().await?;

        info!("Code cache cleared and recreated");
        Ok(())
    }

    fn validate(document: &CacheDocument) -> CacheResult<()> {
        if document.description.trim().is_empty() {
            return Err(CacheError::Validation {
                field: "description",
            });
        }

        if document.code.trim().is_empty() {
            return Err(CacheError::Validation { field: "code" });
        }

        Ok(())
    }

    /// Synthesizes `code_{seq}_{nanos}`.
    ///
    /// Collision-avoidance heuristic, not a coordinated allocator: the
    /// sequence component is the current store count and may repeat under
    /// concurrent saves. The store's `add` rejects the rare collision
    /// instead of overwriting.
    async fn next_entry_id(&self) -> CacheResult<String> {
        let sequence = self.store.count(&self.collection_name).await?;
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();

        Ok(format!("code_{sequence}_{nanos}"))
    }
}

/// Cheaply cloneable handle to a shared service instance.
///
/// Constructed explicitly at startup and passed through request context;
/// there is no process-wide singleton.
pub struct CodeCacheHandle<E: EmbeddingProvider, S: VectorStore> {
    inner: Arc<CodeCacheService<E, S>>,
}

impl<E: EmbeddingProvider, S: VectorStore> Clone for CodeCacheHandle<E, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: EmbeddingProvider, S: VectorStore> CodeCacheHandle<E, S> {
    pub fn new(service: CodeCacheService<E, S>) -> Self {
        Self {
            inner: Arc::new(service),
        }
    }

    pub async fn ensure_collection(&self) -> CacheResult<()> {
        self.inner.ensure_collection().await
    }

    pub async fn save(&self, document: &CacheDocument) -> CacheResult<String> {
        self.inner.save(document).await
    }

    pub async fn search(&self, query_text: &str, params: &SearchParams) -> Vec<CacheMatch> {
        self.inner.search(query_text, params).await
    }

    pub async fn stats(&self) -> CacheResult<CacheStats> {
        self.inner.stats().await
    }

    pub async fn clear(&self) -> CacheResult<()> {
        self.inner.clear().await
    }

    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<E: EmbeddingProvider, S: VectorStore> std::fmt::Debug for CodeCacheHandle<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeCacheHandle")
            .field("strong_count", &self.strong_count())
            .finish()
    }
}
