use super::client::VectorStore;
use super::error::VectorDbError;
use super::mock::MockVectorStore;
use super::model::{CachePoint, RecordPayload, cosine_similarity};

const TEST_COLLECTION: &str = "test_cached_code";
const TEST_VECTOR_SIZE: u64 = 8;

fn unit_vector(axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; TEST_VECTOR_SIZE as usize];
    v[axis % TEST_VECTOR_SIZE as usize] = 1.0;
    v
}

fn test_payload(entry_id: &str, scope_id: i64) -> RecordPayload {
    RecordPayload {
        entry_id: entry_id.to_string(),
        code: format!("print('{entry_id}')"),
        action: "generate_code".to_string(),
        action_description: "test snippet".to_string(),
        scope_id,
        success_count: 1,
        created_at: "2026-08-30T10:00:00Z".to_string(),
        input_schema_json: "{}".to_string(),
        config_json: "{}".to_string(),
        insights_json: "[]".to_string(),
        libraries_json: "[]".to_string(),
        required_keys_json: "[]".to_string(),
    }
}

fn test_point(id: u64, axis: usize, scope_id: i64) -> CachePoint {
    CachePoint::new(id, unit_vector(axis), test_payload(&format!("code_{id}"), scope_id))
}

#[tokio::test]
async fn test_ensure_collection_creates_new() {
    let store = MockVectorStore::new();

    store
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .expect("should create collection");

    assert_eq!(store.point_count(TEST_COLLECTION), Some(0));
}

#[tokio::test]
async fn test_ensure_collection_idempotent() {
    let store = MockVectorStore::new();

    store
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();
    store
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();

    assert_eq!(store.point_count(TEST_COLLECTION), Some(0));
}

#[tokio::test]
async fn test_add_rejects_duplicate_id() {
    let store = MockVectorStore::new();
    store
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();

    store
        .add(TEST_COLLECTION, test_point(1, 0, -1))
        .await
        .expect("first add should succeed");

    let result = store.add(TEST_COLLECTION, test_point(1, 1, -1)).await;

    assert!(matches!(
        result,
        Err(VectorDbError::DuplicateId { point_id: 1, .. })
    ));
    assert_eq!(store.point_count(TEST_COLLECTION), Some(1));
}

#[tokio::test]
async fn test_add_rejects_wrong_dimension() {
    let store = MockVectorStore::new();
    store
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();

    let point = CachePoint::new(1, vec![1.0, 0.0], test_payload("code_1", -1));
    let result = store.add(TEST_COLLECTION, point).await;

    assert!(matches!(
        result,
        Err(VectorDbError::InvalidDimension {
            expected: 8,
            actual: 2
        })
    ));
}

#[tokio::test]
async fn test_add_to_missing_collection_fails() {
    let store = MockVectorStore::new();

    let result = store.add("missing", test_point(1, 0, -1)).await;

    assert!(matches!(
        result,
        Err(VectorDbError::CollectionNotFound { .. })
    ));
}

#[tokio::test]
async fn test_query_returns_ascending_distance() {
    let store = MockVectorStore::new();
    store
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();

    store
        .add(TEST_COLLECTION, test_point(1, 0, -1))
        .await
        .unwrap();
    store
        .add(TEST_COLLECTION, test_point(2, 1, -1))
        .await
        .unwrap();

    // Query closer to axis 0 than axis 1.
    let mut query = vec![0.0; TEST_VECTOR_SIZE as usize];
    query[0] = 1.0;
    query[1] = 0.2;

    let hits = store.query(TEST_COLLECTION, query, 10, None).await.unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].payload.entry_id, "code_1");
    assert!(hits[0].distance <= hits[1].distance);
}

#[tokio::test]
async fn test_query_limit_truncates() {
    let store = MockVectorStore::new();
    store
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();

    for id in 0..5 {
        store
            .add(TEST_COLLECTION, test_point(id, id as usize, -1))
            .await
            .unwrap();
    }

    let hits = store
        .query(TEST_COLLECTION, unit_vector(0), 2, None)
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_query_scope_filter_is_exact() {
    let store = MockVectorStore::new();
    store
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();

    store
        .add(TEST_COLLECTION, test_point(1, 0, 5))
        .await
        .unwrap();
    store
        .add(TEST_COLLECTION, test_point(2, 0, 7))
        .await
        .unwrap();
    // Sentinel/global entry must not leak into scoped queries either.
    store
        .add(TEST_COLLECTION, test_point(3, 0, -1))
        .await
        .unwrap();

    let hits = store
        .query(TEST_COLLECTION, unit_vector(0), 10, Some(7))
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].payload.entry_id, "code_2");

    let unscoped = store
        .query(TEST_COLLECTION, unit_vector(0), 10, None)
        .await
        .unwrap();
    assert_eq!(unscoped.len(), 3);
}

#[tokio::test]
async fn test_count_and_scan() {
    let store = MockVectorStore::new();
    store
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();

    assert_eq!(store.count(TEST_COLLECTION).await.unwrap(), 0);

    store
        .add(TEST_COLLECTION, test_point(1, 0, -1))
        .await
        .unwrap();
    store
        .add(TEST_COLLECTION, test_point(2, 1, 5))
        .await
        .unwrap();

    assert_eq!(store.count(TEST_COLLECTION).await.unwrap(), 2);

    let payloads = store.scan_payloads(TEST_COLLECTION).await.unwrap();
    assert_eq!(payloads.len(), 2);
    assert!(payloads.iter().any(|p| p.entry_id == "code_1"));
}

#[tokio::test]
async fn test_drop_collection_removes_everything() {
    let store = MockVectorStore::new();
    store
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();
    store
        .add(TEST_COLLECTION, test_point(1, 0, -1))
        .await
        .unwrap();

    store.drop_collection(TEST_COLLECTION).await.unwrap();

    assert_eq!(store.point_count(TEST_COLLECTION), None);

    // Recreate yields an empty collection under the same name.
    store
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();
    assert_eq!(store.count(TEST_COLLECTION).await.unwrap(), 0);
}

#[test]
fn test_record_payload_qdrant_round_trip() {
    let payload = test_payload("code_0_1764000000000000000", 5);

    let map = payload.to_qdrant_payload();
    let decoded = RecordPayload::from_qdrant_payload(&map);

    assert_eq!(decoded, payload);
}

#[test]
fn test_record_payload_missing_fields_default() {
    let decoded = RecordPayload::from_qdrant_payload(&std::collections::HashMap::new());

    assert_eq!(decoded, RecordPayload::default());
}

#[test]
fn test_cosine_similarity_bounds() {
    let a = [1.0, 0.0, 0.0];
    let b = [0.0, 1.0, 0.0];
    let c = [1.0, 0.0, 0.0];

    assert_eq!(cosine_similarity(&a, &b), 0.0);
    assert!((cosine_similarity(&a, &c) - 1.0).abs() < 1e-6);
    assert_eq!(cosine_similarity(&a, &[]), 0.0);
    assert_eq!(cosine_similarity(&a, &[0.0, 0.0, 0.0]), 0.0);
}
