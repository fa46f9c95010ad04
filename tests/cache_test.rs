//! Integration tests for the durable signature cache.

use mockup_sdk::cache::{CacheOptions, SignatureCache, CACHE_NAME};
use mockup_sdk::store::{DurableStore, FileStore, MemoryStore, StoreError};
use mockup_sdk::types::CachedSignature;
use mockup_sdk::{
    Alignment, Client, ClientOptions, ColorElement, DesignElement, Environment, MockupRequest,
    ProductSelection,
};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct DisabledStore;

impl DurableStore for DisabledStore {
    fn get_item(&self, _name: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Backend {
            message: "storage is disabled".to_string(),
        })
    }

    fn set_item(&self, _name: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend {
            message: "storage is disabled".to_string(),
        })
    }

    fn remove_item(&self, _name: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend {
            message: "storage is disabled".to_string(),
        })
    }
}

fn options(server: &MockServer) -> ClientOptions {
    ClientOptions {
        environment: Some(Environment::Development),
        mockup_api_url: Some("https://mockups.test".to_string()),
        url_signer_endpoint: Some(format!("{}/v1/sign-url", server.uri())),
        ..ClientOptions::new("acct_1", "client_1")
    }
}

fn request(hex: &str) -> MockupRequest {
    MockupRequest {
        design: vec![DesignElement::Color(ColorElement {
            name: "front".to_string(),
            width: 500,
            height: 500,
            alignment: Alignment::Center,
            hex: hex.to_string(),
            tile: None,
        })],
        product: ProductSelection {
            product_id: "p1".to_string(),
            mockup_id: "m1".to_string(),
            ..Default::default()
        },
    }
}

async fn mount_signer(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/sign-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "signature": "S1",
            "urlWithSignature": "/mockup?productId=p1&signature=S1"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_signatures_shared_through_durable_store() {
    let mock_server = MockServer::start().await;
    mount_signer(&mock_server, 1).await;

    let store = MemoryStore::new();
    let first = Client::with_store(options(&mock_server), Arc::new(store.clone())).unwrap();
    first.mockups().get_mockup_url(&request("#FF0000")).await.unwrap();

    // A later client on the same store starts with the persisted signature.
    let second = Client::with_store(options(&mock_server), Arc::new(store.clone())).unwrap();
    assert_eq!(second.mockups().cache_stats().size, 1);

    let mockup = second.mockups().get_mockup_url(&request("#FF0000")).await.unwrap();
    assert_eq!(mockup.signature().as_deref(), Some("S1"));
}

#[tokio::test]
async fn test_disabled_store_falls_back_to_memory() {
    let mock_server = MockServer::start().await;
    mount_signer(&mock_server, 1).await;

    let client = Client::with_store(options(&mock_server), Arc::new(DisabledStore)).unwrap();
    assert!(!client.mockups().cache_stats().durable_enabled);

    client.mockups().get_mockup_url(&request("#FF0000")).await.unwrap();
    client.mockups().get_mockup_url(&request("#FF0000")).await.unwrap();

    let stats = client.mockups().cache_stats();
    assert!(!stats.durable_enabled);
    assert_eq!(stats.size, 1);
}

#[tokio::test]
async fn test_client_cache_eviction() {
    let mock_server = MockServer::start().await;
    mount_signer(&mock_server, 4).await;

    let client = Client::new(ClientOptions {
        cache: CacheOptions {
            memory_capacity: 2,
            storage_capacity: 1,
        },
        ..options(&mock_server)
    })
    .unwrap();

    for hex in ["#FF0000", "#00FF00", "#0000FF"] {
        client.mockups().get_mockup_url(&request(hex)).await.unwrap();
    }
    assert_eq!(client.mockups().cache_stats().size, 2);

    // The first design was evicted, so it goes back to the signer.
    client.mockups().get_mockup_url(&request("#FF0000")).await.unwrap();
}

#[tokio::test]
async fn test_clear_cache_forces_new_signature() {
    let mock_server = MockServer::start().await;
    mount_signer(&mock_server, 2).await;

    let client = Client::new(options(&mock_server)).unwrap();
    client.mockups().get_mockup_url(&request("#FF0000")).await.unwrap();
    client.mockups().clear_cache();
    assert_eq!(client.mockups().cache_stats().size, 0);

    client.mockups().get_mockup_url(&request("#FF0000")).await.unwrap();
}

#[test]
fn test_file_store_persists_most_recent_subset() {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("mockup_sdk_cache_test_{nanos}"));
    let store = Arc::new(FileStore::open(&dir).unwrap());
    let options = CacheOptions {
        memory_capacity: 10,
        storage_capacity: 3,
    };

    let cache = SignatureCache::with_store(options, store.clone());
    for i in 0..8 {
        cache.set(format!("/mockup?n={i}&accountId=a"), format!("sig-{i}"));
    }
    cache.get("/mockup?n=2&accountId=a");

    let raw = store.get_item(CACHE_NAME).unwrap().unwrap();
    let saved: Vec<CachedSignature> = serde_json::from_str(&raw).unwrap();
    let keys: Vec<_> = saved.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(
        keys,
        ["/mockup?n=2&accountId=a", "/mockup?n=7&accountId=a", "/mockup?n=6&accountId=a"]
    );

    let reloaded = SignatureCache::with_store(options, store);
    assert_eq!(reloaded.stats().size, 3);
    assert_eq!(reloaded.get("/mockup?n=2&accountId=a").as_deref(), Some("sig-2"));
    assert_eq!(reloaded.get("/mockup?n=0&accountId=a"), None);

    std::fs::remove_dir_all(&dir).unwrap();
}
