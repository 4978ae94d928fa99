//! End-to-end tests over the file-backed adapters.

mod common;

use common::{account, key, token, SERVICE};
use credcache::adapters::{FileAccountStorage, FileCredentialStore};
use credcache::{AccountStore, PropertiesPatch, TokenCache, TokenCacheConfig, TokenQuery};
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_token_cache_over_files() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileCredentialStore::at(temp_dir.path().join("credentials")).with_max_value_len(96);
    let config = TokenCacheConfig::new(SERVICE).with_chunk_size(96);

    let cache = TokenCache::new(store.clone(), config.clone()).unwrap();
    cache
        .add(vec![token("alice", "arm"), token("bob", "graph")])
        .await
        .unwrap();
    assert!(store.path_for(&format!("{}_index", SERVICE)).exists());
    assert!(store.path_for(&format!("{}_1", SERVICE)).exists());

    // A second process sees the same tokens.
    let reopened = TokenCache::new(store.clone(), config).unwrap();
    let bob = reopened
        .find(TokenQuery::new().user_id("bob"))
        .await
        .unwrap();
    assert_eq!(bob, vec![token("bob", "graph")]);

    reopened.clear().await.unwrap();
    assert!(!store.path_for(&format!("{}_index", SERVICE)).exists());
    assert!(cache.entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_account_store_over_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state").join("accounts.json");

    let store = AccountStore::new(FileAccountStorage::at(&path));
    store.add_or_update(account("alice")).await.unwrap();
    store
        .update_properties(&key("alice"), PropertiesPatch::new().set("tenant", json!("t-1")))
        .await
        .unwrap();
    assert!(path.exists());

    let reopened = AccountStore::new(FileAccountStorage::at(&path));
    let alice = reopened
        .get_account_by_key(&key("alice"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alice.properties.get("tenant"), Some(&json!("t-1")));
}
