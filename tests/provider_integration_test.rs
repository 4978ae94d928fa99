//! Integration tests for an account provider driving both components.
//!
//! Sign-in puts tokens in the cache and the account in the store; clearing
//! an account removes its tokens and marks it stale; startup reconciles the
//! restored accounts with whatever tokens survived.

mod common;

use std::sync::Arc;

use common::{account, expired_token, key, test_cache, token, TestAccountProvider};
use credcache::adapters::InMemoryAccountStorage;
use credcache::{AccountProvider, AccountStore, CredCacheError, TokenQuery};

fn provider() -> TestAccountProvider {
    TestAccountProvider::new(
        Arc::new(test_cache(128)),
        Arc::new(AccountStore::new(InMemoryAccountStorage::new())),
    )
}

#[tokio::test]
async fn test_prompt_stores_tokens_and_account() {
    let provider = provider();
    provider.script_sign_in(
        account("alice"),
        vec![token("alice", "arm"), token("alice", "graph")],
    );

    let signed_in = provider.prompt().await.unwrap();
    assert_eq!(signed_in.key, key("alice"));
    assert!(!signed_in.is_stale);

    let tokens = provider
        .cache
        .find(TokenQuery::new().user_id("alice"))
        .await
        .unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(provider.accounts.get_accounts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_prompt_cancelled() {
    let provider = provider();
    let err = provider.prompt().await.unwrap_err();
    assert!(matches!(err, CredCacheError::Provider(_)));
    assert!(!err.is_retryable());
    assert_eq!(err.error_code(), "PROVIDER");
}

#[tokio::test]
async fn test_clear_removes_only_that_users_tokens() {
    let provider = provider();
    provider.script_sign_in(account("alice"), vec![token("alice", "arm")]);
    provider.script_sign_in(account("bob"), vec![token("bob", "arm")]);
    provider.prompt().await.unwrap();
    provider.prompt().await.unwrap();

    provider.clear(&key("alice")).await.unwrap();

    assert_eq!(
        provider.cache.entries().await.unwrap(),
        vec![token("bob", "arm")]
    );
    let alice = provider
        .accounts
        .get_account_by_key(&key("alice"))
        .await
        .unwrap()
        .unwrap();
    assert!(alice.is_stale);
}

#[tokio::test]
async fn test_sign_in_again_after_clear_revives_account() {
    let provider = provider();
    provider.script_sign_in(account("alice"), vec![token("alice", "arm")]);
    provider.prompt().await.unwrap();
    provider.clear(&key("alice")).await.unwrap();

    let mut events = provider.accounts.subscribe();
    provider.script_sign_in(account("alice"), vec![token("alice", "arm")]);
    let revived = provider.prompt().await.unwrap();

    assert!(!revived.is_stale);
    let change = events.recv().await.unwrap();
    assert_eq!(change.modified.len(), 1);
    assert!(change.modified[0].before.is_stale);
}

#[tokio::test]
async fn test_initialize_marks_accounts_without_tokens_stale() {
    let provider = provider();
    provider
        .cache
        .add(vec![token("alice", "arm"), expired_token("bob", "arm")])
        .await
        .unwrap();

    let restored = vec![account("alice"), account("bob"), account("carol")];
    let initialized = provider.initialize(restored).await.unwrap();

    let stale: Vec<_> = initialized
        .iter()
        .map(|a| (a.key.account_id.as_str(), a.is_stale))
        .collect();
    assert_eq!(
        stale,
        vec![("alice", false), ("bob", true), ("carol", true)]
    );
}
