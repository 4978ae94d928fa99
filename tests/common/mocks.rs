//! Test account provider.
//!
//! Drives a token cache and an account store the way a real provider would,
//! with sign-in results scripted up front instead of coming from a browser.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use credcache::adapters::{InMemoryAccountStorage, InMemoryCredentialStore};
use credcache::{
    Account, AccountKey, AccountProvider, AccountStore, CredCacheError, CredCacheResult,
    TokenCache, TokenCacheEntry, TokenQuery,
};

/// One scripted interactive sign-in.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub account: Account,
    pub tokens: Vec<TokenCacheEntry>,
}

/// [`AccountProvider`] backed by in-memory storage.
pub struct TestAccountProvider {
    pub cache: Arc<TokenCache<InMemoryCredentialStore>>,
    pub accounts: Arc<AccountStore<InMemoryAccountStorage>>,
    sign_ins: Mutex<VecDeque<SignIn>>,
}

impl TestAccountProvider {
    pub fn new(
        cache: Arc<TokenCache<InMemoryCredentialStore>>,
        accounts: Arc<AccountStore<InMemoryAccountStorage>>,
    ) -> Self {
        Self {
            cache,
            accounts,
            sign_ins: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue the result of the next `prompt` call.
    pub fn script_sign_in(&self, account: Account, tokens: Vec<TokenCacheEntry>) {
        self.sign_ins
            .lock()
            .unwrap()
            .push_back(SignIn { account, tokens });
    }

    fn tokens_for(key: &AccountKey) -> TokenQuery {
        TokenQuery::new().user_id(key.account_id.clone())
    }
}

#[async_trait]
impl AccountProvider for TestAccountProvider {
    async fn prompt(&self) -> CredCacheResult<Account> {
        let sign_in = self
            .sign_ins
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CredCacheError::Provider("sign-in cancelled".to_string()))?;

        self.cache.add(sign_in.tokens).await?;
        let stored = self
            .accounts
            .add_or_update(sign_in.account.with_stale(false))
            .await?;
        Ok(stored)
    }

    async fn clear(&self, key: &AccountKey) -> CredCacheResult<()> {
        self.cache.remove_matching(Self::tokens_for(key)).await?;
        self.accounts.update_state(key, true).await?;
        Ok(())
    }

    async fn initialize(&self, restored: Vec<Account>) -> CredCacheResult<Vec<Account>> {
        let mut initialized = Vec::with_capacity(restored.len());
        for account in restored {
            let tokens = self.cache.find(Self::tokens_for(&account.key)).await?;
            let usable = tokens.iter().any(|t| !t.is_expired());
            initialized.push(account.with_stale(!usable));
        }
        Ok(initialized)
    }
}
