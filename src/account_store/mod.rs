//! Account reconciliation store.
//!
//! Keeps a de-duplicated list of accounts in an [`AccountStorage`] blob and
//! an in-memory baseline of the list as last observed. Every mutation
//! re-reads the blob, applies the change to a copy, writes the copy back and
//! diffs it against the baseline. Non-empty diffs are published as
//! [`AccountChangeEvent`]s on a broadcast channel; subscribers receive them
//! on their own task, never on the mutating caller's stack.
//!
//! All operations on one store run through a single [`OperationChain`].

mod merge;
mod sync;

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::AccountStoreConfig;
use crate::error::AccountStoreError;
use crate::models::{Account, AccountKey, DisplayInfo};
use crate::op_chain::OperationChain;
use crate::traits::AccountStorage;

pub use merge::{merge, PropertiesPatch};
pub use sync::{sync, AccountChangeEvent, AccountModification, SyncOutcome};

/// What a mutation did to the working copy, plus the value to hand back.
enum Applied<T> {
    /// The list changed and must be persisted.
    Changed(T),
    /// Nothing to persist.
    Unchanged(T),
}

/// Persisted, change-tracked account list.
///
/// # Example
///
/// ```ignore
/// use credcache::{AccountStore, Account, AccountKey, DisplayInfo};
///
/// let store = AccountStore::new(storage);
/// let mut changes = store.subscribe();
///
/// store.add_or_update(account).await?;
/// let event = changes.recv().await?;
/// assert_eq!(event.added.len(), 1);
/// ```
pub struct AccountStore<S> {
    inner: Arc<StoreInner<S>>,
    chain: OperationChain,
}

/// State shared with queued operations.
struct StoreInner<S> {
    name: String,
    storage: S,
    /// The list as of the last reconciliation; `None` until first read.
    baseline: Mutex<Option<Vec<Account>>>,
    events: broadcast::Sender<AccountChangeEvent>,
}

impl<S: AccountStorage + 'static> AccountStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, AccountStoreConfig::default())
    }

    pub fn with_config(storage: S, config: AccountStoreConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let chain =
            OperationChain::new(config.name.clone()).with_timeout(config.operation_timeout);
        Self {
            inner: Arc::new(StoreInner {
                name: config.name,
                storage,
                baseline: Mutex::new(None),
                events,
            }),
            chain,
        }
    }

    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    /// Receive a [`AccountChangeEvent`] for every reconciliation that
    /// changes the list.
    pub fn subscribe(&self) -> broadcast::Receiver<AccountChangeEvent> {
        self.inner.events.subscribe()
    }

    /// Add `account`, or merge it into the stored account with the same key.
    ///
    /// Returns the stored result: the new account, the merged account, or the
    /// existing account untouched when the merge changes nothing.
    pub fn add_or_update(
        &self,
        account: Account,
    ) -> impl Future<Output = Result<Account, AccountStoreError>> {
        let inner = Arc::clone(&self.inner);
        self.chain.enqueue(async move {
            inner
                .mutate(move |accounts| {
                    let Some(i) = accounts.iter().position(|a| a.key.matches(&account.key))
                    else {
                        accounts.push(account.clone());
                        return Applied::Changed(account);
                    };
                    let patch = PropertiesPatch::from_properties(&account.properties);
                    match merge(
                        &accounts[i],
                        Some(&account.display_info),
                        Some(&patch),
                        Some(account.is_stale),
                    ) {
                        Some(merged) => {
                            accounts[i] = merged.clone();
                            Applied::Changed(merged)
                        }
                        None => Applied::Unchanged(accounts[i].clone()),
                    }
                })
                .await
        })
    }

    /// The reconciled list. Reads storage only if nothing was read yet.
    pub fn get_accounts(&self) -> impl Future<Output = Result<Vec<Account>, AccountStoreError>> {
        let inner = Arc::clone(&self.inner);
        self.chain
            .enqueue(async move { inner.refresh_accounts(false).await })
    }

    /// Re-read storage and reconcile, publishing any out-of-band changes.
    pub fn refresh(&self) -> impl Future<Output = Result<Vec<Account>, AccountStoreError>> {
        let inner = Arc::clone(&self.inner);
        self.chain
            .enqueue(async move { inner.refresh_accounts(true).await })
    }

    /// The single account matching `key`. `None` when no account or more
    /// than one account matches.
    pub fn get_account_by_key(
        &self,
        key: &AccountKey,
    ) -> impl Future<Output = Result<Option<Account>, AccountStoreError>> {
        let inner = Arc::clone(&self.inner);
        let key = key.clone();
        self.chain.enqueue(async move {
            let accounts = inner.refresh_accounts(false).await?;
            let mut matches = accounts.into_iter().filter(|a| a.key.matches(&key));
            let found = match (matches.next(), matches.next()) {
                (Some(account), None) => Some(account),
                (Some(_), Some(_)) => {
                    debug!(provider = %key.provider_id, "ambiguous account key");
                    None
                }
                _ => None,
            };
            Ok::<_, AccountStoreError>(found)
        })
    }

    /// Every account owned by `provider_id`.
    pub fn get_accounts_by_provider(
        &self,
        provider_id: &str,
    ) -> impl Future<Output = Result<Vec<Account>, AccountStoreError>> {
        let inner = Arc::clone(&self.inner);
        let provider_id = provider_id.to_string();
        self.chain.enqueue(async move {
            let accounts = inner.refresh_accounts(false).await?;
            Ok::<_, AccountStoreError>(
                accounts
                    .into_iter()
                    .filter(|a| a.key.provider_id == provider_id)
                    .collect(),
            )
        })
    }

    /// Remove the first account matching `key` and return it.
    pub fn remove(
        &self,
        key: &AccountKey,
    ) -> impl Future<Output = Result<Option<Account>, AccountStoreError>> {
        let inner = Arc::clone(&self.inner);
        let key = key.clone();
        self.chain.enqueue(async move {
            inner
                .mutate(move |accounts| {
                    match accounts.iter().position(|a| a.key.matches(&key)) {
                        Some(i) => Applied::Changed(Some(accounts.remove(i))),
                        None => Applied::Unchanged(None),
                    }
                })
                .await
        })
    }

    /// Replace the display info of the account matching `key`.
    ///
    /// Returns the updated account, or `None` if no account matches or the
    /// display info is already current.
    pub fn update_display_info(
        &self,
        key: &AccountKey,
        display_info: DisplayInfo,
    ) -> impl Future<Output = Result<Option<Account>, AccountStoreError>> {
        self.update_matching(key, move |account| {
            merge(account, Some(&display_info), None, None)
        })
    }

    /// Apply a property patch to the account matching `key`.
    ///
    /// Returns the updated account, or `None` if no account matches or the
    /// patch changes nothing.
    pub fn update_properties(
        &self,
        key: &AccountKey,
        properties: PropertiesPatch,
    ) -> impl Future<Output = Result<Option<Account>, AccountStoreError>> {
        self.update_matching(key, move |account| {
            merge(account, None, Some(&properties), None)
        })
    }

    /// Set the stale flag of the account matching `key`.
    ///
    /// Returns the updated account, or `None` if no account matches or the
    /// flag already has that value.
    pub fn update_state(
        &self,
        key: &AccountKey,
        stale: bool,
    ) -> impl Future<Output = Result<Option<Account>, AccountStoreError>> {
        self.update_matching(key, move |account| merge(account, None, None, Some(stale)))
    }

    /// Queue a merge into the first account matching `key`.
    fn update_matching<F>(
        &self,
        key: &AccountKey,
        update: F,
    ) -> impl Future<Output = Result<Option<Account>, AccountStoreError>>
    where
        F: FnOnce(&Account) -> Option<Account> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let key = key.clone();
        self.chain.enqueue(async move {
            inner
                .mutate(move |accounts| {
                    let Some(i) = accounts.iter().position(|a| a.key.matches(&key)) else {
                        return Applied::Unchanged(None);
                    };
                    match update(&accounts[i]) {
                        Some(merged) => {
                            accounts[i] = merged.clone();
                            Applied::Changed(Some(merged))
                        }
                        None => Applied::Unchanged(None),
                    }
                })
                .await
        })
    }
}

impl<S: AccountStorage> StoreInner<S> {
    /// Refresh from storage, apply `mutation` to a copy, persist and
    /// reconcile. Storage is only written when the mutation changed something.
    async fn mutate<T, F>(&self, mutation: F) -> Result<T, AccountStoreError>
    where
        F: FnOnce(&mut Vec<Account>) -> Applied<T>,
    {
        let mut working = self.refresh_accounts(true).await?;

        match mutation(&mut working) {
            Applied::Unchanged(value) => Ok(value),
            Applied::Changed(value) => {
                self.storage.store(&working).await?;
                self.reconcile(working);
                Ok(value)
            }
        }
    }

    async fn refresh_accounts(&self, force: bool) -> Result<Vec<Account>, AccountStoreError> {
        if !force {
            let cached = self.lock_baseline().clone();
            if let Some(baseline) = cached {
                return Ok(baseline);
            }
        }

        let latest = self.storage.load().await?.unwrap_or_default();
        Ok(self.reconcile(latest))
    }

    /// Diff `latest` against the baseline, adopt the result and publish the
    /// change, if any.
    fn reconcile(&self, latest: Vec<Account>) -> Vec<Account> {
        let outcome = {
            let mut baseline = self.lock_baseline();
            let outcome = sync(baseline.as_deref(), latest);
            *baseline = Some(outcome.accounts.clone());
            outcome
        };

        if let Some(change) = outcome.change {
            info!(
                store = %self.name,
                added = change.added.len(),
                modified = change.modified.len(),
                removed = change.removed.len(),
                "accounts changed"
            );
            if self.events.send(change).is_err() {
                debug!(store = %self.name, "no change subscribers");
            }
        }

        outcome.accounts
    }

    fn lock_baseline(&self) -> std::sync::MutexGuard<'_, Option<Vec<Account>>> {
        self.baseline.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
