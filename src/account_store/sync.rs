//! Diffing the persisted account list against the in-memory baseline.

use crate::models::Account;

use super::merge::{merge, PropertiesPatch};

/// One account whose stored version differs from the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountModification {
    pub before: Account,
    pub after: Account,
}

/// What changed between two reconciliations. Never published empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountChangeEvent {
    pub added: Vec<Account>,
    pub modified: Vec<AccountModification>,
    pub removed: Vec<Account>,
}

impl AccountChangeEvent {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }
}

/// Result of reconciling a latest list against a baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    /// The reconciled list; becomes the new baseline
    pub accounts: Vec<Account>,
    /// `None` when nothing changed
    pub change: Option<AccountChangeEvent>,
}

/// Reconcile `latest` against `baseline`.
///
/// Without a baseline `latest` is adopted as-is and no change is reported.
/// Otherwise each latest account is either new (added), differs from its
/// baseline counterpart (modified, merged version kept) or is unchanged (the
/// baseline version is kept). Baseline accounts missing from `latest` are
/// reported as removed.
pub fn sync(baseline: Option<&[Account]>, latest: Vec<Account>) -> SyncOutcome {
    let baseline = match baseline {
        Some(baseline) => baseline,
        None => {
            return SyncOutcome {
                accounts: latest,
                change: None,
            }
        }
    };

    let mut change = AccountChangeEvent::default();
    let mut accounts = Vec::with_capacity(latest.len());

    for account in latest {
        match baseline.iter().find(|known| known.key.matches(&account.key)) {
            None => {
                change.added.push(account.clone());
                accounts.push(account);
            }
            Some(known) => {
                let patch = PropertiesPatch::replacing(&known.properties, &account.properties);
                match merge(
                    known,
                    Some(&account.display_info),
                    Some(&patch),
                    Some(account.is_stale),
                ) {
                    Some(merged) => {
                        change.modified.push(AccountModification {
                            before: known.clone(),
                            after: merged.clone(),
                        });
                        accounts.push(merged);
                    }
                    None => accounts.push(known.clone()),
                }
            }
        }
    }

    change.removed = baseline
        .iter()
        .filter(|known| !accounts.iter().any(|a| a.key.matches(&known.key)))
        .cloned()
        .collect();

    SyncOutcome {
        accounts,
        change: (!change.is_empty()).then_some(change),
    }
}
