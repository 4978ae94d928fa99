//! Field-level merge of account updates.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::models::{Account, DisplayInfo};

/// Property updates to apply to an account.
///
/// `Some(value)` adds or overwrites a property; `None` deletes it. Properties
/// not named in the patch are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertiesPatch {
    changes: BTreeMap<String, Option<Value>>,
}

impl PropertiesPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite `name`.
    pub fn set(mut self, name: impl Into<String>, value: Value) -> Self {
        self.changes.insert(name.into(), Some(value));
        self
    }

    /// Delete `name`.
    pub fn delete(mut self, name: impl Into<String>) -> Self {
        self.changes.insert(name.into(), None);
        self
    }

    /// Set every property in `properties`, deleting nothing.
    pub fn from_properties(properties: &Map<String, Value>) -> Self {
        Self {
            changes: properties
                .iter()
                .map(|(name, value)| (name.clone(), Some(value.clone())))
                .collect(),
        }
    }

    /// Turn `current` into exactly `latest`: set everything in `latest` and
    /// delete what only `current` has.
    pub fn replacing(current: &Map<String, Value>, latest: &Map<String, Value>) -> Self {
        let mut patch = Self::from_properties(latest);
        for name in current.keys().filter(|name| !latest.contains_key(*name)) {
            patch.changes.insert(name.clone(), None);
        }
        patch
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<Value>)> {
        self.changes.iter()
    }
}

/// Apply updates to `account`.
///
/// Returns `None` when nothing would change, otherwise a new account with the
/// updates applied. `account` itself is never modified.
///
/// - `display_info` replaces the current one wholesale if it differs.
/// - `properties` is applied key by key (see [`PropertiesPatch`]).
/// - `stale` replaces the flag if it differs.
pub fn merge(
    account: &Account,
    display_info: Option<&DisplayInfo>,
    properties: Option<&PropertiesPatch>,
    stale: Option<bool>,
) -> Option<Account> {
    let mut merged = account.clone();
    let mut has_changes = false;

    if let Some(info) = display_info {
        if *info != merged.display_info {
            merged.display_info = info.clone();
            has_changes = true;
        }
    }

    if let Some(patch) = properties {
        for (name, change) in patch.iter() {
            match change {
                Some(value) => {
                    if merged.properties.get(name) != Some(value) {
                        merged.properties.insert(name.clone(), value.clone());
                        has_changes = true;
                    }
                }
                None => {
                    if merged.properties.remove(name).is_some() {
                        has_changes = true;
                    }
                }
            }
        }
    }

    if let Some(stale) = stale {
        if stale != merged.is_stale {
            merged.is_stale = stale;
            has_changes = true;
        }
    }

    has_changes.then_some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountKey;
    use serde_json::json;

    fn account() -> Account {
        Account::new(
            AccountKey::new("azure", "user-1"),
            DisplayInfo::new("user@contoso.com").with_contextual_display_name("Contoso"),
        )
        .with_property("tenant", json!("t-1"))
        .with_property("region", json!("west"))
    }

    #[test]
    fn test_no_updates_is_none() {
        assert!(merge(&account(), None, None, None).is_none());
    }

    #[test]
    fn test_same_values_is_none() {
        let a = account();
        let patch = PropertiesPatch::new().set("tenant", json!("t-1"));
        assert!(merge(&a, Some(&a.display_info), Some(&patch), Some(false)).is_none());
    }

    #[test]
    fn test_display_info_replaced_wholesale() {
        let a = account();
        let info = DisplayInfo::new("user@contoso.com")
            .with_contextual_display_name("Contoso")
            .with_contextual_logo("light.svg", "dark.svg");

        let merged = merge(&a, Some(&info), None, None).unwrap();
        assert_eq!(merged.display_info, info);
        assert_eq!(merged.properties, a.properties);
    }

    #[test]
    fn test_properties_add_overwrite_delete() {
        let a = account();
        let patch = PropertiesPatch::new()
            .set("tenant", json!("t-2"))
            .set("home", json!({"id": 7}))
            .delete("region");

        let merged = merge(&a, None, Some(&patch), None).unwrap();
        assert_eq!(merged.properties.get("tenant"), Some(&json!("t-2")));
        assert_eq!(merged.properties.get("home"), Some(&json!({"id": 7})));
        assert!(merged.properties.get("region").is_none());
    }

    #[test]
    fn test_deleting_absent_property_is_none() {
        let patch = PropertiesPatch::new().delete("never-there");
        assert!(merge(&account(), None, Some(&patch), None).is_none());
    }

    #[test]
    fn test_stale_flag() {
        let a = account();
        assert!(merge(&a, None, None, Some(false)).is_none());
        let merged = merge(&a, None, None, Some(true)).unwrap();
        assert!(merged.is_stale);
    }

    #[test]
    fn test_input_untouched() {
        let a = account();
        let before = a.clone();
        let _ = merge(&a, None, Some(&PropertiesPatch::new().delete("tenant")), Some(true));
        assert_eq!(a, before);
    }

    #[test]
    fn test_replacing_patch() {
        let current = account().properties;
        let latest = Account::new(AccountKey::new("azure", "user-1"), DisplayInfo::default())
            .with_property("tenant", json!("t-1"))
            .properties;

        let patch = PropertiesPatch::replacing(&current, &latest);
        let changes: Vec<_> = patch.iter().collect();
        assert_eq!(changes.len(), 2);
        assert!(changes.contains(&(&"region".to_string(), &None)));
        assert!(changes.contains(&(&"tenant".to_string(), &Some(json!("t-1")))));
    }
}
