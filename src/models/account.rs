use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity of an account across providers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccountKey {
    /// Provider that owns the account (e.g. "azurePublicCloud")
    pub provider_id: String,
    /// Provider-scoped account identifier
    pub account_id: String,
    /// Extra provider arguments that take part in identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_args: Option<BTreeMap<String, String>>,
}

impl AccountKey {
    pub fn new(provider_id: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            account_id: account_id.into(),
            provider_args: None,
        }
    }

    /// Attach a provider argument.
    pub fn with_provider_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.provider_args
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Whether two keys name the same account.
    ///
    /// Provider ids and account ids must be equal. When either side carries
    /// provider args, every arg on both sides must have the same value on the
    /// other side; a missing args map counts as empty.
    pub fn matches(&self, other: &AccountKey) -> bool {
        if self.provider_id != other.provider_id {
            return false;
        }

        if self.provider_args.is_some() || other.provider_args.is_some() {
            let empty = BTreeMap::new();
            let mine = self.provider_args.as_ref().unwrap_or(&empty);
            let theirs = other.provider_args.as_ref().unwrap_or(&empty);
            if mine != theirs {
                return false;
            }
        }

        self.account_id == other.account_id
    }
}

/// Light and dark variants of an account's provider logo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ContextualLogo {
    pub light: String,
    pub dark: String,
}

/// How an account is presented to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DisplayInfo {
    /// Primary name, usually the user's email
    pub display_name: String,
    /// Secondary line, usually the tenant or cloud
    #[serde(default)]
    pub contextual_display_name: String,
    #[serde(default)]
    pub contextual_logo: ContextualLogo,
}

impl DisplayInfo {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    pub fn with_contextual_display_name(mut self, name: impl Into<String>) -> Self {
        self.contextual_display_name = name.into();
        self
    }

    pub fn with_contextual_logo(mut self, light: impl Into<String>, dark: impl Into<String>) -> Self {
        self.contextual_logo = ContextualLogo {
            light: light.into(),
            dark: dark.into(),
        };
        self
    }
}

/// A persisted signed-in identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub key: AccountKey,
    pub display_info: DisplayInfo,
    /// Provider-specific data (tenants, home account id, ...)
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Set when the provider can no longer produce tokens for this account
    #[serde(default)]
    pub is_stale: bool,
}

impl Account {
    pub fn new(key: AccountKey, display_info: DisplayInfo) -> Self {
        Self {
            key,
            display_info,
            properties: Map::new(),
            is_stale: false,
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn with_stale(mut self, stale: bool) -> Self {
        self.is_stale = stale;
        self
    }
}
