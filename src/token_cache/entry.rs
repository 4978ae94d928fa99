//! Token cache entries and partial-match queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One cached OAuth token.
///
/// The cache only interprets the four identity fields and `expires_on`;
/// everything else the provider stores (access token, refresh token, token
/// type, ...) rides along in `extra` and is written back untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenCacheEntry {
    pub authority: String,
    pub client_id: String,
    pub user_id: String,
    pub resource: String,
    pub expires_on: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The slot an entry occupies. Two entries with equal identities replace
/// each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryIdentity<'a> {
    pub authority: &'a str,
    pub client_id: &'a str,
    pub user_id: &'a str,
    pub resource: &'a str,
}

impl TokenCacheEntry {
    pub fn new(
        authority: impl Into<String>,
        client_id: impl Into<String>,
        user_id: impl Into<String>,
        resource: impl Into<String>,
        expires_on: DateTime<Utc>,
    ) -> Self {
        Self {
            authority: authority.into(),
            client_id: client_id.into(),
            user_id: user_id.into(),
            resource: resource.into(),
            expires_on,
            extra: Map::new(),
        }
    }

    /// Attach a provider-specific field.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    pub fn identity(&self) -> EntryIdentity<'_> {
        EntryIdentity {
            authority: &self.authority,
            client_id: &self.client_id,
            user_id: &self.user_id,
            resource: &self.resource,
        }
    }

    /// Whether `other` occupies the same slot as this entry.
    pub fn same_slot(&self, other: &TokenCacheEntry) -> bool {
        self.identity() == other.identity()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_on <= Utc::now()
    }

    /// The serialized value of field `name`, as a query would see it.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "authority" => Some(Value::String(self.authority.clone())),
            "clientId" => Some(Value::String(self.client_id.clone())),
            "userId" => Some(Value::String(self.user_id.clone())),
            "resource" => Some(Value::String(self.resource.clone())),
            "expiresOn" => serde_json::to_value(self.expires_on).ok(),
            other => self.extra.get(other).cloned(),
        }
    }
}

/// A partial field mapping. An entry matches when every field in the query
/// equals the entry's field of the same (serialized) name. An empty query
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenQuery {
    fields: Map<String, Value>,
}

impl TokenQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authority(self, authority: impl Into<String>) -> Self {
        self.field("authority", Value::String(authority.into()))
    }

    pub fn client_id(self, client_id: impl Into<String>) -> Self {
        self.field("clientId", Value::String(client_id.into()))
    }

    pub fn user_id(self, user_id: impl Into<String>) -> Self {
        self.field("userId", Value::String(user_id.into()))
    }

    pub fn resource(self, resource: impl Into<String>) -> Self {
        self.field("resource", Value::String(resource.into()))
    }

    /// Match on any field by its serialized name.
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn matches(&self, entry: &TokenCacheEntry) -> bool {
        self.fields
            .iter()
            .all(|(name, expected)| entry.field(name).as_ref() == Some(expected))
    }
}

impl From<Map<String, Value>> for TokenQuery {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
