//! Core types: the credentials bag handed to handlers and the identity
//! they produce

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

use crate::error::{AuthError, Result};

/// Open-ended credentials submitted for authentication
///
/// Keys are interpreted by handlers by convention, e.g. `username` and
/// `password` for the password strategy or `token` for bearer tokens.
/// The manager and dispatcher never look inside.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials {
    fields: Map<String, Value>,
}

impl Credentials {
    /// Create an empty credentials bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set a field in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Build credentials from a JSON object
    ///
    /// Anything other than an object is rejected.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(AuthError::InvalidFormat(format!(
                "credentials must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Get a raw field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a field if it is a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Check whether a field is present
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Field names, in key order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// Values are secrets; only keys are printed.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for key in self.fields.keys() {
            map.entry(key, &"<redacted>");
        }
        map.finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Credentials {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<Map<String, Value>> for Credentials {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// An authenticated identity
///
/// This is the successful outcome of an authentication attempt:
/// - The principal identifier, prefixed by strategy
///   (e.g. `"password:alice"`, `"oidc:https://idp.example.com#user123"`)
/// - Claims extracted from the credential
/// - Expiration time and scopes, if the credential carried them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Principal identifier
    pub principal: String,

    /// Claims extracted from the credential
    #[serde(default)]
    pub claims: HashMap<String, Value>,

    /// When the identity stops being valid (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Allowed scopes
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Issuer of the underlying credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Strategy that authenticated this identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticated_by: Option<String>,
}

impl Identity {
    pub fn new(principal: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            claims: HashMap::new(),
            expires_at: None,
            scopes: Vec::new(),
            issuer: None,
            authenticated_by: None,
        }
    }

    /// Set expiration time
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Add a claim
    pub fn with_claim(mut self, key: impl Into<String>, value: Value) -> Self {
        self.claims.insert(key.into(), value);
        self
    }

    /// Set scopes
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Set issuer
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Record which strategy produced this identity
    pub fn authenticated_by(mut self, strategy: impl Into<String>) -> Self {
        self.authenticated_by = Some(strategy.into());
        self
    }

    /// Check if the identity is expired
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| exp < Utc::now())
    }
}
