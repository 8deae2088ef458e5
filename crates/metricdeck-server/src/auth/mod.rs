//! Bearer-token verification.
//!
//! Tokens are checked against a [`KeySet`] served by a [`KeyCache`]. The
//! cache is an ordinary value owned by the verifier: it refreshes after its
//! TTL and can be invalidated explicitly (key rotation, tests).

pub mod key_cache;
pub mod middleware;

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use metricdeck_core::error::{MetricDeckError, Result};

pub use key_cache::KeyCache;
pub use middleware::require_bearer;

/// Identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub subject: String,
    pub key_id: String,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, bearer: &str) -> Result<Claims>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyEntry {
    pub id: String,
    pub token: String,
    pub subject: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeySet {
    #[serde(default)]
    pub keys: Vec<KeyEntry>,
}

impl KeySet {
    pub fn find(&self, token: &str) -> Option<&KeyEntry> {
        self.keys.iter().find(|k| k.token == token)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashMap::new();
        for key in &self.keys {
            if key.token.is_empty() {
                return Err(MetricDeckError::Parse(format!(
                    "key {} has an empty token",
                    key.id
                )));
            }
            if let Some(other) = seen.insert(key.token.as_str(), key.id.as_str()) {
                return Err(MetricDeckError::Parse(format!(
                    "keys {other} and {} share a token",
                    key.id
                )));
            }
        }
        Ok(())
    }
}

/// Where key sets come from.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch(&self) -> Result<KeySet>;
}

/// Reads a YAML `keys: [{id, token, subject}]` document on every fetch.
pub struct FileKeySource {
    path: PathBuf,
}

impl FileKeySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl KeySource for FileKeySource {
    async fn fetch(&self) -> Result<KeySet> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let set: KeySet = serde_yaml::from_str(&raw).map_err(|e| {
            MetricDeckError::Parse(format!("{}: invalid key set: {e}", self.path.display()))
        })?;
        set.validate()?;
        tracing::debug!(path = %self.path.display(), keys = set.len(), "key set fetched");
        Ok(set)
    }
}

/// Verifies tokens against the cached key set. An unknown token asks the
/// cache for one early refetch before it is rejected, so rotated keys are
/// picked up without waiting for the TTL. The cache's minimum refresh
/// interval bounds how often unknown tokens reach the key source.
pub struct KeySetVerifier {
    cache: KeyCache,
}

impl KeySetVerifier {
    pub fn new(cache: KeyCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &KeyCache {
        &self.cache
    }
}

#[async_trait]
impl TokenVerifier for KeySetVerifier {
    async fn verify(&self, bearer: &str) -> Result<Claims> {
        let lookup = |set: &KeySet| {
            set.find(bearer).map(|k| Claims {
                subject: k.subject.clone(),
                key_id: k.id.clone(),
            })
        };

        if let Some(claims) = lookup(&*self.cache.get().await?) {
            return Ok(claims);
        }

        match lookup(&*self.cache.refresh().await?) {
            Some(claims) => Ok(claims),
            None => Err(MetricDeckError::AuthFailed),
        }
    }
}
