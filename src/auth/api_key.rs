//! API key authentication for gateway clients.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

/// The client an API key belongs to.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Key identifier from config.
    pub key_id: String,
    pub name: String,
    pub client_id: String,
}

/// Validates API keys against the configured set.
///
/// Keys are held only as SHA-256 digests.
#[derive(Clone, Default)]
pub struct ApiKeyValidator {
    keys: Arc<HashMap<String, ApiClient>>,
}

impl ApiKeyValidator {
    pub fn new(configured_keys: Vec<ConfiguredApiKey>) -> Self {
        let keys = configured_keys
            .into_iter()
            .map(|key| {
                (
                    Self::hash_key(&key.key),
                    ApiClient {
                        key_id: key.id,
                        name: key.name,
                        client_id: key.client_id,
                    },
                )
            })
            .collect();

        Self {
            keys: Arc::new(keys),
        }
    }

    pub fn hash_key(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Look up the client for a presented key.
    pub fn validate(&self, key: &str) -> Option<ApiClient> {
        self.keys.get(&Self::hash_key(key)).cloned()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

/// API key configuration from config file.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ConfiguredApiKey {
    pub id: String,
    /// The actual API key value.
    pub key: String,
    pub name: String,
    pub client_id: String,
}
