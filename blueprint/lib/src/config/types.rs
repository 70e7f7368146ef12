//! The persisted settings record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::providers::Provider;

/// Persisted settings: which provider to use and the stored credentials.
///
/// Only the selected provider's key is guaranteed to be present.
///
/// ```yaml
/// llmProvider: openai
/// apiKeys:
///   openai: sk-...
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub llm_provider: Provider,
    pub api_keys: BTreeMap<String, Option<String>>,
}

impl Config {
    /// Creates a config selecting `provider` with its credential.
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        let mut config = Self {
            llm_provider: provider,
            api_keys: BTreeMap::new(),
        };
        config.set_api_key(provider, api_key);
        config
    }

    /// The stored, non-blank credential for `provider`.
    pub fn api_key(&self, provider: Provider) -> Option<&str> {
        self.api_keys
            .get(provider.api_key_field())
            .and_then(|key| key.as_deref())
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn set_api_key(&mut self, provider: Provider, api_key: impl Into<String>) {
        self.api_keys
            .insert(provider.api_key_field().to_string(), Some(api_key.into()));
    }
}
