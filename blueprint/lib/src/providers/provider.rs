use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use rig::providers::{anthropic, gemini, openai};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use super::client::ProviderClient;

/// Hosted LLM services a schema can be designed with.
///
/// The lowercase form (`gemini`, `openai`, `anthropic`) is what appears in
/// the configuration file.
#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    EnumIter,
    EnumString,
    IntoStaticStr,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provider {
    Gemini,
    OpenAi,
    Anthropic,
}

impl Provider {
    /// Returns the configuration for this provider.
    ///
    /// ## Panics
    ///
    /// Panics if the provider is not found in the configuration map.
    /// This should never happen as all providers must have configuration.
    pub fn config(&self) -> &'static ProviderConfig {
        PROVIDER_CONFIG
            .get(self)
            .expect("All providers must have config")
    }

    /// Key under `apiKeys` in the configuration file.
    pub fn api_key_field(&self) -> &'static str {
        self.config().api_key_field
    }

    /// Model used for every request to this provider.
    pub fn default_model(&self) -> &'static str {
        self.config().default_model
    }

    /// The lowercase identifier, e.g. `openai`.
    pub fn key(&self) -> &'static str {
        self.into()
    }

    /// All providers in menu order.
    pub fn all() -> Vec<Provider> {
        Provider::iter().collect()
    }

    /// Builds a client bound to the given API key.
    pub(crate) fn connect(&self, api_key: &str) -> Result<ProviderClient, String> {
        (self.config().connect)(api_key)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config().label)
    }
}

/// Everything that differs between providers.
///
/// Adding a provider means one new [`Provider`] variant and one entry in
/// [`PROVIDER_CONFIG`].
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Human-readable name
    pub label: &'static str,
    /// Key under `apiKeys` holding the credential
    pub api_key_field: &'static str,
    /// Fixed target model
    pub default_model: &'static str,
    /// Client constructor
    pub connect: fn(&str) -> Result<ProviderClient, String>,
}

fn connect_gemini(api_key: &str) -> Result<ProviderClient, String> {
    gemini::Client::builder()
        .api_key(api_key)
        .build()
        .map(ProviderClient::Gemini)
        .map_err(|e| e.to_string())
}

fn connect_openai(api_key: &str) -> Result<ProviderClient, String> {
    openai::Client::builder()
        .api_key(api_key)
        .build()
        .map(ProviderClient::OpenAi)
        .map_err(|e| e.to_string())
}

fn connect_anthropic(api_key: &str) -> Result<ProviderClient, String> {
    anthropic::Client::builder()
        .api_key(api_key)
        .build()
        .map(ProviderClient::Anthropic)
        .map_err(|e| e.to_string())
}

lazy_static! {
    /// Single source of truth for provider settings.
    pub static ref PROVIDER_CONFIG: HashMap<Provider, ProviderConfig> = {
        let mut m = HashMap::new();

        m.insert(Provider::Gemini, ProviderConfig {
            label: "Gemini",
            api_key_field: "gemini",
            default_model: "gemini-2.5-flash",
            connect: connect_gemini,
        });

        m.insert(Provider::OpenAi, ProviderConfig {
            label: "OpenAI",
            api_key_field: "openai",
            default_model: "gpt-4.1",
            connect: connect_openai,
        });

        m.insert(Provider::Anthropic, ProviderConfig {
            label: "Anthropic",
            api_key_field: "anthropic",
            default_model: "claude-sonnet-4-5",
            connect: connect_anthropic,
        });

        m
    };
}
