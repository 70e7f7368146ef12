//! Interactive first-run setup.

use tracing::{info, warn};

use super::store::ConfigStore;
use super::types::Config;
use crate::error::BlueprintError;
use crate::interaction::Prompter;
use crate::providers::Provider;

/// Asks for a provider and its API key, then persists and returns the config.
///
/// When a config already exists at the store's path, keys stored for the
/// other providers are carried over.
///
/// ## Errors
///
/// Returns `Interaction` when a prompt is aborted and `ConfigWrite` when the
/// file cannot be saved.
pub fn run_first_run_wizard<P: Prompter>(
    prompter: &mut P,
    store: &ConfigStore,
) -> Result<Config, BlueprintError> {
    let providers = Provider::all();
    let labels: Vec<String> = providers.iter().map(ToString::to_string).collect();

    prompter.show("Let's configure your LLM provider.");
    let choice = prompter.select("Which provider should design your schemas?", &labels)?;
    let provider = providers
        .get(choice)
        .copied()
        .ok_or_else(|| BlueprintError::Interaction(format!("no provider at index {choice}")))?;

    let api_key = loop {
        let key = prompter.secret(&format!("{provider} API key:"))?;
        let key = key.trim();
        if !key.is_empty() {
            break key.to_string();
        }
        warn!("empty API key entered");
        prompter.show("The API key cannot be empty.");
    };

    let mut config = match store.read() {
        Ok(existing) => existing,
        Err(_) => Config::new(provider, api_key.clone()),
    };
    config.llm_provider = provider;
    config.set_api_key(provider, api_key);

    store.write(&config)?;
    info!(provider = provider.key(), "provider configured");
    prompter.show(&format!(
        "Saved configuration to {}",
        store.path().display()
    ));

    Ok(config)
}
