//! Error types for the blueprint library.

use std::path::PathBuf;

use thiserror::Error;

use crate::architect::Operation;
use crate::providers::Provider;
use crate::schema::ValidationError;

/// Everything that can end a blueprint run.
///
/// Invalid interactive input never shows up here; it is handled by
/// re-prompting.
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// No configuration file at the expected location.
    #[error("no configuration found at {}; run `blueprint config` to create one", path.display())]
    ConfigMissing { path: PathBuf },

    /// The configuration file exists but lacks required settings.
    #[error("configuration at {} is invalid: {reason}", path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    /// Writing the configuration file failed.
    #[error("failed to write configuration to {}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The selected provider has no stored API key.
    #[error("no API key stored for {provider}; run `blueprint config` to add one")]
    CredentialMissing { provider: Provider },

    /// The provider rejected the stored API key.
    #[error("invalid API key for {provider}; run `blueprint config` to update it")]
    AuthFailure { provider: Provider },

    /// The provider is throttling requests.
    #[error("rate limited by {provider}; wait a moment and try again")]
    RateLimited { provider: Provider },

    /// The model reply did not have the abstract schema shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Any other failure talking to the provider.
    #[error("failed to {operation}: {message}")]
    Provider { operation: Operation, message: String },

    /// The provider client could not be constructed.
    #[error("failed to build {provider} client: {reason}")]
    ClientBuild { provider: Provider, reason: String },

    /// A prompt was aborted or the terminal is unavailable.
    #[error("interactive prompt failed: {0}")]
    Interaction(String),

    /// Writing the approved design failed.
    #[error("failed to write output to {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
