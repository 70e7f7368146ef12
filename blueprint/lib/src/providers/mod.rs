//! Provider lookup table and rig-core client construction.

mod client;
mod provider;

pub use client::{ProviderClient, SchemaReply};
pub use provider::{PROVIDER_CONFIG, Provider, ProviderConfig};
