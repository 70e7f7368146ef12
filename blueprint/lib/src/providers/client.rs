//! Thin wrapper over the rig-core provider clients.

use std::borrow::Cow;

use rig::client::CompletionClient;
use rig::extractor::ExtractionError;
use rig::providers::{anthropic, gemini, openai};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{AbstractSchema, ValidationError, validate};

/// A raw structured-output reply.
///
/// Advertised to the model with the [`AbstractSchema`] shape, but decoded as
/// plain JSON so [`SchemaReply::validate`] can report every problem instead
/// of the first one serde trips over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaReply(pub Value);

impl JsonSchema for SchemaReply {
    fn schema_name() -> Cow<'static, str> {
        AbstractSchema::schema_name()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        AbstractSchema::json_schema(generator)
    }
}

impl SchemaReply {
    /// Checks the reply and converts it into a typed schema.
    ///
    /// ## Errors
    ///
    /// Returns a [`ValidationError`] listing every missing or mistyped property.
    pub fn validate(&self) -> Result<AbstractSchema, ValidationError> {
        validate(&self.0)
    }
}

impl From<Value> for SchemaReply {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A connected client for one of the supported providers.
pub enum ProviderClient {
    /// Google Gemini client
    Gemini(gemini::Client),
    /// OpenAI client (Responses API)
    OpenAi(openai::Client),
    /// Anthropic Claude client
    Anthropic(anthropic::Client),
}

impl ProviderClient {
    /// Issues one structured-output request constrained to the
    /// [`AbstractSchema`] shape.
    ///
    /// `preamble` becomes the system instruction and `prompt` the user
    /// instruction.
    ///
    /// ## Errors
    ///
    /// Returns the extractor's error unchanged; callers classify it.
    pub async fn extract_schema(
        &self,
        model: &str,
        preamble: &str,
        prompt: &str,
    ) -> Result<SchemaReply, ExtractionError> {
        match self {
            ProviderClient::Gemini(client) => extract(client, model, preamble, prompt).await,
            ProviderClient::OpenAi(client) => extract(client, model, preamble, prompt).await,
            ProviderClient::Anthropic(client) => extract(client, model, preamble, prompt).await,
        }
    }
}

async fn extract<C>(
    client: &C,
    model: &str,
    preamble: &str,
    prompt: &str,
) -> Result<SchemaReply, ExtractionError>
where
    C: CompletionClient,
{
    let extractor = client
        .extractor::<SchemaReply>(model)
        .preamble(preamble)
        .build();
    extractor.extract(prompt.to_string()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_advertises_the_abstract_schema_shape() {
        let reply = serde_json::to_value(schemars::schema_for!(SchemaReply)).unwrap();
        let schema = serde_json::to_value(schemars::schema_for!(AbstractSchema)).unwrap();
        assert_eq!(reply, schema);
        assert_eq!(reply["required"], json!(["models"]));
    }

    #[test]
    fn any_json_decodes_into_a_reply() {
        let reply: SchemaReply = serde_json::from_value(json!({ "tables": "nope" })).unwrap();
        assert_eq!(reply.0, json!({ "tables": "nope" }));
        assert!(reply.validate().is_err());
    }
}
