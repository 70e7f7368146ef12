//! Model-call adapter: turns ideas and change requests into schemas.
//!
//! Each operation is one structured-output exchange with the configured
//! provider. Nothing is retried; failures are mapped onto
//! [`BlueprintError`] variants with user-facing messages.

use std::fmt;
use std::future::Future;

use rig::extractor::ExtractionError;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::BlueprintError;
use crate::providers::{Provider, ProviderClient};
use crate::schema::{AbstractSchema, ValidationError, ValidationIssue};

/// Embedded system instructions
mod prompts {
    pub const GENERATE: &str = include_str!("../prompts/generate.md");
    pub const REVISE: &str = include_str!("../prompts/revise.md");
}

/// The two model calls, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Revise,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Generate => f.write_str("generate schema"),
            Operation::Revise => f.write_str("revise schema"),
        }
    }
}

/// Something that can propose and revise schemas.
///
/// The revision loop is generic over this so it can run against a live
/// provider or a scripted stand-in.
pub trait SchemaDesigner {
    /// Proposes a schema for an application idea.
    fn generate_schema(
        &self,
        idea: &str,
    ) -> impl Future<Output = Result<AbstractSchema, BlueprintError>>;

    /// Returns the complete schema after applying `request` to `schema`.
    fn revise_schema(
        &self,
        schema: &AbstractSchema,
        request: &str,
    ) -> impl Future<Output = Result<AbstractSchema, BlueprintError>>;
}

/// [`SchemaDesigner`] backed by a hosted model.
pub struct SchemaArchitect {
    provider: Provider,
    model: &'static str,
    client: ProviderClient,
}

impl SchemaArchitect {
    /// Builds an architect for the provider selected in `config`.
    ///
    /// No network traffic happens here.
    ///
    /// ## Errors
    ///
    /// - `CredentialMissing` when the selected provider has no stored key
    /// - `ClientBuild` when the provider client cannot be constructed
    pub fn from_config(config: &Config) -> Result<Self, BlueprintError> {
        let provider = config.llm_provider;
        let api_key = config
            .api_key(provider)
            .ok_or(BlueprintError::CredentialMissing { provider })?;

        let client = provider
            .connect(api_key)
            .map_err(|reason| BlueprintError::ClientBuild { provider, reason })?;

        let model = provider.default_model();
        info!(provider = provider.key(), model, "using model");
        Ok(Self {
            provider,
            model,
            client,
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        self.model
    }

    #[instrument(skip(self, preamble, prompt), fields(provider = self.provider.key(), model = self.model))]
    async fn request(
        &self,
        operation: Operation,
        preamble: &str,
        prompt: &str,
    ) -> Result<AbstractSchema, BlueprintError> {
        debug!(prompt_len = prompt.len(), "sending structured-output request");

        let reply = self
            .client
            .extract_schema(self.model, preamble, prompt)
            .await
            .map_err(|e| map_extraction_error(self.provider, operation, e))?;

        let schema = reply.validate()?;
        debug!(models = schema.models.len(), "received schema");
        Ok(schema)
    }
}

impl SchemaDesigner for SchemaArchitect {
    async fn generate_schema(&self, idea: &str) -> Result<AbstractSchema, BlueprintError> {
        self.request(Operation::Generate, prompts::GENERATE, &generation_prompt(idea))
            .await
    }

    async fn revise_schema(
        &self,
        schema: &AbstractSchema,
        request: &str,
    ) -> Result<AbstractSchema, BlueprintError> {
        self.request(
            Operation::Revise,
            prompts::REVISE,
            &revision_prompt(schema, request),
        )
        .await
    }
}

/// User instruction for the generate call, embedding the idea verbatim.
pub fn generation_prompt(idea: &str) -> String {
    format!(
        "Design the database schema for the following application idea.\n\n\
         Application idea:\n{idea}\n"
    )
}

/// User instruction for the revise call.
///
/// Embeds the current schema as pretty JSON followed by the change request
/// verbatim.
pub fn revision_prompt(schema: &AbstractSchema, request: &str) -> String {
    format!(
        "Here is the current database schema:\n\n```json\n{}\n```\n\n\
         Revise it according to this change request:\n{request}\n",
        schema.to_pretty_json()
    )
}

/// Error codes providers put in their JSON error bodies.
const AUTH_CODES: &[&str] = &[
    "401",
    "invalid_api_key",
    "authentication_error",
    "unauthenticated",
    "api_key_invalid",
];
const RATE_CODES: &[&str] = &[
    "429",
    "rate_limit_exceeded",
    "rate_limit_error",
    "insufficient_quota",
    "resource_exhausted",
];

/// Human-readable wording of the same failures.
const AUTH_PHRASES: &[&str] = &[
    "unauthorized",
    "invalid api key",
    "incorrect api key",
    "api key not valid",
    "invalid x-api-key",
];
const RATE_PHRASES: &[&str] = &["rate limit", "too many requests", "exceeded your current quota"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureKind {
    Auth,
    RateLimit,
}

/// Maps a transport failure message onto a user-facing error.
///
/// When the message carries a provider's JSON error body, its `code`,
/// `status`, `type` and detail `reason` fields decide; otherwise the text is
/// searched. Auth failures become `AuthFailure`, throttling and exhausted
/// quota `RateLimited`, and anything else is wrapped with the operation name.
///
/// ## Examples
///
/// ```
/// use blueprint_lib::architect::{classify_failure, Operation};
/// use blueprint_lib::providers::Provider;
/// use blueprint_lib::BlueprintError;
///
/// let err = classify_failure(Provider::OpenAi, Operation::Generate, "HTTP 429 Too Many Requests");
/// assert!(matches!(err, BlueprintError::RateLimited { .. }));
///
/// let body = r#"ProviderError: {"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
/// let err = classify_failure(Provider::Anthropic, Operation::Revise, body);
/// assert!(matches!(err, BlueprintError::AuthFailure { .. }));
/// ```
pub fn classify_failure(provider: Provider, operation: Operation, message: &str) -> BlueprintError {
    let kind = match error_body(message) {
        Some(body) => classify_body(&body),
        None => classify_text(&message.to_lowercase(), true),
    };

    match kind {
        Some(FailureKind::Auth) => BlueprintError::AuthFailure { provider },
        Some(FailureKind::RateLimit) => BlueprintError::RateLimited { provider },
        None => BlueprintError::Provider {
            operation,
            message: message.to_string(),
        },
    }
}

/// The first JSON object embedded in `message`, if any.
fn error_body(message: &str) -> Option<Value> {
    let start = message.find('{')?;
    let body = serde_json::Deserializer::from_str(&message[start..])
        .into_iter::<Value>()
        .next()?
        .ok()?;
    body.is_object().then_some(body)
}

fn classify_body(body: &Value) -> Option<FailureKind> {
    let error = body.get("error").unwrap_or(body);

    let mut codes: Vec<String> = ["code", "status", "type"]
        .iter()
        .filter_map(|key| error.get(key))
        .filter_map(|value| match value {
            Value::String(s) => Some(s.to_lowercase()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect();
    if let Some(details) = error.get("details").and_then(Value::as_array) {
        codes.extend(
            details
                .iter()
                .filter_map(|detail| detail.get("reason").and_then(Value::as_str))
                .map(str::to_lowercase),
        );
    }

    if codes.iter().any(|code| AUTH_CODES.contains(&code.as_str())) {
        return Some(FailureKind::Auth);
    }
    if codes.iter().any(|code| RATE_CODES.contains(&code.as_str())) {
        return Some(FailureKind::RateLimit);
    }

    // Numbers inside a provider's prose (token counts, limits) are not status codes.
    let text = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase();
    classify_text(&text, false)
}

fn classify_text(lower: &str, with_codes: bool) -> Option<FailureKind> {
    let mentions = |codes: &[&str], phrases: &[&str]| {
        phrases.iter().any(|p| lower.contains(p))
            || (with_codes && codes.iter().any(|c| lower.contains(c)))
    };

    if mentions(AUTH_CODES, AUTH_PHRASES) {
        Some(FailureKind::Auth)
    } else if mentions(RATE_CODES, RATE_PHRASES) {
        Some(FailureKind::RateLimit)
    } else {
        None
    }
}

fn map_extraction_error(
    provider: Provider,
    operation: Operation,
    err: ExtractionError,
) -> BlueprintError {
    match err {
        ExtractionError::CompletionError(e) => classify_failure(provider, operation, &e.to_string()),
        other => BlueprintError::Validation(ValidationError {
            issues: vec![ValidationIssue::new("$", other.to_string())],
        }),
    }
}
